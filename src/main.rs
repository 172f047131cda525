use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use routediv::runtime::config::{load_search_config, parse_algorithms, SearchConfig};
use routediv::runtime::logging::init_logging;
use routediv::runtime::topology::{load_topology, TopologyFormat};
use routediv::{search_routes, RouteSearchRequest, SearchAlgorithm, SearchResult};
use serde_json::{json, Value};

#[derive(Debug, Parser)]
#[command(name = "routediv")]
#[command(about = "Enumerate interior-disjoint routes between two routers")]
struct Args {
    #[arg(long)]
    topology: PathBuf,
    #[arg(long)]
    source: u32,
    #[arg(long)]
    target: u32,
    /// bellman-ford, wave, ant, a comma separated list, or all
    #[arg(long)]
    algorithm: Option<String>,
    #[arg(long)]
    config: Option<PathBuf>,
    /// text or json; guessed from the file extension when omitted
    #[arg(long)]
    format: Option<String>,
    #[arg(long)]
    trials: Option<usize>,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    output_json: Option<PathBuf>,
    #[arg(long)]
    log_level: Option<String>,
}

fn resolve_config(args: &Args) -> Result<SearchConfig> {
    let cfg = match args.config.as_ref() {
        Some(path) => load_search_config(path)?,
        None => SearchConfig::default(),
    };
    apply_overrides(cfg, args)
}

fn apply_overrides(mut cfg: SearchConfig, args: &Args) -> Result<SearchConfig> {
    if let Some(raw) = args.algorithm.as_deref() {
        cfg.algorithms = parse_algorithms(raw)?;
    }
    if let Some(trials) = args.trials {
        cfg.ant.trials = trials;
    }
    if args.seed.is_some() {
        cfg.seed = args.seed;
    }
    if let Some(level) = args.log_level.as_ref() {
        cfg.log_level = level.clone();
    }
    Ok(cfg)
}

fn run_entry(algorithm: SearchAlgorithm, result: &SearchResult) -> Value {
    json!({
        "algorithm": algorithm,
        "routes": &result.routes,
    })
}

fn build_payload(args: &Args, cfg: &SearchConfig, runs: Vec<Value>) -> Value {
    json!({
        "config": {
            "topology": &args.topology,
            "source": args.source,
            "target": args.target,
            "algorithms": &cfg.algorithms,
            "trials": cfg.ant.trials,
            "seed": cfg.seed,
        },
        "runs": runs,
    })
}

fn print_routes(algorithm: &str, result: &SearchResult) {
    println!("== {algorithm} ==");
    if result.is_empty() {
        println!("No paths found!");
        return;
    }
    for (index, route) in result.iter().enumerate() {
        println!("Path {} {:?} has cost {}", index, route.nodes, route.cost);
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let cfg = resolve_config(&args)?;
    init_logging(&cfg.log_level)?;

    let format = args
        .format
        .as_deref()
        .map(str::parse::<TopologyFormat>)
        .transpose()?;
    let topology = load_topology(&args.topology, format)?;
    let mut rng = cfg.rng();
    let graph = topology.build_graph(&mut rng)?;
    let request = RouteSearchRequest {
        source: args.source,
        target: args.target,
    };

    let mut runs: Vec<Value> = Vec::new();
    for algorithm in &cfg.algorithms {
        let result = search_routes(&graph, request, &cfg.strategy(*algorithm), &mut rng)
            .with_context(|| format!("{algorithm} search failed"))?;
        if args.output_json.is_none() {
            print_routes(algorithm.name(), &result);
        }
        runs.push(run_entry(*algorithm, &result));
    }

    if let Some(path) = args.output_json.as_ref() {
        let payload = build_payload(&args, &cfg, runs);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_vec_pretty(&payload)?)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use routediv::runtime::config::parse_search_config;
    use routediv::RoutePath;

    use super::*;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec![
            "routediv",
            "--topology",
            "net/topo.txt",
            "--source",
            "1",
            "--target",
            "3",
        ];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).expect("valid arguments")
    }

    #[test]
    fn flags_override_config_values() {
        let cfg = parse_search_config(
            "algorithm: wave\nant:\n  trials: 50\n  seed: 4\nlog_level: warn\n",
        )
        .expect("valid config");
        let flags = args(&[
            "--algorithm",
            "all",
            "--trials",
            "9",
            "--seed",
            "12",
            "--log-level",
            "debug",
        ]);
        let cfg = apply_overrides(cfg, &flags).expect("overrides apply");
        assert_eq!(cfg.algorithms, SearchAlgorithm::ALL.to_vec());
        assert_eq!(cfg.ant.trials, 9);
        assert_eq!(cfg.seed, Some(12));
        assert_eq!(cfg.log_level, "debug");
    }

    #[test]
    fn config_values_survive_when_flags_are_absent() {
        let cfg = parse_search_config("algorithm: ant\nant:\n  trials: 50\n  seed: 4\n")
            .expect("valid config");
        let cfg = apply_overrides(cfg, &args(&[])).expect("overrides apply");
        assert_eq!(cfg.algorithms, vec![SearchAlgorithm::Ant]);
        assert_eq!(cfg.ant.trials, 50);
        assert_eq!(cfg.seed, Some(4));
        assert_eq!(cfg.log_level, "INFO");
    }

    #[test]
    fn bad_algorithm_flag_is_rejected() {
        assert!(apply_overrides(SearchConfig::default(), &args(&["--algorithm", "dfs"])).is_err());
    }

    #[test]
    fn payload_lists_routes_per_run() {
        let args = args(&["--seed", "3"]);
        let cfg = apply_overrides(SearchConfig::default(), &args).expect("overrides apply");
        let result = SearchResult::new(vec![
            RoutePath::new(vec![1, 2, 3], 10),
            RoutePath::new(vec![1, 3], 20),
        ]);
        let runs = vec![
            run_entry(SearchAlgorithm::BellmanFord, &result),
            run_entry(SearchAlgorithm::Wave, &SearchResult::default()),
        ];
        let payload = build_payload(&args, &cfg, runs);

        assert_eq!(
            payload["runs"][0],
            json!({
                "algorithm": "bellman-ford",
                "routes": [
                    {"nodes": [1, 2, 3], "cost": 10},
                    {"nodes": [1, 3], "cost": 20},
                ],
            })
        );
        assert_eq!(payload["runs"][1]["routes"], json!([]));
        assert_eq!(payload["config"]["source"], json!(1));
        assert_eq!(payload["config"]["target"], json!(3));
        assert_eq!(payload["config"]["seed"], json!(3));
        assert_eq!(payload["config"]["algorithms"], json!(["bellman-ford"]));
    }
}
