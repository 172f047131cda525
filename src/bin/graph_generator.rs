use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use routediv::runtime::generator::{generate_topology, GeneratorParams, DEFAULT_MAX_COST};
use routediv::runtime::logging::init_logging;
use routediv::runtime::topology::write_text_topology;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "graph_generator")]
#[command(about = "Generate a random router topology in the text layout")]
struct Args {
    #[arg(long)]
    vertices: usize,
    #[arg(long)]
    edges: usize,
    #[arg(long)]
    output: Option<PathBuf>,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long, default_value_t = DEFAULT_MAX_COST)]
    max_cost: i64,
    #[arg(long, default_value = "INFO")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level)?;

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let params = GeneratorParams {
        vertices: args.vertices,
        edges: args.edges,
        max_cost: args.max_cost,
    };
    let topology = generate_topology(&params, &mut rng)?;
    let text = write_text_topology(&topology);

    match args.output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, text)
                .with_context(|| format!("failed to write topology {}", path.display()))?;
            info!(
                "topology written: path={} vertices={} links={}",
                path.display(),
                topology.vertex_count,
                topology.links.len()
            );
        }
        None => print!("{text}"),
    }

    Ok(())
}
