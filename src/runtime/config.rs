use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Deserialize;

use crate::search::{AntParams, SearchAlgorithm, SearchStrategyConfig, DEFAULT_TRIALS};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    pub algorithms: Vec<SearchAlgorithm>,
    pub ant: AntParams,
    pub seed: Option<u64>,
    pub log_level: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            algorithms: vec![SearchAlgorithm::BellmanFord],
            ant: AntParams::default(),
            seed: None,
            log_level: "INFO".to_string(),
        }
    }
}

impl SearchConfig {
    pub fn strategy(&self, algorithm: SearchAlgorithm) -> SearchStrategyConfig {
        SearchStrategyConfig {
            algorithm,
            ant: self.ant,
        }
    }

    /// Seeded generator when a seed is configured, entropy otherwise.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
struct RawAnt {
    trials: Option<usize>,
    seed: Option<u64>,
}

#[derive(Debug, Deserialize, Default)]
struct RawSearchConfig {
    algorithm: Option<String>,
    ant: Option<RawAnt>,
    seed: Option<u64>,
    log_level: Option<String>,
}

pub fn load_search_config(path: &Path) -> Result<SearchConfig> {
    let raw_text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    parse_search_config(&raw_text)
}

pub fn parse_search_config(raw_text: &str) -> Result<SearchConfig> {
    let raw_cfg: RawSearchConfig = if raw_text.trim().is_empty() {
        RawSearchConfig::default()
    } else {
        serde_yaml::from_str(raw_text).context("failed to parse search config yaml")?
    };
    let ant_raw = raw_cfg.ant.unwrap_or_default();

    let algorithms = match raw_cfg.algorithm {
        Some(raw) => parse_algorithms(&raw)?,
        None => vec![SearchAlgorithm::BellmanFord],
    };

    let trials = ant_raw.trials.unwrap_or(DEFAULT_TRIALS);
    if trials == 0 {
        bail!("ant.trials must be at least 1");
    }

    Ok(SearchConfig {
        algorithms,
        ant: AntParams { trials },
        seed: ant_raw.seed.or(raw_cfg.seed),
        log_level: raw_cfg
            .log_level
            .map(|level| level.trim().to_uppercase())
            .filter(|level| !level.is_empty())
            .unwrap_or_else(|| "INFO".to_string()),
    })
}

/// Accepts a single name, a comma separated list, or `all`.
pub fn parse_algorithms(raw: &str) -> Result<Vec<SearchAlgorithm>> {
    if raw.trim().eq_ignore_ascii_case("all") {
        return Ok(SearchAlgorithm::ALL.to_vec());
    }

    let mut out = Vec::new();
    for name in raw.split(',').map(str::trim).filter(|name| !name.is_empty()) {
        let algorithm: SearchAlgorithm = name
            .parse()
            .with_context(|| format!("invalid algorithm list: {raw}"))?;
        if !out.contains(&algorithm) {
            out.push(algorithm);
        }
    }
    if out.is_empty() {
        bail!("no search algorithm selected");
    }
    Ok(out)
}
