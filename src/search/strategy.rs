use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use super::{AntEngine, AntParams, RouteSearchEngine, SearchInput, UniquePathEngine, WaveEngine};
use crate::error::SearchError;
use crate::model::graph::{vertex_index, Graph};
use crate::model::route::SearchResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SearchAlgorithm {
    BellmanFord,
    Wave,
    Ant,
}

impl SearchAlgorithm {
    pub const ALL: [SearchAlgorithm; 3] = [
        SearchAlgorithm::BellmanFord,
        SearchAlgorithm::Wave,
        SearchAlgorithm::Ant,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SearchAlgorithm::BellmanFord => "bellman-ford",
            SearchAlgorithm::Wave => "wave",
            SearchAlgorithm::Ant => "ant",
        }
    }
}

impl fmt::Display for SearchAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown search algorithm '{0}' (expected bellman-ford, wave or ant)")]
pub struct UnknownAlgorithm(pub String);

impl FromStr for SearchAlgorithm {
    type Err = UnknownAlgorithm;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_lowercase().replace('_', "-").as_str() {
            "bellman-ford" | "bellmanford" | "bf" | "unique" => Ok(SearchAlgorithm::BellmanFord),
            "wave" => Ok(SearchAlgorithm::Wave),
            "ant" | "ants" | "pheromone" => Ok(SearchAlgorithm::Ant),
            _ => Err(UnknownAlgorithm(raw.to_string())),
        }
    }
}

/// Endpoints of a search, 1-indexed as they appear in topology files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteSearchRequest {
    pub source: u32,
    pub target: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchStrategyConfig {
    pub algorithm: SearchAlgorithm,
    pub ant: AntParams,
}

impl Default for SearchStrategyConfig {
    fn default() -> Self {
        Self {
            algorithm: SearchAlgorithm::BellmanFord,
            ant: AntParams::default(),
        }
    }
}

fn validate_request(
    graph: &Graph,
    request: RouteSearchRequest,
) -> Result<(usize, usize), SearchError> {
    let source = vertex_index(request.source, graph.vertex_count())?;
    let target = vertex_index(request.target, graph.vertex_count())?;
    if source == target {
        return Err(SearchError::SameEndpoints {
            vertex: request.source,
        });
    }
    Ok((source, target))
}

fn run_engine<E>(
    engine: &mut E,
    input: SearchInput,
) -> Result<(&'static str, SearchResult), SearchError>
where
    E: RouteSearchEngine,
{
    let result = engine.search(input)?;
    Ok((engine.name(), result))
}

/// Validates `request`, runs the configured algorithm on a private copy of
/// the graph's edges and returns routes 1-indexed.
pub fn search_routes<R>(
    graph: &Graph,
    request: RouteSearchRequest,
    config: &SearchStrategyConfig,
    rng: &mut R,
) -> Result<SearchResult, SearchError>
where
    R: Rng,
{
    let (source, target) = validate_request(graph, request)?;
    if config.algorithm == SearchAlgorithm::Ant && config.ant.trials == 0 {
        return Err(SearchError::InvalidTrialBudget);
    }

    let input = SearchInput {
        vertex_count: graph.vertex_count(),
        edges: graph.working_edges(),
        source,
        target,
    };
    let (name, result) = match config.algorithm {
        SearchAlgorithm::BellmanFord => run_engine(&mut UniquePathEngine, input)?,
        SearchAlgorithm::Wave => run_engine(&mut WaveEngine, input)?,
        SearchAlgorithm::Ant => run_engine(
            &mut AntEngine {
                params: config.ant,
                rng,
            },
            input,
        )?,
    };
    let result = result.one_indexed();

    info!(
        "route search: algorithm={} source={} target={} routes={} costs={:?}",
        name,
        request.source,
        request.target,
        result.len(),
        result.costs()
    );

    Ok(result)
}
