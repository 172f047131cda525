mod ant;
mod bellman_ford;
mod strategy;
mod traits;
mod types;
mod unique;
mod wave;

pub use ant::{ant_search, AntColony, AntParams, AntStats, DEFAULT_TRIALS, MIN_COST_DIVISOR};
pub use bellman_ford::{compute_relaxation, relax, Relaxation};
pub use strategy::{
    search_routes, RouteSearchRequest, SearchAlgorithm, SearchStrategyConfig, UnknownAlgorithm,
};
pub use traits::RouteSearchEngine;
pub use types::{AntEngine, SearchInput, UniquePathEngine, WaveEngine};
pub use unique::{extract_unique_paths, UniquePaths};
pub use wave::wave_search;
