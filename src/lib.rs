pub mod error;
pub mod model;
pub mod runtime;
pub mod search;

pub use error::SearchError;
pub use model::graph::{Edge, Graph, Link, WorkingEdges};
pub use model::route::{RoutePath, SearchResult};
pub use search::{search_routes, RouteSearchRequest, SearchAlgorithm, SearchStrategyConfig};
