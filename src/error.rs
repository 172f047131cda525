use thiserror::Error;

/// Rejections raised at the boundary of a search call.
///
/// A disconnected source/target pair is not an error; it yields an empty
/// `SearchResult`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("graph has no vertices")]
    EmptyGraph,

    #[error("vertex {vertex} is out of range 1..={vertex_count}")]
    VertexOutOfRange { vertex: u32, vertex_count: usize },

    #[error("link {from}-{to} has negative cost {cost}")]
    NegativeCost { from: u32, to: u32, cost: i64 },

    #[error("source and target are the same vertex {vertex}")]
    SameEndpoints { vertex: u32 },

    #[error("ant search needs at least one trial")]
    InvalidTrialBudget,
}
