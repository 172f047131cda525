use crate::model::graph::WorkingEdges;

use super::ant::AntParams;

/// One 0-indexed search over an owned edge copy.
#[derive(Debug, Clone)]
pub struct SearchInput {
    pub vertex_count: usize,
    pub edges: WorkingEdges,
    pub source: usize,
    pub target: usize,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct UniquePathEngine;

#[derive(Debug, Default, Clone, Copy)]
pub struct WaveEngine;

#[derive(Debug)]
pub struct AntEngine<'a, R> {
    pub params: AntParams,
    pub rng: &'a mut R,
}
