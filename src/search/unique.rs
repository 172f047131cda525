use std::collections::BTreeSet;

use tracing::debug;

use super::bellman_ford::relax;
use super::{RouteSearchEngine, SearchInput, UniquePathEngine};
use crate::error::SearchError;
use crate::model::graph::WorkingEdges;
use crate::model::route::{RoutePath, SearchResult};

impl RouteSearchEngine for UniquePathEngine {
    fn name(&self) -> &'static str {
        "bellman-ford"
    }

    fn search(&mut self, input: SearchInput) -> Result<SearchResult, SearchError> {
        Ok(extract_unique_paths(
            input.vertex_count,
            input.edges,
            input.source,
            input.target,
        ))
    }
}

/// Successive shortest paths over a progressively pruned edge set.
///
/// Every yielded path is optimal in the edge set as it stood when the path
/// was computed. After each path the edges are pruned:
/// a direct source-target hop loses both directed edges between the pair,
/// and a longer path loses every edge touching one of its interior vertices.
/// The direct source-target edge therefore survives interior pruning, and
/// no interior vertex can appear in two yielded paths.
#[derive(Debug, Clone)]
pub struct UniquePaths {
    vertex_count: usize,
    source: usize,
    target: usize,
    edges: WorkingEdges,
    done: bool,
}

impl UniquePaths {
    pub fn new(vertex_count: usize, edges: WorkingEdges, source: usize, target: usize) -> Self {
        let done = source == target || source >= vertex_count || target >= vertex_count;
        Self {
            vertex_count,
            source,
            target,
            edges,
            done,
        }
    }

    /// Edge set the next extraction will run against.
    pub fn working_edges(&self) -> &WorkingEdges {
        &self.edges
    }

    fn prune(&mut self, nodes: &[usize]) -> usize {
        if nodes.len() == 2 {
            return self.edges.remove_between(self.source, self.target);
        }
        let interior: BTreeSet<usize> = nodes[1..nodes.len() - 1].iter().copied().collect();
        self.edges.remove_touching(&interior)
    }
}

impl Iterator for UniquePaths {
    type Item = RoutePath;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let (relaxation, nodes) = relax(
            self.vertex_count,
            self.edges.as_slice(),
            self.source,
            self.target,
        );
        let Some(cost) = relaxation.distance_to(self.target).filter(|_| nodes.len() > 1) else {
            self.done = true;
            return None;
        };

        let pruned = self.prune(&nodes);
        debug!(
            "unique path extracted: nodes={:?} cost={} pruned_edges={} remaining_edges={}",
            nodes,
            cost,
            pruned,
            self.edges.len()
        );
        if pruned == 0 {
            self.done = true;
        }

        Some(RoutePath::new(nodes, cost))
    }
}

/// Runs the extractor to exhaustion. `source == target` yields nothing.
pub fn extract_unique_paths(
    vertex_count: usize,
    edges: WorkingEdges,
    source: usize,
    target: usize,
) -> SearchResult {
    UniquePaths::new(vertex_count, edges, source, target).collect()
}
