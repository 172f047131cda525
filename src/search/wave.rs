use std::collections::BTreeSet;

use tracing::debug;

use super::{RouteSearchEngine, SearchInput, WaveEngine};
use crate::error::SearchError;
use crate::model::graph::WorkingEdges;
use crate::model::route::{RoutePath, SearchResult};

impl RouteSearchEngine for WaveEngine {
    fn name(&self) -> &'static str {
        "wave"
    }

    fn search(&mut self, input: SearchInput) -> Result<SearchResult, SearchError> {
        Ok(wave_search(&input.edges, input.source, input.target))
    }
}

fn viable_hops(
    edges: &WorkingEdges,
    tail: usize,
    used: &BTreeSet<usize>,
    target: usize,
) -> Vec<usize> {
    edges
        .neighbors(tail)
        .into_iter()
        .filter(|vertex| *vertex == target || !used.contains(vertex))
        .collect()
}

/// Target wins outright; otherwise the cheapest hop, first found on ties.
fn pick_next_hop(
    edges: &WorkingEdges,
    tail: usize,
    hops: &[usize],
    target: usize,
) -> Option<usize> {
    if hops.contains(&target) {
        return Some(target);
    }
    hops.iter()
        .copied()
        .min_by_key(|hop| edges.cost(tail, *hop).unwrap_or(u64::MAX))
}

/// Greedy simultaneous expansion from `source`.
///
/// Every neighbour of the source starts its own branch. Each round extends
/// each live branch by one hop, always serving the branch with the fewest
/// viable hops first so narrow branches claim their vertices before wide
/// ones. A vertex joins at most one branch; only the target is shared.
/// Completed routes are returned in completion order.
pub fn wave_search(edges: &WorkingEdges, source: usize, target: usize) -> SearchResult {
    if source == target {
        return SearchResult::default();
    }

    let mut used: BTreeSet<usize> = BTreeSet::from([source]);
    let mut active: Vec<Vec<usize>> = Vec::new();
    let mut completed: Vec<Vec<usize>> = Vec::new();

    for neighbor in edges.neighbors(source) {
        if neighbor == target {
            completed.push(vec![source, neighbor]);
        } else if used.insert(neighbor) {
            active.push(vec![source, neighbor]);
        }
    }

    let mut round = 0usize;
    while !active.is_empty() {
        round += 1;
        let mut pending = std::mem::take(&mut active);
        let mut dead_ends = 0usize;

        while !pending.is_empty() {
            let candidates: Vec<Vec<usize>> = pending
                .iter()
                .map(|branch| {
                    let tail = branch.last().copied().unwrap_or(source);
                    viable_hops(edges, tail, &used, target)
                })
                .collect();
            let Some((idx, hops)) = candidates
                .into_iter()
                .enumerate()
                .min_by_key(|(_, hops)| hops.len())
            else {
                break;
            };

            let mut branch = pending.remove(idx);
            let tail = branch.last().copied().unwrap_or(source);
            let Some(next) = pick_next_hop(edges, tail, &hops, target) else {
                dead_ends += 1;
                continue;
            };

            branch.push(next);
            if next == target {
                completed.push(branch);
            } else {
                used.insert(next);
                active.push(branch);
            }
        }

        debug!(
            "wave round {}: active={} completed={} dead_ends={}",
            round,
            active.len(),
            completed.len(),
            dead_ends
        );
    }

    completed
        .into_iter()
        .filter_map(|nodes| {
            let cost = edges.path_cost(&nodes)?;
            Some(RoutePath::new(nodes, cost))
        })
        .collect()
}
