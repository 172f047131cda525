use std::cmp::Ordering;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutePath {
    pub nodes: Vec<usize>,
    pub cost: u64,
}

impl RoutePath {
    pub fn new(nodes: Vec<usize>, cost: u64) -> Self {
        Self { nodes, cost }
    }

    /// Vertices strictly between the two endpoints.
    pub fn interior(&self) -> &[usize] {
        match self.nodes.len() {
            0..=2 => &[],
            len => &self.nodes[1..len - 1],
        }
    }

    pub fn hop_count(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }
}

pub fn compare_route_path(a: &RoutePath, b: &RoutePath) -> Ordering {
    a.cost.cmp(&b.cost).then_with(|| a.nodes.cmp(&b.nodes))
}

/// Ordered routes produced by one search run. Empty means no route was found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub routes: Vec<RoutePath>,
}

impl SearchResult {
    pub fn new(routes: Vec<RoutePath>) -> Self {
        Self { routes }
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn costs(&self) -> Vec<u64> {
        self.routes.iter().map(|route| route.cost).collect()
    }

    pub fn paths(&self) -> Vec<Vec<usize>> {
        self.routes.iter().map(|route| route.nodes.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RoutePath> {
        self.routes.iter()
    }

    /// Shifts every vertex by one, for handing results back across the 1-indexed boundary.
    pub fn one_indexed(mut self) -> Self {
        for route in &mut self.routes {
            for node in &mut route.nodes {
                *node += 1;
            }
        }
        self
    }

    /// True when no interior vertex is shared by two routes.
    pub fn is_interior_disjoint(&self) -> bool {
        let mut seen = BTreeSet::new();
        self.routes
            .iter()
            .flat_map(|route| route.interior().iter())
            .all(|vertex| seen.insert(*vertex))
    }
}

impl FromIterator<RoutePath> for SearchResult {
    fn from_iter<I: IntoIterator<Item = RoutePath>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
