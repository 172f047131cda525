use std::collections::BTreeSet;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::SearchError;

pub const INITIAL_PHEROMONE_MIN: f64 = 1.0;
pub const INITIAL_PHEROMONE_MAX: f64 = 4.0;

/// Undirected connection as supplied by a topology source, 1-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub from: u32,
    pub to: u32,
    pub cost: i64,
}

/// Directed edge record, 0-indexed.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub from: usize,
    pub to: usize,
    pub cost: u64,
    pub pheromone: f64,
}

impl Edge {
    pub fn new(from: usize, to: usize, cost: u64, pheromone: f64) -> Self {
        Self {
            from,
            to,
            cost,
            pheromone,
        }
    }

    pub fn joins(&self, a: usize, b: usize) -> bool {
        (self.from == a && self.to == b) || (self.from == b && self.to == a)
    }
}

#[derive(Debug, Clone)]
pub struct Graph {
    vertex_count: usize,
    edges: Vec<Edge>,
}

impl Graph {
    /// Validates boundary links and expands each one into two directed edges.
    ///
    /// Pheromone is seeded uniformly in `[1, 4)` from `rng`.
    pub fn from_links<R>(
        vertex_count: usize,
        links: &[Link],
        rng: &mut R,
    ) -> Result<Self, SearchError>
    where
        R: Rng,
    {
        if vertex_count == 0 {
            return Err(SearchError::EmptyGraph);
        }

        let mut edges = Vec::with_capacity(links.len() * 2);
        for link in links {
            let a = vertex_index(link.from, vertex_count)?;
            let b = vertex_index(link.to, vertex_count)?;
            let cost = u64::try_from(link.cost).map_err(|_| SearchError::NegativeCost {
                from: link.from,
                to: link.to,
                cost: link.cost,
            })?;
            edges.push(Edge::new(
                a,
                b,
                cost,
                rng.gen_range(INITIAL_PHEROMONE_MIN..INITIAL_PHEROMONE_MAX),
            ));
            edges.push(Edge::new(
                b,
                a,
                cost,
                rng.gen_range(INITIAL_PHEROMONE_MIN..INITIAL_PHEROMONE_MAX),
            ));
        }

        Ok(Self {
            vertex_count,
            edges,
        })
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Owned copy of the edge list for a single search run.
    pub fn working_edges(&self) -> WorkingEdges {
        WorkingEdges::new(self.edges.clone())
    }
}

/// Converts a 1-indexed boundary vertex into an internal index.
pub fn vertex_index(vertex: u32, vertex_count: usize) -> Result<usize, SearchError> {
    if vertex == 0 || vertex as usize > vertex_count {
        return Err(SearchError::VertexOutOfRange {
            vertex,
            vertex_count,
        });
    }
    Ok(vertex as usize - 1)
}

/// Mutable per-run edge list. Algorithms prune it or adjust pheromone on it;
/// nothing outside the run observes the changes.
#[derive(Debug, Clone, Default)]
pub struct WorkingEdges {
    edges: Vec<Edge>,
}

impl WorkingEdges {
    pub fn new(edges: Vec<Edge>) -> Self {
        Self { edges }
    }

    pub fn as_slice(&self) -> &[Edge] {
        &self.edges
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&Edge> {
        self.edges.get(idx)
    }

    pub fn get_mut(&mut self, idx: usize) -> Option<&mut Edge> {
        self.edges.get_mut(idx)
    }

    /// Positions of the edges leaving `vertex`, in list order.
    pub fn outgoing(&self, vertex: usize) -> impl Iterator<Item = (usize, &Edge)> + '_ {
        self.edges
            .iter()
            .enumerate()
            .filter(move |(_, edge)| edge.from == vertex)
    }

    /// Distinct heads of edges leaving `vertex`, first occurrence wins the order.
    pub fn neighbors(&self, vertex: usize) -> Vec<usize> {
        let mut seen = BTreeSet::new();
        self.outgoing(vertex)
            .filter_map(|(_, edge)| seen.insert(edge.to).then_some(edge.to))
            .collect()
    }

    /// Cheapest cost among parallel edges `from -> to`.
    pub fn cost(&self, from: usize, to: usize) -> Option<u64> {
        self.outgoing(from)
            .filter(|(_, edge)| edge.to == to)
            .map(|(_, edge)| edge.cost)
            .min()
    }

    pub fn path_cost(&self, nodes: &[usize]) -> Option<u64> {
        let mut total = 0u64;
        for hop in nodes.windows(2) {
            total = total.checked_add(self.cost(hop[0], hop[1])?)?;
        }
        Some(total)
    }

    /// Drops every edge matching `predicate`, returning how many were removed.
    pub fn remove_where<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(&Edge) -> bool,
    {
        let before = self.edges.len();
        self.edges.retain(|edge| !predicate(edge));
        before - self.edges.len()
    }

    pub fn remove_between(&mut self, a: usize, b: usize) -> usize {
        self.remove_where(|edge| edge.joins(a, b))
    }

    pub fn remove_touching(&mut self, vertices: &BTreeSet<usize>) -> usize {
        self.remove_where(|edge| vertices.contains(&edge.from) || vertices.contains(&edge.to))
    }

    pub fn into_inner(self) -> Vec<Edge> {
        self.edges
    }
}

impl From<Vec<Edge>> for WorkingEdges {
    fn from(edges: Vec<Edge>) -> Self {
        Self::new(edges)
    }
}
