use std::collections::BTreeSet;

use rand::Rng;
use tracing::debug;

use super::{AntEngine, RouteSearchEngine, SearchInput};
use crate::error::SearchError;
use crate::model::graph::WorkingEdges;
use crate::model::route::{compare_route_path, RoutePath, SearchResult};

impl<R: Rng> RouteSearchEngine for AntEngine<'_, R> {
    fn name(&self) -> &'static str {
        "ant"
    }

    fn search(&mut self, input: SearchInput) -> Result<SearchResult, SearchError> {
        ant_search(
            input.vertex_count,
            input.edges,
            input.source,
            input.target,
            self.params,
            &mut *self.rng,
        )
    }
}

pub const DEFAULT_TRIALS: usize = 1000;

/// Lower bound applied to every cost used as a divisor. Zero-cost edges
/// are weighted as if they cost this much; reported costs are untouched.
pub const MIN_COST_DIVISOR: u64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AntParams {
    pub trials: usize,
}

impl Default for AntParams {
    fn default() -> Self {
        Self {
            trials: DEFAULT_TRIALS,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AntStats {
    pub successful_trials: usize,
    pub failed_trials: usize,
    pub distinct_paths: usize,
    pub kept_paths: usize,
}

fn cost_divisor(cost: u64) -> f64 {
    cost.max(MIN_COST_DIVISOR) as f64
}

/// Picks from `eligible` (edge positions) by walking cumulative
/// `pheromone / cost` mass until it meets `draw`.
fn choose_edge(edges: &WorkingEdges, eligible: &[usize], draw: f64) -> Option<usize> {
    let weights: Vec<(usize, f64)> = eligible
        .iter()
        .filter_map(|idx| {
            let edge = edges.get(*idx)?;
            Some((*idx, edge.pheromone / cost_divisor(edge.cost)))
        })
        .collect();
    let total: f64 = weights.iter().map(|(_, weight)| weight).sum();
    if !(total.is_finite() && total > 0.0) {
        return weights.first().map(|(idx, _)| *idx);
    }

    let mut cumulative = 0.0;
    for (idx, weight) in &weights {
        cumulative += weight / total;
        if cumulative >= draw {
            return Some(*idx);
        }
    }
    // Rounding can leave the cumulative mass just under 1.0.
    weights.last().map(|(idx, _)| *idx)
}

/// Pheromone-guided random walks from `source` to `target` over an owned
/// edge set. Pheromone learned by one trial biases every later trial.
#[derive(Debug, Clone)]
pub struct AntColony {
    vertex_count: usize,
    edges: WorkingEdges,
    source: usize,
    target: usize,
}

impl AntColony {
    pub fn new(vertex_count: usize, edges: WorkingEdges, source: usize, target: usize) -> Self {
        Self {
            vertex_count,
            edges,
            source,
            target,
        }
    }

    pub fn edges(&self) -> &WorkingEdges {
        &self.edges
    }

    /// One walk. Returns the edge positions taken and the route, or `None`
    /// when the walk strands itself on a vertex with no unvisited exits.
    fn walk<R>(&self, rng: &mut R) -> Option<(Vec<usize>, RoutePath)>
    where
        R: Rng,
    {
        if self.source == self.target
            || self.source >= self.vertex_count
            || self.target >= self.vertex_count
        {
            return None;
        }

        let mut visited = vec![false; self.vertex_count];
        visited[self.source] = true;
        let mut current = self.source;
        let mut taken = Vec::new();
        let mut nodes = vec![self.source];

        loop {
            let eligible: Vec<usize> = self
                .edges
                .outgoing(current)
                .filter(|(_, edge)| {
                    edge.to == self.target || !visited.get(edge.to).copied().unwrap_or(true)
                })
                .map(|(idx, _)| idx)
                .collect();
            if eligible.is_empty() {
                return None;
            }

            let idx = choose_edge(&self.edges, &eligible, rng.gen::<f64>())?;
            let edge = self.edges.get(idx)?;
            visited[edge.to] = true;
            taken.push(idx);
            nodes.push(edge.to);
            current = edge.to;

            if current == self.target {
                // Parallel links price the route by the cheapest edge per hop.
                let cost = self.edges.path_cost(&nodes)?;
                return Some((taken, RoutePath::new(nodes, cost)));
            }
        }
    }

    /// Adds `1 + floor(3u) / cost` to every edge the successful walk used.
    fn reinforce<R>(&mut self, taken: &[usize], path_cost: u64, rng: &mut R)
    where
        R: Rng,
    {
        let delta = 1.0 + (3.0 * rng.gen::<f64>()).floor() / cost_divisor(path_cost);
        for idx in taken {
            if let Some(edge) = self.edges.get_mut(*idx) {
                edge.pheromone += delta;
            }
        }
    }

    /// Runs one trial, reinforcing pheromone when it reaches the target.
    pub fn run_trial<R>(&mut self, rng: &mut R) -> Option<RoutePath>
    where
        R: Rng,
    {
        let (taken, route) = self.walk(rng)?;
        self.reinforce(&taken, route.cost, rng);
        Some(route)
    }

    /// Runs a fixed budget of trials, then ranks distinct routes by cost and
    /// keeps only those sharing no interior vertex with a cheaper kept route.
    pub fn search<R>(&mut self, trials: usize, rng: &mut R) -> (SearchResult, AntStats)
    where
        R: Rng,
    {
        let mut stats = AntStats::default();
        let mut seen: BTreeSet<Vec<usize>> = BTreeSet::new();
        let mut found: Vec<RoutePath> = Vec::new();

        for _ in 0..trials {
            let Some(route) = self.run_trial(rng) else {
                stats.failed_trials += 1;
                continue;
            };
            stats.successful_trials += 1;
            if seen.insert(route.nodes.clone()) {
                found.push(route);
            }
        }

        stats.distinct_paths = found.len();
        found.sort_by(compare_route_path);

        let mut claimed: BTreeSet<usize> = BTreeSet::new();
        let kept: Vec<RoutePath> = found
            .into_iter()
            .filter(|route| {
                if route.interior().iter().any(|vertex| claimed.contains(vertex)) {
                    return false;
                }
                claimed.extend(route.interior().iter().copied());
                true
            })
            .collect();
        stats.kept_paths = kept.len();

        debug!(
            "ant search {}->{}: trials={} successful={} failed={} distinct={} kept={}",
            self.source,
            self.target,
            trials,
            stats.successful_trials,
            stats.failed_trials,
            stats.distinct_paths,
            stats.kept_paths
        );

        (SearchResult::new(kept), stats)
    }
}

pub fn ant_search<R>(
    vertex_count: usize,
    edges: WorkingEdges,
    source: usize,
    target: usize,
    params: AntParams,
    rng: &mut R,
) -> Result<SearchResult, SearchError>
where
    R: Rng,
{
    if params.trials == 0 {
        return Err(SearchError::InvalidTrialBudget);
    }
    let mut colony = AntColony::new(vertex_count, edges, source, target);
    let (result, _) = colony.search(params.trials, rng);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::model::graph::Edge;
    use crate::search::fixtures::undirected;

    fn grid_edges() -> WorkingEdges {
        undirected(&[
            (0, 1, 2),
            (1, 5, 2),
            (0, 2, 1),
            (2, 3, 1),
            (3, 5, 4),
            (0, 4, 3),
            (4, 5, 3),
            (1, 3, 1),
            (2, 4, 2),
            (0, 5, 15),
        ])
    }

    #[test]
    fn choose_edge_walks_cumulative_mass() {
        let edges = WorkingEdges::new(vec![Edge::new(0, 1, 1, 1.0), Edge::new(0, 2, 3, 1.0)]);
        // Weights 1 and 1/3 normalise to 0.75 and 0.25.
        assert_eq!(choose_edge(&edges, &[0, 1], 0.0), Some(0));
        assert_eq!(choose_edge(&edges, &[0, 1], 0.5), Some(0));
        assert_eq!(choose_edge(&edges, &[0, 1], 0.7), Some(0));
        assert_eq!(choose_edge(&edges, &[0, 1], 0.8), Some(1));
        assert_eq!(choose_edge(&edges, &[0, 1], 0.999_999), Some(1));
    }

    #[test]
    fn zero_cost_edges_use_cost_floor() {
        let edges = WorkingEdges::new(vec![Edge::new(0, 1, 0, 2.0), Edge::new(0, 2, 1, 2.0)]);
        // Both weigh 2.0 once the zero cost is floored.
        assert_eq!(choose_edge(&edges, &[0, 1], 0.5), Some(0));
        assert_eq!(choose_edge(&edges, &[0, 1], 0.51), Some(1));
    }

    #[test]
    fn single_link_yields_one_route() {
        let mut rng = StdRng::seed_from_u64(11);
        let out = ant_search(2, undirected(&[(0, 1, 7)]), 0, 1, AntParams::default(), &mut rng)
            .expect("search");
        assert_eq!(out.paths(), vec![vec![0, 1]]);
        assert_eq!(out.costs(), vec![7]);
    }

    #[test]
    fn successful_trial_reinforces_only_used_edges() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut colony = AntColony::new(2, undirected(&[(0, 1, 7)]), 0, 1);
        let route = colony.run_trial(&mut rng).expect("trial reaches target");
        assert_eq!(route.nodes, vec![0, 1]);

        let forward = colony.edges().get(0).expect("forward edge");
        let backward = colony.edges().get(1).expect("backward edge");
        assert!(forward.pheromone >= 2.0);
        assert!(forward.pheromone < 2.0 + 3.0 / 7.0 + 1e-9);
        assert_eq!(backward.pheromone, 1.0);
    }

    #[test]
    fn parallel_links_report_cheapest_cost() {
        let edges = WorkingEdges::new(vec![
            Edge::new(0, 1, 100, 3.9),
            Edge::new(1, 0, 100, 3.9),
            Edge::new(0, 1, 1, 1.0),
            Edge::new(1, 0, 1, 1.0),
        ]);
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let out = ant_search(2, edges.clone(), 0, 1, AntParams { trials: 200 }, &mut rng)
                .expect("search");
            assert_eq!(out.paths(), vec![vec![0, 1]], "seed {seed}");
            assert_eq!(out.costs(), vec![1], "seed {seed}");
        }
    }

    #[test]
    fn disconnected_pair_returns_nothing() {
        let mut rng = StdRng::seed_from_u64(2);
        let edges = undirected(&[(0, 1, 1), (2, 3, 1)]);
        let mut colony = AntColony::new(4, edges, 0, 3);
        let (out, stats) = colony.search(200, &mut rng);
        assert!(out.is_empty());
        assert_eq!(stats.failed_trials, 200);
        assert_eq!(stats.successful_trials, 0);
    }

    #[test]
    fn triangle_ranks_cheapest_route_first() {
        let mut rng = StdRng::seed_from_u64(2024);
        let edges = undirected(&[(0, 1, 5), (1, 2, 5), (0, 2, 20)]);
        let out = ant_search(3, edges, 0, 2, AntParams::default(), &mut rng).expect("search");

        assert_eq!(out.routes[0], RoutePath::new(vec![0, 1, 2], 10));
        for route in out.iter() {
            assert!(
                *route == RoutePath::new(vec![0, 1, 2], 10)
                    || *route == RoutePath::new(vec![0, 2], 20)
            );
        }
    }

    #[test]
    fn routes_are_sorted_consistent_and_interior_disjoint() {
        let mut rng = StdRng::seed_from_u64(99);
        let edges = grid_edges();
        let mut colony = AntColony::new(6, edges.clone(), 0, 5);
        let (out, stats) = colony.search(2000, &mut rng);

        assert!(!out.is_empty());
        assert!(stats.distinct_paths >= stats.kept_paths);
        assert_eq!(stats.kept_paths, out.len());
        assert!(out.is_interior_disjoint());
        assert!(out.costs().windows(2).all(|pair| pair[0] <= pair[1]));
        for route in out.iter() {
            assert_eq!(route.nodes.first(), Some(&0));
            assert_eq!(route.nodes.last(), Some(&5));
            assert_eq!(edges.path_cost(&route.nodes), Some(route.cost));
        }
        for edge in colony.edges().as_slice() {
            assert!(edge.pheromone.is_finite() && edge.pheromone > 0.0);
        }
    }

    #[test]
    fn fixed_seed_is_reproducible() {
        let run = |seed: u64| {
            let mut rng = StdRng::seed_from_u64(seed);
            ant_search(6, grid_edges(), 0, 5, AntParams { trials: 500 }, &mut rng)
                .expect("search")
        };
        assert_eq!(run(17), run(17));
    }

    #[test]
    fn zero_trial_budget_is_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        let err = ant_search(2, undirected(&[(0, 1, 1)]), 0, 1, AntParams { trials: 0 }, &mut rng)
            .unwrap_err();
        assert_eq!(err, SearchError::InvalidTrialBudget);
    }
}
