use crate::model::graph::Edge;

/// Label-correcting single-source result. `None` distance means unreachable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relaxation {
    pub dist: Vec<Option<u64>>,
    pub parent: Vec<Option<usize>>,
}

impl Relaxation {
    pub fn distance_to(&self, vertex: usize) -> Option<u64> {
        self.dist.get(vertex).copied().flatten()
    }

    /// Walks parent pointers back from `target`. Empty when unreachable.
    pub fn path_to(&self, source: usize, target: usize) -> Vec<usize> {
        if self.distance_to(target).is_none() {
            return Vec::new();
        }

        let mut reversed = vec![target];
        let mut current = target;
        for _ in 0..self.parent.len() {
            if current == source {
                reversed.reverse();
                return reversed;
            }
            let Some(next) = self.parent.get(current).copied().flatten() else {
                break;
            };
            reversed.push(next);
            current = next;
        }

        Vec::new()
    }
}

pub fn compute_relaxation(vertex_count: usize, edges: &[Edge], source: usize) -> Relaxation {
    let mut dist: Vec<Option<u64>> = vec![None; vertex_count];
    let mut parent: Vec<Option<usize>> = vec![None; vertex_count];
    if source >= vertex_count {
        return Relaxation { dist, parent };
    }
    dist[source] = Some(0);

    // Costs are unsigned, so a pass without updates is a fixed point.
    loop {
        let mut changed = false;
        for edge in edges {
            if edge.from >= vertex_count || edge.to >= vertex_count {
                continue;
            }
            let Some(base) = dist[edge.from] else {
                continue;
            };
            let candidate = base.saturating_add(edge.cost);
            if dist[edge.to].map_or(true, |current| candidate < current) {
                dist[edge.to] = Some(candidate);
                parent[edge.to] = Some(edge.from);
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }

    Relaxation { dist, parent }
}

/// Relaxes from `source` and reconstructs the path to `target`.
///
/// `source == target` yields distance 0 and the one-vertex path.
pub fn relax(
    vertex_count: usize,
    edges: &[Edge],
    source: usize,
    target: usize,
) -> (Relaxation, Vec<usize>) {
    let relaxation = compute_relaxation(vertex_count, edges, source);
    let path = relaxation.path_to(source, target);
    (relaxation, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::fixtures::undirected;

    #[test]
    fn relax_prefers_cheaper_two_hop_route() {
        let edges = undirected(&[(0, 1, 5), (1, 2, 5), (0, 2, 20)]);
        let (out, path) = relax(3, edges.as_slice(), 0, 2);
        assert_eq!(out.distance_to(2), Some(10));
        assert_eq!(out.distance_to(1), Some(5));
        assert_eq!(path, vec![0, 1, 2]);
    }

    #[test]
    fn relax_reports_unreachable_target() {
        let edges = undirected(&[(0, 1, 1), (2, 3, 1)]);
        let (out, path) = relax(4, edges.as_slice(), 0, 3);
        assert_eq!(out.distance_to(3), None);
        assert!(path.is_empty());
    }

    #[test]
    fn relax_source_equals_target_is_trivial() {
        let edges = undirected(&[(0, 1, 4)]);
        let (out, path) = relax(2, edges.as_slice(), 1, 1);
        assert_eq!(out.distance_to(1), Some(0));
        assert_eq!(path, vec![1]);
    }

    #[test]
    fn relax_converges_when_edges_listed_backwards() {
        // Edge order forces several passes before the chain settles.
        let edges = undirected(&[(3, 4, 1), (2, 3, 1), (1, 2, 1), (0, 1, 1)]);
        let (out, path) = relax(5, edges.as_slice(), 0, 4);
        assert_eq!(out.distance_to(4), Some(4));
        assert_eq!(path, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn relax_handles_zero_cost_edges() {
        let edges = undirected(&[(0, 1, 0), (1, 2, 0), (0, 2, 1)]);
        let (out, path) = relax(3, edges.as_slice(), 0, 2);
        assert_eq!(out.distance_to(2), Some(0));
        assert_eq!(path, vec![0, 1, 2]);
    }
}
