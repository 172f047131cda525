use std::collections::BTreeSet;

use anyhow::{bail, Context, Result};
use rand::seq::SliceRandom;
use rand::Rng;

use super::topology::{RouterInfo, Topology};
use crate::model::graph::Link;

pub const DEFAULT_MAX_COST: i64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorParams {
    pub vertices: usize,
    pub edges: usize,
    /// Link costs are drawn from `0..max_cost`.
    pub max_cost: i64,
}

impl GeneratorParams {
    pub fn new(vertices: usize, edges: usize) -> Self {
        Self {
            vertices,
            edges,
            max_cost: DEFAULT_MAX_COST,
        }
    }

    fn max_links(&self) -> usize {
        self.vertices.saturating_mul(self.vertices.saturating_sub(1)) / 2
    }
}

fn pick_pairs<R: Rng>(params: &GeneratorParams, n: u32, rng: &mut R) -> Vec<(u32, u32)> {
    if params.edges.saturating_mul(2) > params.max_links() {
        let mut all: Vec<(u32, u32)> = (1..=n)
            .flat_map(|a| ((a + 1)..=n).map(move |b| (a, b)))
            .collect();
        all.shuffle(rng);
        all.truncate(params.edges);
        return all;
    }

    let mut seen = BTreeSet::new();
    let mut out = Vec::with_capacity(params.edges);
    while out.len() < params.edges {
        let a = rng.gen_range(1..=n);
        let b = rng.gen_range(1..=n);
        if a == b {
            continue;
        }
        let pair = (a.min(b), a.max(b));
        if seen.insert(pair) {
            out.push(pair);
        }
    }
    out
}

/// Random simple topology with `edges` distinct links and one router line
/// per vertex. The same seeded generator always yields the same topology.
pub fn generate_topology<R: Rng>(params: &GeneratorParams, rng: &mut R) -> Result<Topology> {
    if params.vertices == 0 {
        bail!("generator needs at least one vertex");
    }
    let vertex_count = u32::try_from(params.vertices)
        .with_context(|| format!("{} vertices exceed the router numbering", params.vertices))?;
    if params.max_cost <= 0 {
        bail!("max cost must be positive, got {}", params.max_cost);
    }
    if params.edges > params.max_links() {
        bail!(
            "{} vertices allow at most {} distinct links, requested {}",
            params.vertices,
            params.max_links(),
            params.edges
        );
    }

    let links = pick_pairs(params, vertex_count, rng)
        .into_iter()
        .map(|(from, to)| Link {
            from,
            to,
            cost: rng.gen_range(0..params.max_cost),
        })
        .collect();

    let routers = (1..=vertex_count)
        .map(|number| RouterInfo {
            name: format!("r{number}"),
            number,
            x: f64::from(rng.gen_range(0..1000u32)),
            y: f64::from(rng.gen_range(50..650u32)),
        })
        .collect();

    Ok(Topology {
        vertex_count: params.vertices,
        links,
        routers,
    })
}
