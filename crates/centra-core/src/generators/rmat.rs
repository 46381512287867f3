//! R-MAT graph generator.
//!
//! Each edge is placed by descending `scale` levels of the adjacency matrix
//! and picking one of four quadrants with probabilities `a`, `b`, `c` and
//! `d = 1 - a - b - c`. Skewed probabilities produce the heavy-tailed degree
//! distributions typical of real networks.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use centra_common::utils::error::{Error, Result};

use crate::graph::{Graph, GraphBuilder};

/// Largest supported scale (vertex count `2^scale` must fit in `u32`).
const MAX_SCALE: u32 = 31;

/// Parameters for [`rmat`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RmatParams {
    /// log2 of the vertex count.
    pub scale: u32,
    /// Candidate edges per vertex.
    pub edge_factor: usize,
    /// Probability of the top-left quadrant.
    pub a: f64,
    /// Probability of the top-right quadrant.
    pub b: f64,
    /// Probability of the bottom-left quadrant.
    pub c: f64,
    /// Generator seed.
    pub seed: u64,
    /// Build an undirected graph.
    pub undirected: bool,
    /// Apply a seeded permutation to vertex ids so that high-degree vertices
    /// are not clustered at low ids.
    pub scramble: bool,
}

impl Default for RmatParams {
    fn default() -> Self {
        Self {
            scale: 10,
            edge_factor: 16,
            a: 0.57,
            b: 0.19,
            c: 0.19,
            seed: 0,
            undirected: false,
            scramble: false,
        }
    }
}

impl RmatParams {
    /// Creates parameters with the Graph500 quadrant probabilities.
    #[must_use]
    pub fn new(scale: u32, edge_factor: usize) -> Self {
        Self {
            scale,
            edge_factor,
            ..Self::default()
        }
    }

    /// Sets the generator seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Generates an undirected graph.
    #[must_use]
    pub fn undirected(mut self) -> Self {
        self.undirected = true;
        self
    }

    /// Scrambles vertex ids.
    #[must_use]
    pub fn scrambled(mut self) -> Self {
        self.scramble = true;
        self
    }

    /// Number of vertices the parameters produce.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        1usize << self.scale
    }

    fn validate(&self) -> Result<()> {
        if self.scale > MAX_SCALE {
            return Err(Error::InvalidParameter(format!(
                "R-MAT scale {} exceeds {MAX_SCALE}",
                self.scale
            )));
        }
        let d = 1.0 - self.a - self.b - self.c;
        let probabilities = [self.a, self.b, self.c, d];
        if probabilities
            .iter()
            .any(|p| !p.is_finite() || *p < 0.0 || *p > 1.0)
        {
            return Err(Error::InvalidParameter(format!(
                "R-MAT probabilities a={}, b={}, c={}, d={d} must lie in [0, 1]",
                self.a, self.b, self.c
            )));
        }
        Ok(())
    }
}

/// Generates an R-MAT graph. Self-loops are dropped; duplicate edges are
/// collapsed by the graph builder.
pub fn rmat(params: &RmatParams) -> Result<Graph> {
    params.validate()?;

    let n = params.vertex_count();
    let candidates = params.edge_factor.saturating_mul(n);
    let mut rng = ChaCha8Rng::seed_from_u64(params.seed);

    let ab = params.a + params.b;
    let a_norm = params.a / ab;
    let c_norm = params.c / (1.0 - ab);

    let mut builder = GraphBuilder::new(n, !params.undirected);
    builder.reserve(candidates);

    let permutation = params.scramble.then(|| {
        let mut perm: Vec<u32> = (0..n as u64).map(|v| v as u32).collect();
        perm.shuffle(&mut rng);
        perm
    });

    for _ in 0..candidates {
        let mut src = 0u64;
        let mut dst = 0u64;
        for level in (0..params.scale).rev() {
            let bit = 1u64 << level;
            let src_bottom = rng.gen_range(0.0..1.0) >= ab;
            let threshold = if src_bottom { c_norm } else { a_norm };
            let dst_right = rng.gen_range(0.0..1.0) >= threshold;
            if src_bottom {
                src |= bit;
            }
            if dst_right {
                dst |= bit;
            }
        }
        if src == dst {
            continue;
        }
        let (src, dst) = match &permutation {
            Some(perm) => (perm[src as usize], perm[dst as usize]),
            None => (src as u32, dst as u32),
        };
        builder.add_edge(src, dst);
    }

    tracing::debug!(
        scale = params.scale,
        edge_factor = params.edge_factor,
        seed = params.seed,
        "generated R-MAT edges"
    );

    builder.build()
}
