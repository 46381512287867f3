//! Source subset selection.
//!
//! Betweenness can be estimated from a random sample of `k` source vertices
//! instead of all `V`. The sample is drawn once per run, before partitioning,
//! so it is identical whatever the device count. Randomness comes from an
//! explicit [`SourceSampler`] rather than a process-global generator.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use centra_common::types::VertexId;
use centra_common::utils::error::{Error, Result};

/// Strategy for drawing a random source sample.
pub trait SourceSampler {
    /// Draws `k` distinct ids from `[0, vertex_count)`, with
    /// `0 < k < vertex_count`.
    fn sample(&mut self, vertex_count: usize, k: usize) -> Vec<VertexId>;
}

/// ChaCha8-backed sampler; identical seeds give identical samples.
#[derive(Debug, Clone)]
pub struct SeededSampler {
    seed: u64,
    rng: ChaCha8Rng,
}

impl SeededSampler {
    /// Creates a sampler from a seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Creates a sampler from a freshly drawn seed. The seed is logged so the
    /// run can be replayed with [`SeededSampler::new`].
    #[must_use]
    pub fn from_random_seed() -> Self {
        let seed = rand::random::<u64>();
        tracing::info!(seed, "no subset seed given, drew a random one");
        Self::new(seed)
    }

    /// Returns the seed this sampler was created with.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl SourceSampler for SeededSampler {
    fn sample(&mut self, vertex_count: usize, k: usize) -> Vec<VertexId> {
        rand::seq::index::sample(&mut self.rng, vertex_count, k)
            .into_iter()
            .map(VertexId::from_index)
            .collect()
    }
}

/// The ordered source vertices of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSubset {
    sources: Vec<VertexId>,
    vertex_count: usize,
}

impl SourceSubset {
    /// All vertices of a `vertex_count`-vertex graph, ascending.
    #[must_use]
    pub fn full(vertex_count: usize) -> Self {
        Self {
            sources: (0..vertex_count).map(VertexId::from_index).collect(),
            vertex_count,
        }
    }

    /// Returns the number of sources `k`.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Returns true if there are no sources (empty graph).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Returns true when every vertex is a source.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.sources.len() == self.vertex_count
    }

    /// Returns the vertex count of the graph the subset was drawn from.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Returns the sources in order.
    #[must_use]
    pub fn as_slice(&self) -> &[VertexId] {
        &self.sources
    }
}

/// Selects the sources of a run.
///
/// `None` or `Some(V)` selects every vertex in ascending order; `Some(k)` with
/// `0 < k < V` draws a sample through `sampler`. Anything else fails with
/// [`Error::InvalidSubsetSize`].
pub fn select_sources<S>(
    vertex_count: usize,
    subset_size: Option<usize>,
    sampler: &mut S,
) -> Result<SourceSubset>
where
    S: SourceSampler + ?Sized,
{
    match subset_size {
        None => Ok(SourceSubset::full(vertex_count)),
        Some(k) if k == 0 || k > vertex_count => Err(Error::InvalidSubsetSize {
            requested: k,
            vertex_count,
        }),
        Some(k) if k == vertex_count => Ok(SourceSubset::full(vertex_count)),
        Some(k) => {
            let sources = sampler.sample(vertex_count, k);
            if sources.len() != k {
                return Err(Error::InvalidParameter(format!(
                    "sampler returned {} sources, expected {k}",
                    sources.len()
                )));
            }
            if let Some(bad) = sources.iter().find(|v| v.index() >= vertex_count) {
                return Err(Error::InvalidVertex {
                    vertex: u64::from(bad.as_u32()),
                    vertex_count,
                });
            }
            tracing::debug!(k, vertex_count, "sampled source subset");
            Ok(SourceSubset {
                sources,
                vertex_count,
            })
        }
    }
}
