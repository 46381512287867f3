//! Graph construction from edge lists.

use centra_common::types::VertexId;
use centra_common::utils::error::{Error, Result};

use super::csr::{Graph, ReverseAdjacency};

/// Collects edges and produces an immutable [`Graph`].
///
/// Validation happens in [`build`](Self::build): vertex ids must lie in
/// `[0, V)` and weights must be finite and non-negative. Each adjacency list
/// is sorted by target and parallel arcs are collapsed to the lightest one,
/// so the stored graph does not depend on insertion order.
#[derive(Debug, Clone)]
pub struct GraphBuilder {
    vertex_count: usize,
    directed: bool,
    weighted: bool,
    edges: Vec<(u32, u32, f64)>,
}

impl GraphBuilder {
    /// Creates a builder for a graph with `vertex_count` vertices.
    #[must_use]
    pub fn new(vertex_count: usize, directed: bool) -> Self {
        Self {
            vertex_count,
            directed,
            weighted: false,
            edges: Vec::new(),
        }
    }

    /// Creates a builder for a directed graph.
    #[must_use]
    pub fn directed(vertex_count: usize) -> Self {
        Self::new(vertex_count, true)
    }

    /// Creates a builder for an undirected graph.
    #[must_use]
    pub fn undirected(vertex_count: usize) -> Self {
        Self::new(vertex_count, false)
    }

    /// Reserves room for `additional` edges.
    pub fn reserve(&mut self, additional: usize) {
        self.edges.reserve(additional);
    }

    /// Adds an unweighted edge. Weighs `1.0` if the graph ends up weighted.
    pub fn add_edge(&mut self, src: u32, dst: u32) -> &mut Self {
        self.edges.push((src, dst, 1.0));
        self
    }

    /// Adds a weighted edge; the built graph becomes weighted.
    pub fn add_weighted_edge(&mut self, src: u32, dst: u32, weight: f64) -> &mut Self {
        self.weighted = true;
        self.edges.push((src, dst, weight));
        self
    }

    /// Returns the number of edges added so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Returns true if no edges were added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Validates the edges and builds the CSR graph.
    pub fn build(self) -> Result<Graph> {
        let n = self.vertex_count;
        if n > u32::MAX as usize {
            return Err(Error::InvalidGraph(format!(
                "{n} vertices exceed the supported maximum of {}",
                u32::MAX
            )));
        }

        let mut arcs = Vec::with_capacity(if self.directed {
            self.edges.len()
        } else {
            self.edges.len() * 2
        });
        for &(src, dst, weight) in &self.edges {
            for id in [src, dst] {
                if id as usize >= n {
                    return Err(Error::InvalidVertex {
                        vertex: u64::from(id),
                        vertex_count: n,
                    });
                }
            }
            if !weight.is_finite() || weight < 0.0 {
                return Err(Error::InvalidGraph(format!(
                    "edge {src}->{dst} has invalid weight {weight}"
                )));
            }
            arcs.push((src, dst, weight));
            if !self.directed && src != dst {
                arcs.push((dst, src, weight));
            }
        }

        arcs.sort_unstable_by(|a, b| {
            a.0.cmp(&b.0)
                .then(a.1.cmp(&b.1))
                .then(a.2.total_cmp(&b.2))
        });
        // Sorted by weight within a (src, dst) run, so the first one is the lightest.
        arcs.dedup_by(|next, kept| next.0 == kept.0 && next.1 == kept.1);

        let edge_count = if self.directed {
            arcs.len()
        } else {
            arcs.iter().filter(|(src, dst, _)| src <= dst).count()
        };

        let mut offsets = vec![0usize; n + 1];
        for &(src, _, _) in &arcs {
            offsets[src as usize + 1] += 1;
        }
        for i in 0..n {
            offsets[i + 1] += offsets[i];
        }

        let targets: Vec<VertexId> = arcs.iter().map(|&(_, dst, _)| VertexId::new(dst)).collect();
        let weights = self
            .weighted
            .then(|| arcs.iter().map(|&(_, _, w)| w).collect::<Vec<f64>>());

        let reverse = self.directed.then(|| build_reverse(n, &arcs));

        tracing::debug!(
            vertices = n,
            edges = edge_count,
            arcs = targets.len(),
            directed = self.directed,
            weighted = self.weighted,
            "built CSR graph"
        );

        Ok(Graph {
            vertex_count: n,
            edge_count,
            directed: self.directed,
            offsets,
            targets,
            weights,
            reverse,
        })
    }
}

/// Builds the incoming-arc index; arcs must already be sorted by source.
fn build_reverse(n: usize, arcs: &[(u32, u32, f64)]) -> ReverseAdjacency {
    let mut offsets = vec![0usize; n + 1];
    for &(_, dst, _) in arcs {
        offsets[dst as usize + 1] += 1;
    }
    for i in 0..n {
        offsets[i + 1] += offsets[i];
    }

    let mut cursor = offsets.clone();
    let mut sources = vec![VertexId::default(); arcs.len()];
    let mut arc_ids = vec![0usize; arcs.len()];
    for (arc, &(src, dst, _)) in arcs.iter().enumerate() {
        let slot = &mut cursor[dst as usize];
        sources[*slot] = VertexId::new(src);
        arc_ids[*slot] = arc;
        *slot += 1;
    }

    ReverseAdjacency {
        offsets,
        sources,
        arc_ids,
    }
}
