//! Compressed sparse row storage.

use std::ops::Range;

use centra_common::types::VertexId;
use centra_common::utils::error::{Error, Result};

/// Incoming-arc index for directed graphs.
#[derive(Debug, Clone)]
pub(super) struct ReverseAdjacency {
    /// Start of each vertex's incoming list (length `V + 1`).
    pub(super) offsets: Vec<usize>,
    /// Source vertex of each incoming arc.
    pub(super) sources: Vec<VertexId>,
    /// Forward arc id of each incoming arc (parallel to `sources`).
    pub(super) arc_ids: Vec<usize>,
}

/// An immutable graph in CSR form.
///
/// Arc ids are positions in the forward target array; they index per-arc data
/// such as weights and edge scores.
#[derive(Debug, Clone)]
pub struct Graph {
    pub(super) vertex_count: usize,
    pub(super) edge_count: usize,
    pub(super) directed: bool,
    /// Start of each vertex's outgoing list (length `V + 1`).
    pub(super) offsets: Vec<usize>,
    /// Target of each arc.
    pub(super) targets: Vec<VertexId>,
    /// Weight of each arc, if the graph is weighted.
    pub(super) weights: Option<Vec<f64>>,
    /// Incoming arcs; `None` for undirected graphs, whose in- and out-lists coincide.
    pub(super) reverse: Option<ReverseAdjacency>,
}

impl Graph {
    /// Builds a graph from an unweighted edge list.
    pub fn from_edges(vertex_count: usize, edges: &[(u32, u32)], directed: bool) -> Result<Self> {
        let mut builder = super::GraphBuilder::new(vertex_count, directed);
        for &(src, dst) in edges {
            builder.add_edge(src, dst);
        }
        builder.build()
    }

    /// Builds a graph from a weighted edge list.
    pub fn from_weighted_edges(
        vertex_count: usize,
        edges: &[(u32, u32, f64)],
        directed: bool,
    ) -> Result<Self> {
        let mut builder = super::GraphBuilder::new(vertex_count, directed);
        for &(src, dst, weight) in edges {
            builder.add_weighted_edge(src, dst, weight);
        }
        builder.build()
    }

    /// Returns the number of vertices `V`.
    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Returns the number of edges as supplied (undirected edges count once).
    #[inline]
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Returns the number of stored arcs.
    #[inline]
    #[must_use]
    pub fn arc_count(&self) -> usize {
        self.targets.len()
    }

    /// Returns whether the graph is directed.
    #[inline]
    #[must_use]
    pub fn is_directed(&self) -> bool {
        self.directed
    }

    /// Returns whether the graph carries edge weights.
    #[inline]
    #[must_use]
    pub fn is_weighted(&self) -> bool {
        self.weights.is_some()
    }

    /// Returns whether `vertex` is in `[0, V)`.
    #[inline]
    #[must_use]
    pub fn contains(&self, vertex: VertexId) -> bool {
        vertex.index() < self.vertex_count
    }

    /// Validates that `vertex` is in `[0, V)`.
    pub fn check_vertex(&self, vertex: VertexId) -> Result<()> {
        if self.contains(vertex) {
            Ok(())
        } else {
            Err(Error::InvalidVertex {
                vertex: u64::from(vertex.as_u32()),
                vertex_count: self.vertex_count,
            })
        }
    }

    /// Iterates over all vertex ids in ascending order.
    pub fn vertices(&self) -> impl Iterator<Item = VertexId> + use<> {
        (0..self.vertex_count).map(VertexId::from_index)
    }

    /// Returns the arc ids leaving `vertex`.
    #[inline]
    #[must_use]
    pub fn arcs(&self, vertex: VertexId) -> Range<usize> {
        let v = vertex.index();
        self.offsets[v]..self.offsets[v + 1]
    }

    /// Returns the targets of the arcs leaving `vertex`, sorted ascending.
    #[inline]
    #[must_use]
    pub fn neighbors(&self, vertex: VertexId) -> &[VertexId] {
        &self.targets[self.arcs(vertex)]
    }

    /// Returns the target of an arc.
    #[inline]
    #[must_use]
    pub fn arc_target(&self, arc: usize) -> VertexId {
        self.targets[arc]
    }

    /// Returns the weight of an arc, `1.0` for unweighted graphs.
    #[inline]
    #[must_use]
    pub fn arc_weight(&self, arc: usize) -> f64 {
        self.weights.as_ref().map_or(1.0, |w| w[arc])
    }

    /// Returns the out-degree of `vertex`.
    #[inline]
    #[must_use]
    pub fn out_degree(&self, vertex: VertexId) -> usize {
        self.arcs(vertex).len()
    }

    /// Returns the in-degree of `vertex`.
    #[must_use]
    pub fn in_degree(&self, vertex: VertexId) -> usize {
        match &self.reverse {
            Some(rev) => rev.offsets[vertex.index() + 1] - rev.offsets[vertex.index()],
            None => self.out_degree(vertex),
        }
    }

    /// Returns the largest out-degree, 0 for an empty graph.
    #[must_use]
    pub fn max_out_degree(&self) -> usize {
        self.offsets
            .windows(2)
            .map(|w| w[1] - w[0])
            .max()
            .unwrap_or(0)
    }

    /// Iterates over `(source, arc id)` for every arc entering `vertex`.
    ///
    /// For undirected graphs the arc ids are those of the mirrored outgoing
    /// arcs, which carry the same weight.
    #[must_use]
    pub fn in_arcs(&self, vertex: VertexId) -> InArcs<'_> {
        let v = vertex.index();
        match &self.reverse {
            Some(rev) => {
                let range = rev.offsets[v]..rev.offsets[v + 1];
                InArcs {
                    sources: &rev.sources[range.clone()],
                    arc_ids: Some(&rev.arc_ids[range]),
                    base: 0,
                    pos: 0,
                }
            }
            None => {
                let range = self.arcs(vertex);
                InArcs {
                    sources: &self.targets[range.clone()],
                    arc_ids: None,
                    base: range.start,
                    pos: 0,
                }
            }
        }
    }

    /// Iterates over every stored arc as `(source, target, weight)`.
    ///
    /// Undirected edges appear once per direction.
    pub fn arc_list(&self) -> impl Iterator<Item = (VertexId, VertexId, f64)> + '_ {
        self.vertices().flat_map(move |src| {
            self.arcs(src)
                .map(move |arc| (src, self.targets[arc], self.arc_weight(arc)))
        })
    }
}

/// Iterator over the incoming arcs of one vertex.
#[derive(Debug, Clone)]
pub struct InArcs<'a> {
    sources: &'a [VertexId],
    arc_ids: Option<&'a [usize]>,
    base: usize,
    pos: usize,
}

impl Iterator for InArcs<'_> {
    type Item = (VertexId, usize);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let source = *self.sources.get(self.pos)?;
        let arc = self
            .arc_ids
            .map_or(self.base + self.pos, |ids| ids[self.pos]);
        self.pos += 1;
        Some((source, arc))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.sources.len() - self.pos;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for InArcs<'_> {}
