//! Min-heap entry for Dijkstra-style relaxation.

use std::cmp::Ordering;

use centra_common::types::VertexId;

/// A `(distance, sequence, vertex)` entry ordered so that
/// `std::collections::BinaryHeap` pops the smallest distance first.
///
/// Equal distances pop in push order (`seq`), which keeps tie handling
/// deterministic.
#[derive(Debug, Clone, Copy)]
pub struct MinScored {
    /// Tentative distance from the source.
    pub dist: f64,
    /// Push sequence number.
    pub seq: u64,
    /// Vertex the entry refers to.
    pub vertex: VertexId,
}

impl MinScored {
    /// Creates a heap entry.
    #[must_use]
    pub fn new(dist: f64, seq: u64, vertex: VertexId) -> Self {
        Self { dist, seq, vertex }
    }
}

impl PartialEq for MinScored {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for MinScored {}

impl PartialOrd for MinScored {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MinScored {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: BinaryHeap is a max-heap.
        other
            .dist
            .total_cmp(&self.dist)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}
