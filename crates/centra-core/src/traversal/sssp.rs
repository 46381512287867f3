//! Dijkstra single-source shortest paths.

use std::collections::BinaryHeap;

use centra_common::types::VertexId;
use centra_common::utils::error::Result;

use super::heap::MinScored;
use crate::graph::Graph;

/// Output of [`sssp`].
#[derive(Debug, Clone, PartialEq)]
pub struct SsspResult {
    /// Shortest distance from the source, `f64::INFINITY` when unreachable.
    pub distances: Vec<f64>,
    /// Predecessor on the first shortest path found; `None` for the source
    /// and unreachable vertices.
    pub predecessors: Vec<Option<VertexId>>,
}

/// Shortest paths from `source` using arc weights (unit weights when the
/// graph is unweighted).
///
/// Only strictly shorter paths replace a tentative distance, so ties keep
/// the predecessor that was settled first.
pub fn sssp(graph: &Graph, source: VertexId) -> Result<SsspResult> {
    graph.check_vertex(source)?;

    let n = graph.vertex_count();
    let mut distances = vec![f64::INFINITY; n];
    let mut predecessors = vec![None; n];
    let mut settled = vec![false; n];
    let mut heap = BinaryHeap::new();
    let mut seq = 0u64;

    distances[source.index()] = 0.0;
    heap.push(MinScored::new(0.0, seq, source));

    while let Some(MinScored { dist, vertex, .. }) = heap.pop() {
        if settled[vertex.index()] {
            continue;
        }
        settled[vertex.index()] = true;

        for arc in graph.arcs(vertex) {
            let target = graph.arc_target(arc);
            if settled[target.index()] {
                continue;
            }
            let candidate = dist + graph.arc_weight(arc);
            if candidate < distances[target.index()] {
                distances[target.index()] = candidate;
                predecessors[target.index()] = Some(vertex);
                seq += 1;
                heap.push(MinScored::new(candidate, seq, target));
            }
        }
    }

    Ok(SsspResult {
        distances,
        predecessors,
    })
}
