//! Reduction of per-shard partial scores into the global result.

use centra_common::types::VertexId;
use centra_common::utils::error::{Error, Result};
use centra_core::graph::Graph;

use crate::accumulator::PartialScores;
use crate::scores::{EdgeCentralityScores, EdgeScore};

/// Scale factors applied once to the summed partial scores.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalization {
    /// Factor for vertex scores.
    pub vertex_scale: f64,
    /// Factor for edge scores.
    pub edge_scale: f64,
}

impl Normalization {
    /// Computes the betweenness scale factors for a run over `sources` of
    /// `vertex_count` vertices.
    #[must_use]
    pub fn betweenness(
        vertex_count: usize,
        sources: usize,
        directed: bool,
        normalized: bool,
        endpoints: bool,
    ) -> Self {
        let n = vertex_count as f64;

        let mut vertex_scale = if normalized {
            if endpoints {
                if vertex_count > 1 { 1.0 / (n * (n - 1.0)) } else { 1.0 }
            } else if vertex_count > 2 {
                1.0 / ((n - 1.0) * (n - 2.0))
            } else {
                1.0
            }
        } else if directed {
            1.0
        } else {
            0.5
        };

        let mut edge_scale = if normalized {
            if vertex_count > 1 { 1.0 / (n * (n - 1.0)) } else { 1.0 }
        } else if directed {
            1.0
        } else {
            0.5
        };

        if sources > 0 && sources < vertex_count {
            let sampled = n / sources as f64;
            vertex_scale *= sampled;
            edge_scale *= sampled;
        }

        Self {
            vertex_scale,
            edge_scale,
        }
    }
}

/// Summed and scaled scores of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate {
    /// Per-vertex scores.
    pub vertex: Vec<f64>,
    /// Per-arc scores, when edge scores were requested.
    pub arc: Option<Vec<f64>>,
}

/// Collects one [`PartialScores`] per shard rank.
///
/// Partials may arrive in any order; [`Aggregator::finish`] sums them in
/// ascending rank so the floating-point result does not depend on which
/// shard completed first.
#[derive(Debug)]
pub struct Aggregator {
    vertex_count: usize,
    arc_count: Option<usize>,
    expected_sources: usize,
    slots: Vec<Option<PartialScores>>,
}

impl Aggregator {
    /// Creates an aggregator for `shards` ranks.
    ///
    /// `arc_count` is `Some` when per-arc partials are expected.
    /// `expected_sources` is the size of the source subset.
    #[must_use]
    pub fn new(
        shards: usize,
        vertex_count: usize,
        arc_count: Option<usize>,
        expected_sources: usize,
    ) -> Self {
        Self {
            vertex_count,
            arc_count,
            expected_sources,
            slots: vec![None; shards],
        }
    }

    /// Records the partial scores of `rank`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AggregationMismatch`] for an unknown or repeated rank
    /// or for vectors of the wrong length.
    pub fn submit(&mut self, rank: usize, partial: PartialScores) -> Result<()> {
        let shards = self.slots.len();
        let slot = self.slots.get_mut(rank).ok_or_else(|| {
            Error::AggregationMismatch(format!("rank {rank} outside group of {shards}"))
        })?;
        if slot.is_some() {
            return Err(Error::AggregationMismatch(format!(
                "rank {rank} reported twice"
            )));
        }
        if partial.vertex.len() != self.vertex_count {
            return Err(Error::AggregationMismatch(format!(
                "rank {rank} sent {} vertex scores, expected {}",
                partial.vertex.len(),
                self.vertex_count
            )));
        }
        match (self.arc_count, partial.arc.as_ref()) {
            (None, None) => {}
            (Some(expected), Some(arc)) if arc.len() == expected => {}
            (expected, arc) => {
                return Err(Error::AggregationMismatch(format!(
                    "rank {rank} sent {:?} arc scores, expected {expected:?}",
                    arc.map(Vec::len)
                )));
            }
        }
        *slot = Some(partial);
        Ok(())
    }

    /// Returns the number of ranks that have reported.
    #[must_use]
    pub fn received(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Sums all partials in rank order and applies `normalization`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AggregationMismatch`] if a rank never reported or the
    /// shards processed a different number of sources than the subset holds.
    pub fn finish(self, normalization: Normalization) -> Result<Aggregate> {
        let mut vertex = vec![0.0; self.vertex_count];
        let mut arc = self.arc_count.map(|m| vec![0.0; m]);
        let mut processed = 0;

        for (rank, slot) in self.slots.into_iter().enumerate() {
            let partial = slot.ok_or_else(|| {
                Error::AggregationMismatch(format!("rank {rank} never reported"))
            })?;
            processed += partial.sources;
            add_assign(&mut vertex, &partial.vertex);
            if let (Some(total), Some(part)) = (arc.as_mut(), partial.arc.as_ref()) {
                add_assign(total, part);
            }
        }

        if processed != self.expected_sources {
            return Err(Error::AggregationMismatch(format!(
                "shards processed {processed} sources, subset has {}",
                self.expected_sources
            )));
        }

        scale(&mut vertex, normalization.vertex_scale);
        if let Some(arc) = arc.as_mut() {
            scale(arc, normalization.edge_scale);
        }

        Ok(Aggregate { vertex, arc })
    }
}

fn add_assign(total: &mut [f64], part: &[f64]) {
    for (t, p) in total.iter_mut().zip(part) {
        *t += p;
    }
}

fn scale(values: &mut [f64], factor: f64) {
    if factor != 1.0 {
        values.iter_mut().for_each(|v| *v *= factor);
    }
}

/// Turns per-arc scores into per-edge scores.
///
/// Directed graphs keep one entry per arc. Undirected graphs fold the two
/// arcs of each edge into a single `(min, max)` entry.
#[must_use]
pub fn fold_edges(graph: &Graph, arc_scores: &[f64]) -> EdgeCentralityScores {
    let directed = graph.is_directed();
    let mut edges = Vec::with_capacity(graph.edge_count());

    for source in graph.vertices() {
        for arc in graph.arcs(source) {
            let target = graph.arc_target(arc);
            if directed {
                edges.push(edge(source, target, arc_scores[arc]));
            } else if source <= target {
                let mirrored = if source == target {
                    0.0
                } else {
                    mirror_arc(graph, target, source).map_or(0.0, |m| arc_scores[m])
                };
                edges.push(edge(source, target, arc_scores[arc] + mirrored));
            }
        }
    }

    EdgeCentralityScores::new(edges, directed)
}

fn edge(source: VertexId, target: VertexId, score: f64) -> EdgeScore {
    EdgeScore {
        source,
        target,
        score,
    }
}

/// Arc id of `from -> to`; adjacency lists are sorted by target.
fn mirror_arc(graph: &Graph, from: VertexId, to: VertexId) -> Option<usize> {
    graph
        .neighbors(from)
        .binary_search(&to)
        .ok()
        .map(|pos| graph.arcs(from).start + pos)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn partial(vertex: Vec<f64>, sources: usize) -> PartialScores {
        PartialScores {
            vertex,
            arc: None,
            sources,
        }
    }

    const IDENTITY: Normalization = Normalization {
        vertex_scale: 1.0,
        edge_scale: 1.0,
    };

    #[test]
    fn test_sums_out_of_order() {
        let mut agg = Aggregator::new(3, 2, None, 6);
        agg.submit(2, partial(vec![1.0, 0.0], 2)).unwrap();
        agg.submit(0, partial(vec![0.5, 1.0], 2)).unwrap();
        agg.submit(1, partial(vec![0.0, 2.0], 2)).unwrap();
        assert_eq!(agg.received(), 3);

        let result = agg.finish(IDENTITY).unwrap();
        assert_eq!(result.vertex, vec![1.5, 3.0]);
        assert!(result.arc.is_none());
    }

    #[test]
    fn test_duplicate_rank_rejected() {
        let mut agg = Aggregator::new(2, 1, None, 2);
        agg.submit(0, partial(vec![1.0], 1)).unwrap();
        assert!(matches!(
            agg.submit(0, partial(vec![1.0], 1)),
            Err(Error::AggregationMismatch(_))
        ));
    }

    #[test]
    fn test_out_of_range_rank_rejected() {
        let mut agg = Aggregator::new(2, 1, None, 2);
        assert!(matches!(
            agg.submit(2, partial(vec![1.0], 1)),
            Err(Error::AggregationMismatch(_))
        ));
    }

    #[test]
    fn test_wrong_length_rejected() {
        let mut agg = Aggregator::new(1, 3, None, 1);
        assert!(matches!(
            agg.submit(0, partial(vec![1.0], 1)),
            Err(Error::AggregationMismatch(_))
        ));

        let mut agg = Aggregator::new(1, 1, Some(2), 1);
        assert!(matches!(
            agg.submit(0, partial(vec![1.0], 1)),
            Err(Error::AggregationMismatch(_))
        ));
    }

    #[test]
    fn test_missing_shard_rejected() {
        let mut agg = Aggregator::new(2, 1, None, 2);
        agg.submit(1, partial(vec![1.0], 1)).unwrap();
        assert!(matches!(
            agg.finish(IDENTITY),
            Err(Error::AggregationMismatch(_))
        ));
    }

    #[test]
    fn test_source_count_checked() {
        let mut agg = Aggregator::new(1, 1, None, 3);
        agg.submit(0, partial(vec![1.0], 2)).unwrap();
        assert!(matches!(
            agg.finish(IDENTITY),
            Err(Error::AggregationMismatch(_))
        ));
    }

    #[test]
    fn test_normalization_factors() {
        let raw_directed = Normalization::betweenness(5, 5, true, false, false);
        assert_eq!(raw_directed.vertex_scale, 1.0);

        let raw_undirected = Normalization::betweenness(5, 5, false, false, false);
        assert_eq!(raw_undirected.vertex_scale, 0.5);
        assert_eq!(raw_undirected.edge_scale, 0.5);

        let normalized = Normalization::betweenness(5, 5, true, true, false);
        assert!((normalized.vertex_scale - 1.0 / 12.0).abs() < 1e-12);
        assert!((normalized.edge_scale - 1.0 / 20.0).abs() < 1e-12);

        let with_endpoints = Normalization::betweenness(5, 5, false, true, true);
        assert!((with_endpoints.vertex_scale - 1.0 / 20.0).abs() < 1e-12);
    }

    #[test]
    fn test_sampled_runs_scale_up() {
        let full = Normalization::betweenness(10, 10, true, false, false);
        let sampled = Normalization::betweenness(10, 4, true, false, false);
        assert_eq!(full.vertex_scale, 1.0);
        assert!((sampled.vertex_scale - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_tiny_graphs_unscaled() {
        let n = Normalization::betweenness(2, 2, true, true, false);
        assert_eq!(n.vertex_scale, 1.0);
        let n = Normalization::betweenness(1, 1, true, true, true);
        assert_eq!(n.vertex_scale, 1.0);
    }

    #[test]
    fn test_fold_undirected_edges() {
        // Arcs: 0->1, 1->0, 1->2, 2->1.
        let graph = Graph::from_edges(3, &[(0, 1), (1, 2)], false).unwrap();
        let folded = fold_edges(&graph, &[1.0, 2.0, 3.0, 4.0]);

        assert_eq!(folded.len(), 2);
        assert_eq!(folded.get(VertexId::new(0), VertexId::new(1)), Some(3.0));
        assert_eq!(folded.get(VertexId::new(2), VertexId::new(1)), Some(7.0));
    }

    #[test]
    fn test_fold_directed_edges() {
        let graph = Graph::from_edges(3, &[(0, 1), (1, 2), (2, 1)], true).unwrap();
        let folded = fold_edges(&graph, &[1.0, 2.0, 3.0]);

        assert_eq!(folded.len(), 3);
        assert_eq!(folded.get(VertexId::new(1), VertexId::new(2)), Some(2.0));
        assert_eq!(folded.get(VertexId::new(2), VertexId::new(1)), Some(3.0));
    }
}
