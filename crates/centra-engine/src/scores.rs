//! Centrality result types.

use hashbrown::HashMap;
use serde::Serialize;

use centra_common::types::VertexId;

/// One centrality score per vertex, indexed by vertex id.
///
/// Produced once per run and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CentralityScores {
    values: Vec<f64>,
}

impl CentralityScores {
    pub(crate) fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    /// Returns the number of scored vertices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true for an empty graph.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the score of `vertex`, or `None` if it is out of range.
    #[must_use]
    pub fn get(&self, vertex: VertexId) -> Option<f64> {
        self.values.get(vertex.index()).copied()
    }

    /// Returns the scores as a slice indexed by vertex id.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Iterates over `(vertex, score)` in ascending vertex order.
    pub fn iter(&self) -> impl Iterator<Item = (VertexId, f64)> + '_ {
        self.values
            .iter()
            .enumerate()
            .map(|(i, &score)| (VertexId::from_index(i), score))
    }

    /// Returns the scores as a vertex-to-score map.
    #[must_use]
    pub fn to_map(&self) -> HashMap<VertexId, f64> {
        self.iter().collect()
    }

    /// Returns the `k` highest-scoring vertices, highest first. Ties are
    /// broken by ascending vertex id.
    #[must_use]
    pub fn top_k(&self, k: usize) -> Vec<(VertexId, f64)> {
        let mut ranked: Vec<_> = self.iter().collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        ranked.truncate(k);
        ranked
    }

    /// Consumes the scores, returning the underlying vector.
    #[must_use]
    pub fn into_vec(self) -> Vec<f64> {
        self.values
    }
}

/// Betweenness of a single edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EdgeScore {
    /// Edge source (smaller endpoint for undirected graphs).
    pub source: VertexId,
    /// Edge target (larger endpoint for undirected graphs).
    pub target: VertexId,
    /// Centrality score.
    pub score: f64,
}

/// Per-edge betweenness, sorted by `(source, target)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeCentralityScores {
    edges: Vec<EdgeScore>,
    directed: bool,
}

impl EdgeCentralityScores {
    pub(crate) fn new(edges: Vec<EdgeScore>, directed: bool) -> Self {
        Self { edges, directed }
    }

    /// Returns the number of scored edges.
    #[must_use]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Returns true if the graph has no edges.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Returns the score of the edge `source -> target`. For undirected
    /// graphs the endpoints may be given in either order.
    #[must_use]
    pub fn get(&self, source: VertexId, target: VertexId) -> Option<f64> {
        let probe = |s: VertexId, t: VertexId| {
            self.edges
                .binary_search_by(|e| (e.source, e.target).cmp(&(s, t)))
                .ok()
                .map(|i| self.edges[i].score)
        };
        match probe(source, target) {
            Some(score) => Some(score),
            None if !self.directed => probe(target, source),
            None => None,
        }
    }

    /// Returns all edge scores.
    #[must_use]
    pub fn as_slice(&self) -> &[EdgeScore] {
        &self.edges
    }
}
