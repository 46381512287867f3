//! Single-source dependency accumulation (Brandes' algorithm).
//!
//! For every source the accumulator runs two passes:
//!
//! 1. **Forward**: BFS (unweighted) or Dijkstra (weighted) from the source,
//!    recording each vertex's distance, its number of shortest paths
//!    `sigma`, and its predecessors on those paths.
//! 2. **Backward**: vertices are popped in non-increasing distance order and
//!    each pushes `sigma[p] * (1 + delta[w]) / sigma[w]` to every
//!    predecessor `p` of `w`.
//!
//! `delta` of every vertex except the source is then added to the shard's
//! running totals. Scratch buffers are sized once per shard and reset only
//! for the vertices a traversal touched, so a shard costs `O(V)` memory plus
//! the predecessor lists.

use std::collections::{BinaryHeap, VecDeque};

use smallvec::SmallVec;

use centra_common::types::VertexId;
use centra_common::utils::error::{Error, Result};
use centra_core::graph::Graph;
use centra_core::traversal::MinScored;

/// Per-source options, fixed for a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccumulatorOptions {
    /// Count path endpoints as lying on the path.
    pub endpoints: bool,
    /// Use arc weights (Dijkstra) instead of hop counts (BFS).
    pub weighted: bool,
    /// Also accumulate per-arc scores.
    pub edge_scores: bool,
}

/// Unnormalized contributions of one shard's sources.
#[derive(Debug, Clone, PartialEq)]
pub struct PartialScores {
    /// Per-vertex dependency sums.
    pub vertex: Vec<f64>,
    /// Per-arc dependency sums, when requested.
    pub arc: Option<Vec<f64>>,
    /// Number of sources processed.
    pub sources: usize,
}

/// Predecessor on a shortest path, with the arc that was used.
#[derive(Debug, Clone, Copy)]
struct Pred {
    vertex: VertexId,
    arc: usize,
}

/// Accumulates Brandes dependencies for a sequence of sources.
pub struct BrandesAccumulator<'g> {
    graph: &'g Graph,
    options: AccumulatorOptions,
    stack: Vec<VertexId>,
    queue: VecDeque<VertexId>,
    heap: BinaryHeap<MinScored>,
    settled: Vec<bool>,
    preds: Vec<SmallVec<[Pred; 4]>>,
    sigma: Vec<f64>,
    dist: Vec<f64>,
    delta: Vec<f64>,
    scores: Vec<f64>,
    arc_scores: Option<Vec<f64>>,
    processed: usize,
}

impl<'g> BrandesAccumulator<'g> {
    /// Creates an accumulator with zeroed totals.
    #[must_use]
    pub fn new(graph: &'g Graph, options: AccumulatorOptions) -> Self {
        let n = graph.vertex_count();
        Self {
            graph,
            options,
            stack: Vec::with_capacity(n),
            queue: VecDeque::new(),
            heap: BinaryHeap::new(),
            settled: vec![false; n],
            preds: vec![SmallVec::new(); n],
            sigma: vec![0.0; n],
            dist: vec![f64::INFINITY; n],
            delta: vec![0.0; n],
            scores: vec![0.0; n],
            arc_scores: options.edge_scores.then(|| vec![0.0; graph.arc_count()]),
            processed: 0,
        }
    }

    /// Adds the dependencies of `source` to the running totals.
    pub fn accumulate(&mut self, source: VertexId) -> Result<()> {
        self.graph.check_vertex(source)?;

        if self.options.weighted {
            self.forward_weighted(source);
        } else {
            self.forward_unweighted(source);
        }

        if let Some(v) = self
            .stack
            .iter()
            .find(|v| !self.sigma[v.index()].is_finite())
        {
            let err = Error::NumericOverflow(format!(
                "shortest-path count from source {source} to vertex {v} exceeds f64 range"
            ));
            self.reset();
            return Err(err);
        }

        self.backward(source);
        self.processed += 1;
        Ok(())
    }

    /// Returns the totals accumulated so far.
    #[must_use]
    pub fn finish(self) -> PartialScores {
        PartialScores {
            vertex: self.scores,
            arc: self.arc_scores,
            sources: self.processed,
        }
    }

    fn forward_unweighted(&mut self, source: VertexId) {
        let graph = self.graph;
        self.sigma[source.index()] = 1.0;
        self.dist[source.index()] = 0.0;
        self.queue.push_back(source);

        while let Some(v) = self.queue.pop_front() {
            self.stack.push(v);
            let next = self.dist[v.index()] + 1.0;
            let sigma_v = self.sigma[v.index()];

            for arc in graph.arcs(v) {
                let w = graph.arc_target(arc);
                if w == v {
                    continue;
                }
                let wi = w.index();
                if self.dist[wi].is_infinite() {
                    self.dist[wi] = next;
                    self.queue.push_back(w);
                }
                if self.dist[wi] == next {
                    self.sigma[wi] += sigma_v;
                    self.preds[wi].push(Pred { vertex: v, arc });
                }
            }
        }
    }

    fn forward_weighted(&mut self, source: VertexId) {
        let graph = self.graph;
        let mut seq = 0u64;
        self.sigma[source.index()] = 1.0;
        self.dist[source.index()] = 0.0;
        self.heap.push(MinScored::new(0.0, seq, source));

        while let Some(MinScored { dist, vertex: v, .. }) = self.heap.pop() {
            let vi = v.index();
            if self.settled[vi] || dist > self.dist[vi] {
                continue;
            }
            // sigma[v] is final once v settles: later relaxations into v are ignored.
            self.settled[vi] = true;
            self.stack.push(v);
            let sigma_v = self.sigma[vi];

            for arc in graph.arcs(v) {
                let w = graph.arc_target(arc);
                let wi = w.index();
                if w == v || self.settled[wi] {
                    continue;
                }
                let candidate = dist + graph.arc_weight(arc);
                if candidate < self.dist[wi] {
                    self.dist[wi] = candidate;
                    self.sigma[wi] = sigma_v;
                    self.preds[wi].clear();
                    self.preds[wi].push(Pred { vertex: v, arc });
                    seq += 1;
                    self.heap.push(MinScored::new(candidate, seq, w));
                } else if candidate == self.dist[wi] {
                    self.sigma[wi] += sigma_v;
                    self.preds[wi].push(Pred { vertex: v, arc });
                }
            }
        }
    }

    fn backward(&mut self, source: VertexId) {
        let s = source.index();
        let bonus = if self.options.endpoints { 1.0 } else { 0.0 };
        let reached = self.stack.len();

        while let Some(w) = self.stack.pop() {
            let wi = w.index();
            let coeff = (1.0 + self.delta[wi]) / self.sigma[wi];
            for pred in &self.preds[wi] {
                let pi = pred.vertex.index();
                let contribution = self.sigma[pi] * coeff;
                self.delta[pi] += contribution;
                if let Some(arc_scores) = &mut self.arc_scores {
                    arc_scores[pred.arc] += contribution;
                }
            }
            if wi != s {
                self.scores[wi] += self.delta[wi] + bonus;
            }
            self.clear_vertex(wi);
        }

        if self.options.endpoints {
            self.scores[s] += (reached - 1) as f64;
        }
    }

    fn clear_vertex(&mut self, v: usize) {
        self.sigma[v] = 0.0;
        self.dist[v] = f64::INFINITY;
        self.delta[v] = 0.0;
        self.settled[v] = false;
        self.preds[v].clear();
    }

    /// Clears scratch state after an aborted traversal.
    fn reset(&mut self) {
        while let Some(v) = self.stack.pop() {
            self.clear_vertex(v.index());
        }
        self.queue.clear();
        self.heap.clear();
    }
}

/// Accumulates every source of a shard.
///
/// `cancelled` is polled before each source; once it returns true the shard
/// stops with [`Error::Cancelled`].
pub fn accumulate_shard<C>(
    graph: &Graph,
    sources: &[VertexId],
    options: AccumulatorOptions,
    cancelled: C,
) -> Result<PartialScores>
where
    C: Fn() -> bool,
{
    let mut accumulator = BrandesAccumulator::new(graph, options);
    for &source in sources {
        if cancelled() {
            return Err(Error::Cancelled);
        }
        accumulator.accumulate(source)?;
    }
    Ok(accumulator.finish())
}
