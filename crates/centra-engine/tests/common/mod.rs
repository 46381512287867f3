//! Shared helpers for the engine integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;

use centra_common::types::VertexId;
use centra_core::graph::Graph;
use centra_core::{RmatParams, rmat};

/// Tolerance used when comparing against the reference.
pub const EPSILON: f64 = 1e-4;

/// Small undirected R-MAT graph used across tests.
pub fn undirected_rmat(scale: u32, seed: u64) -> Graph {
    rmat(&RmatParams::new(scale, 4).with_seed(seed).undirected().scrambled()).unwrap()
}

/// Small directed R-MAT graph used across tests.
pub fn directed_rmat(scale: u32, seed: u64) -> Graph {
    rmat(&RmatParams::new(scale, 4).with_seed(seed)).unwrap()
}

/// Re-weights `graph` with small integer weights so equal-length paths tie often.
pub fn with_small_weights(graph: &Graph) -> Graph {
    let edges: Vec<(u32, u32, f64)> = graph
        .arc_list()
        .filter(|(s, t, _)| graph.is_directed() || s <= t)
        .map(|(s, t, _)| {
            let (s, t) = (s.as_u32(), t.as_u32());
            (s, t, f64::from((s * 7 + t * 3) % 3 + 1))
        })
        .collect();
    Graph::from_weighted_edges(graph.vertex_count(), &edges, graph.is_directed()).unwrap()
}

/// Two 5-cliques joined by the bridge 4-5.
pub fn barbell() -> Graph {
    let mut edges = Vec::new();
    for base in [0u32, 5] {
        for a in 0..5 {
            for b in a + 1..5 {
                edges.push((base + a, base + b));
            }
        }
    }
    edges.push((4, 5));
    Graph::from_edges(10, &edges, false).unwrap()
}

/// Hop distances and shortest-path counts from `source`.
fn path_counts(graph: &Graph, source: usize) -> (Vec<Option<usize>>, Vec<f64>) {
    let n = graph.vertex_count();
    let mut dist = vec![None; n];
    let mut sigma = vec![0.0; n];
    let mut queue = VecDeque::new();
    dist[source] = Some(0);
    sigma[source] = 1.0;
    queue.push_back(source);

    while let Some(v) = queue.pop_front() {
        let d = dist[v].unwrap();
        for w in graph.neighbors(VertexId::from_index(v)) {
            let w = w.index();
            if w == v {
                continue;
            }
            if dist[w].is_none() {
                dist[w] = Some(d + 1);
                queue.push_back(w);
            }
            if dist[w] == Some(d + 1) {
                sigma[w] += sigma[v];
            }
        }
    }
    (dist, sigma)
}

/// Raw (unnormalized, no endpoints) betweenness from the pair-counting
/// definition: `sum over s != v != t of sigma_st(v) / sigma_st`.
///
/// Counts ordered pairs, so undirected scores are twice the halved
/// convention.
pub fn reference_betweenness(graph: &Graph) -> Vec<f64> {
    let n = graph.vertex_count();
    let table: Vec<_> = (0..n).map(|s| path_counts(graph, s)).collect();
    let mut scores = vec![0.0; n];

    for s in 0..n {
        let (dist_s, sigma_s) = &table[s];
        for t in 0..n {
            let Some(d_st) = dist_s[t] else { continue };
            if s == t {
                continue;
            }
            for v in 0..n {
                if v == s || v == t {
                    continue;
                }
                let (dist_v, sigma_v) = &table[v];
                if let (Some(d_sv), Some(d_vt)) = (dist_s[v], dist_v[t])
                    && d_sv + d_vt == d_st
                {
                    scores[v] += sigma_s[v] * sigma_v[t] / sigma_s[t];
                }
            }
        }
    }
    scores
}

/// Counts positions where `a` and `b` differ by more than `epsilon`,
/// relative to the larger magnitude when it exceeds one.
pub fn compare_scores(a: &[f64], b: &[f64], epsilon: f64) -> usize {
    assert_eq!(a.len(), b.len(), "score vectors differ in length");
    a.iter()
        .zip(b)
        .filter(|(x, y)| {
            let scale = x.abs().max(y.abs()).max(1.0);
            (*x - *y).abs() > epsilon * scale
        })
        .count()
}
