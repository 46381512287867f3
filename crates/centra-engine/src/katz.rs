//! Katz centrality by power iteration.
//!
//! Iterates `x' = alpha * A^T x + beta` from `x = 0`: each vertex sums the
//! scores of its in-neighbours. Every vertex update reads only the previous
//! iterate, so the sweep runs on the rayon pool and stays deterministic.

use rayon::prelude::*;

use centra_common::types::VertexId;
use centra_common::utils::error::{Error, Result};
use centra_core::graph::Graph;

use crate::config::KatzConfig;
use crate::scores::CentralityScores;

/// Computes Katz centrality.
///
/// # Errors
///
/// Returns [`Error::InvalidParameter`] for a rejected configuration and
/// [`Error::NotConverged`] when the iterate has not settled within
/// `max_iter` sweeps.
pub fn katz(graph: &Graph, config: &KatzConfig) -> Result<CentralityScores> {
    config.validate()?;

    let n = graph.vertex_count();
    if n == 0 {
        return Ok(CentralityScores::new(Vec::new()));
    }

    let alpha = config
        .alpha
        .unwrap_or_else(|| 1.0 / (graph.max_out_degree() as f64 + 1.0));
    let beta = config.beta;
    let weighted = config.use_weights && graph.is_weighted();
    let threshold = n as f64 * config.tolerance;

    let mut current = vec![0.0; n];
    let mut next = vec![0.0; n];

    for iteration in 1..=config.max_iter {
        next.par_iter_mut().enumerate().for_each(|(v, out)| {
            let incoming: f64 = graph
                .in_arcs(VertexId::from_index(v))
                .map(|(u, arc)| {
                    let w = if weighted { graph.arc_weight(arc) } else { 1.0 };
                    w * current[u.index()]
                })
                .sum();
            *out = alpha * incoming + beta;
        });

        let change: f64 = next
            .iter()
            .zip(&current)
            .map(|(a, b)| (a - b).abs())
            .sum();
        std::mem::swap(&mut current, &mut next);

        if !change.is_finite() {
            break;
        }
        if change < threshold {
            tracing::debug!(iteration, alpha, "katz converged");
            if config.normalized {
                let norm = current.iter().map(|x| x * x).sum::<f64>().sqrt();
                if norm > 0.0 {
                    current.iter_mut().for_each(|x| *x /= norm);
                }
            }
            return Ok(CentralityScores::new(current));
        }
    }

    tracing::warn!(max_iter = config.max_iter, alpha, "katz did not converge");
    Err(Error::NotConverged {
        iterations: config.max_iter,
    })
}
