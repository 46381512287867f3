//! Katz centrality command.

use std::time::Instant;

use anyhow::{Context, Result};
use centra_engine::{KatzConfig, katz_centrality};
use serde::Serialize;

use crate::output::{self, Format};
use crate::{GraphArgs, OutputFormat};

/// Options collected from the command line.
pub struct Options {
    pub alpha: Option<f64>,
    pub beta: f64,
    pub max_iter: usize,
    pub tolerance: f64,
    pub normalized: bool,
    pub top: usize,
}

#[derive(Serialize)]
struct Entry {
    vertex: u32,
    score: f64,
}

#[derive(Serialize)]
struct KatzOutput {
    config: KatzConfig,
    vertices: usize,
    elapsed_ms: u128,
    top: Vec<Entry>,
}

/// Run the katz command.
pub fn run(args: &GraphArgs, options: &Options, format: OutputFormat, quiet: bool) -> Result<()> {
    let (_, graph) = super::generate(args, quiet || format.is_json())?;
    let config = KatzConfig {
        alpha: options.alpha,
        beta: options.beta,
        max_iter: options.max_iter,
        tolerance: options.tolerance,
        normalized: options.normalized,
        use_weights: false,
    };

    let start = Instant::now();
    let scores = katz_centrality(&graph, &config).context("katz centrality failed")?;
    let elapsed_ms = start.elapsed().as_millis();
    let ranked = scores.top_k(options.top);

    let fmt: Format = format.into();
    match fmt {
        Format::Json => output::print_json(
            &KatzOutput {
                config,
                vertices: graph.vertex_count(),
                elapsed_ms,
                top: ranked
                    .iter()
                    .map(|&(v, score)| Entry {
                        vertex: v.as_u32(),
                        score,
                    })
                    .collect(),
            },
            quiet,
        ),
        Format::Table => {
            if !quiet {
                let rows: Vec<_> = ranked
                    .iter()
                    .map(|&(v, score)| (vec![v.to_string()], score))
                    .collect();
                output::print_ranking(&["Rank", "Vertex", "Katz"], &rows);
                output::status(&format!("Converged in {elapsed_ms} ms"), quiet);
            }
            Ok(())
        }
    }
}
