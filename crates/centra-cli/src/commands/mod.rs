//! CLI command implementations.

pub mod betweenness;
pub mod devices;
pub mod info;
pub mod katz;

use std::time::Instant;

use anyhow::{Context, Result};
use centra_core::{Graph, RmatParams, rmat};

use crate::GraphArgs;

/// Builds the R-MAT graph described by `args`.
pub fn generate(args: &GraphArgs, quiet: bool) -> Result<(RmatParams, Graph)> {
    let mut params = RmatParams::new(args.scale, args.edge_factor).with_seed(args.graph_seed);
    if !args.directed {
        params = params.undirected();
    }
    if args.scramble {
        params = params.scrambled();
    }

    let start = Instant::now();
    let graph = rmat(&params).context("failed to generate R-MAT graph")?;
    crate::output::status(
        &format!(
            "Generated {} vertices, {} edges in {:.2?}",
            graph.vertex_count(),
            graph.edge_count(),
            start.elapsed()
        ),
        quiet,
    );
    Ok((params, graph))
}
