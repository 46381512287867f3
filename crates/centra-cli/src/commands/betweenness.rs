//! Betweenness centrality command.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use centra_engine::{BetweennessConfig, Engine, LocalDevices, PartitionStrategy, SeededSampler};
use serde::Serialize;

use crate::output::{self, Format};
use crate::{GraphArgs, OutputFormat, Partition};

/// Options collected from the command line.
pub struct Options {
    pub subset_size: Option<usize>,
    pub seed: Option<u64>,
    pub devices: usize,
    pub peer_to_peer: bool,
    pub partition: Partition,
    pub normalized: bool,
    pub endpoints: bool,
    pub edges: bool,
    pub top: usize,
}

#[derive(Serialize)]
struct VertexEntry {
    vertex: u32,
    score: f64,
}

#[derive(Serialize)]
struct EdgeEntry {
    source: u32,
    target: u32,
    score: f64,
}

#[derive(Serialize)]
struct BetweennessOutput<T> {
    config: BetweennessConfig,
    vertices: usize,
    edges: usize,
    elapsed_ms: u128,
    top: Vec<T>,
}

impl Options {
    fn config(&self) -> BetweennessConfig {
        let partition = match self.partition {
            Partition::Contiguous => PartitionStrategy::Contiguous,
            Partition::RoundRobin => PartitionStrategy::RoundRobin,
        };
        // Sampled runs always record their seed so the output can be replayed.
        let subset_seed = self.seed.or_else(|| {
            self.subset_size
                .map(|_| SeededSampler::from_random_seed().seed())
        });
        BetweennessConfig {
            normalized: self.normalized,
            endpoints: self.endpoints,
            subset_size: self.subset_size,
            subset_seed,
            use_weights: false,
            device_count: Some(self.devices),
            peer_to_peer: self.peer_to_peer,
            partition,
        }
    }
}

/// Run the betweenness command.
pub fn run(args: &GraphArgs, options: &Options, format: OutputFormat, quiet: bool) -> Result<()> {
    let (_, graph) = super::generate(args, quiet || format.is_json())?;
    let config = options.config();
    let engine = Engine::new(Arc::new(LocalDevices::detect()));

    let fmt: Format = format.into();
    let start = Instant::now();

    if options.edges {
        let scores = engine
            .edge_betweenness_centrality(&graph, &config)
            .context("edge betweenness failed")?;
        let elapsed_ms = start.elapsed().as_millis();

        let mut ranked: Vec<_> = scores.as_slice().to_vec();
        ranked.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then((a.source, a.target).cmp(&(b.source, b.target)))
        });
        ranked.truncate(options.top);

        match fmt {
            Format::Json => output::print_json(
                &BetweennessOutput {
                    config,
                    vertices: graph.vertex_count(),
                    edges: graph.edge_count(),
                    elapsed_ms,
                    top: ranked
                        .iter()
                        .map(|e| EdgeEntry {
                            source: e.source.as_u32(),
                            target: e.target.as_u32(),
                            score: e.score,
                        })
                        .collect(),
                },
                quiet,
            )?,
            Format::Table => {
                if !quiet {
                    let rows: Vec<_> = ranked
                        .iter()
                        .map(|e| (vec![e.source.to_string(), e.target.to_string()], e.score))
                        .collect();
                    output::print_ranking(&["Rank", "Source", "Target", "Betweenness"], &rows);
                    output::status(&format!("Scored {} edges in {elapsed_ms} ms", scores.len()), quiet);
                }
            }
        }
        return Ok(());
    }

    let scores = engine
        .betweenness_centrality(&graph, &config)
        .context("betweenness failed")?;
    let elapsed_ms = start.elapsed().as_millis();
    let ranked = scores.top_k(options.top);

    match fmt {
        Format::Json => output::print_json(
            &BetweennessOutput {
                config,
                vertices: graph.vertex_count(),
                edges: graph.edge_count(),
                elapsed_ms,
                top: ranked
                    .iter()
                    .map(|&(v, score)| VertexEntry {
                        vertex: v.as_u32(),
                        score,
                    })
                    .collect(),
            },
            quiet,
        )?,
        Format::Table => {
            if !quiet {
                let rows: Vec<_> = ranked
                    .iter()
                    .map(|&(v, score)| (vec![v.to_string()], score))
                    .collect();
                output::print_ranking(&["Rank", "Vertex", "Betweenness"], &rows);
                output::status(
                    &format!(
                        "Scored {} vertices on {} of {} device(s) in {elapsed_ms} ms",
                        scores.len(),
                        config.devices(),
                        engine.provider().available()
                    ),
                    quiet,
                );
            }
        }
    }
    Ok(())
}
