//! Graph summary command.

use anyhow::Result;
use centra_common::VertexId;
use serde::Serialize;

use crate::output::{self, Format};
use crate::{GraphArgs, OutputFormat};

/// Summary of a generated graph.
#[derive(Serialize)]
struct InfoOutput {
    vertices: usize,
    edges: usize,
    arcs: usize,
    directed: bool,
    max_out_degree: usize,
    isolated: usize,
    mean_degree: f64,
}

/// Run the info command.
pub fn run(args: &GraphArgs, format: OutputFormat, quiet: bool) -> Result<()> {
    let (_, graph) = super::generate(args, true)?;

    let isolated = graph
        .vertices()
        .filter(|&v| graph.out_degree(v) == 0 && graph.in_degree(v) == 0)
        .count();
    let output = InfoOutput {
        vertices: graph.vertex_count(),
        edges: graph.edge_count(),
        arcs: graph.arc_count(),
        directed: graph.is_directed(),
        max_out_degree: graph.max_out_degree(),
        isolated,
        mean_degree: if graph.vertex_count() == 0 {
            0.0
        } else {
            graph.arc_count() as f64 / graph.vertex_count() as f64
        },
    };

    let fmt: Format = format.into();
    match fmt {
        Format::Json => output::print_json(&output, quiet),
        Format::Table => {
            let hub = graph
                .vertices()
                .max_by_key(|&v| (graph.out_degree(v), std::cmp::Reverse(v)))
                .map_or_else(|| "N/A".to_string(), |v: VertexId| v.to_string());
            let items = vec![
                ("Vertices", output.vertices.to_string()),
                ("Edges", output.edges.to_string()),
                ("Stored Arcs", output.arcs.to_string()),
                ("Directed", output.directed.to_string()),
                ("Max Out-Degree", output.max_out_degree.to_string()),
                ("Highest-Degree Vertex", hub),
                ("Isolated Vertices", output.isolated.to_string()),
                ("Mean Out-Degree", format!("{:.2}", output.mean_degree)),
            ];
            output::print_key_value_table(&items, fmt, quiet)
        }
    }
}
