//! Immutable graph store.
//!
//! Graphs are stored in compressed sparse row (CSR) form:
//! - a dense vertex range `[0, V)`
//! - outgoing arcs grouped by source, sorted by target
//! - optional per-arc `f64` weights
//! - for directed graphs, a reverse index of incoming arcs
//!
//! Undirected edges are stored as two arcs, one per direction. Once built a
//! [`Graph`] is never mutated, so it can be shared across worker threads
//! without locking.
//!
//! # Example
//!
//! ```
//! use centra_core::graph::GraphBuilder;
//!
//! let mut builder = GraphBuilder::directed(3);
//! builder.add_edge(0, 1);
//! builder.add_edge(1, 2);
//! let graph = builder.build()?;
//!
//! assert_eq!(graph.vertex_count(), 3);
//! assert_eq!(graph.edge_count(), 2);
//! # Ok::<(), centra_common::Error>(())
//! ```

mod builder;
mod csr;

pub use builder::GraphBuilder;
pub use csr::{Graph, InArcs};
