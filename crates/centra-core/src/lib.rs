//! # centra-core
//!
//! Core layer for Centra: the immutable graph store and the building blocks
//! the centrality engine runs on.
//!
//! This crate depends only on `centra-common`.
//!
//! ## Modules
//!
//! - [`graph`] - Compressed sparse row graph store and its builder
//! - [`traversal`] - Breadth-first search and single-source shortest paths
//! - [`generators`] - Synthetic graph generators (R-MAT)

pub mod generators;
pub mod graph;
pub mod traversal;

// Re-export commonly used types
pub use generators::{RmatParams, rmat};
pub use graph::{Graph, GraphBuilder};
pub use traversal::{BfsResult, SsspResult, bfs, sssp};
