//! Single-source traversals over a [`Graph`](crate::graph::Graph).
//!
//! - [`bfs`] - level-synchronous breadth-first search with an optional depth limit
//! - [`sssp`] - Dijkstra single-source shortest paths
//!
//! [`MinScored`] is the heap entry shared by every Dijkstra-style loop in the
//! workspace.

mod bfs;
mod heap;
mod sssp;

pub use bfs::{BfsResult, bfs};
pub use heap::MinScored;
pub use sssp::{SsspResult, sssp};
