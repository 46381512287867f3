//! # Centra
//!
//! Betweenness and Katz centrality for graphs too large to score on a single
//! device.
//!
//! Start with [`Engine`]: it draws a device group from a [`DeviceProvider`],
//! splits the source vertices across the devices, and combines their partial
//! scores into one result that matches a single-device run.
//!
//! ## Quick Start
//!
//! ```rust
//! use centra::{BetweennessConfig, Graph, betweenness_centrality};
//!
//! // 0 - 1 - 2 - 3
//! let graph = Graph::from_edges(4, &[(0, 1), (1, 2), (2, 3)], false)?;
//!
//! let scores = betweenness_centrality(&graph, &BetweennessConfig::new())?;
//! assert!(scores.as_slice()[1] > scores.as_slice()[0]);
//! # Ok::<(), centra::Error>(())
//! ```
//!
//! ## Sampling
//!
//! Exact betweenness runs one traversal per vertex. Setting a subset size
//! estimates it from `k` seeded random sources instead:
//!
//! ```rust
//! use std::sync::Arc;
//! use centra::{BetweennessConfig, Engine, LocalDevices, RmatParams, rmat};
//!
//! let graph = rmat(&RmatParams::new(8, 4).with_seed(1).undirected())?;
//! let engine = Engine::new(Arc::new(LocalDevices::new(4)));
//!
//! let config = BetweennessConfig::new()
//!     .with_subset_size(32)
//!     .with_seed(42)
//!     .with_devices(4);
//! let estimate = engine.betweenness_centrality(&graph, &config)?;
//! assert_eq!(estimate.len(), graph.vertex_count());
//! # Ok::<(), centra::Error>(())
//! ```

// Entry points and configuration
pub use centra_engine::{
    BetweennessConfig, CentralityScores, DeviceGroup, DeviceProvider, EdgeCentralityScores,
    EdgeScore, Engine, ExecutionContext, KatzConfig, LocalDevices, PartitionStrategy,
    SeededSampler, SourceSampler, betweenness_centrality, edge_betweenness_centrality,
    katz_centrality,
};

// Graph store and generators
pub use centra_core::{Graph, GraphBuilder, RmatParams, rmat};

// Shared types
pub use centra_common::{Error, Result, VertexId};
