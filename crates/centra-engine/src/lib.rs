//! # centra-engine
//!
//! Centrality computation for Centra: multi-device betweenness centrality
//! with source sampling, and Katz centrality.
//!
//! ## Modules
//!
//! - [`engine`] - `Engine` entry point and convenience functions
//! - [`config`] - Run configuration
//! - [`sampling`] - Source subset selection
//! - [`partition`] - Splitting sources into per-device shards
//! - [`accumulator`] - Brandes single-source dependency accumulation
//! - [`aggregator`] - Reduction and normalization of partial scores
//! - [`context`] - Device groups and shard execution
//! - [`katz`] - Katz centrality
//! - [`scores`] - Result types

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod accumulator;
pub mod aggregator;
pub mod config;
pub mod context;
pub mod engine;
pub mod katz;
pub mod partition;
pub mod sampling;
pub mod scores;

pub use config::{BetweennessConfig, KatzConfig};
pub use context::{DeviceGroup, DeviceProvider, ExecutionContext, LocalDevices};
pub use engine::{Engine, betweenness_centrality, edge_betweenness_centrality, katz_centrality};
pub use partition::PartitionStrategy;
pub use sampling::{SeededSampler, SourceSampler};
pub use scores::{CentralityScores, EdgeCentralityScores, EdgeScore};
