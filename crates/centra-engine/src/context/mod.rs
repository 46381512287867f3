//! Multi-device execution.
//!
//! An [`ExecutionContext`] acquires a [`DeviceGroup`] from a
//! [`DeviceProvider`], runs one shard per device on scoped worker threads,
//! and hands the group back when the run ends, whether it succeeded or not.
//!
//! ```
//! use std::sync::Arc;
//! use centra_engine::context::{ExecutionContext, LocalDevices};
//! use centra_engine::partition::{partition, PartitionStrategy};
//! use centra_engine::sampling::SourceSubset;
//!
//! let devices = Arc::new(LocalDevices::new(2));
//! let shards = partition(&SourceSubset::full(5), 2, PartitionStrategy::Contiguous).unwrap();
//!
//! let mut ctx = ExecutionContext::new(devices.clone());
//! ctx.establish(2, true).unwrap();
//! let reports = ctx.run(&shards, |task| Ok(task.shard.len())).unwrap();
//!
//! assert_eq!(reports.iter().map(|r| r.output).sum::<usize>(), 5);
//! assert_eq!(devices.free_count(), 2);
//! ```

mod device;
mod execution;

pub use device::{DeviceGroup, DeviceProvider, LocalDevices};
pub use execution::{ContextState, ExecutionContext, ShardReport, ShardTask};
