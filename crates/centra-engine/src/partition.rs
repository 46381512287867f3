//! Splitting a source subset into per-device shards.

use serde::{Deserialize, Serialize};

use centra_common::types::VertexId;
use centra_common::utils::error::{Error, Result};

use crate::sampling::SourceSubset;

/// How sources are assigned to shards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartitionStrategy {
    /// Consecutive runs of the subset; the first `k mod D` shards get one
    /// extra source.
    #[default]
    Contiguous,
    /// Source `i` goes to shard `i mod D`.
    RoundRobin,
}

/// Sources assigned to one device rank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shard {
    /// Device rank within the group, `0..D`.
    pub rank: usize,
    /// Sources in subset order.
    pub sources: Vec<VertexId>,
}

impl Shard {
    /// Returns the number of sources in the shard.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Returns true for a shard with no sources.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

/// Splits `subset` into `device_count` balanced shards.
///
/// Shard sizes differ by at most one, every source lands in exactly one
/// shard, and relative order is preserved. `device_count = 1` returns the
/// whole subset as rank 0.
pub fn partition(
    subset: &SourceSubset,
    device_count: usize,
    strategy: PartitionStrategy,
) -> Result<Vec<Shard>> {
    if device_count == 0 {
        return Err(Error::InvalidParameter(
            "device count must be at least 1".to_string(),
        ));
    }

    let sources = subset.as_slice();
    let shards = match strategy {
        PartitionStrategy::Contiguous => {
            let base = sources.len() / device_count;
            let extra = sources.len() % device_count;
            let mut start = 0;
            (0..device_count)
                .map(|rank| {
                    let len = base + usize::from(rank < extra);
                    let shard = Shard {
                        rank,
                        sources: sources[start..start + len].to_vec(),
                    };
                    start += len;
                    shard
                })
                .collect()
        }
        PartitionStrategy::RoundRobin => (0..device_count)
            .map(|rank| Shard {
                rank,
                sources: sources
                    .iter()
                    .skip(rank)
                    .step_by(device_count)
                    .copied()
                    .collect(),
            })
            .collect(),
    };

    Ok(shards)
}
