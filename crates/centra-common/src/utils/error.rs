//! Error types shared by every Centra crate.

use thiserror::Error;

/// Result alias using the Centra [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by graph construction and centrality runs.
///
/// None of these are retried internally; a caller may re-run with different
/// parameters (for example a smaller device count).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Requested subset size is outside `(0, V]`.
    #[error("invalid subset size {requested}: must be in (0, {vertex_count}]")]
    InvalidSubsetSize {
        /// Requested number of sources.
        requested: usize,
        /// Number of vertices in the graph.
        vertex_count: usize,
    },

    /// Fewer free devices than requested.
    #[error("insufficient devices: requested {requested}, {available} available")]
    InsufficientDevices {
        /// Requested device count.
        requested: usize,
        /// Devices free at the time of the request.
        available: usize,
    },

    /// Peer links were requested but the provider cannot establish them.
    #[error("peer access unavailable for a group of {0} devices")]
    PeerAccessUnavailable(usize),

    /// A shard failed while computing its partial scores.
    #[error("computation failed on device {device}: {reason}")]
    DeviceComputationFailure {
        /// Rank of the failing device within its group.
        device: usize,
        /// Description of the failure.
        reason: String,
    },

    /// Dispatched and collected shards disagree.
    #[error("aggregation mismatch: {0}")]
    AggregationMismatch(String),

    /// Vertex id outside `[0, V)`.
    #[error("invalid vertex {vertex}: graph has {vertex_count} vertices")]
    InvalidVertex {
        /// Offending vertex id.
        vertex: u64,
        /// Number of vertices in the graph.
        vertex_count: usize,
    },

    /// Graph input rejected during construction.
    #[error("invalid graph: {0}")]
    InvalidGraph(String),

    /// Parameter rejected before any work was done.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Shortest-path counts exceeded the representable range.
    #[error("numeric overflow: {0}")]
    NumericOverflow(String),

    /// Power iteration did not converge.
    #[error("power iteration failed to converge after {iterations} iterations")]
    NotConverged {
        /// Iterations performed.
        iterations: usize,
    },

    /// Work stopped because another shard of the same run failed.
    #[error("run cancelled")]
    Cancelled,

    /// An execution context was used out of order.
    #[error("invalid context state: {0}")]
    InvalidState(String),
}

impl Error {
    /// Returns true for errors that abort a run after dispatch started.
    #[must_use]
    pub fn is_run_failure(&self) -> bool {
        matches!(
            self,
            Self::DeviceComputationFailure { .. } | Self::AggregationMismatch(_) | Self::Cancelled
        )
    }
}
