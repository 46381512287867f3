//! Run configuration for the centrality algorithms.

use serde::{Deserialize, Serialize};

use centra_common::utils::error::{Error, Result};

use crate::partition::PartitionStrategy;

/// Configuration for a betweenness centrality run.
///
/// # Examples
///
/// ```
/// use centra_engine::BetweennessConfig;
///
/// let config = BetweennessConfig::new()
///     .with_subset_size(64)
///     .with_seed(7)
///     .with_devices(4);
/// assert_eq!(config.device_count, Some(4));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BetweennessConfig {
    /// Scale scores by the number of vertex pairs.
    pub normalized: bool,
    /// Count path endpoints as lying on the path.
    pub endpoints: bool,
    /// Number of sampled sources `k`; `None` uses every vertex.
    pub subset_size: Option<usize>,
    /// Seed for source sampling; `None` draws (and logs) a fresh seed.
    pub subset_seed: Option<u64>,
    /// Use edge weights as distances instead of hop counts.
    pub use_weights: bool,
    /// Number of devices; `None` runs on a single device.
    pub device_count: Option<usize>,
    /// Request peer links between devices.
    pub peer_to_peer: bool,
    /// How sources are split across devices.
    pub partition: PartitionStrategy,
}

impl Default for BetweennessConfig {
    fn default() -> Self {
        Self {
            normalized: true,
            endpoints: false,
            subset_size: None,
            subset_seed: None,
            use_weights: false,
            device_count: None,
            peer_to_peer: false,
            partition: PartitionStrategy::Contiguous,
        }
    }
}

impl BetweennessConfig {
    /// Creates the default configuration: exact, normalized, no endpoints,
    /// one device.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables normalization.
    pub fn with_normalized(mut self, normalized: bool) -> Self {
        self.normalized = normalized;
        self
    }

    /// Enables or disables endpoint counting.
    pub fn with_endpoints(mut self, endpoints: bool) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Samples `k` sources instead of using every vertex.
    pub fn with_subset_size(mut self, k: usize) -> Self {
        self.subset_size = Some(k);
        self
    }

    /// Sets the sampling seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.subset_seed = Some(seed);
        self
    }

    /// Enables or disables weighted shortest paths.
    pub fn with_weights(mut self, use_weights: bool) -> Self {
        self.use_weights = use_weights;
        self
    }

    /// Runs on `count` devices.
    pub fn with_devices(mut self, count: usize) -> Self {
        self.device_count = Some(count);
        self
    }

    /// Requests peer links between devices.
    pub fn with_peer_to_peer(mut self, enabled: bool) -> Self {
        self.peer_to_peer = enabled;
        self
    }

    /// Sets the partition strategy.
    pub fn with_partition(mut self, strategy: PartitionStrategy) -> Self {
        self.partition = strategy;
        self
    }

    /// Returns the number of devices the run uses.
    #[must_use]
    pub fn devices(&self) -> usize {
        self.device_count.unwrap_or(1)
    }

    /// Checks parameters that do not depend on the graph.
    pub fn validate(&self) -> Result<()> {
        if self.device_count == Some(0) {
            return Err(Error::InvalidParameter(
                "device count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Configuration for Katz centrality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KatzConfig {
    /// Attenuation factor; `None` uses `1 / (max_out_degree + 1)`.
    pub alpha: Option<f64>,
    /// Constant added to every vertex each iteration.
    pub beta: f64,
    /// Iteration limit.
    pub max_iter: usize,
    /// Per-vertex convergence tolerance.
    pub tolerance: f64,
    /// Scale the result to unit L2 norm.
    pub normalized: bool,
    /// Weight walks by edge weights.
    pub use_weights: bool,
}

impl Default for KatzConfig {
    fn default() -> Self {
        Self {
            alpha: None,
            beta: 1.0,
            max_iter: 1000,
            tolerance: 1e-6,
            normalized: true,
            use_weights: false,
        }
    }
}

impl KatzConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the attenuation factor.
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = Some(alpha);
        self
    }

    /// Sets the constant term.
    pub fn with_beta(mut self, beta: f64) -> Self {
        self.beta = beta;
        self
    }

    /// Sets the iteration limit.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Sets the convergence tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Enables or disables L2 normalization.
    pub fn with_normalized(mut self, normalized: bool) -> Self {
        self.normalized = normalized;
        self
    }

    /// Enables or disables edge weights.
    pub fn with_weights(mut self, use_weights: bool) -> Self {
        self.use_weights = use_weights;
        self
    }

    /// Checks parameters that do not depend on the graph.
    pub fn validate(&self) -> Result<()> {
        if let Some(alpha) = self.alpha
            && !(alpha.is_finite() && alpha > 0.0)
        {
            return Err(Error::InvalidParameter(format!(
                "alpha must be positive, got {alpha}"
            )));
        }
        if !self.beta.is_finite() {
            return Err(Error::InvalidParameter(format!(
                "beta must be finite, got {}",
                self.beta
            )));
        }
        if self.max_iter == 0 {
            return Err(Error::InvalidParameter(
                "max_iter must be at least 1".to_string(),
            ));
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(Error::InvalidParameter(format!(
                "tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
}
