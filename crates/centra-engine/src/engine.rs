//! The centrality engine: the public entry point tying the stages together.
//!
//! A betweenness run flows through
//! `select_sources -> partition -> accumulate (one worker per device) ->
//! aggregate`, with the device group held by an [`ExecutionContext`] for the
//! duration of the parallel stage.

use std::sync::Arc;
use std::time::Instant;

use centra_common::utils::error::{Error, Result};
use centra_core::graph::Graph;

use crate::accumulator::{AccumulatorOptions, accumulate_shard};
use crate::aggregator::{Aggregate, Aggregator, Normalization, fold_edges};
use crate::config::{BetweennessConfig, KatzConfig};
use crate::context::{DeviceProvider, ExecutionContext, LocalDevices};
use crate::katz::katz;
use crate::partition::partition;
use crate::sampling::{SeededSampler, SourceSampler, select_sources};
use crate::scores::{CentralityScores, EdgeCentralityScores};

/// Runs centrality algorithms on devices drawn from a [`DeviceProvider`].
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use centra_core::graph::Graph;
/// use centra_engine::{BetweennessConfig, Engine, LocalDevices};
///
/// let graph = Graph::from_edges(5, &[(0, 1), (1, 2), (2, 3), (3, 4)], true).unwrap();
/// let engine = Engine::new(Arc::new(LocalDevices::new(2)));
///
/// let config = BetweennessConfig::new().with_normalized(false).with_devices(2);
/// let scores = engine.betweenness_centrality(&graph, &config).unwrap();
/// assert_eq!(scores.as_slice(), &[0.0, 3.0, 4.0, 3.0, 0.0]);
/// ```
#[derive(Clone)]
pub struct Engine {
    provider: Arc<dyn DeviceProvider>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("available", &self.provider.available())
            .finish()
    }
}

impl Engine {
    /// Creates an engine over `provider`.
    #[must_use]
    pub fn new(provider: Arc<dyn DeviceProvider>) -> Self {
        Self { provider }
    }

    /// Creates an engine over the host's [`LocalDevices`].
    #[must_use]
    pub fn local() -> Self {
        Self::new(Arc::new(LocalDevices::detect()))
    }

    /// Returns the device provider.
    #[must_use]
    pub fn provider(&self) -> &Arc<dyn DeviceProvider> {
        &self.provider
    }

    /// Computes vertex betweenness centrality.
    ///
    /// With `subset_size = Some(k)` the result estimates exact betweenness
    /// from `k` sampled sources, scaled by `V / k`.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidSubsetSize`] if `k` is `0` or exceeds `V`.
    /// - [`Error::InsufficientDevices`] / [`Error::PeerAccessUnavailable`]
    ///   if the device group cannot be established. No work is done.
    /// - [`Error::DeviceComputationFailure`] if a shard fails.
    pub fn betweenness_centrality(
        &self,
        graph: &Graph,
        config: &BetweennessConfig,
    ) -> Result<CentralityScores> {
        let mut sampler = default_sampler(config);
        self.betweenness_centrality_with_sampler(graph, config, &mut sampler)
    }

    /// Computes vertex betweenness drawing sources from `sampler`.
    ///
    /// `config.subset_seed` is ignored; the sampler owns its randomness.
    pub fn betweenness_centrality_with_sampler<S>(
        &self,
        graph: &Graph,
        config: &BetweennessConfig,
        sampler: &mut S,
    ) -> Result<CentralityScores>
    where
        S: SourceSampler + ?Sized,
    {
        let aggregate = self.run_betweenness(graph, config, sampler, false)?;
        Ok(CentralityScores::new(aggregate.vertex))
    }

    /// Computes edge betweenness centrality.
    ///
    /// `endpoints` has no effect on edge scores. Undirected edges are
    /// reported once, keyed by `(min, max)`.
    pub fn edge_betweenness_centrality(
        &self,
        graph: &Graph,
        config: &BetweennessConfig,
    ) -> Result<EdgeCentralityScores> {
        let mut sampler = default_sampler(config);
        let aggregate = self.run_betweenness(graph, config, &mut sampler, true)?;
        let arc = aggregate
            .arc
            .ok_or_else(|| Error::AggregationMismatch("edge scores missing".to_string()))?;
        Ok(fold_edges(graph, &arc))
    }

    /// Computes Katz centrality on the host thread pool.
    pub fn katz_centrality(&self, graph: &Graph, config: &KatzConfig) -> Result<CentralityScores> {
        katz(graph, config)
    }

    fn run_betweenness<S>(
        &self,
        graph: &Graph,
        config: &BetweennessConfig,
        sampler: &mut S,
        edge_scores: bool,
    ) -> Result<Aggregate>
    where
        S: SourceSampler + ?Sized,
    {
        config.validate()?;
        let start = Instant::now();
        let n = graph.vertex_count();
        let devices = config.devices();

        let subset = select_sources(n, config.subset_size, sampler)?;

        let mut ctx = ExecutionContext::new(Arc::clone(&self.provider));
        ctx.establish(devices, config.peer_to_peer)?;
        if let Some(group) = ctx.group() {
            tracing::debug!(
                ordinals = ?group.devices(),
                peer_to_peer = group.peer_to_peer(),
                "device group established"
            );
        }

        let shards = partition(&subset, devices, config.partition)?;
        if config.use_weights && !graph.is_weighted() {
            tracing::debug!("graph has no weights, using unit distances");
        }
        let options = AccumulatorOptions {
            endpoints: config.endpoints,
            weighted: config.use_weights && graph.is_weighted(),
            edge_scores,
        };

        tracing::info!(
            vertices = n,
            edges = graph.edge_count(),
            sources = subset.len(),
            devices,
            "starting betweenness run"
        );

        let reports = ctx
            .run(&shards, |task| {
                accumulate_shard(graph, &task.shard.sources, options, || task.is_cancelled())
            })
            .inspect_err(log_run_failure)?;

        let mut aggregator = Aggregator::new(
            devices,
            n,
            edge_scores.then(|| graph.arc_count()),
            subset.len(),
        );
        for report in reports {
            aggregator.submit(report.rank, report.output)?;
        }

        let normalization = Normalization::betweenness(
            n,
            subset.len(),
            graph.is_directed(),
            config.normalized,
            config.endpoints,
        );
        let aggregate = aggregator
            .finish(normalization)
            .inspect_err(log_run_failure)?;

        tracing::info!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            "betweenness run finished"
        );
        Ok(aggregate)
    }
}

fn log_run_failure(err: &Error) {
    if err.is_run_failure() {
        tracing::warn!(error = %err, "betweenness run aborted");
    }
}

fn default_sampler(config: &BetweennessConfig) -> SeededSampler {
    match (config.subset_seed, config.subset_size) {
        (Some(seed), _) => SeededSampler::new(seed),
        // Exact runs never draw from the sampler.
        (None, None) => SeededSampler::new(0),
        (None, Some(_)) => SeededSampler::from_random_seed(),
    }
}

/// Computes vertex betweenness on the host's local devices.
pub fn betweenness_centrality(
    graph: &Graph,
    config: &BetweennessConfig,
) -> Result<CentralityScores> {
    Engine::local().betweenness_centrality(graph, config)
}

/// Computes edge betweenness on the host's local devices.
pub fn edge_betweenness_centrality(
    graph: &Graph,
    config: &BetweennessConfig,
) -> Result<EdgeCentralityScores> {
    Engine::local().edge_betweenness_centrality(graph, config)
}

/// Computes Katz centrality.
pub fn katz_centrality(graph: &Graph, config: &KatzConfig) -> Result<CentralityScores> {
    katz(graph, config)
}
