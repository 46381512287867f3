//! Execution context: the lifetime of one device group.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crossbeam::channel;

use centra_common::utils::error::{Error, Result};

use super::device::{DeviceGroup, DeviceProvider};
use crate::partition::Shard;

/// Lifecycle state of an [`ExecutionContext`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextState {
    /// No devices held yet.
    Uninitialized,
    /// A device group is held and ready for dispatch.
    Established,
    /// Shards are executing.
    Running,
    /// Devices have been returned to the provider.
    TornDown,
}

/// One shard as seen by the worker executing it.
#[derive(Debug)]
pub struct ShardTask<'a> {
    /// Rank of the device within the group.
    pub rank: usize,
    /// Provider ordinal of the device.
    pub device: usize,
    /// Sources assigned to this rank.
    pub shard: &'a Shard,
    cancel: &'a AtomicBool,
}

impl ShardTask<'_> {
    /// Returns true once another shard of the run has failed.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }
}

/// Successful output of one shard.
#[derive(Debug, Clone)]
pub struct ShardReport<T> {
    /// Rank the output belongs to.
    pub rank: usize,
    /// Provider ordinal of the device that computed it.
    pub device: usize,
    /// The shard's output.
    pub output: T,
    /// Wall time spent in the shard.
    pub elapsed: Duration,
}

/// Owns a device group for exactly one run.
///
/// The group is acquired by [`establish`](Self::establish) and released on
/// every exit path: explicitly by [`run`](Self::run) or
/// [`teardown`](Self::teardown), otherwise when the context is dropped.
pub struct ExecutionContext {
    provider: Arc<dyn DeviceProvider>,
    group: Option<DeviceGroup>,
    state: ContextState,
}

impl std::fmt::Debug for ExecutionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutionContext")
            .field("group", &self.group)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl ExecutionContext {
    /// Creates an uninitialized context drawing devices from `provider`.
    #[must_use]
    pub fn new(provider: Arc<dyn DeviceProvider>) -> Self {
        Self {
            provider,
            group: None,
            state: ContextState::Uninitialized,
        }
    }

    /// Returns the current lifecycle state.
    #[must_use]
    pub fn state(&self) -> ContextState {
        self.state
    }

    /// Returns the held device group, if established.
    #[must_use]
    pub fn group(&self) -> Option<&DeviceGroup> {
        self.group.as_ref()
    }

    /// Acquires `count` devices, with peer links if `peer_to_peer`.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::InvalidState`] unless the context is
    /// uninitialized, and otherwise propagates the provider's
    /// [`Error::InsufficientDevices`] or [`Error::PeerAccessUnavailable`].
    /// On failure no devices are held.
    pub fn establish(&mut self, count: usize, peer_to_peer: bool) -> Result<()> {
        if self.state != ContextState::Uninitialized {
            return Err(Error::InvalidState(format!(
                "cannot establish a context in state {:?}",
                self.state
            )));
        }
        let group = self.provider.acquire(count, peer_to_peer)?;
        tracing::debug!(
            devices = ?group.devices(),
            peer_to_peer = group.peer_to_peer(),
            "established device group"
        );
        self.group = Some(group);
        self.state = ContextState::Established;
        Ok(())
    }

    /// Executes `work` once per shard, each on its own device thread, and
    /// returns the outputs in rank order.
    ///
    /// Blocks until every worker has finished. When a shard fails the others
    /// are signalled through [`ShardTask::is_cancelled`], all workers are
    /// joined, and the lowest-rank failure is returned. The context is torn
    /// down before returning.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidState`] if the context is not established.
    /// - [`Error::AggregationMismatch`] if the shards do not match the group
    ///   one-to-one by rank.
    /// - [`Error::DeviceComputationFailure`] if any shard fails or panics.
    pub fn run<T, F>(mut self, shards: &[Shard], work: F) -> Result<Vec<ShardReport<T>>>
    where
        T: Send,
        F: Fn(&ShardTask<'_>) -> Result<T> + Sync,
    {
        let devices = match (&self.group, self.state) {
            (Some(group), ContextState::Established) => group.devices().to_vec(),
            _ => {
                return Err(Error::InvalidState(format!(
                    "cannot run a context in state {:?}",
                    self.state
                )));
            }
        };
        if shards.len() != devices.len() {
            return Err(Error::AggregationMismatch(format!(
                "{} shards for a group of {} devices",
                shards.len(),
                devices.len()
            )));
        }
        if let Some((rank, shard)) = shards
            .iter()
            .enumerate()
            .find(|(rank, shard)| shard.rank != *rank)
        {
            return Err(Error::AggregationMismatch(format!(
                "shard at position {rank} carries rank {}",
                shard.rank
            )));
        }

        self.state = ContextState::Running;
        tracing::info!(devices = devices.len(), "dispatching shards");

        let outcomes = dispatch(shards, &devices, &work);
        self.teardown();
        collect(outcomes, &devices)
    }

    /// Releases the device group. Idempotent.
    pub fn teardown(&mut self) {
        if let Some(group) = self.group.take() {
            self.provider.release(&group);
            tracing::debug!(devices = ?group.devices(), "released device group");
        }
        self.state = ContextState::TornDown;
    }
}

impl Drop for ExecutionContext {
    fn drop(&mut self) {
        self.teardown();
    }
}

type Outcome<T> = (usize, Result<T>, Duration);

fn dispatch<T, F>(shards: &[Shard], devices: &[usize], work: &F) -> Vec<Outcome<T>>
where
    T: Send,
    F: Fn(&ShardTask<'_>) -> Result<T> + Sync,
{
    let cancel = AtomicBool::new(false);
    let (tx, rx) = channel::unbounded::<Outcome<T>>();
    let mut spawn_failures = Vec::new();

    let scoped = crossbeam::thread::scope(|scope| {
        for (shard, &device) in shards.iter().zip(devices) {
            let tx = tx.clone();
            let cancel = &cancel;
            let spawned = scope
                .builder()
                .name(format!("centra-device-{}", shard.rank))
                .spawn(move |_| {
                    let task = ShardTask {
                        rank: shard.rank,
                        device,
                        shard,
                        cancel,
                    };
                    let start = Instant::now();
                    let result = panic::catch_unwind(AssertUnwindSafe(|| work(&task)))
                        .unwrap_or_else(|payload| {
                            Err(Error::DeviceComputationFailure {
                                device: shard.rank,
                                reason: format!("worker panicked: {}", panic_message(&*payload)),
                            })
                        });
                    if result.is_err() {
                        cancel.store(true, Ordering::Relaxed);
                    }
                    // The receiver outlives every worker.
                    let _ = tx.send((shard.rank, result, start.elapsed()));
                });
            if let Err(e) = spawned {
                cancel.store(true, Ordering::Relaxed);
                spawn_failures.push((
                    shard.rank,
                    Err(Error::DeviceComputationFailure {
                        device: shard.rank,
                        reason: format!("failed to start worker: {e}"),
                    }),
                    Duration::ZERO,
                ));
            }
        }
        drop(tx);
        rx.iter().collect::<Vec<_>>()
    });

    let mut outcomes = scoped.unwrap_or_else(|_| {
        vec![(
            0,
            Err(Error::DeviceComputationFailure {
                device: 0,
                reason: "worker thread panicked outside its shard".to_string(),
            }),
            Duration::ZERO,
        )]
    });
    outcomes.extend(spawn_failures);
    outcomes
}

fn collect<T>(outcomes: Vec<Outcome<T>>, devices: &[usize]) -> Result<Vec<ShardReport<T>>> {
    let mut reports: Vec<Option<ShardReport<T>>> = devices.iter().map(|_| None).collect();
    let mut failure: Option<(usize, Error)> = None;

    for (rank, result, elapsed) in outcomes {
        match result {
            Ok(output) => {
                tracing::debug!(rank, elapsed_ms = elapsed.as_millis() as u64, "shard finished");
                if let Some(slot) = reports.get_mut(rank) {
                    *slot = Some(ShardReport {
                        rank,
                        device: devices[rank],
                        output,
                        elapsed,
                    });
                }
            }
            Err(Error::Cancelled) => tracing::debug!(rank, "shard cancelled"),
            Err(err) => {
                tracing::warn!(rank, error = %err, "shard failed");
                if failure.as_ref().is_none_or(|(lowest, _)| rank < *lowest) {
                    failure = Some((rank, err));
                }
            }
        }
    }

    if let Some((rank, err)) = failure {
        return Err(match err {
            err @ Error::DeviceComputationFailure { .. } => err,
            other => Error::DeviceComputationFailure {
                device: rank,
                reason: other.to_string(),
            },
        });
    }

    reports
        .into_iter()
        .enumerate()
        .map(|(rank, report)| {
            report.ok_or_else(|| {
                Error::AggregationMismatch(format!("rank {rank} finished without a report"))
            })
        })
        .collect()
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::device::LocalDevices;
    use crate::partition::{PartitionStrategy, partition};
    use crate::sampling::SourceSubset;

    fn shards(k: usize, devices: usize) -> Vec<Shard> {
        partition(&SourceSubset::full(k), devices, PartitionStrategy::Contiguous).unwrap()
    }

    fn context(provider: &Arc<LocalDevices>, count: usize) -> ExecutionContext {
        let mut ctx = ExecutionContext::new(provider.clone());
        ctx.establish(count, false).unwrap();
        ctx
    }

    #[test]
    fn test_run_returns_reports_in_rank_order() {
        let provider = Arc::new(LocalDevices::new(4));
        let ctx = context(&provider, 3);
        assert_eq!(ctx.state(), ContextState::Established);
        assert_eq!(provider.free_count(), 1);

        let reports = ctx
            .run(&shards(10, 3), |task| Ok(task.shard.len()))
            .unwrap();

        let sizes: Vec<_> = reports.iter().map(|r| (r.rank, r.output)).collect();
        assert_eq!(sizes, vec![(0, 4), (1, 3), (2, 3)]);
        assert_eq!(provider.free_count(), 4);
        assert_eq!(provider.active_groups(), 0);
    }

    #[test]
    fn test_workers_run_on_named_threads() {
        let provider = Arc::new(LocalDevices::new(2));
        let reports = context(&provider, 2)
            .run(&shards(4, 2), |_| {
                Ok(std::thread::current().name().map(str::to_string))
            })
            .unwrap();

        assert_eq!(reports[1].output.as_deref(), Some("centra-device-1"));
    }

    #[test]
    fn test_failure_returns_lowest_rank_and_releases() {
        let provider = Arc::new(LocalDevices::new(4));
        let result = context(&provider, 4).run(&shards(8, 4), |task| {
            if task.rank >= 2 {
                Err(Error::NumericOverflow(format!("rank {}", task.rank)))
            } else {
                Ok(())
            }
        });

        match result {
            Err(Error::DeviceComputationFailure { device, reason }) => {
                assert_eq!(device, 2);
                assert!(reason.contains("rank 2"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert_eq!(provider.free_count(), 4);
    }

    #[test]
    fn test_panic_becomes_failure() {
        let provider = Arc::new(LocalDevices::new(2));
        let result = context(&provider, 2).run(&shards(4, 2), |task| {
            assert!(task.rank != 1, "device exploded");
            Ok(())
        });

        assert!(matches!(
            result,
            Err(Error::DeviceComputationFailure { device: 1, .. })
        ));
        assert_eq!(provider.free_count(), 2);
    }

    #[test]
    fn test_cancelled_shards_are_not_the_failure() {
        let provider = Arc::new(LocalDevices::new(2));
        let result = context(&provider, 2).run(&shards(4, 2), |task| {
            if task.rank == 0 {
                // Wait until rank 1 has failed.
                while !task.is_cancelled() {
                    std::thread::yield_now();
                }
                Err::<(), _>(Error::Cancelled)
            } else {
                Err(Error::InvalidParameter("boom".to_string()))
            }
        });

        assert!(matches!(
            result,
            Err(Error::DeviceComputationFailure { device: 1, .. })
        ));
    }

    #[test]
    fn test_shard_count_must_match_group() {
        let provider = Arc::new(LocalDevices::new(4));
        let result = context(&provider, 2).run(&shards(6, 3), |_| Ok(()));

        assert!(matches!(result, Err(Error::AggregationMismatch(_))));
        assert_eq!(provider.free_count(), 4);
    }

    #[test]
    fn test_run_requires_established() {
        let provider = Arc::new(LocalDevices::new(1));
        let ctx = ExecutionContext::new(provider);
        assert!(matches!(
            ctx.run(&shards(1, 1), |_| Ok(())),
            Err(Error::InvalidState(_))
        ));
    }

    #[test]
    fn test_establish_twice_rejected() {
        let provider = Arc::new(LocalDevices::new(2));
        let mut ctx = context(&provider, 1);
        assert!(matches!(
            ctx.establish(1, false),
            Err(Error::InvalidState(_))
        ));
        assert_eq!(provider.free_count(), 1);
    }

    #[test]
    fn test_teardown_is_idempotent_and_drop_releases() {
        let provider = Arc::new(LocalDevices::new(3));
        let mut ctx = context(&provider, 2);
        ctx.teardown();
        ctx.teardown();
        assert_eq!(ctx.state(), ContextState::TornDown);
        assert_eq!(provider.free_count(), 3);

        {
            let _ctx = context(&provider, 3);
            assert_eq!(provider.free_count(), 0);
        }
        assert_eq!(provider.free_count(), 3);
    }

    #[test]
    fn test_insufficient_devices_holds_nothing() {
        let provider = Arc::new(LocalDevices::new(2));
        let mut ctx = ExecutionContext::new(provider.clone());

        assert_eq!(
            ctx.establish(8, false),
            Err(Error::InsufficientDevices {
                requested: 8,
                available: 2
            })
        );
        assert_eq!(ctx.state(), ContextState::Uninitialized);
        assert_eq!(provider.free_count(), 2);
    }
}
