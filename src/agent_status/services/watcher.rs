//! Status broadcast watcher loop.

use super::AgentStatusStore;
use crate::agent_status::{
    domain::{AgentStatus, AgentStatusChanged},
    ports::{StatusPublishError, StatusPublisher},
};
use crate::workspace::domain::AgentId;
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

const BROADCAST_FAILURES_METRIC: &str = "conclave_status_broadcast_failures_total";

/// Polling cadence and failure escalation for the watcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatcherConfig {
    /// Seconds between polls of the status store.
    pub poll_interval_secs: u64,
    /// Consecutive publish failures after which failures log at error level.
    pub failure_escalation_threshold: u32,
    /// Upper bound for a single publish, in seconds.
    pub publish_timeout_secs: u64,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 10,
            failure_escalation_threshold: 5,
            publish_timeout_secs: 5,
        }
    }
}

impl WatcherConfig {
    /// Returns the poll interval.
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// Returns the per-publish timeout.
    #[must_use]
    pub const fn publish_timeout(&self) -> Duration {
        Duration::from_secs(self.publish_timeout_secs)
    }
}

/// Observable lifecycle state of the watcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WatcherState {
    /// Waiting for the next tick.
    Idle,
    /// Taking and diffing a snapshot.
    Polling,
    /// The last poll found nothing to publish.
    Unchanged,
    /// The last poll published at least one change.
    Broadcasting,
    /// The loop has exited after cancellation.
    Stopped,
}

/// Result of one poll.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollOutcome {
    /// Changes published successfully.
    pub broadcast: usize,
    /// Changes whose publish failed and remain pending.
    pub failed: usize,
}

impl PollOutcome {
    /// Returns `true` when the poll found no change to publish.
    #[must_use]
    pub const fn is_unchanged(&self) -> bool {
        self.broadcast == 0 && self.failed == 0
    }
}

/// Publishes agent status changes observed by polling the status store.
///
/// Changes are computed against the last successfully broadcast status of
/// each agent, so a failed publish is retried on the next poll. Publish
/// failures are logged and counted but never stop the loop.
pub struct StatusBroadcastWatcher<P, C>
where
    P: StatusPublisher,
    C: Clock + Send + Sync,
{
    store: Arc<AgentStatusStore<C>>,
    publisher: Arc<P>,
    config: WatcherConfig,
    last_broadcast: Mutex<HashMap<AgentId, AgentStatus>>,
    consecutive_failures: AtomicU32,
    state: watch::Sender<WatcherState>,
}

impl<P, C> StatusBroadcastWatcher<P, C>
where
    P: StatusPublisher,
    C: Clock + Send + Sync,
{
    /// Creates a watcher in the [`WatcherState::Idle`] state.
    #[must_use]
    pub fn new(store: Arc<AgentStatusStore<C>>, publisher: Arc<P>, config: WatcherConfig) -> Self {
        let (state, _) = watch::channel(WatcherState::Idle);
        Self {
            store,
            publisher,
            config,
            last_broadcast: Mutex::new(HashMap::new()),
            consecutive_failures: AtomicU32::new(0),
            state,
        }
    }

    /// Subscribes to watcher state transitions.
    #[must_use]
    pub fn subscribe_state(&self) -> watch::Receiver<WatcherState> {
        self.state.subscribe()
    }

    /// Returns the current watcher state.
    #[must_use]
    pub fn state(&self) -> WatcherState {
        *self.state.borrow()
    }

    /// Returns the number of publish failures since the last success.
    #[must_use]
    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures.load(Ordering::Relaxed)
    }

    /// Snapshots the store and publishes every status change.
    #[tracing::instrument(skip(self))]
    pub async fn poll_once(&self) -> PollOutcome {
        self.state.send_replace(WatcherState::Polling);
        let snapshot = self.store.snapshot();
        let mut last_broadcast = self.last_broadcast.lock().await;

        let mut changes: Vec<AgentStatusChanged> = snapshot
            .values()
            .filter(|record| last_broadcast.get(&record.agent_id) != Some(&record.status))
            .map(|record| AgentStatusChanged {
                agent_id: record.agent_id,
                status: record.status,
            })
            .collect();

        if changes.is_empty() {
            tracing::trace!(agents = snapshot.len(), "no status change, skipping broadcast");
            self.state.send_replace(WatcherState::Unchanged);
            return PollOutcome::default();
        }

        changes.sort_by_key(|change| change.agent_id);
        self.state.send_replace(WatcherState::Broadcasting);

        let publish_timeout = self.config.publish_timeout();
        let mut outcome = PollOutcome::default();
        for change in changes {
            let published = tokio::time::timeout(publish_timeout, self.publisher.publish(&change))
                .await
                .unwrap_or_else(|_| Err(StatusPublishError::TimedOut(publish_timeout)));
            match published {
                Ok(()) => {
                    last_broadcast.insert(change.agent_id, change.status);
                    self.consecutive_failures.store(0, Ordering::Relaxed);
                    outcome.broadcast = outcome.broadcast.saturating_add(1);
                }
                Err(err) => {
                    self.record_failure(&change, &err);
                    outcome.failed = outcome.failed.saturating_add(1);
                }
            }
        }

        tracing::debug!(
            broadcast = outcome.broadcast,
            failed = outcome.failed,
            "status changes published"
        );
        outcome
    }

    fn record_failure(&self, change: &AgentStatusChanged, err: &StatusPublishError) {
        metrics::counter!(BROADCAST_FAILURES_METRIC).increment(1);
        let failures = self
            .consecutive_failures
            .fetch_add(1, Ordering::Relaxed)
            .saturating_add(1);

        if failures >= self.config.failure_escalation_threshold {
            tracing::error!(
                agent_id = %change.agent_id,
                consecutive_failures = failures,
                error = %err,
                "status broadcast keeps failing"
            );
        } else {
            tracing::warn!(
                agent_id = %change.agent_id,
                consecutive_failures = failures,
                error = %err,
                "status broadcast failed, will retry next poll"
            );
        }
    }

    /// Polls on the configured interval until `cancel` fires.
    ///
    /// The first poll runs immediately. Cancellation is observed while
    /// waiting for the next tick and while a poll is in flight; an
    /// interrupted poll leaves its unpublished changes pending.
    pub async fn run(&self, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(self.config.poll_interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tracing::info!(
            poll_interval_secs = self.config.poll_interval_secs,
            "status watcher started"
        );

        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    tokio::select! {
                        biased;
                        () = cancel.cancelled() => break,
                        _ = self.poll_once() => {}
                    }
                    self.state.send_replace(WatcherState::Idle);
                }
            }
        }

        self.state.send_replace(WatcherState::Stopped);
        tracing::info!("status watcher stopped");
    }
}

impl<P, C> StatusBroadcastWatcher<P, C>
where
    P: StatusPublisher + 'static,
    C: Clock + Send + Sync + 'static,
{
    /// Runs the watcher loop on a background task.
    #[must_use]
    pub fn spawn(self: Arc<Self>, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move { self.run(cancel).await })
    }
}
