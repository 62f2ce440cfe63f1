//! In-process broadcast channel publisher.

use crate::agent_status::{
    domain::{AgentStatusChanged, StatusBroadcast},
    ports::{StatusPublishResult, StatusPublisher},
};
use async_trait::async_trait;
use tokio::sync::broadcast;

const DEFAULT_CAPACITY: usize = 256;

/// Status publisher backed by a [`tokio::sync::broadcast`] channel.
///
/// Publishing never blocks. Lagging subscribers lose the oldest envelopes,
/// and publishing with no subscribers succeeds.
#[derive(Debug, Clone)]
pub struct ChannelStatusPublisher {
    sender: broadcast::Sender<StatusBroadcast>,
}

impl ChannelStatusPublisher {
    /// Creates a publisher with the default channel capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates a publisher with a custom channel capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Subscribes to envelopes published after this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<StatusBroadcast> {
        self.sender.subscribe()
    }

    /// Returns the number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for ChannelStatusPublisher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StatusPublisher for ChannelStatusPublisher {
    async fn publish(&self, change: &AgentStatusChanged) -> StatusPublishResult<()> {
        let delivered = self.sender.send(StatusBroadcast::new(*change)).unwrap_or(0);
        tracing::trace!(agent_id = %change.agent_id, delivered, "status envelope sent");
        Ok(())
    }
}
