//! Real-time publish channel port.

use crate::agent_status::domain::AgentStatusChanged;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Result type for publish operations.
pub type StatusPublishResult<T> = Result<T, StatusPublishError>;

/// Publishes status change events to real-time subscribers.
#[async_trait]
pub trait StatusPublisher: Send + Sync {
    /// Publishes one status change under the well-known event name.
    ///
    /// # Errors
    ///
    /// Returns [`StatusPublishError`] when the channel cannot accept the
    /// event.
    async fn publish(&self, change: &AgentStatusChanged) -> StatusPublishResult<()>;
}

/// Errors returned by status publishers.
#[derive(Debug, Clone, Error)]
pub enum StatusPublishError {
    /// The broadcast channel cannot be reached.
    #[error("broadcast channel unreachable: {0}")]
    Unreachable(String),

    /// The publish did not complete within the allowed time.
    #[error("broadcast timed out after {0:?}")]
    TimedOut(Duration),

    /// Generic adapter failure.
    #[error("status publisher error: {0}")]
    Adapter(Arc<dyn std::error::Error + Send + Sync>),
}

impl StatusPublishError {
    /// Wraps an adapter failure.
    pub fn adapter(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Adapter(Arc::new(err))
    }
}
