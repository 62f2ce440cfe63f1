//! Agent completion port.

use crate::workspace::domain::AgentMember;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for agent completion calls.
pub type AgentCompletionResult<T> = Result<T, AgentCompletionError>;

/// Produces an agent's reply to a prompt.
#[async_trait]
pub trait AgentCompletion: Send + Sync {
    /// Asks `agent` to respond to `prompt`.
    ///
    /// # Errors
    ///
    /// Returns [`AgentCompletionError`] when the agent cannot respond.
    async fn complete(&self, agent: &AgentMember, prompt: &str) -> AgentCompletionResult<String>;
}

/// Errors returned by agent completion adapters.
#[derive(Debug, Clone, Error)]
pub enum AgentCompletionError {
    /// The agent's backing capability could not be reached.
    #[error("agent unavailable: {0}")]
    Unavailable(String),

    /// Generic adapter failure.
    #[error("agent completion error: {0}")]
    Adapter(Arc<dyn std::error::Error + Send + Sync>),
}

impl AgentCompletionError {
    /// Wraps an adapter failure.
    pub fn adapter(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Adapter(Arc::new(err))
    }
}
