//! Lookup of an agent's registered tool server.

use crate::tool_gateway::domain::ToolServerUrl;
use crate::workspace::domain::AgentId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for tool server lookups.
pub type ToolServerDirectoryResult<T> = Result<T, ToolServerDirectoryError>;

/// Resolves the tool server registered for an agent.
#[async_trait]
pub trait ToolServerDirectory: Send + Sync {
    /// Returns the agent's tool server, or `None` when none is registered.
    ///
    /// # Errors
    ///
    /// Returns [`ToolServerDirectoryError`] when the lookup itself fails.
    async fn tool_server_for(
        &self,
        agent_id: AgentId,
    ) -> ToolServerDirectoryResult<Option<ToolServerUrl>>;
}

/// Errors returned by tool server directories.
#[derive(Debug, Clone, Error)]
pub enum ToolServerDirectoryError {
    /// Persistence failure.
    #[error("tool server directory error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ToolServerDirectoryError {
    /// Wraps a persistence failure.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
