//! In-memory tool server directory.

use crate::orchestration::ports::{
    ToolServerDirectory, ToolServerDirectoryError, ToolServerDirectoryResult,
};
use crate::tool_gateway::domain::ToolServerUrl;
use crate::workspace::domain::AgentId;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Thread-safe map from agent id to its registered tool server.
#[derive(Debug, Clone, Default)]
pub struct InMemoryToolServerDirectory {
    servers: Arc<RwLock<HashMap<AgentId, ToolServerUrl>>>,
}

impl InMemoryToolServerDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers or replaces the tool server for an agent.
    ///
    /// # Errors
    ///
    /// Returns persistence errors when lock acquisition fails.
    pub fn register(
        &self,
        agent_id: AgentId,
        server: ToolServerUrl,
    ) -> ToolServerDirectoryResult<()> {
        let mut servers = self.servers.write().map_err(|err| {
            ToolServerDirectoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        servers.insert(agent_id, server);
        Ok(())
    }
}

#[async_trait]
impl ToolServerDirectory for InMemoryToolServerDirectory {
    async fn tool_server_for(
        &self,
        agent_id: AgentId,
    ) -> ToolServerDirectoryResult<Option<ToolServerUrl>> {
        let servers = self.servers.read().map_err(|err| {
            ToolServerDirectoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(servers.get(&agent_id).cloned())
    }
}
