//! Workspace roster entry.

use super::{AgentId, AgentName};
use serde::{Deserialize, Serialize};

/// An agent that belongs to a workspace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgentMember {
    name: AgentName,
    id: AgentId,
}

impl AgentMember {
    /// Creates a roster entry.
    #[must_use]
    pub const fn new(name: AgentName, id: AgentId) -> Self {
        Self { name, id }
    }

    /// Returns the agent display name.
    #[must_use]
    pub const fn name(&self) -> &AgentName {
        &self.name
    }

    /// Returns the agent identifier.
    #[must_use]
    pub const fn id(&self) -> AgentId {
        self.id
    }
}
