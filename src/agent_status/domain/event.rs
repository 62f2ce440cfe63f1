//! Status change events published to observers.

use super::AgentStatus;
use crate::workspace::domain::AgentId;
use serde::{Deserialize, Serialize};

/// Well-known event name carried by every status broadcast.
pub const AGENT_STATUS_CHANGED_EVENT: &str = "agent-status-changed";

/// Payload announcing that an agent's status changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentStatusChanged {
    /// Agent whose status changed.
    pub agent_id: AgentId,
    /// The new status.
    pub status: AgentStatus,
}

/// Envelope delivered to subscribers of the broadcast channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusBroadcast {
    /// Event name, always [`AGENT_STATUS_CHANGED_EVENT`].
    pub event: String,
    /// Event payload.
    pub payload: AgentStatusChanged,
}

impl StatusBroadcast {
    /// Wraps a status change in the well-known event envelope.
    #[must_use]
    pub fn new(payload: AgentStatusChanged) -> Self {
        Self {
            event: AGENT_STATUS_CHANGED_EVENT.to_owned(),
            payload,
        }
    }
}

impl From<AgentStatusChanged> for StatusBroadcast {
    fn from(payload: AgentStatusChanged) -> Self {
        Self::new(payload)
    }
}
