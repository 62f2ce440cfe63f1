//! Stored status record.

use super::AgentStatus;
use crate::workspace::domain::AgentId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Latest status written for one agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentStatusRecord {
    /// Agent the record belongs to.
    pub agent_id: AgentId,
    /// Most recently written status.
    pub status: AgentStatus,
    /// Time of the most recent write.
    pub last_changed: DateTime<Utc>,
}
