//! Domain types for agent status tracking.

mod error;
mod event;
mod record;
mod status;

pub use error::ParseAgentStatusError;
pub use event::{AGENT_STATUS_CHANGED_EVENT, AgentStatusChanged, StatusBroadcast};
pub use record::AgentStatusRecord;
pub use status::AgentStatus;
