//! Error types for workspace domain validation.

use super::AgentId;
use thiserror::Error;

/// Errors returned while constructing workspace domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WorkspaceDomainError {
    /// The agent name is empty after trimming.
    #[error("agent name must not be empty")]
    EmptyAgentName,

    /// The agent name exceeds the 100-character limit.
    #[error("agent name exceeds 100 character limit: {0}")]
    AgentNameTooLong(String),

    /// The workspace display name is empty after trimming.
    #[error("workspace display name must not be empty")]
    EmptyDisplayName,

    /// Two roster entries share the same agent identifier.
    #[error("agent {0} appears more than once in the workspace roster")]
    DuplicateMember(AgentId),
}
