//! Error types for agent status parsing.

use thiserror::Error;

/// Error returned when parsing an [`super::AgentStatus`] from text fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown agent status: {0}")]
pub struct ParseAgentStatusError(pub String);
