//! Validated agent display name.

use super::WorkspaceDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length for an agent name.
const MAX_NAME_LENGTH: usize = 100;

/// Human-readable agent name as shown in a workspace roster.
///
/// Names keep their original casing for display; [`AgentName::matches`]
/// compares case-insensitively because decision engines frequently change
/// the capitalisation of the names they were given.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AgentName(String);

impl AgentName {
    /// Creates a validated agent name.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceDomainError::EmptyAgentName`] when the value is
    /// empty after trimming or [`WorkspaceDomainError::AgentNameTooLong`] when
    /// it exceeds 100 characters.
    pub fn new(value: impl Into<String>) -> Result<Self, WorkspaceDomainError> {
        let normalized = value.into().trim().to_owned();
        if normalized.is_empty() {
            return Err(WorkspaceDomainError::EmptyAgentName);
        }
        if normalized.chars().count() > MAX_NAME_LENGTH {
            return Err(WorkspaceDomainError::AgentNameTooLong(normalized));
        }
        Ok(Self(normalized))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` when `candidate` names this agent, ignoring case and
    /// surrounding whitespace.
    #[must_use]
    pub fn matches(&self, candidate: &str) -> bool {
        self.0.eq_ignore_ascii_case(candidate.trim())
    }
}

impl TryFrom<String> for AgentName {
    type Error = WorkspaceDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AgentName> for String {
    fn from(value: AgentName) -> Self {
        value.0
    }
}

impl AsRef<str> for AgentName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for AgentName {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}
