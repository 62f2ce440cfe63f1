//! Error types for orchestration runs.

use super::TraceStep;
use crate::workspace::domain::UserId;
use std::time::Duration;
use thiserror::Error;

/// Structural failures that abort an orchestration run.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OrchestrationError {
    /// A decision or request named an agent outside the workspace roster.
    #[error("agent '{0}' is not a member of the workspace")]
    UnknownAgent(String),

    /// Group chat is disabled and the request addressed no agent.
    #[error("a target agent is required when group chat is disabled")]
    MissingTargetAgent,

    /// The calling user is not authorized for the workspace.
    #[error("user {0} is not authorized for this workspace")]
    Unauthorized(UserId),

    /// The decision engine produced an unusable decision.
    #[error("malformed routing decision: {0}")]
    MalformedDecision(String),

    /// No final answer within the iteration budget.
    #[error("no final answer after {0} iterations")]
    LoopExceeded(u32),

    /// The decision engine failed after its retry.
    #[error("decision engine failed: {0}")]
    DecisionEngine(String),

    /// The decision engine did not answer in time.
    #[error("decision engine timed out after {0:?}")]
    DecisionTimeout(Duration),

    /// The decision prompt could not be rendered.
    #[error("failed to render decision prompt: {0}")]
    PromptRender(String),

    /// The orchestrator configuration is invalid.
    #[error("invalid orchestrator configuration: {0}")]
    InvalidConfig(String),
}

/// An aborted run together with the steps completed before the failure.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{error}")]
pub struct OrchestrationFailure {
    /// The structural error.
    pub error: OrchestrationError,
    /// Partial trace for diagnostics.
    pub trace: Vec<TraceStep>,
}

impl OrchestrationFailure {
    /// Attaches a partial trace to an error.
    #[must_use]
    pub const fn new(error: OrchestrationError, trace: Vec<TraceStep>) -> Self {
        Self { error, trace }
    }
}

impl From<OrchestrationError> for OrchestrationFailure {
    fn from(error: OrchestrationError) -> Self {
        Self::new(error, Vec::new())
    }
}
