//! Decision engine port.

use crate::orchestration::domain::{DecisionContext, RoutingDecision};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for decision engine calls.
pub type DecisionEngineResult<T> = Result<T, DecisionEngineError>;

/// Chooses the next orchestration step from the current context.
///
/// Any model or rule set may back this trait as long as it returns a
/// [`RoutingDecision`].
#[async_trait]
pub trait DecisionEngine: Send + Sync {
    /// Produces the next routing decision.
    ///
    /// # Errors
    ///
    /// Returns [`DecisionEngineError::Malformed`] when the engine's output
    /// cannot be read as a decision, or another variant when the engine is
    /// unavailable.
    async fn decide(&self, context: &DecisionContext) -> DecisionEngineResult<RoutingDecision>;
}

/// Errors returned by decision engines.
#[derive(Debug, Clone, Error)]
pub enum DecisionEngineError {
    /// The engine answered with something that is not a valid decision.
    #[error("malformed decision: {0}")]
    Malformed(String),

    /// The backing capability could not be reached.
    #[error("decision capability unavailable: {0}")]
    Unavailable(String),

    /// Generic adapter failure.
    #[error("decision engine error: {0}")]
    Adapter(Arc<dyn std::error::Error + Send + Sync>),
}

impl DecisionEngineError {
    /// Wraps an adapter failure.
    pub fn adapter(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Adapter(Arc::new(err))
    }
}
