//! Decision engine driven by a text generator.

use crate::orchestration::{
    domain::{DecisionContext, RoutingDecision},
    ports::{
        DecisionEngine, DecisionEngineError, DecisionEngineResult, TextGenerationError,
        TextGenerator,
    },
};
use async_trait::async_trait;
use std::sync::Arc;

const ROUTER_SYSTEM_PROMPT: &str = "You are the router of a multi-agent workspace. \
Answer with a single JSON object and nothing else.";

/// Renders the decision context into a prompt and parses the model's JSON
/// reply into a [`RoutingDecision`].
#[derive(Debug)]
pub struct PromptedDecisionEngine<T>
where
    T: TextGenerator,
{
    generator: Arc<T>,
}

impl<T> PromptedDecisionEngine<T>
where
    T: TextGenerator,
{
    /// Creates an engine over a text generator.
    #[must_use]
    pub const fn new(generator: Arc<T>) -> Self {
        Self { generator }
    }
}

#[async_trait]
impl<T> DecisionEngine for PromptedDecisionEngine<T>
where
    T: TextGenerator,
{
    async fn decide(&self, context: &DecisionContext) -> DecisionEngineResult<RoutingDecision> {
        let prompt = context.render_prompt().map_err(DecisionEngineError::adapter)?;
        let reply = self
            .generator
            .generate(ROUTER_SYSTEM_PROMPT, &prompt)
            .await
            .map_err(|err| match err {
                TextGenerationError::Unavailable(reason) => {
                    DecisionEngineError::Unavailable(reason)
                }
                other => DecisionEngineError::adapter(other),
            })?;

        RoutingDecision::parse_json(&reply)
            .map_err(|err| DecisionEngineError::Malformed(err.to_string()))
    }
}
