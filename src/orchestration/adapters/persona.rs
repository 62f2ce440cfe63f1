//! Agent completion through per-agent persona prompts.

use crate::orchestration::ports::{
    AgentCompletion, AgentCompletionError, AgentCompletionResult, TextGenerationError,
    TextGenerator,
};
use crate::workspace::domain::{AgentId, AgentMember};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// Answers as an agent by prefixing the prompt with the agent's persona.
///
/// Agents without a registered persona get a generic one naming the agent.
#[derive(Debug)]
pub struct PersonaCompletion<T>
where
    T: TextGenerator,
{
    generator: Arc<T>,
    personas: HashMap<AgentId, String>,
}

impl<T> PersonaCompletion<T>
where
    T: TextGenerator,
{
    /// Creates a completion adapter with no registered personas.
    #[must_use]
    pub fn new(generator: Arc<T>) -> Self {
        Self {
            generator,
            personas: HashMap::new(),
        }
    }

    /// Registers the system prompt used for an agent.
    #[must_use]
    pub fn with_persona(mut self, agent_id: AgentId, persona: impl Into<String>) -> Self {
        self.personas.insert(agent_id, persona.into());
        self
    }

    fn system_prompt(&self, agent: &AgentMember) -> String {
        self.personas.get(&agent.id()).cloned().unwrap_or_else(|| {
            format!(
                "You are {}, an agent in a shared workspace. Answer the instruction directly.",
                agent.name()
            )
        })
    }
}

#[async_trait]
impl<T> AgentCompletion for PersonaCompletion<T>
where
    T: TextGenerator,
{
    async fn complete(&self, agent: &AgentMember, prompt: &str) -> AgentCompletionResult<String> {
        let system_prompt = self.system_prompt(agent);
        self.generator
            .generate(&system_prompt, prompt)
            .await
            .map_err(|err| match err {
                TextGenerationError::Unavailable(reason) => AgentCompletionError::Unavailable(reason),
                other => AgentCompletionError::adapter(other),
            })
    }
}
