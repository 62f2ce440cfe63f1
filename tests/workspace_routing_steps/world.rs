//! Shared world state for workspace routing BDD scenarios.

use async_trait::async_trait;
use conclave::knowledge::{
    adapters::{HashingEmbedder, memory::InMemoryKnowledgeStore},
    services::{KnowledgeConfig, KnowledgeRetrievalService},
};
use conclave::orchestration::{
    adapters::{InMemoryToolServerDirectory, PersonaCompletion, PromptedDecisionEngine},
    domain::{FinalOrchestrationResult, OrchestrationFailure, RoutingDecision},
    ports::{TextGenerationError, TextGenerationResult, TextGenerator},
    services::{OrchestratorConfig, WorkspaceOrchestrator},
};
use conclave::tool_gateway::{adapters::InMemoryToolServer, services::ToolGateway};
use conclave::workspace::domain::{
    AgentId, AgentMember, AgentName, UserId, Workspace, WorkspaceId,
};
use mockable::DefaultClock;
use rstest::fixture;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

type Knowledge = KnowledgeRetrievalService<HashingEmbedder, InMemoryKnowledgeStore, DefaultClock>;

/// Orchestrator type exercised by the scenarios.
pub type TestOrchestrator = WorkspaceOrchestrator<
    PromptedDecisionEngine<ReplayGenerator>,
    PersonaCompletion<ReplayGenerator>,
    Knowledge,
    InMemoryToolServer,
    InMemoryToolServerDirectory,
    DefaultClock,
>;

/// Text generator replaying canned replies; the last one repeats.
#[derive(Default)]
pub struct ReplayGenerator {
    replies: Mutex<VecDeque<String>>,
    user_prompts: Mutex<Vec<String>>,
}

impl ReplayGenerator {
    /// Creates a generator from replies in order.
    pub fn new(replies: Vec<String>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            user_prompts: Mutex::new(Vec::new()),
        }
    }

    /// Returns every user prompt received so far.
    pub fn user_prompts(&self) -> Vec<String> {
        self.user_prompts
            .lock()
            .map(|prompts| prompts.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl TextGenerator for ReplayGenerator {
    async fn generate(&self, _system_prompt: &str, user_prompt: &str) -> TextGenerationResult<String> {
        if let Ok(mut prompts) = self.user_prompts.lock() {
            prompts.push(user_prompt.to_owned());
        }
        let mut replies = self
            .replies
            .lock()
            .map_err(|_| TextGenerationError::Unavailable("replies lock poisoned".to_owned()))?;
        let reply = if replies.len() > 1 {
            replies.pop_front()
        } else {
            replies.front().cloned()
        };
        reply.ok_or_else(|| TextGenerationError::Unavailable("no scripted reply".to_owned()))
    }
}

/// Scenario world for workspace routing behaviour tests.
pub struct RoutingWorld {
    /// Workspace under test.
    pub workspace: Option<Workspace>,
    /// Decisions the router will produce, in order.
    pub decisions: Vec<RoutingDecision>,
    /// Tool host shared by every registered server.
    pub tools: Arc<InMemoryToolServer>,
    /// Agent to tool server registrations.
    pub directory: Arc<InMemoryToolServerDirectory>,
    /// Generator answering on behalf of agents.
    pub agents: Arc<ReplayGenerator>,
    /// Outcome of the last resolved turn.
    pub outcome: Option<Result<FinalOrchestrationResult, OrchestrationFailure>>,
}

impl RoutingWorld {
    /// Creates a world with no workspace and an empty script.
    pub fn new() -> Self {
        Self {
            workspace: None,
            decisions: Vec::new(),
            tools: Arc::new(InMemoryToolServer::new()),
            directory: Arc::new(InMemoryToolServerDirectory::new()),
            agents: Arc::new(ReplayGenerator::new(vec![
                "Order 1042 shipped on Monday.".to_owned(),
            ])),
            outcome: None,
        }
    }

    /// Returns the workspace configured by a given step.
    pub fn workspace(&self) -> Result<&Workspace, eyre::Report> {
        self.workspace
            .as_ref()
            .ok_or_else(|| eyre::eyre!("no workspace in scenario world"))
    }

    /// Looks up a roster member by name.
    pub fn member(&self, name: &str) -> Result<AgentMember, eyre::Report> {
        self.workspace()?
            .find_by_name(name)
            .cloned()
            .ok_or_else(|| eyre::eyre!("agent '{name}' is not on the roster"))
    }

    /// Builds an orchestrator replaying the scripted decisions.
    pub fn orchestrator(&self) -> Result<TestOrchestrator, eyre::Report> {
        let replies = self
            .decisions
            .iter()
            .map(serde_json::to_string)
            .collect::<Result<Vec<_>, _>>()?;
        let knowledge = KnowledgeRetrievalService::new(
            Arc::new(HashingEmbedder::default()),
            Arc::new(InMemoryKnowledgeStore::new()),
            Arc::new(DefaultClock),
            KnowledgeConfig::default(),
        )?;
        let orchestrator = WorkspaceOrchestrator::new(
            Arc::new(PromptedDecisionEngine::new(Arc::new(ReplayGenerator::new(
                replies,
            )))),
            Arc::new(PersonaCompletion::new(Arc::clone(&self.agents))),
            Arc::new(knowledge),
            ToolGateway::new(Arc::clone(&self.tools)),
            Arc::clone(&self.directory),
            Arc::new(DefaultClock),
            OrchestratorConfig::default(),
        )?;
        Ok(orchestrator)
    }
}

impl Default for RoutingWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> RoutingWorld {
    RoutingWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

/// Builds a two-agent workspace authorizing the user "alice".
pub fn build_workspace(
    first: &str,
    second: &str,
    group_chat_enabled: bool,
) -> Result<Workspace, eyre::Report> {
    let members = vec![
        AgentMember::new(AgentName::new(first)?, AgentId::new()),
        AgentMember::new(AgentName::new(second)?, AgentId::new()),
    ];
    Ok(Workspace::new(
        WorkspaceId::new(),
        "Scenario desk",
        members,
        [UserId::new("alice")],
        group_chat_enabled,
    )?)
}
