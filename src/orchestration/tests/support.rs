//! Scripted ports and fixtures shared by orchestrator tests.

use crate::knowledge::services::KnowledgeServiceError;
use crate::orchestration::{
    adapters::InMemoryToolServerDirectory,
    domain::{DecisionContext, RoutingDecision},
    ports::{
        AgentCompletion, AgentCompletionError, AgentCompletionResult, DecisionEngine,
        DecisionEngineError, DecisionEngineResult, KnowledgeLookup, KnowledgeLookupError,
        KnowledgeLookupResult,
    },
    services::{OrchestratorConfig, WorkspaceOrchestrator},
};
use crate::tool_gateway::{
    adapters::InMemoryToolServer, domain::ToolDescriptor, domain::ToolServerUrl,
    services::ToolGateway,
};
use crate::workspace::domain::{AgentId, AgentMember, AgentName, UserId, Workspace, WorkspaceId};
use async_trait::async_trait;
use mockable::DefaultClock;
use serde_json::json;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub type TestOrchestrator = WorkspaceOrchestrator<
    ScriptedDecisionEngine,
    ScriptedCompletion,
    StaticKnowledge,
    InMemoryToolServer,
    InMemoryToolServerDirectory,
    DefaultClock,
>;

/// Decision engine replaying queued replies; the last reply repeats.
#[derive(Default)]
pub struct ScriptedDecisionEngine {
    replies: Mutex<VecDeque<DecisionEngineResult<RoutingDecision>>>,
    contexts: Mutex<Vec<DecisionContext>>,
}

impl ScriptedDecisionEngine {
    pub fn new(replies: Vec<DecisionEngineResult<RoutingDecision>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            contexts: Mutex::new(Vec::new()),
        }
    }

    pub fn decisions(decisions: Vec<RoutingDecision>) -> Self {
        Self::new(decisions.into_iter().map(Ok).collect())
    }

    pub fn contexts(&self) -> Vec<DecisionContext> {
        self.contexts.lock().expect("contexts lock").clone()
    }
}

#[async_trait]
impl DecisionEngine for ScriptedDecisionEngine {
    async fn decide(&self, context: &DecisionContext) -> DecisionEngineResult<RoutingDecision> {
        self.contexts
            .lock()
            .expect("contexts lock")
            .push(context.clone());
        let mut replies = self.replies.lock().expect("replies lock");
        let reply = if replies.len() > 1 {
            replies.pop_front()
        } else {
            replies.front().cloned()
        };
        reply.unwrap_or_else(|| Err(DecisionEngineError::Unavailable("script empty".to_owned())))
    }
}

/// Agent completion answering `"<name>: <prompt>"` with optional delays and
/// failures per agent.
#[derive(Default)]
pub struct ScriptedCompletion {
    delays: HashMap<String, Duration>,
    failures: Mutex<HashMap<String, usize>>,
    prompts: Mutex<Vec<(String, String)>>,
}

impl ScriptedCompletion {
    pub fn with_delay(mut self, agent: &str, delay: Duration) -> Self {
        self.delays.insert(agent.to_owned(), delay);
        self
    }

    pub fn failing(self, agent: &str, times: usize) -> Self {
        self.failures
            .lock()
            .expect("failures lock")
            .insert(agent.to_owned(), times);
        self
    }

    pub fn prompts(&self) -> Vec<(String, String)> {
        self.prompts.lock().expect("prompts lock").clone()
    }
}

#[async_trait]
impl AgentCompletion for ScriptedCompletion {
    async fn complete(&self, agent: &AgentMember, prompt: &str) -> AgentCompletionResult<String> {
        let name = agent.name().as_str().to_owned();
        if let Some(delay) = self.delays.get(&name) {
            tokio::time::sleep(*delay).await;
        }
        self.prompts
            .lock()
            .expect("prompts lock")
            .push((name.clone(), prompt.to_owned()));

        let mut failures = self.failures.lock().expect("failures lock");
        if let Some(remaining) = failures.get_mut(&name)
            && *remaining > 0
        {
            *remaining -= 1;
            return Err(AgentCompletionError::Unavailable(format!("{name} offline")));
        }
        Ok(format!("{name}: {prompt}"))
    }
}

/// Knowledge lookup returning fixed text per agent.
#[derive(Default)]
pub struct StaticKnowledge {
    entries: HashMap<AgentId, String>,
    broken: bool,
}

impl StaticKnowledge {
    pub fn with_entry(mut self, agent_id: AgentId, text: &str) -> Self {
        self.entries.insert(agent_id, text.to_owned());
        self
    }

    pub fn broken() -> Self {
        Self {
            entries: HashMap::new(),
            broken: true,
        }
    }
}

#[async_trait]
impl KnowledgeLookup for StaticKnowledge {
    async fn lookup(&self, _query: &str, agent_id: AgentId) -> KnowledgeLookupResult<String> {
        if self.broken {
            return Err(KnowledgeLookupError::Retrieval(
                KnowledgeServiceError::EmbeddingTimeout(Duration::from_secs(1)),
            ));
        }
        Ok(self.entries.get(&agent_id).cloned().unwrap_or_default())
    }
}

/// Roster and tool wiring for the Sales/Support workspace.
pub struct Fixture {
    pub sales: AgentMember,
    pub support: AgentMember,
    pub tool_server: ToolServerUrl,
    pub tools: Arc<InMemoryToolServer>,
    pub directory: Arc<InMemoryToolServerDirectory>,
}

impl Fixture {
    pub fn new() -> Self {
        let sales = member("Sales");
        let support = member("Support");
        let tool_server = ToolServerUrl::new("http://support-tools.local/mcp").expect("valid url");
        let tools = Arc::new(InMemoryToolServer::new());
        tools.set_tool_catalog(
            tool_server.clone(),
            vec![
                ToolDescriptor::new("lookup-order", "Looks up an order", json!({"type": "object"}))
                    .expect("valid tool"),
            ],
        );
        let directory = Arc::new(InMemoryToolServerDirectory::new());
        directory
            .register(support.id(), tool_server.clone())
            .expect("registration should succeed");
        Self {
            sales,
            support,
            tool_server,
            tools,
            directory,
        }
    }

    pub fn workspace(&self, group_chat_enabled: bool) -> Workspace {
        Workspace::new(
            WorkspaceId::new(),
            "Customer desk",
            vec![self.sales.clone(), self.support.clone()],
            [UserId::new("alice")],
            group_chat_enabled,
        )
        .expect("valid workspace")
    }

    pub fn orchestrator(
        &self,
        engine: &Arc<ScriptedDecisionEngine>,
        completion: &Arc<ScriptedCompletion>,
        knowledge: StaticKnowledge,
        config: OrchestratorConfig,
    ) -> TestOrchestrator {
        WorkspaceOrchestrator::new(
            Arc::clone(engine),
            Arc::clone(completion),
            Arc::new(knowledge),
            ToolGateway::new(Arc::clone(&self.tools)),
            Arc::clone(&self.directory),
            Arc::new(DefaultClock),
            config,
        )
        .expect("valid orchestrator config")
    }
}

pub fn member(name: &str) -> AgentMember {
    AgentMember::new(AgentName::new(name).expect("valid name"), AgentId::new())
}

pub fn agent_name(name: &str) -> AgentName {
    AgentName::new(name).expect("valid name")
}
