//! Shared fixtures for in-memory integration tests.

use async_trait::async_trait;
use conclave::knowledge::{
    adapters::{HashingEmbedder, memory::InMemoryKnowledgeStore},
    services::{KnowledgeConfig, KnowledgeRetrievalService},
};
use conclave::orchestration::ports::{TextGenerationError, TextGenerationResult, TextGenerator};
use conclave::workspace::domain::{
    AgentId, AgentMember, AgentName, UserId, Workspace, WorkspaceId,
};
use mockable::DefaultClock;
use rstest::fixture;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Knowledge service over the hashing embedder and in-memory store.
pub type TestKnowledgeService =
    KnowledgeRetrievalService<HashingEmbedder, InMemoryKnowledgeStore, DefaultClock>;

/// Provides a fresh knowledge service for each test.
#[fixture]
pub fn knowledge_service() -> TestKnowledgeService {
    KnowledgeRetrievalService::new(
        Arc::new(HashingEmbedder::default()),
        Arc::new(InMemoryKnowledgeStore::new()),
        Arc::new(DefaultClock),
        KnowledgeConfig::default(),
    )
    .expect("default knowledge config is valid")
}

/// Builds a roster member with a fresh identifier.
pub fn member(name: &str) -> AgentMember {
    AgentMember::new(AgentName::new(name).expect("valid agent name"), AgentId::new())
}

/// Builds a workspace authorizing a single user.
pub fn workspace(members: Vec<AgentMember>, group_chat_enabled: bool) -> Workspace {
    Workspace::new(
        WorkspaceId::new(),
        "Integration desk",
        members,
        [UserId::new("alice")],
        group_chat_enabled,
    )
    .expect("valid workspace")
}

/// Text generator replaying queued replies; the last reply repeats.
///
/// Every `(system, user)` prompt pair is recorded for later assertions.
#[derive(Default)]
pub struct ScriptedGenerator {
    replies: Mutex<VecDeque<String>>,
    prompts: Mutex<Vec<(String, String)>>,
}

impl ScriptedGenerator {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(Into::into).collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<(String, String)> {
        self.prompts.lock().expect("prompts lock").clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, system_prompt: &str, user_prompt: &str) -> TextGenerationResult<String> {
        self.prompts
            .lock()
            .expect("prompts lock")
            .push((system_prompt.to_owned(), user_prompt.to_owned()));
        let mut replies = self.replies.lock().expect("replies lock");
        let reply = if replies.len() > 1 {
            replies.pop_front()
        } else {
            replies.front().cloned()
        };
        reply.ok_or_else(|| TextGenerationError::Unavailable("script exhausted".to_owned()))
    }
}
