//! Knowledge lookup port, backed by the knowledge retrieval engine.

use crate::knowledge::{
    ports::{Embedder, KnowledgeStore},
    services::{KnowledgeRetrievalService, KnowledgeServiceError},
};
use crate::workspace::domain::AgentId;
use async_trait::async_trait;
use mockable::Clock;
use thiserror::Error;

/// Result type for knowledge lookups.
pub type KnowledgeLookupResult<T> = Result<T, KnowledgeLookupError>;

/// Retrieves an agent's private knowledge relevant to a query.
#[async_trait]
pub trait KnowledgeLookup: Send + Sync {
    /// Returns concatenated knowledge for `agent_id`, or an empty string.
    ///
    /// # Errors
    ///
    /// Returns [`KnowledgeLookupError`] when retrieval fails.
    async fn lookup(&self, query: &str, agent_id: AgentId) -> KnowledgeLookupResult<String>;
}

/// Errors returned by knowledge lookups.
#[derive(Debug, Error)]
pub enum KnowledgeLookupError {
    /// The retrieval engine failed.
    #[error(transparent)]
    Retrieval(#[from] KnowledgeServiceError),
}

#[async_trait]
impl<E, S, C> KnowledgeLookup for KnowledgeRetrievalService<E, S, C>
where
    E: Embedder,
    S: KnowledgeStore,
    C: Clock + Send + Sync,
{
    async fn lookup(&self, query: &str, agent_id: AgentId) -> KnowledgeLookupResult<String> {
        Ok(self.retrieve(query, agent_id).await?)
    }
}
