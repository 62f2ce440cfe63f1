//! Chunk storage and similarity search port.

use crate::knowledge::domain::{DocumentId, Embedding, KnowledgeChunk, ScoredChunk};
use crate::workspace::domain::AgentId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for knowledge store operations.
pub type KnowledgeStoreResult<T> = Result<T, KnowledgeStoreError>;

/// Persistence and nearest-neighbour contract for knowledge chunks.
///
/// Implementations must restrict every read to the given agent before
/// ranking; a search may never return a chunk owned by another agent.
#[async_trait]
pub trait KnowledgeStore: Send + Sync {
    /// Stores chunks. Re-ingesting a document appends new chunks.
    async fn insert(&self, chunks: Vec<KnowledgeChunk>) -> KnowledgeStoreResult<()>;

    /// Returns up to `limit` chunks owned by `agent_id`, most similar first.
    async fn search(
        &self,
        agent_id: AgentId,
        query: &Embedding,
        limit: usize,
    ) -> KnowledgeStoreResult<Vec<ScoredChunk>>;

    /// Removes every chunk of a document owned by `agent_id` and returns how
    /// many were removed.
    async fn delete_document(
        &self,
        agent_id: AgentId,
        document_id: DocumentId,
    ) -> KnowledgeStoreResult<usize>;

    /// Counts chunks owned by `agent_id`.
    async fn count_for_agent(&self, agent_id: AgentId) -> KnowledgeStoreResult<usize>;
}

/// Errors returned by knowledge store implementations.
#[derive(Debug, Clone, Error)]
pub enum KnowledgeStoreError {
    /// A vector does not match the dimensionality already stored for the agent.
    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Dimensionality of existing vectors.
        expected: usize,
        /// Dimensionality of the rejected vector.
        actual: usize,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl KnowledgeStoreError {
    /// Wraps a persistence-layer failure.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
