//! Knowledge chunk and embedding value objects.

use super::{ChunkId, DocumentId, KnowledgeDomainError};
use crate::workspace::domain::AgentId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Dense embedding vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Embedding(Vec<f32>);

impl Embedding {
    /// Wraps embedding components.
    ///
    /// # Errors
    ///
    /// Returns [`KnowledgeDomainError::EmptyEmbedding`] for an empty vector.
    pub fn new(values: Vec<f32>) -> Result<Self, KnowledgeDomainError> {
        if values.is_empty() {
            return Err(KnowledgeDomainError::EmptyEmbedding);
        }
        Ok(Self(values))
    }

    /// Returns the vector components.
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    /// Returns the number of dimensions.
    #[must_use]
    pub fn dimensions(&self) -> usize {
        self.0.len()
    }
}

/// A span of document text owned by one agent, with its embedding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeChunk {
    id: ChunkId,
    agent_id: AgentId,
    document_id: DocumentId,
    position: usize,
    text: String,
    embedding: Embedding,
    created_at: DateTime<Utc>,
}

impl KnowledgeChunk {
    /// Creates a chunk at `position` within its source document.
    #[must_use]
    pub fn new(
        agent_id: AgentId,
        document_id: DocumentId,
        position: usize,
        text: String,
        embedding: Embedding,
        clock: &impl mockable::Clock,
    ) -> Self {
        Self {
            id: ChunkId::new(),
            agent_id,
            document_id,
            position,
            text,
            embedding,
            created_at: clock.utc(),
        }
    }

    /// Returns the chunk identifier.
    #[must_use]
    pub const fn id(&self) -> ChunkId {
        self.id
    }

    /// Returns the owning agent.
    #[must_use]
    pub const fn agent_id(&self) -> AgentId {
        self.agent_id
    }

    /// Returns the source document.
    #[must_use]
    pub const fn document_id(&self) -> DocumentId {
        self.document_id
    }

    /// Returns the zero-based window index within the source document.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Returns the chunk text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the chunk embedding.
    #[must_use]
    pub const fn embedding(&self) -> &Embedding {
        &self.embedding
    }

    /// Returns when the chunk was stored.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// A chunk paired with its similarity to a query.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredChunk {
    /// The matched chunk.
    pub chunk: KnowledgeChunk,
    /// Cosine similarity to the query (higher is closer).
    pub similarity: f32,
}
