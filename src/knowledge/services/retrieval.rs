//! Service layer for per-agent knowledge ingestion and retrieval.

use crate::knowledge::{
    domain::{
        ChunkingConfig, DocumentId, Embedding, KnowledgeChunk, KnowledgeDomainError,
        split_into_chunks,
    },
    ports::{Embedder, EmbedderError, KnowledgeStore, KnowledgeStoreError},
};
use crate::workspace::domain::AgentId;
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Number of chunks concatenated into a retrieval result.
pub const RETRIEVAL_TOP_K: usize = 3;

const CHUNK_SEPARATOR: &str = "\n\n";

/// Tunables for ingestion and retrieval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KnowledgeConfig {
    /// Word-window settings used during ingestion.
    pub chunking: ChunkingConfig,
    /// Upper bound for one embedding call, in seconds.
    pub embedding_timeout_secs: u64,
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            chunking: ChunkingConfig::default(),
            embedding_timeout_secs: 20,
        }
    }
}

impl KnowledgeConfig {
    /// Returns the embedding timeout.
    #[must_use]
    pub const fn embedding_timeout(&self) -> Duration {
        Duration::from_secs(self.embedding_timeout_secs)
    }
}

/// Service-level errors for knowledge operations.
#[derive(Debug, Error)]
pub enum KnowledgeServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] KnowledgeDomainError),
    /// The embedder failed.
    #[error(transparent)]
    Embedder(#[from] EmbedderError),
    /// The store failed.
    #[error(transparent)]
    Store(#[from] KnowledgeStoreError),
    /// The embedder did not answer within the configured bound.
    #[error("embedding timed out after {0:?}")]
    EmbeddingTimeout(Duration),
    /// The embedder returned a different number of vectors than inputs.
    #[error("embedder returned {actual} vectors for {expected} inputs")]
    EmbeddingCountMismatch {
        /// Number of texts sent.
        expected: usize,
        /// Number of vectors received.
        actual: usize,
    },
}

/// Result type for knowledge service operations.
pub type KnowledgeServiceResult<T> = Result<T, KnowledgeServiceError>;

/// Ingests documents into per-agent vector indexes and answers similarity
/// queries restricted to one agent.
#[derive(Clone)]
pub struct KnowledgeRetrievalService<E, S, C>
where
    E: Embedder,
    S: KnowledgeStore,
    C: Clock + Send + Sync,
{
    embedder: Arc<E>,
    store: Arc<S>,
    clock: Arc<C>,
    config: KnowledgeConfig,
}

impl<E, S, C> KnowledgeRetrievalService<E, S, C>
where
    E: Embedder,
    S: KnowledgeStore,
    C: Clock + Send + Sync,
{
    /// Creates a retrieval service.
    ///
    /// # Errors
    ///
    /// Returns [`KnowledgeServiceError::Domain`] when the chunking settings
    /// are invalid.
    pub fn new(
        embedder: Arc<E>,
        store: Arc<S>,
        clock: Arc<C>,
        config: KnowledgeConfig,
    ) -> KnowledgeServiceResult<Self> {
        config.chunking.validate()?;
        Ok(Self {
            embedder,
            store,
            clock,
            config,
        })
    }

    /// Splits `document_text` into chunks owned by `agent_id` under a fresh
    /// document identifier.
    ///
    /// Re-ingesting the same text stores a second copy; de-duplication is
    /// the caller's concern.
    ///
    /// # Errors
    ///
    /// Returns embedder, timeout, or store errors.
    pub async fn ingest(
        &self,
        document_text: &str,
        agent_id: AgentId,
    ) -> KnowledgeServiceResult<DocumentId> {
        let document_id = DocumentId::new();
        self.ingest_document(document_id, document_text, agent_id)
            .await?;
        Ok(document_id)
    }

    /// Ingests text under a caller-supplied document identifier and returns
    /// the number of chunks stored.
    ///
    /// # Errors
    ///
    /// Returns embedder, timeout, or store errors.
    #[tracing::instrument(skip(self, document_text), fields(chars = document_text.len()))]
    pub async fn ingest_document(
        &self,
        document_id: DocumentId,
        document_text: &str,
        agent_id: AgentId,
    ) -> KnowledgeServiceResult<usize> {
        let texts = split_into_chunks(document_text, &self.config.chunking);
        if texts.is_empty() {
            tracing::debug!("document has no words; nothing to ingest");
            return Ok(0);
        }

        let embeddings = self.embed(&texts).await?;
        let chunks: Vec<KnowledgeChunk> = texts
            .into_iter()
            .zip(embeddings)
            .enumerate()
            .map(|(position, (text, embedding))| {
                KnowledgeChunk::new(
                    agent_id,
                    document_id,
                    position,
                    text,
                    embedding,
                    &*self.clock,
                )
            })
            .collect();
        let stored = chunks.len();
        self.store.insert(chunks).await?;

        tracing::debug!(stored, "document ingested");
        Ok(stored)
    }

    /// Returns the top [`RETRIEVAL_TOP_K`] chunks owned by `agent_id` that are
    /// most similar to `query`, joined by blank lines in descending
    /// similarity order.
    ///
    /// An agent without knowledge, or a blank query, yields an empty string.
    ///
    /// # Errors
    ///
    /// Returns embedder, timeout, or store errors.
    #[tracing::instrument(skip(self, query))]
    pub async fn retrieve(&self, query: &str, agent_id: AgentId) -> KnowledgeServiceResult<String> {
        if query.trim().is_empty() || self.store.count_for_agent(agent_id).await? == 0 {
            return Ok(String::new());
        }

        let query_embedding = self
            .embed(&[query.to_owned()])
            .await?
            .into_iter()
            .next()
            .ok_or(KnowledgeServiceError::EmbeddingCountMismatch {
                expected: 1,
                actual: 0,
            })?;

        let matches = self
            .store
            .search(agent_id, &query_embedding, RETRIEVAL_TOP_K)
            .await?;
        tracing::debug!(matches = matches.len(), "knowledge retrieved");

        Ok(matches
            .iter()
            .map(|scored| scored.chunk.text())
            .collect::<Vec<_>>()
            .join(CHUNK_SEPARATOR))
    }

    /// Removes a previously ingested document and returns the number of
    /// chunks deleted.
    ///
    /// # Errors
    ///
    /// Returns store errors.
    pub async fn delete_document(
        &self,
        agent_id: AgentId,
        document_id: DocumentId,
    ) -> KnowledgeServiceResult<usize> {
        Ok(self.store.delete_document(agent_id, document_id).await?)
    }

    async fn embed(&self, texts: &[String]) -> KnowledgeServiceResult<Vec<Embedding>> {
        let timeout = self.config.embedding_timeout();
        let embeddings = tokio::time::timeout(timeout, self.embedder.embed(texts))
            .await
            .map_err(|_| KnowledgeServiceError::EmbeddingTimeout(timeout))??;
        if embeddings.len() != texts.len() {
            return Err(KnowledgeServiceError::EmbeddingCountMismatch {
                expected: texts.len(),
                actual: embeddings.len(),
            });
        }
        Ok(embeddings)
    }
}
