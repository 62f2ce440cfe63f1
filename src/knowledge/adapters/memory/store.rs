//! In-memory knowledge store with brute-force cosine ranking.

use crate::knowledge::{
    domain::{DocumentId, Embedding, KnowledgeChunk, ScoredChunk, cosine_similarity},
    ports::{KnowledgeStore, KnowledgeStoreError, KnowledgeStoreResult},
};
use crate::workspace::domain::AgentId;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Thread-safe in-memory chunk store.
///
/// Chunks are partitioned by owning agent so a search only ever scans the
/// requesting agent's partition.
#[derive(Debug, Clone, Default)]
pub struct InMemoryKnowledgeStore {
    state: Arc<RwLock<HashMap<AgentId, Vec<KnowledgeChunk>>>>,
}

impl InMemoryKnowledgeStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl ToString) -> KnowledgeStoreError {
    KnowledgeStoreError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl KnowledgeStore for InMemoryKnowledgeStore {
    async fn insert(&self, chunks: Vec<KnowledgeChunk>) -> KnowledgeStoreResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;

        let mut expected_dimensions: HashMap<AgentId, usize> = HashMap::new();
        for chunk in &chunks {
            let actual = chunk.embedding().dimensions();
            let expected = *expected_dimensions
                .entry(chunk.agent_id())
                .or_insert_with(|| {
                    state
                        .get(&chunk.agent_id())
                        .and_then(|partition| partition.first())
                        .map_or(actual, |existing| existing.embedding().dimensions())
                });
            if expected != actual {
                return Err(KnowledgeStoreError::DimensionMismatch { expected, actual });
            }
        }

        for chunk in chunks {
            state.entry(chunk.agent_id()).or_default().push(chunk);
        }
        Ok(())
    }

    async fn search(
        &self,
        agent_id: AgentId,
        query: &Embedding,
        limit: usize,
    ) -> KnowledgeStoreResult<Vec<ScoredChunk>> {
        let state = self.state.read().map_err(lock_error)?;
        let Some(partition) = state.get(&agent_id) else {
            return Ok(Vec::new());
        };

        let mut scored: Vec<ScoredChunk> = partition
            .iter()
            .map(|chunk| ScoredChunk {
                similarity: cosine_similarity(query.as_slice(), chunk.embedding().as_slice()),
                chunk: chunk.clone(),
            })
            .collect();
        scored.sort_by(|left, right| right.similarity.total_cmp(&left.similarity));
        scored.truncate(limit);
        Ok(scored)
    }

    async fn delete_document(
        &self,
        agent_id: AgentId,
        document_id: DocumentId,
    ) -> KnowledgeStoreResult<usize> {
        let mut state = self.state.write().map_err(lock_error)?;
        let Some(partition) = state.get_mut(&agent_id) else {
            return Ok(0);
        };
        let before = partition.len();
        partition.retain(|chunk| chunk.document_id() != document_id);
        Ok(before.saturating_sub(partition.len()))
    }

    async fn count_for_agent(&self, agent_id: AgentId) -> KnowledgeStoreResult<usize> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.get(&agent_id).map_or(0, Vec::len))
    }
}
