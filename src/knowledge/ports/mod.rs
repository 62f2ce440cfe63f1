//! Port contracts for embedding and chunk storage.

mod embedder;
mod store;

pub use embedder::{Embedder, EmbedderError, EmbedderResult};
pub use store::{KnowledgeStore, KnowledgeStoreError, KnowledgeStoreResult};
