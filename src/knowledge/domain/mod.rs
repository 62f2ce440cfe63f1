//! Domain model for knowledge chunks, chunking, and vector similarity.

mod chunk;
mod chunking;
mod error;
mod ids;
mod similarity;

pub use chunk::{Embedding, KnowledgeChunk, ScoredChunk};
pub use chunking::{ChunkingConfig, split_into_chunks};
pub use error::KnowledgeDomainError;
pub use ids::{ChunkId, DocumentId};
pub use similarity::{cosine_similarity, l2_norm, l2_normalize};
