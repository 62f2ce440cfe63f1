//! Error types for knowledge domain validation.

use thiserror::Error;

/// Errors returned while constructing knowledge domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum KnowledgeDomainError {
    /// Chunk windows must contain at least one word.
    #[error("chunk size must be at least one word")]
    EmptyChunkWindow,

    /// Overlap must leave room for forward progress between windows.
    #[error("chunk overlap ({overlap_words}) must be smaller than chunk size ({chunk_words})")]
    OverlapTooLarge {
        /// Configured window size in words.
        chunk_words: usize,
        /// Configured overlap in words.
        overlap_words: usize,
    },

    /// An embedding vector has no components.
    #[error("embedding must have at least one dimension")]
    EmptyEmbedding,
}
