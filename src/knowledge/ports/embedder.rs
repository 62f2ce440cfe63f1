//! Embedding capability port.

use crate::knowledge::domain::Embedding;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for embedding operations.
pub type EmbedderResult<T> = Result<T, EmbedderError>;

/// Computes dense embeddings for text.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embeds each input text, returning vectors in input order.
    ///
    /// # Errors
    ///
    /// Returns [`EmbedderError`] when the backing model cannot be reached or
    /// returns an unusable response.
    async fn embed(&self, texts: &[String]) -> EmbedderResult<Vec<Embedding>>;
}

/// Errors returned by embedding adapters.
#[derive(Debug, Clone, Error)]
pub enum EmbedderError {
    /// The embedding backend could not be reached in time.
    #[error("embedding backend unavailable: {0}")]
    Unavailable(String),

    /// The backend answered with a payload that cannot be used.
    #[error("invalid embedding response: {0}")]
    InvalidResponse(String),

    /// Generic adapter failure.
    #[error("embedding adapter error: {0}")]
    Adapter(Arc<dyn std::error::Error + Send + Sync>),
}

impl EmbedderError {
    /// Wraps an adapter failure.
    pub fn adapter(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Adapter(Arc::new(err))
    }
}
