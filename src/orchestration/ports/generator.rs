//! Generative text capability.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for text generation.
pub type TextGenerationResult<T> = Result<T, TextGenerationError>;

/// A language model that turns a system and user prompt into text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generates a reply.
    ///
    /// # Errors
    ///
    /// Returns [`TextGenerationError`] when the model cannot be reached or
    /// returns no usable text.
    async fn generate(&self, system_prompt: &str, user_prompt: &str)
    -> TextGenerationResult<String>;
}

/// Errors returned by text generators.
#[derive(Debug, Clone, Error)]
pub enum TextGenerationError {
    /// The model endpoint could not be reached in time.
    #[error("text generation unavailable: {0}")]
    Unavailable(String),

    /// The model answered without usable text.
    #[error("invalid text generation response: {0}")]
    InvalidResponse(String),

    /// Generic adapter failure.
    #[error("text generation error: {0}")]
    Adapter(Arc<dyn std::error::Error + Send + Sync>),
}

impl TextGenerationError {
    /// Wraps an adapter failure.
    pub fn adapter(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Adapter(Arc::new(err))
    }
}
