//! Overlapping word-window chunking.

use super::KnowledgeDomainError;
use serde::{Deserialize, Serialize};

/// Window configuration for splitting documents.
///
/// # Examples
///
/// ```
/// use conclave::knowledge::domain::{ChunkingConfig, split_into_chunks};
///
/// let config = ChunkingConfig::new(4, 1).unwrap();
/// let chunks = split_into_chunks("one two three four five six seven", &config);
/// assert_eq!(chunks, ["one two three four", "four five six seven"]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    chunk_words: usize,
    overlap_words: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_words: 120,
            overlap_words: 30,
        }
    }
}

impl ChunkingConfig {
    /// Creates a validated chunking configuration.
    ///
    /// # Errors
    ///
    /// Returns [`KnowledgeDomainError::EmptyChunkWindow`] when `chunk_words`
    /// is zero or [`KnowledgeDomainError::OverlapTooLarge`] when the overlap
    /// would prevent the window from advancing.
    pub fn new(chunk_words: usize, overlap_words: usize) -> Result<Self, KnowledgeDomainError> {
        let config = Self {
            chunk_words,
            overlap_words,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks the window invariants; deserialized configs bypass [`Self::new`].
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`Self::new`].
    pub const fn validate(&self) -> Result<(), KnowledgeDomainError> {
        if self.chunk_words == 0 {
            return Err(KnowledgeDomainError::EmptyChunkWindow);
        }
        if self.overlap_words >= self.chunk_words {
            return Err(KnowledgeDomainError::OverlapTooLarge {
                chunk_words: self.chunk_words,
                overlap_words: self.overlap_words,
            });
        }
        Ok(())
    }

    /// Returns the window size in words.
    #[must_use]
    pub const fn chunk_words(&self) -> usize {
        self.chunk_words
    }

    /// Returns the number of words shared by consecutive windows.
    #[must_use]
    pub const fn overlap_words(&self) -> usize {
        self.overlap_words
    }

    const fn stride(&self) -> usize {
        self.chunk_words.saturating_sub(self.overlap_words)
    }
}

/// Splits text into overlapping whitespace-delimited word windows.
///
/// Whitespace inside a window is collapsed to single spaces. Text with no
/// words produces no chunks.
#[must_use]
pub fn split_into_chunks(text: &str, config: &ChunkingConfig) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    let stride = config.stride().max(1);
    let mut chunks = Vec::new();
    let mut start = 0;

    while start < words.len() {
        let end = start.saturating_add(config.chunk_words()).min(words.len());
        if let Some(window) = words.get(start..end) {
            chunks.push(window.join(" "));
        }
        if end == words.len() {
            break;
        }
        start = start.saturating_add(stride);
    }

    chunks
}
