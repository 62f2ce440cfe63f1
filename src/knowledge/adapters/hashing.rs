//! Deterministic feature-hashing embedder.

use crate::knowledge::{
    domain::{Embedding, l2_normalize},
    ports::{Embedder, EmbedderError, EmbedderResult},
};
use async_trait::async_trait;
use sha2::{Digest, Sha256};

/// Default vector width for [`HashingEmbedder`].
pub const DEFAULT_HASHING_DIMENSIONS: usize = 256;

/// Local bag-of-words embedder using SHA-256 token buckets.
///
/// Each lowercase alphanumeric token is hashed into one of `dimensions`
/// buckets with a hash-derived sign, and the result is L2-normalized. Texts
/// sharing vocabulary land close together, which is enough for offline use
/// and deterministic tests without a model endpoint.
#[derive(Debug, Clone, Copy)]
pub struct HashingEmbedder {
    dimensions: usize,
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self {
            dimensions: DEFAULT_HASHING_DIMENSIONS,
        }
    }
}

impl HashingEmbedder {
    /// Creates an embedder producing vectors of `dimensions` components.
    ///
    /// A width of zero is raised to one.
    #[must_use]
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
        }
    }

    /// Returns the vector width.
    #[must_use]
    pub const fn dimensions(&self) -> usize {
        self.dimensions
    }

    #[expect(clippy::float_arithmetic, reason = "bucket weights accumulate as floats")]
    fn embed_one(&self, text: &str) -> EmbedderResult<Embedding> {
        let mut values = vec![0.0_f32; self.dimensions];
        let width = u64::try_from(self.dimensions).map_err(EmbedderError::adapter)?;

        for token in tokenize(text) {
            let digest = Sha256::digest(token.as_bytes());
            let hash = digest
                .iter()
                .take(8)
                .fold(0_u64, |acc, byte| (acc << 8) | u64::from(*byte));
            let bucket = usize::try_from(hash.checked_rem(width).unwrap_or(0))
                .map_err(EmbedderError::adapter)?;
            let sign = if digest.get(8).is_some_and(|byte| byte & 1 == 1) {
                -1.0
            } else {
                1.0
            };
            if let Some(slot) = values.get_mut(bucket) {
                *slot += sign;
            }
        }

        l2_normalize(&mut values);
        Embedding::new(values).map_err(|err| EmbedderError::InvalidResponse(err.to_string()))
    }
}

fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|character: char| !character.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
}

#[async_trait]
impl Embedder for HashingEmbedder {
    async fn embed(&self, texts: &[String]) -> EmbedderResult<Vec<Embedding>> {
        texts.iter().map(|text| self.embed_one(text)).collect()
    }
}
