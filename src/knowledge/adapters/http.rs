//! OpenAI-compatible embeddings endpoint adapter.

use crate::knowledge::{
    domain::Embedding,
    ports::{Embedder, EmbedderError, EmbedderResult},
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Connection settings for [`HttpEmbedder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpEmbedderConfig {
    /// Base URL such as `https://api.example.com/v1`; `/embeddings` is appended.
    pub base_url: String,
    /// Model identifier sent with each request.
    pub model: String,
    /// Optional bearer token.
    pub api_key: Option<String>,
    /// Upper bound for a single request.
    pub timeout: Duration,
}

impl HttpEmbedderConfig {
    /// Creates a configuration with a 20 second timeout and no API key.
    #[must_use]
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            model: model.into(),
            api_key: None,
            timeout: Duration::from_secs(20),
        }
    }

    /// Sets the bearer token.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Embedder backed by a remote `/embeddings` endpoint.
#[derive(Debug, Clone)]
pub struct HttpEmbedder {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingDatum>,
}

#[derive(Deserialize)]
struct EmbeddingDatum {
    index: usize,
    embedding: Vec<f32>,
}

impl HttpEmbedder {
    /// Builds an embedder with its own HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`EmbedderError::Adapter`] when the HTTP client cannot be
    /// constructed.
    pub fn new(config: HttpEmbedderConfig) -> EmbedderResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(EmbedderError::adapter)?;
        Ok(Self {
            client,
            endpoint: format!("{}/embeddings", config.base_url.trim_end_matches('/')),
            model: config.model,
            api_key: config.api_key,
        })
    }
}

#[async_trait]
impl Embedder for HttpEmbedder {
    #[tracing::instrument(skip_all, fields(endpoint = %self.endpoint, inputs = texts.len()))]
    async fn embed(&self, texts: &[String]) -> EmbedderResult<Vec<Embedding>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let mut request = self.client.post(&self.endpoint).json(&EmbeddingRequest {
            model: &self.model,
            input: texts,
        });
        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request
            .send()
            .await
            .map_err(|err| EmbedderError::Unavailable(err.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(EmbedderError::Unavailable(format!(
                "embedding endpoint returned HTTP {status}"
            )));
        }

        let mut body: EmbeddingResponse = response
            .json()
            .await
            .map_err(|err| EmbedderError::InvalidResponse(err.to_string()))?;
        if body.data.len() != texts.len() {
            return Err(EmbedderError::InvalidResponse(format!(
                "expected {} embeddings, received {}",
                texts.len(),
                body.data.len()
            )));
        }

        body.data.sort_by_key(|datum| datum.index);
        body.data
            .into_iter()
            .map(|datum| {
                Embedding::new(datum.embedding)
                    .map_err(|err| EmbedderError::InvalidResponse(err.to_string()))
            })
            .collect()
    }
}
