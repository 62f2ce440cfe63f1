//! OpenAI-compatible chat completions adapter.

use crate::orchestration::ports::{TextGenerationError, TextGenerationResult, TextGenerator};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Connection settings for [`ChatCompletionsClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatCompletionsConfig {
    /// Base URL such as `https://api.example.com/v1`; `/chat/completions` is
    /// appended.
    pub base_url: String,
    /// Model identifier sent with each request.
    pub model: String,
    /// Optional bearer token.
    pub api_key: Option<String>,
    /// Upper bound for a single request.
    pub timeout: Duration,
}

impl ChatCompletionsConfig {
    /// Creates a configuration with a 60 second timeout and no API key.
    #[must_use]
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            model: model.into(),
            api_key: None,
            timeout: Duration::from_secs(60),
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

/// Text generator backed by a remote `/chat/completions` endpoint.
#[derive(Debug, Clone)]
pub struct ChatCompletionsClient {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

impl ChatCompletionsClient {
    /// Builds a client with its own HTTP connection pool.
    ///
    /// # Errors
    ///
    /// Returns [`TextGenerationError::Adapter`] when the HTTP client cannot be
    /// constructed.
    pub fn new(config: ChatCompletionsConfig) -> TextGenerationResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(TextGenerationError::adapter)?;
        Ok(Self {
            client,
            endpoint: format!(
                "{}/chat/completions",
                config.base_url.trim_end_matches('/')
            ),
            model: config.model,
            api_key: config.api_key,
        })
    }
}

#[async_trait]
impl TextGenerator for ChatCompletionsClient {
    #[tracing::instrument(skip_all, fields(endpoint = %self.endpoint, model = %self.model))]
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> TextGenerationResult<String> {
        let body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
        };
        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request
            .send()
            .await
            .map_err(|err| TextGenerationError::Unavailable(err.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(TextGenerationError::Unavailable(format!(
                "chat completions endpoint returned HTTP {status}"
            )));
        }

        let reply: ChatResponse = response
            .json()
            .await
            .map_err(|err| TextGenerationError::InvalidResponse(err.to_string()))?;
        reply
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| {
                TextGenerationError::InvalidResponse("response carried no text".to_owned())
            })
    }
}
