//! Aggregated engine configuration.
//!
//! Each context owns its configuration struct; [`EngineConfig`] groups them so
//! a host process can load everything from one serialized document or from
//! `CONCLAVE_*` environment variables.

use crate::agent_status::services::WatcherConfig;
use crate::knowledge::domain::KnowledgeDomainError;
use crate::knowledge::services::KnowledgeConfig;
use crate::orchestration::domain::OrchestrationError;
use crate::orchestration::services::OrchestratorConfig;
use crate::tool_gateway::adapters::ToolGatewayConfig;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;

/// Maximum orchestration iterations.
pub const MAX_ITERATIONS_VAR: &str = "CONCLAVE_MAX_ITERATIONS";
/// Status watcher poll interval in seconds.
pub const STATUS_POLL_SECS_VAR: &str = "CONCLAVE_STATUS_POLL_SECS";
/// Tool server request timeout in seconds.
pub const TOOL_TIMEOUT_SECS_VAR: &str = "CONCLAVE_TOOL_TIMEOUT_SECS";
/// Agents called concurrently in a group-chat step.
pub const MAX_PARALLEL_AGENTS_VAR: &str = "CONCLAVE_MAX_PARALLEL_AGENTS";

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable holds an unusable value.
    #[error("invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        /// Variable name.
        key: &'static str,
        /// Raw value.
        value: String,
        /// Parse or range failure.
        reason: String,
    },
    /// Orchestrator limits are invalid.
    #[error(transparent)]
    Orchestrator(#[from] OrchestrationError),
    /// Chunking settings are invalid.
    #[error(transparent)]
    Knowledge(#[from] KnowledgeDomainError),
}

/// Configuration for every engine component.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Orchestrator loop and fan-out limits.
    pub orchestrator: OrchestratorConfig,
    /// Tool server client settings.
    pub tool_gateway: ToolGatewayConfig,
    /// Ingestion and retrieval settings.
    pub knowledge: KnowledgeConfig,
    /// Status watcher cadence.
    pub watcher: WatcherConfig,
}

impl EngineConfig {
    /// Loads defaults overridden by `CONCLAVE_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable cannot be parsed or the
    /// resulting configuration is invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads defaults overridden by values from `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a value cannot be parsed or the resulting
    /// configuration is invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(max_iterations) = parse_positive::<u32>(&lookup, MAX_ITERATIONS_VAR)? {
            config.orchestrator.max_iterations = max_iterations;
        }
        if let Some(poll_secs) = parse_positive::<u64>(&lookup, STATUS_POLL_SECS_VAR)? {
            config.watcher.poll_interval_secs = poll_secs;
        }
        if let Some(timeout_secs) = parse_positive::<u64>(&lookup, TOOL_TIMEOUT_SECS_VAR)? {
            config.tool_gateway.request_timeout_secs = timeout_secs;
        }
        if let Some(parallel) = parse_positive::<usize>(&lookup, MAX_PARALLEL_AGENTS_VAR)? {
            config.orchestrator.max_parallel_agents = parallel;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validates every component configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for zero limits or inconsistent chunking.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.orchestrator.validate()?;
        self.knowledge.chunking.validate()?;
        Ok(())
    }
}

fn parse_positive<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError>
where
    T: FromStr + Default + PartialEq,
    T::Err: Display,
{
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    let parsed = raw
        .trim()
        .parse::<T>()
        .map_err(|err| ConfigError::InvalidValue {
            key,
            value: raw.clone(),
            reason: err.to_string(),
        })?;
    if parsed == T::default() {
        return Err(ConfigError::InvalidValue {
            key,
            value: raw,
            reason: "must be greater than zero".to_owned(),
        });
    }
    Ok(Some(parsed))
}
