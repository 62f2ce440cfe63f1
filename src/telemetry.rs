//! Tracing subscriber bootstrap for host processes.

use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Errors raised while installing the tracing subscriber.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The fallback filter directive cannot be parsed.
    #[error("invalid log filter '{filter}': {reason}")]
    InvalidFilter {
        /// Directive that failed to parse.
        filter: String,
        /// Parser message.
        reason: String,
    },
    /// A global subscriber is already installed.
    #[error("failed to install tracing subscriber: {0}")]
    AlreadyInitialized(String),
}

/// Installs a formatted tracing subscriber.
///
/// `RUST_LOG` takes precedence; `default_filter` applies when it is unset or
/// invalid.
///
/// # Errors
///
/// Returns [`TelemetryError`] when `default_filter` is invalid or a global
/// subscriber is already set.
pub fn init_tracing(default_filter: &str) -> Result<(), TelemetryError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .map_err(|err| TelemetryError::InvalidFilter {
            filter: default_filter.to_owned(),
            reason: err.to_string(),
        })?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|err| TelemetryError::AlreadyInitialized(err.to_string()))
}
