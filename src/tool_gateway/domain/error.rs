//! Error types for tool gateway domain validation.

use thiserror::Error;

/// Errors returned while constructing tool gateway domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ToolGatewayDomainError {
    /// The tool server URL is empty.
    #[error("tool server URL must not be empty")]
    EmptyServerUrl,

    /// The tool server URL does not have an `http://` or `https://` prefix.
    #[error("tool server URL '{0}' must start with 'http://' or 'https://'")]
    InvalidServerUrl(String),

    /// A tool name is empty after trimming.
    #[error("tool name must not be empty")]
    EmptyToolName,
}
