//! Tool protocol client port.

use crate::tool_gateway::domain::{ToolArguments, ToolDescriptor, ToolServerUrl};
use async_trait::async_trait;
use thiserror::Error;

/// Result type for tool gateway operations.
pub type ToolGatewayResult<T> = Result<T, ToolGatewayError>;

/// Wire-level contract for talking to one tool server.
///
/// Implementations must bound every request with a timeout and report an
/// expired timeout as [`ToolGatewayError::ServerUnreachable`].
#[async_trait]
pub trait ToolProtocolClient: Send + Sync {
    /// Lists the tools the server currently exposes.
    async fn list_tools(&self, server: &ToolServerUrl) -> ToolGatewayResult<Vec<ToolDescriptor>>;

    /// Calls a tool and returns its textual payload.
    async fn call_tool(
        &self,
        server: &ToolServerUrl,
        tool_name: &str,
        arguments: &ToolArguments,
    ) -> ToolGatewayResult<String>;
}

/// Errors returned by tool protocol clients and the gateway service.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ToolGatewayError {
    /// The server could not be reached, timed out, or refused the request.
    #[error("tool server {server} is unreachable: {reason}")]
    ServerUnreachable {
        /// Server endpoint.
        server: ToolServerUrl,
        /// Connection failure detail.
        reason: String,
    },

    /// The tool is not part of the server's current capability set.
    #[error("tool '{tool_name}' is not exposed by {server}")]
    ToolNotFound {
        /// Server endpoint.
        server: ToolServerUrl,
        /// Requested tool.
        tool_name: String,
    },

    /// The tool ran but reported a failure.
    #[error("tool '{tool_name}' failed: {message}")]
    Invocation {
        /// Invoked tool.
        tool_name: String,
        /// Error message captured from the remote server.
        message: String,
    },

    /// The server answered with a payload that violates the protocol.
    #[error("protocol error from {server}: {reason}")]
    Protocol {
        /// Server endpoint.
        server: ToolServerUrl,
        /// Decoding failure detail.
        reason: String,
    },
}

impl ToolGatewayError {
    /// Returns `true` for failures worth one automatic retry.
    ///
    /// Only connection failures qualify. A tool that ran and reported an
    /// error may already have had side effects, so it is never re-run.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::ServerUnreachable { .. })
    }
}
