//! Tool invocation arguments and results.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// JSON-serializable argument map passed to a tool.
pub type ToolArguments = Map<String, Value>;

/// Outcome of one tool invocation, scoped to a single orchestration step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolInvocationResult {
    /// Name of the invoked tool.
    pub tool_name: String,
    /// Raw payload on success, or the failure description otherwise.
    pub payload: String,
    /// Whether the tool ran successfully.
    pub succeeded: bool,
}

impl ToolInvocationResult {
    /// Creates a successful result.
    #[must_use]
    pub fn success(tool_name: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            payload: payload.into(),
            succeeded: true,
        }
    }

    /// Creates a failed result carrying the error description.
    #[must_use]
    pub fn failure(tool_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            payload: message.into(),
            succeeded: false,
        }
    }
}
