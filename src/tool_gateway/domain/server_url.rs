//! Validated tool server endpoint.

use super::ToolGatewayDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// HTTP(S) endpoint of a tool server.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ToolServerUrl(String);

impl ToolServerUrl {
    /// Creates a validated tool server URL.
    ///
    /// # Errors
    ///
    /// Returns [`ToolGatewayDomainError`] when `value` is empty or does not
    /// start with `http://` or `https://`.
    pub fn new(value: impl Into<String>) -> Result<Self, ToolGatewayDomainError> {
        let normalized = value.into().trim().to_owned();
        if normalized.is_empty() {
            return Err(ToolGatewayDomainError::EmptyServerUrl);
        }

        let has_valid_prefix =
            normalized.starts_with("http://") || normalized.starts_with("https://");
        if !has_valid_prefix {
            return Err(ToolGatewayDomainError::InvalidServerUrl(normalized));
        }

        Ok(Self(normalized))
    }

    /// Returns the URL as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ToolServerUrl {
    type Error = ToolGatewayDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ToolServerUrl> for String {
    fn from(value: ToolServerUrl) -> Self {
        value.0
    }
}

impl fmt::Display for ToolServerUrl {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}
