//! Domain model for tool servers, tool descriptors, and invocation results.
//!
//! Transport and wire-format concerns remain in adapters.

mod error;
mod invocation;
mod server_url;
mod tool;

pub use error::ToolGatewayDomainError;
pub use invocation::{ToolArguments, ToolInvocationResult};
pub use server_url::ToolServerUrl;
pub use tool::ToolDescriptor;
