//! Adapter implementations for the tool protocol client port.

mod http;
mod memory;

pub use http::{McpHttpClient, ToolGatewayConfig};
pub use memory::{InMemoryToolServer, RecordedInvocation};
