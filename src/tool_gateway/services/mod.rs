//! Application services for tool discovery and invocation.

mod gateway;

pub use gateway::ToolGateway;
