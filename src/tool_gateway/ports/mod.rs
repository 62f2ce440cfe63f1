//! Port contracts for tool server communication.

mod client;

pub use client::{ToolGatewayError, ToolGatewayResult, ToolProtocolClient};
