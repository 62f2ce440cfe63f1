//! Tool gateway service.

use crate::tool_gateway::{
    domain::{ToolArguments, ToolDescriptor, ToolInvocationResult, ToolServerUrl},
    ports::{ToolGatewayError, ToolGatewayResult, ToolProtocolClient},
};
use std::collections::HashSet;
use std::sync::Arc;

/// Discovers and invokes tools on remote tool servers.
///
/// The gateway is stateless across calls. Each invocation lists the target
/// server's tools first and only calls a tool present in that listing.
#[derive(Debug)]
pub struct ToolGateway<G>
where
    G: ToolProtocolClient,
{
    client: Arc<G>,
}

impl<G> Clone for ToolGateway<G>
where
    G: ToolProtocolClient,
{
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
        }
    }
}

impl<G> ToolGateway<G>
where
    G: ToolProtocolClient,
{
    /// Creates a gateway over a protocol client.
    #[must_use]
    pub const fn new(client: Arc<G>) -> Self {
        Self { client }
    }

    /// Lists the tools a server currently exposes.
    ///
    /// Duplicate names are collapsed, keeping the first descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`ToolGatewayError::ServerUnreachable`] when the server cannot
    /// be contacted, or [`ToolGatewayError::Protocol`] for malformed replies.
    #[tracing::instrument(skip(self), fields(server = %server))]
    pub async fn list_tools(
        &self,
        server: &ToolServerUrl,
    ) -> ToolGatewayResult<Vec<ToolDescriptor>> {
        let listed = self.client.list_tools(server).await?;
        let mut seen = HashSet::new();
        let tools: Vec<ToolDescriptor> = listed
            .into_iter()
            .filter(|tool| {
                let fresh = seen.insert(tool.name().to_owned());
                if !fresh {
                    tracing::debug!(tool = tool.name(), "duplicate tool name ignored");
                }
                fresh
            })
            .collect();
        Ok(tools)
    }

    /// Invokes a tool after confirming the server exposes it.
    ///
    /// # Errors
    ///
    /// Returns [`ToolGatewayError::ToolNotFound`] without calling the server
    /// when the tool is absent from a fresh listing,
    /// [`ToolGatewayError::ServerUnreachable`] for connection failures, and
    /// [`ToolGatewayError::Invocation`] when the tool reports a failure.
    #[tracing::instrument(skip(self, arguments), fields(server = %server))]
    pub async fn invoke_tool(
        &self,
        server: &ToolServerUrl,
        tool_name: &str,
        arguments: &ToolArguments,
    ) -> ToolGatewayResult<String> {
        let tools = self.list_tools(server).await?;
        if !tools.iter().any(|tool| tool.name() == tool_name) {
            tracing::warn!(tool = tool_name, "tool not exposed by server");
            return Err(ToolGatewayError::ToolNotFound {
                server: server.clone(),
                tool_name: tool_name.to_owned(),
            });
        }

        let payload = self.client.call_tool(server, tool_name, arguments).await?;
        tracing::debug!(tool = tool_name, bytes = payload.len(), "tool invoked");
        Ok(payload)
    }

    /// Invokes a tool and folds any failure into the returned result.
    pub async fn invoke(
        &self,
        server: &ToolServerUrl,
        tool_name: &str,
        arguments: &ToolArguments,
    ) -> ToolInvocationResult {
        match self.invoke_tool(server, tool_name, arguments).await {
            Ok(payload) => ToolInvocationResult::success(tool_name, payload),
            Err(err) => ToolInvocationResult::failure(tool_name, err.to_string()),
        }
    }
}
