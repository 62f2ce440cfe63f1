//! Model Context Protocol client over streamable HTTP.
//!
//! Each gateway operation opens a short-lived protocol session: an
//! `initialize` request (capturing the optional `Mcp-Session-Id` header), the
//! `notifications/initialized` notification, then the actual request. No
//! state survives the operation.

use crate::tool_gateway::{
    domain::{ToolArguments, ToolDescriptor, ToolServerUrl},
    ports::{ToolGatewayError, ToolGatewayResult, ToolProtocolClient},
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

const SESSION_HEADER: &str = "mcp-session-id";
const JSONRPC_VERSION: &str = "2.0";
const MAX_LIST_PAGES: usize = 32;

/// Timeouts and client identity for [`McpHttpClient`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolGatewayConfig {
    /// Upper bound for each HTTP request, in seconds.
    pub request_timeout_secs: u64,
    /// Upper bound for establishing a connection, in seconds.
    pub connect_timeout_secs: u64,
    /// Protocol revision announced during `initialize`.
    pub protocol_version: String,
    /// Client name announced during `initialize`.
    pub client_name: String,
}

impl Default for ToolGatewayConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 15,
            connect_timeout_secs: 5,
            protocol_version: "2025-03-26".to_owned(),
            client_name: env!("CARGO_PKG_NAME").to_owned(),
        }
    }
}

impl ToolGatewayConfig {
    /// Returns the per-request timeout.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Returns the connect timeout.
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

#[derive(Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<u64>,
    method: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    params: Option<Value>,
}

#[derive(Deserialize)]
struct JsonRpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<JsonRpcError>,
}

#[derive(Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListToolsResult {
    #[serde(default)]
    tools: Vec<RemoteTool>,
    #[serde(default)]
    next_cursor: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemoteTool {
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    input_schema: Value,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CallToolResult {
    #[serde(default)]
    content: Vec<ContentItem>,
    #[serde(default)]
    structured_content: Option<Value>,
    #[serde(default)]
    is_error: bool,
}

#[derive(Deserialize)]
struct ContentItem {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

/// Outcome of a JSON-RPC exchange before it is mapped to a gateway error.
enum RpcOutcome {
    Result(Value),
    Error { code: i64, message: String },
}

struct Session {
    id: Option<String>,
}

/// Tool protocol client speaking MCP JSON-RPC over HTTP.
#[derive(Debug)]
pub struct McpHttpClient {
    client: reqwest::Client,
    config: ToolGatewayConfig,
    next_id: AtomicU64,
}

impl McpHttpClient {
    /// Builds a client with bounded request and connect timeouts.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`reqwest::Error`] when the HTTP client cannot
    /// be constructed.
    pub fn new(config: ToolGatewayConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .connect_timeout(config.connect_timeout())
            .build()?;
        Ok(Self {
            client,
            config,
            next_id: AtomicU64::new(1),
        })
    }

    fn request_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    async fn open_session(&self, server: &ToolServerUrl) -> ToolGatewayResult<Session> {
        let params = json!({
            "protocolVersion": self.config.protocol_version,
            "capabilities": {},
            "clientInfo": {
                "name": self.config.client_name,
                "version": env!("CARGO_PKG_VERSION"),
            },
        });
        let request = JsonRpcRequest {
            jsonrpc: JSONRPC_VERSION,
            id: Some(self.request_id()),
            method: "initialize",
            params: Some(params),
        };
        let response = self.post(server, None, &request).await?;
        let session = Session {
            id: response
                .headers()
                .get(SESSION_HEADER)
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned),
        };

        match decode_rpc(server, response).await? {
            RpcOutcome::Result(_) => {}
            RpcOutcome::Error { code, message } => {
                return Err(ToolGatewayError::Protocol {
                    server: server.clone(),
                    reason: format!("initialize rejected ({code}): {message}"),
                });
            }
        }

        let notification = JsonRpcRequest {
            jsonrpc: JSONRPC_VERSION,
            id: None,
            method: "notifications/initialized",
            params: None,
        };
        self.post(server, session.id.as_deref(), &notification)
            .await?;
        Ok(session)
    }

    async fn call(
        &self,
        server: &ToolServerUrl,
        session: &Session,
        method: &str,
        params: Value,
    ) -> ToolGatewayResult<RpcOutcome> {
        let request = JsonRpcRequest {
            jsonrpc: JSONRPC_VERSION,
            id: Some(self.request_id()),
            method,
            params: Some(params),
        };
        let response = self.post(server, session.id.as_deref(), &request).await?;
        decode_rpc(server, response).await
    }

    async fn post(
        &self,
        server: &ToolServerUrl,
        session_id: Option<&str>,
        body: &JsonRpcRequest<'_>,
    ) -> ToolGatewayResult<reqwest::Response> {
        let mut request = self
            .client
            .post(server.as_str())
            .header(reqwest::header::ACCEPT, "application/json, text/event-stream")
            .json(body);
        if let Some(id) = session_id {
            request = request.header(SESSION_HEADER, id);
        }

        let response = request
            .send()
            .await
            .map_err(|err| unreachable_error(server, &err))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ToolGatewayError::ServerUnreachable {
                server: server.clone(),
                reason: format!("HTTP {status} for {}", body.method),
            });
        }
        Ok(response)
    }
}

fn unreachable_error(server: &ToolServerUrl, err: &reqwest::Error) -> ToolGatewayError {
    let reason = if err.is_timeout() {
        format!("request timed out: {err}")
    } else {
        err.to_string()
    };
    ToolGatewayError::ServerUnreachable {
        server: server.clone(),
        reason,
    }
}

fn protocol_error(server: &ToolServerUrl, reason: impl Into<String>) -> ToolGatewayError {
    ToolGatewayError::Protocol {
        server: server.clone(),
        reason: reason.into(),
    }
}

async fn decode_rpc(
    server: &ToolServerUrl,
    response: reqwest::Response,
) -> ToolGatewayResult<RpcOutcome> {
    let is_event_stream = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("text/event-stream"));
    let body = response
        .text()
        .await
        .map_err(|err| unreachable_error(server, &err))?;

    let envelope = if is_event_stream {
        last_event_payload(&body)
            .ok_or_else(|| protocol_error(server, "event stream carried no JSON-RPC response"))?
    } else {
        serde_json::from_str::<JsonRpcResponse>(&body)
            .map_err(|err| protocol_error(server, err.to_string()))?
    };

    match (envelope.result, envelope.error) {
        (_, Some(error)) => Ok(RpcOutcome::Error {
            code: error.code,
            message: error.message,
        }),
        (Some(result), None) => Ok(RpcOutcome::Result(result)),
        (None, None) => Err(protocol_error(server, "response has neither result nor error")),
    }
}

fn last_event_payload(body: &str) -> Option<JsonRpcResponse> {
    body.lines()
        .filter_map(|line| line.strip_prefix("data:"))
        .filter_map(|data| serde_json::from_str::<JsonRpcResponse>(data.trim()).ok())
        .filter(|message| message.result.is_some() || message.error.is_some())
        .next_back()
}

fn payload_from(result: CallToolResult) -> String {
    let texts: Vec<String> = result
        .content
        .into_iter()
        .filter(|item| item.kind == "text")
        .filter_map(|item| item.text)
        .collect();
    if texts.is_empty() {
        return result
            .structured_content
            .map(|value| value.to_string())
            .unwrap_or_default();
    }
    texts.join("\n")
}

#[async_trait]
impl ToolProtocolClient for McpHttpClient {
    #[tracing::instrument(skip(self), fields(server = %server))]
    async fn list_tools(&self, server: &ToolServerUrl) -> ToolGatewayResult<Vec<ToolDescriptor>> {
        let session = self.open_session(server).await?;
        let mut descriptors = Vec::new();
        let mut cursor: Option<String> = None;

        for _ in 0..MAX_LIST_PAGES {
            let params = cursor
                .as_ref()
                .map_or_else(|| json!({}), |next| json!({ "cursor": next }));
            let page = match self.call(server, &session, "tools/list", params).await? {
                RpcOutcome::Result(value) => serde_json::from_value::<ListToolsResult>(value)
                    .map_err(|err| protocol_error(server, err.to_string()))?,
                RpcOutcome::Error { code, message } => {
                    return Err(protocol_error(
                        server,
                        format!("tools/list rejected ({code}): {message}"),
                    ));
                }
            };

            for tool in page.tools {
                let descriptor = ToolDescriptor::new(
                    tool.name,
                    tool.description.unwrap_or_default(),
                    tool.input_schema,
                )
                .map_err(|err| protocol_error(server, err.to_string()))?;
                descriptors.push(descriptor);
            }

            match page.next_cursor {
                Some(next) if !next.is_empty() => cursor = Some(next),
                _ => {
                    tracing::debug!(tools = descriptors.len(), "tools listed");
                    return Ok(descriptors);
                }
            }
        }

        Err(protocol_error(
            server,
            format!("tools/list still paginating after {MAX_LIST_PAGES} pages"),
        ))
    }

    #[tracing::instrument(skip(self, arguments), fields(server = %server))]
    async fn call_tool(
        &self,
        server: &ToolServerUrl,
        tool_name: &str,
        arguments: &ToolArguments,
    ) -> ToolGatewayResult<String> {
        let session = self.open_session(server).await?;
        let params = json!({ "name": tool_name, "arguments": arguments });

        match self.call(server, &session, "tools/call", params).await? {
            RpcOutcome::Error { message, .. } => Err(ToolGatewayError::Invocation {
                tool_name: tool_name.to_owned(),
                message,
            }),
            RpcOutcome::Result(value) => {
                let result = serde_json::from_value::<CallToolResult>(value)
                    .map_err(|err| protocol_error(server, err.to_string()))?;
                let failed = result.is_error;
                let payload = payload_from(result);
                if failed {
                    return Err(ToolGatewayError::Invocation {
                        tool_name: tool_name.to_owned(),
                        message: payload,
                    });
                }
                Ok(payload)
            }
        }
    }
}
