//! In-memory tool server for deterministic tests and local flows.

use crate::tool_gateway::{
    domain::{ToolArguments, ToolDescriptor, ToolServerUrl},
    ports::{ToolGatewayError, ToolGatewayResult, ToolProtocolClient},
};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// One recorded `call_tool` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedInvocation {
    /// Server the call was addressed to.
    pub server: ToolServerUrl,
    /// Invoked tool.
    pub tool_name: String,
    /// Arguments supplied by the caller.
    pub arguments: ToolArguments,
}

type ReplyKey = (ToolServerUrl, String);

/// Scriptable tool protocol client backed by in-process state.
///
/// Servers exist once a catalog is registered for them. Replies are queued
/// per tool; the last queued reply repeats once the queue drains, and a tool
/// with no queued reply echoes its arguments as JSON.
#[derive(Debug, Clone, Default)]
pub struct InMemoryToolServer {
    state: Arc<RwLock<InMemoryToolState>>,
}

#[derive(Debug, Default)]
struct InMemoryToolState {
    catalogs: HashMap<ToolServerUrl, Vec<ToolDescriptor>>,
    replies: HashMap<ReplyKey, VecDeque<Result<String, String>>>,
    unreachable: HashSet<ToolServerUrl>,
    list_calls: HashMap<ToolServerUrl, usize>,
    invocations: Vec<RecordedInvocation>,
}

impl InMemoryToolServer {
    /// Creates a server host with no registered servers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, InMemoryToolState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, InMemoryToolState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers or replaces the tool catalog for a server.
    pub fn set_tool_catalog(&self, server: ToolServerUrl, tools: Vec<ToolDescriptor>) {
        self.write().catalogs.insert(server, tools);
    }

    /// Queues a successful reply for a tool.
    pub fn push_success(
        &self,
        server: &ToolServerUrl,
        tool_name: &str,
        payload: impl Into<String>,
    ) {
        self.push_reply(server, tool_name, Ok(payload.into()));
    }

    /// Queues a failing reply for a tool.
    pub fn push_failure(
        &self,
        server: &ToolServerUrl,
        tool_name: &str,
        message: impl Into<String>,
    ) {
        self.push_reply(server, tool_name, Err(message.into()));
    }

    fn push_reply(&self, server: &ToolServerUrl, tool_name: &str, reply: Result<String, String>) {
        self.write()
            .replies
            .entry((server.clone(), tool_name.to_owned()))
            .or_default()
            .push_back(reply);
    }

    /// Toggles whether a server refuses connections.
    pub fn set_unreachable(&self, server: &ToolServerUrl, unreachable: bool) {
        let mut state = self.write();
        if unreachable {
            state.unreachable.insert(server.clone());
        } else {
            state.unreachable.remove(server);
        }
    }

    /// Returns how many listing requests the server received, reachable or not.
    #[must_use]
    pub fn list_calls(&self, server: &ToolServerUrl) -> usize {
        self.read().list_calls.get(server).copied().unwrap_or_default()
    }

    /// Returns every recorded tool call in arrival order.
    #[must_use]
    pub fn invocations(&self) -> Vec<RecordedInvocation> {
        self.read().invocations.clone()
    }

    fn ensure_reachable(
        state: &InMemoryToolState,
        server: &ToolServerUrl,
    ) -> ToolGatewayResult<()> {
        if state.unreachable.contains(server) || !state.catalogs.contains_key(server) {
            return Err(ToolGatewayError::ServerUnreachable {
                server: server.clone(),
                reason: "connection refused".to_owned(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ToolProtocolClient for InMemoryToolServer {
    async fn list_tools(&self, server: &ToolServerUrl) -> ToolGatewayResult<Vec<ToolDescriptor>> {
        let mut state = self.write();
        let calls = state.list_calls.entry(server.clone()).or_default();
        *calls = calls.saturating_add(1);
        Self::ensure_reachable(&state, server)?;
        Ok(state.catalogs.get(server).cloned().unwrap_or_default())
    }

    async fn call_tool(
        &self,
        server: &ToolServerUrl,
        tool_name: &str,
        arguments: &ToolArguments,
    ) -> ToolGatewayResult<String> {
        let mut state = self.write();
        Self::ensure_reachable(&state, server)?;
        state.invocations.push(RecordedInvocation {
            server: server.clone(),
            tool_name: tool_name.to_owned(),
            arguments: arguments.clone(),
        });

        let key = (server.clone(), tool_name.to_owned());
        let reply = match state.replies.get_mut(&key) {
            Some(queue) if queue.len() > 1 => queue.pop_front(),
            Some(queue) => queue.front().cloned(),
            None => None,
        };

        match reply {
            Some(Ok(payload)) => Ok(payload),
            Some(Err(message)) => Err(ToolGatewayError::Invocation {
                tool_name: tool_name.to_owned(),
                message,
            }),
            None => Ok(serde_json::Value::Object(arguments.clone()).to_string()),
        }
    }
}
