//! Inbound chat turn.

use super::ConversationId;
use crate::workspace::domain::{AgentName, UserId};
use serde::{Deserialize, Serialize};

/// A user message submitted to a workspace.
///
/// `target_agent` may be omitted only when the workspace has group chat
/// enabled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurnRequest {
    /// Conversation the turn belongs to.
    pub conversation_id: ConversationId,
    /// Agent the user addressed, if any.
    pub target_agent: Option<AgentName>,
    /// Free-text user message.
    pub message: String,
    /// Authenticated caller, checked against the workspace when present.
    pub user_id: Option<UserId>,
}

impl ChatTurnRequest {
    /// Creates a request addressed to no particular agent.
    #[must_use]
    pub fn new(conversation_id: ConversationId, message: impl Into<String>) -> Self {
        Self {
            conversation_id,
            target_agent: None,
            message: message.into(),
            user_id: None,
        }
    }

    /// Addresses the request to an agent.
    #[must_use]
    pub fn with_target_agent(mut self, agent: AgentName) -> Self {
        self.target_agent = Some(agent);
        self
    }

    /// Attaches the calling user.
    #[must_use]
    pub fn with_user(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }
}
