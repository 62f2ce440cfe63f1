//! Decision context handed to the decision engine on every iteration.

use super::{ConversationId, OrchestrationError};
use crate::workspace::domain::AgentMember;
use minijinja::Environment;
use serde::{Deserialize, Serialize};

const DECISION_PROMPT_TEMPLATE: &str = r#"You coordinate the agents of a workspace.
Group chat is {% if group_chat_enabled %}enabled: you may address several agents at once through additionalTargets{% else %}disabled: only address agents from the roster{% endif %}.

Roster:
{% for member in roster %}- {{ member.name }} ({{ member.id }})
{% endfor %}
{% if addressed_agent %}The user addressed {{ addressed_agent.name }}.
{% endif %}User message:
{{ user_message }}
{% if history %}
Previous steps:
{% for entry in history %}{% if entry.type == "agent-response" %}- {{ entry.agent_name }} answered: {{ entry.response }}
{% elif entry.type == "agent-error" %}- {{ entry.agent_name }} failed: {{ entry.message }}
{% elif entry.type == "tool-result" %}- tool {{ entry.tool_name }} returned: {{ entry.payload }}
{% elif entry.type == "tool-error" %}- tool {{ entry.tool_name }} failed: {{ entry.message }}
{% endif %}{% endfor %}{% endif %}
This is iteration {{ iteration }}. Reply with one JSON object:
{"kind": "route-to-agent" | "invoke-tool" | "final-answer", "targetAgentName": "...", "instruction": "...", "content": "..."}
For invoke-tool, put the tool name in "instruction" and a JSON object of arguments in "content"."#;

/// Outcome of an earlier step, as presented to the decision engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ContextEntry {
    /// An agent answered.
    AgentResponse {
        /// Responding agent.
        agent_name: String,
        /// Its response.
        response: String,
    },
    /// An agent call failed after retry.
    AgentError {
        /// Agent that failed.
        agent_name: String,
        /// Failure description.
        message: String,
    },
    /// A tool returned a payload.
    ToolResult {
        /// Invoked tool.
        tool_name: String,
        /// Raw payload.
        payload: String,
    },
    /// A tool call failed after retry.
    ToolError {
        /// Invoked tool.
        tool_name: String,
        /// Failure description.
        message: String,
    },
}

/// Everything the decision engine sees when choosing the next step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionContext {
    /// Conversation being resolved.
    pub conversation_id: ConversationId,
    /// The user's message.
    pub user_message: String,
    /// Workspace roster in workspace order.
    pub roster: Vec<AgentMember>,
    /// Whether several agents may be addressed in one run.
    pub group_chat_enabled: bool,
    /// Agent the user addressed, if any.
    pub addressed_agent: Option<AgentMember>,
    /// One-based loop iteration.
    pub iteration: u32,
    /// Outcomes of earlier steps, oldest first.
    pub history: Vec<ContextEntry>,
}

impl DecisionContext {
    /// Renders the context into a routing prompt.
    ///
    /// # Errors
    ///
    /// Returns [`OrchestrationError::PromptRender`] when template rendering
    /// fails.
    pub fn render_prompt(&self) -> Result<String, OrchestrationError> {
        let environment = Environment::new();
        environment
            .render_str(DECISION_PROMPT_TEMPLATE, self)
            .map_err(|err| OrchestrationError::PromptRender(err.to_string()))
    }
}
