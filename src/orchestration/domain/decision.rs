//! Routing decisions produced by the decision engine.

use super::OrchestrationError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What the orchestrator should do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DecisionKind {
    /// Hand the instruction to a member agent.
    #[serde(alias = "route_to_agent")]
    RouteToAgent,
    /// Call a tool on the target agent's tool server.
    #[serde(alias = "invoke_tool")]
    InvokeTool,
    /// Stop and answer the user.
    #[serde(alias = "final_answer")]
    FinalAnswer,
}

impl DecisionKind {
    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RouteToAgent => "route-to-agent",
            Self::InvokeTool => "invoke-tool",
            Self::FinalAnswer => "final-answer",
        }
    }
}

impl fmt::Display for DecisionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An extra agent addressed in the same group-chat step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentDirective {
    /// Roster name of the agent.
    pub agent_name: String,
    /// Instruction for that agent.
    pub instruction: String,
}

impl AgentDirective {
    /// Creates a directive.
    #[must_use]
    pub fn new(agent_name: impl Into<String>, instruction: impl Into<String>) -> Self {
        Self {
            agent_name: agent_name.into(),
            instruction: instruction.into(),
        }
    }
}

/// Structured output of one decision step.
///
/// For [`DecisionKind::InvokeTool`] the `instruction` names the tool and
/// `content` holds its JSON object arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutingDecision {
    /// Decision kind.
    pub kind: DecisionKind,
    /// Agent the decision applies to, by roster name.
    #[serde(default)]
    pub target_agent_name: Option<String>,
    /// Instruction for the agent, or the tool name.
    #[serde(default)]
    pub instruction: String,
    /// Final answer text, or tool arguments as JSON.
    #[serde(default)]
    pub content: String,
    /// Further agents addressed concurrently in group chat.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub additional_targets: Vec<AgentDirective>,
}

impl RoutingDecision {
    /// Routes an instruction to a named agent.
    #[must_use]
    pub fn route_to(agent_name: impl Into<String>, instruction: impl Into<String>) -> Self {
        Self {
            kind: DecisionKind::RouteToAgent,
            target_agent_name: Some(agent_name.into()),
            instruction: instruction.into(),
            content: String::new(),
            additional_targets: Vec::new(),
        }
    }

    /// Invokes a tool with JSON object arguments.
    #[must_use]
    pub fn invoke_tool(tool_name: impl Into<String>, arguments_json: impl Into<String>) -> Self {
        Self {
            kind: DecisionKind::InvokeTool,
            target_agent_name: None,
            instruction: tool_name.into(),
            content: arguments_json.into(),
            additional_targets: Vec::new(),
        }
    }

    /// Produces the final answer.
    #[must_use]
    pub fn final_answer(content: impl Into<String>) -> Self {
        Self {
            kind: DecisionKind::FinalAnswer,
            target_agent_name: None,
            instruction: String::new(),
            content: content.into(),
            additional_targets: Vec::new(),
        }
    }

    /// Sets the agent the decision applies to.
    #[must_use]
    pub fn for_agent(mut self, agent_name: impl Into<String>) -> Self {
        self.target_agent_name = Some(agent_name.into());
        self
    }

    /// Adds another agent to address in the same step.
    #[must_use]
    pub fn also_addressing(mut self, directive: AgentDirective) -> Self {
        self.additional_targets.push(directive);
        self
    }

    /// Parses a decision from model output.
    ///
    /// Prose or code fences around the first JSON object are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`OrchestrationError::MalformedDecision`] when no JSON object
    /// is present or it does not describe a valid decision.
    pub fn parse_json(raw: &str) -> Result<Self, OrchestrationError> {
        let start = raw.find('{');
        let end = raw.rfind('}');
        let object = match (start, end) {
            (Some(open), Some(close)) if open < close => raw.get(open..=close),
            _ => None,
        }
        .ok_or_else(|| {
            OrchestrationError::MalformedDecision("no JSON object in decision output".to_owned())
        })?;

        serde_json::from_str(object)
            .map_err(|err| OrchestrationError::MalformedDecision(err.to_string()))
    }
}
