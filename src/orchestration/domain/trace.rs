//! Orchestration trace and final result.

use super::{ConversationId, RoutingDecision};
use crate::tool_gateway::domain::ToolInvocationResult;
use crate::workspace::domain::AgentId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of dispatching one decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum StepOutcome {
    /// An agent answered an instruction.
    AgentResponse {
        /// Responding agent.
        agent_id: AgentId,
        /// Roster name of the agent.
        agent_name: String,
        /// Instruction the agent received.
        instruction: String,
        /// The agent's response.
        response: String,
    },
    /// A tool was invoked.
    ToolResult(ToolInvocationResult),
    /// The step failed after retries; the run continued.
    Failed {
        /// Failure description fed back to the decision engine.
        reason: String,
    },
    /// The run produced its final answer.
    Final {
        /// Final answer text.
        content: String,
    },
}

/// One recorded step of an orchestration run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceStep {
    /// One-based loop iteration that produced the step.
    pub iteration: u32,
    /// Decision that was dispatched.
    pub decision: RoutingDecision,
    /// What happened.
    pub outcome: StepOutcome,
    /// When the step finished.
    pub completed_at: DateTime<Utc>,
}

/// Agent instruction/response pair for multi-party transcripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranscriptEntry<'a> {
    /// Responding agent.
    pub agent_id: AgentId,
    /// Roster name of the agent.
    pub agent_name: &'a str,
    /// Instruction the agent received.
    pub instruction: &'a str,
    /// The agent's response.
    pub response: &'a str,
}

/// Result of a completed run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalOrchestrationResult {
    /// Conversation the run belongs to.
    pub conversation_id: ConversationId,
    /// Every step in completion order, ending with the final answer.
    pub trace: Vec<TraceStep>,
    /// Final answer text.
    pub content: String,
}

impl FinalOrchestrationResult {
    /// Returns agent responses in trace order.
    #[must_use]
    pub fn agent_transcript(&self) -> Vec<TranscriptEntry<'_>> {
        self.trace
            .iter()
            .filter_map(|step| match &step.outcome {
                StepOutcome::AgentResponse {
                    agent_id,
                    agent_name,
                    instruction,
                    response,
                } => Some(TranscriptEntry {
                    agent_id: *agent_id,
                    agent_name,
                    instruction,
                    response,
                }),
                _ => None,
            })
            .collect()
    }
}
