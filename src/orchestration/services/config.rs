//! Orchestrator configuration.

use crate::orchestration::domain::OrchestrationError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Iteration budget, timeouts, and fan-out limits for orchestration runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// Maximum decision iterations before a run fails.
    pub max_iterations: u32,
    /// Upper bound for one decision engine call, in seconds.
    pub decision_timeout_secs: u64,
    /// Upper bound for one agent completion call, in seconds.
    pub agent_call_timeout_secs: u64,
    /// Upper bound for one tool invocation, in seconds.
    pub tool_call_timeout_secs: u64,
    /// Agents called concurrently during a group-chat step.
    pub max_parallel_agents: usize,
    /// Automatic retries after a transient agent, tool, or decision failure.
    pub transient_retries: u32,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_iterations: 8,
            decision_timeout_secs: 30,
            agent_call_timeout_secs: 60,
            tool_call_timeout_secs: 30,
            max_parallel_agents: 4,
            transient_retries: 1,
        }
    }
}

impl OrchestratorConfig {
    /// Returns a copy with a different iteration budget.
    #[must_use]
    pub const fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Returns a copy with a different fan-out limit.
    #[must_use]
    pub const fn with_max_parallel_agents(mut self, max_parallel_agents: usize) -> Self {
        self.max_parallel_agents = max_parallel_agents;
        self
    }

    /// Checks that limits are usable.
    ///
    /// # Errors
    ///
    /// Returns [`OrchestrationError::InvalidConfig`] when the iteration
    /// budget or fan-out limit is zero.
    pub fn validate(&self) -> Result<(), OrchestrationError> {
        if self.max_iterations == 0 {
            return Err(OrchestrationError::InvalidConfig(
                "max_iterations must be greater than zero".to_owned(),
            ));
        }
        if self.max_parallel_agents == 0 {
            return Err(OrchestrationError::InvalidConfig(
                "max_parallel_agents must be greater than zero".to_owned(),
            ));
        }
        Ok(())
    }

    /// Returns the decision engine timeout.
    #[must_use]
    pub const fn decision_timeout(&self) -> Duration {
        Duration::from_secs(self.decision_timeout_secs)
    }

    /// Returns the agent completion timeout.
    #[must_use]
    pub const fn agent_call_timeout(&self) -> Duration {
        Duration::from_secs(self.agent_call_timeout_secs)
    }

    /// Returns the tool invocation timeout.
    #[must_use]
    pub const fn tool_call_timeout(&self) -> Duration {
        Duration::from_secs(self.tool_call_timeout_secs)
    }
}
