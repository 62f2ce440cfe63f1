//! Agent dispatch with knowledge enrichment, retry, and bounded fan-out.

use crate::orchestration::{
    domain::{RoutingDecision, StepOutcome, TraceStep},
    ports::{AgentCompletion, KnowledgeLookup},
};
use crate::workspace::domain::AgentMember;
use mockable::Clock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Calls agents on behalf of the orchestrator.
///
/// Every handle shares the same ports, so one dispatcher can be cloned into
/// concurrent branches without sharing per-request state.
pub(super) struct AgentDispatcher<A, K, C>
where
    A: AgentCompletion,
    K: KnowledgeLookup,
    C: Clock + Send + Sync,
{
    completion: Arc<A>,
    knowledge: Arc<K>,
    clock: Arc<C>,
    call_timeout: Duration,
    retries: u32,
}

impl<A, K, C> Clone for AgentDispatcher<A, K, C>
where
    A: AgentCompletion,
    K: KnowledgeLookup,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            completion: Arc::clone(&self.completion),
            knowledge: Arc::clone(&self.knowledge),
            clock: Arc::clone(&self.clock),
            call_timeout: self.call_timeout,
            retries: self.retries,
        }
    }
}

impl<A, K, C> AgentDispatcher<A, K, C>
where
    A: AgentCompletion,
    K: KnowledgeLookup,
    C: Clock + Send + Sync,
{
    pub(super) const fn new(
        completion: Arc<A>,
        knowledge: Arc<K>,
        clock: Arc<C>,
        call_timeout: Duration,
        retries: u32,
    ) -> Self {
        Self {
            completion,
            knowledge,
            clock,
            call_timeout,
            retries,
        }
    }

    /// Calls one agent and records the outcome as a trace step.
    #[tracing::instrument(skip(self, instruction), fields(agent_id = %agent.id(), agent = %agent.name()))]
    pub(super) async fn dispatch(
        &self,
        agent: &AgentMember,
        instruction: &str,
        iteration: u32,
    ) -> TraceStep {
        let prompt = self.enrich(agent, instruction).await;
        let outcome = match self.complete_with_retry(agent, &prompt).await {
            Ok(response) => StepOutcome::AgentResponse {
                agent_id: agent.id(),
                agent_name: agent.name().as_str().to_owned(),
                instruction: instruction.to_owned(),
                response,
            },
            Err(reason) => StepOutcome::Failed { reason },
        };

        TraceStep {
            iteration,
            decision: RoutingDecision::route_to(agent.name().as_str(), instruction),
            outcome,
            completed_at: self.clock.utc(),
        }
    }

    async fn enrich(&self, agent: &AgentMember, instruction: &str) -> String {
        match self.knowledge.lookup(instruction, agent.id()).await {
            Ok(knowledge) if knowledge.trim().is_empty() => instruction.to_owned(),
            Ok(knowledge) => {
                format!("Relevant knowledge:\n{knowledge}\n\nInstruction:\n{instruction}")
            }
            Err(err) => {
                tracing::warn!(error = %err, "knowledge lookup failed, using bare instruction");
                instruction.to_owned()
            }
        }
    }

    async fn complete_with_retry(&self, agent: &AgentMember, prompt: &str) -> Result<String, String> {
        let mut last_error = String::new();
        for attempt in 0..=self.retries {
            let call = self.completion.complete(agent, prompt);
            match tokio::time::timeout(self.call_timeout, call).await {
                Ok(Ok(response)) => return Ok(response),
                Ok(Err(err)) => last_error = err.to_string(),
                Err(_) => {
                    last_error = format!("agent call timed out after {:?}", self.call_timeout);
                }
            }
            tracing::warn!(attempt, error = %last_error, "agent call failed");
        }
        Err(format!("agent {} failed: {last_error}", agent.name()))
    }
}

impl<A, K, C> AgentDispatcher<A, K, C>
where
    A: AgentCompletion + 'static,
    K: KnowledgeLookup + 'static,
    C: Clock + Send + Sync + 'static,
{
    /// Calls several agents concurrently, at most `max_parallel` at a time.
    ///
    /// Steps are returned in completion order. Each branch builds its own
    /// step; nothing is shared between branches until they are collected.
    pub(super) async fn dispatch_all(
        &self,
        directives: Vec<(AgentMember, String)>,
        iteration: u32,
        max_parallel: usize,
    ) -> Vec<TraceStep> {
        let semaphore = Arc::new(Semaphore::new(max_parallel.max(1)));
        let mut branches = JoinSet::new();
        let mut pending = HashMap::new();

        for (agent, instruction) in directives {
            let dispatcher = self.clone();
            let permits = Arc::clone(&semaphore);
            let branch_agent = agent.clone();
            let branch_instruction = instruction.clone();
            let handle = branches.spawn(async move {
                let _permit = permits.acquire_owned().await;
                dispatcher
                    .dispatch(&branch_agent, &branch_instruction, iteration)
                    .await
            });
            pending.insert(handle.id(), (agent, instruction));
        }

        let mut steps = Vec::with_capacity(pending.len());
        while let Some(joined) = branches.join_next_with_id().await {
            match joined {
                Ok((id, step)) => {
                    pending.remove(&id);
                    steps.push(step);
                }
                Err(err) => {
                    let Some((agent, instruction)) = pending.remove(&err.id()) else {
                        continue;
                    };
                    tracing::error!(agent_id = %agent.id(), error = %err, "agent branch aborted");
                    steps.push(TraceStep {
                        iteration,
                        decision: RoutingDecision::route_to(agent.name().as_str(), &instruction),
                        outcome: StepOutcome::Failed {
                            reason: format!("agent {} branch aborted: {err}", agent.name()),
                        },
                        completed_at: self.clock.utc(),
                    });
                }
            }
        }
        steps
    }
}
