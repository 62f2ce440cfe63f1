//! Workspace orchestrator service.

use super::OrchestratorConfig;
use super::dispatch::AgentDispatcher;
use crate::orchestration::{
    domain::{
        ChatTurnRequest, ContextEntry, DecisionContext, DecisionKind, FinalOrchestrationResult,
        OrchestrationError, OrchestrationFailure, RoutingDecision, StepOutcome, TraceStep,
    },
    ports::{
        AgentCompletion, DecisionEngine, DecisionEngineError, KnowledgeLookup, ToolServerDirectory,
    },
};
use crate::tool_gateway::{
    domain::{ToolArguments, ToolInvocationResult, ToolServerUrl},
    ports::{ToolGatewayError, ToolProtocolClient},
    services::ToolGateway,
};
use crate::workspace::domain::{AgentMember, Workspace};
use mockable::Clock;
use serde_json::Value;
use std::sync::Arc;

/// Resolves chat turns by iterating decide, dispatch, and feed back.
///
/// Each call to [`WorkspaceOrchestrator::resolve`] owns its own trace and
/// history, so one orchestrator can serve many conversations concurrently.
pub struct WorkspaceOrchestrator<D, A, K, G, R, C>
where
    D: DecisionEngine,
    A: AgentCompletion,
    K: KnowledgeLookup,
    G: ToolProtocolClient,
    R: ToolServerDirectory,
    C: Clock + Send + Sync,
{
    decision_engine: Arc<D>,
    dispatcher: AgentDispatcher<A, K, C>,
    gateway: ToolGateway<G>,
    directory: Arc<R>,
    clock: Arc<C>,
    config: OrchestratorConfig,
}

/// Per-run mutable state.
struct RunState {
    trace: Vec<TraceStep>,
    history: Vec<ContextEntry>,
}

impl RunState {
    const fn new() -> Self {
        Self {
            trace: Vec::new(),
            history: Vec::new(),
        }
    }

    fn record(&mut self, step: TraceStep) {
        if let Some(entry) = context_entry(&step) {
            self.history.push(entry);
        }
        self.trace.push(step);
    }

    fn fail(self, error: OrchestrationError) -> OrchestrationFailure {
        OrchestrationFailure::new(error, self.trace)
    }
}

impl<D, A, K, G, R, C> WorkspaceOrchestrator<D, A, K, G, R, C>
where
    D: DecisionEngine,
    A: AgentCompletion + 'static,
    K: KnowledgeLookup + 'static,
    G: ToolProtocolClient,
    R: ToolServerDirectory,
    C: Clock + Send + Sync + 'static,
{
    /// Creates an orchestrator.
    ///
    /// # Errors
    ///
    /// Returns [`OrchestrationError::InvalidConfig`] when the configuration
    /// has a zero iteration budget or fan-out limit.
    pub fn new(
        decision_engine: Arc<D>,
        completion: Arc<A>,
        knowledge: Arc<K>,
        gateway: ToolGateway<G>,
        directory: Arc<R>,
        clock: Arc<C>,
        config: OrchestratorConfig,
    ) -> Result<Self, OrchestrationError> {
        config.validate()?;
        let dispatcher = AgentDispatcher::new(
            completion,
            knowledge,
            Arc::clone(&clock),
            config.agent_call_timeout(),
            config.transient_retries,
        );
        Ok(Self {
            decision_engine,
            dispatcher,
            gateway,
            directory,
            clock,
            config,
        })
    }

    /// Resolves one chat turn against a workspace.
    ///
    /// # Errors
    ///
    /// Returns [`OrchestrationFailure`] carrying the partial trace when the
    /// request is invalid, a decision names an unknown agent or is malformed,
    /// the decision engine fails, or no final answer arrives within
    /// `max_iterations`.
    #[tracing::instrument(
        skip(self, request, workspace),
        fields(conversation_id = %request.conversation_id, workspace_id = %workspace.id())
    )]
    pub async fn resolve(
        &self,
        request: &ChatTurnRequest,
        workspace: &Workspace,
    ) -> Result<FinalOrchestrationResult, OrchestrationFailure> {
        let addressed = validate_request(request, workspace)?;
        let mut run = RunState::new();

        for iteration in 1..=self.config.max_iterations {
            let context = DecisionContext {
                conversation_id: request.conversation_id,
                user_message: request.message.clone(),
                roster: workspace.members().to_vec(),
                group_chat_enabled: workspace.group_chat_enabled(),
                addressed_agent: addressed.clone(),
                iteration,
                history: run.history.clone(),
            };
            let decision = match self.decide(&context).await {
                Ok(decision) => decision,
                Err(err) => return Err(run.fail(err)),
            };
            tracing::debug!(iteration, kind = %decision.kind, "routing decision received");

            match decision.kind {
                DecisionKind::FinalAnswer => {
                    let content = decision.content.clone();
                    run.record(TraceStep {
                        iteration,
                        decision,
                        outcome: StepOutcome::Final {
                            content: content.clone(),
                        },
                        completed_at: self.clock.utc(),
                    });
                    tracing::info!(steps = run.trace.len(), "orchestration finished");
                    return Ok(FinalOrchestrationResult {
                        conversation_id: request.conversation_id,
                        trace: run.trace,
                        content,
                    });
                }
                DecisionKind::RouteToAgent => {
                    match self.route_to_agents(&decision, workspace, iteration).await {
                        Ok(steps) => steps.into_iter().for_each(|step| run.record(step)),
                        Err(err) => return Err(run.fail(err)),
                    }
                }
                DecisionKind::InvokeTool => {
                    match self
                        .invoke_tool(decision, workspace, addressed.as_ref(), iteration)
                        .await
                    {
                        Ok(step) => run.record(step),
                        Err(err) => return Err(run.fail(err)),
                    }
                }
            }
        }

        tracing::warn!(
            max_iterations = self.config.max_iterations,
            "orchestration exceeded iteration budget"
        );
        Err(run.fail(OrchestrationError::LoopExceeded(
            self.config.max_iterations,
        )))
    }

    async fn decide(&self, context: &DecisionContext) -> Result<RoutingDecision, OrchestrationError> {
        let timeout = self.config.decision_timeout();
        let mut last_error = OrchestrationError::DecisionTimeout(timeout);

        for attempt in 0..=self.config.transient_retries {
            let call = self.decision_engine.decide(context);
            last_error = match tokio::time::timeout(timeout, call).await {
                Ok(Ok(decision)) => return Ok(decision),
                Ok(Err(DecisionEngineError::Malformed(reason))) => {
                    return Err(OrchestrationError::MalformedDecision(reason));
                }
                Ok(Err(err)) => OrchestrationError::DecisionEngine(err.to_string()),
                Err(_) => OrchestrationError::DecisionTimeout(timeout),
            };
            tracing::warn!(attempt, error = %last_error, "decision engine call failed");
        }
        Err(last_error)
    }

    async fn route_to_agents(
        &self,
        decision: &RoutingDecision,
        workspace: &Workspace,
        iteration: u32,
    ) -> Result<Vec<TraceStep>, OrchestrationError> {
        let target_name = decision.target_agent_name.as_deref().ok_or_else(|| {
            OrchestrationError::MalformedDecision(
                "route-to-agent decision names no target agent".to_owned(),
            )
        })?;
        let primary = resolve_member(workspace, target_name)?;

        if decision.additional_targets.is_empty() {
            let step = self
                .dispatcher
                .dispatch(primary, &decision.instruction, iteration)
                .await;
            return Ok(vec![step]);
        }

        if !workspace.group_chat_enabled() {
            return Err(OrchestrationError::MalformedDecision(
                "additional targets require group chat".to_owned(),
            ));
        }

        let mut directives = vec![(primary.clone(), decision.instruction.clone())];
        for directive in &decision.additional_targets {
            let member = resolve_member(workspace, &directive.agent_name)?;
            directives.push((member.clone(), directive.instruction.clone()));
        }

        tracing::debug!(agents = directives.len(), "fanning out to group chat agents");
        Ok(self
            .dispatcher
            .dispatch_all(directives, iteration, self.config.max_parallel_agents)
            .await)
    }

    async fn invoke_tool(
        &self,
        decision: RoutingDecision,
        workspace: &Workspace,
        addressed: Option<&AgentMember>,
        iteration: u32,
    ) -> Result<TraceStep, OrchestrationError> {
        if !decision.additional_targets.is_empty() {
            return Err(OrchestrationError::MalformedDecision(
                "additional targets are only valid when routing to agents".to_owned(),
            ));
        }
        let agent = decision.target_agent_name.as_deref().map_or_else(
            || {
                addressed.ok_or_else(|| {
                    OrchestrationError::MalformedDecision(
                        "invoke-tool decision names no agent".to_owned(),
                    )
                })
            },
            |name| resolve_member(workspace, name),
        )?;
        let tool_name = decision.instruction.trim().to_owned();
        if tool_name.is_empty() {
            return Err(OrchestrationError::MalformedDecision(
                "invoke-tool decision names no tool".to_owned(),
            ));
        }
        let arguments = parse_tool_arguments(&decision.content)?;

        let outcome = match self.directory.tool_server_for(agent.id()).await {
            Ok(Some(server)) => {
                StepOutcome::ToolResult(self.call_tool(&server, &tool_name, &arguments).await)
            }
            Ok(None) => StepOutcome::Failed {
                reason: format!("agent {} has no registered tool server", agent.name()),
            },
            Err(err) => StepOutcome::Failed {
                reason: err.to_string(),
            },
        };

        Ok(TraceStep {
            iteration,
            decision,
            outcome,
            completed_at: self.clock.utc(),
        })
    }

    #[tracing::instrument(skip(self, arguments), fields(server = %server))]
    async fn call_tool(
        &self,
        server: &ToolServerUrl,
        tool_name: &str,
        arguments: &ToolArguments,
    ) -> ToolInvocationResult {
        let timeout = self.config.tool_call_timeout();
        let mut attempt = 0;
        loop {
            let call = self.gateway.invoke_tool(server, tool_name, arguments);
            let error = match tokio::time::timeout(timeout, call).await {
                Ok(Ok(payload)) => return ToolInvocationResult::success(tool_name, payload),
                Ok(Err(err)) => err,
                Err(_) => ToolGatewayError::ServerUnreachable {
                    server: server.clone(),
                    reason: format!("tool call timed out after {timeout:?}"),
                },
            };

            if !error.is_transient() || attempt >= self.config.transient_retries {
                tracing::warn!(tool = tool_name, error = %error, "tool invocation failed");
                return ToolInvocationResult::failure(tool_name, error.to_string());
            }
            attempt += 1;
            tracing::debug!(tool = tool_name, attempt, error = %error, "retrying tool invocation");
        }
    }
}

fn validate_request(
    request: &ChatTurnRequest,
    workspace: &Workspace,
) -> Result<Option<AgentMember>, OrchestrationError> {
    if let Some(user) = &request.user_id
        && !workspace.is_authorized(user)
    {
        return Err(OrchestrationError::Unauthorized(user.clone()));
    }

    let addressed = request
        .target_agent
        .as_ref()
        .map(|name| resolve_member(workspace, name.as_str()).cloned())
        .transpose()?;
    if addressed.is_none() && !workspace.group_chat_enabled() {
        return Err(OrchestrationError::MissingTargetAgent);
    }
    Ok(addressed)
}

fn resolve_member<'a>(
    workspace: &'a Workspace,
    name: &str,
) -> Result<&'a AgentMember, OrchestrationError> {
    workspace
        .find_by_name(name)
        .ok_or_else(|| OrchestrationError::UnknownAgent(name.trim().to_owned()))
}

fn parse_tool_arguments(content: &str) -> Result<ToolArguments, OrchestrationError> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Ok(ToolArguments::new());
    }
    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Object(arguments)) => Ok(arguments),
        Ok(_) => Err(OrchestrationError::MalformedDecision(
            "tool arguments must be a JSON object".to_owned(),
        )),
        Err(err) => Err(OrchestrationError::MalformedDecision(format!(
            "tool arguments are not valid JSON: {err}"
        ))),
    }
}

fn context_entry(step: &TraceStep) -> Option<ContextEntry> {
    let decision_agent = || step.decision.target_agent_name.clone().unwrap_or_default();
    match &step.outcome {
        StepOutcome::AgentResponse {
            agent_name,
            response,
            ..
        } => Some(ContextEntry::AgentResponse {
            agent_name: agent_name.clone(),
            response: response.clone(),
        }),
        StepOutcome::ToolResult(result) if result.succeeded => Some(ContextEntry::ToolResult {
            tool_name: result.tool_name.clone(),
            payload: result.payload.clone(),
        }),
        StepOutcome::ToolResult(result) => Some(ContextEntry::ToolError {
            tool_name: result.tool_name.clone(),
            message: result.payload.clone(),
        }),
        StepOutcome::Failed { reason } => match step.decision.kind {
            DecisionKind::InvokeTool => Some(ContextEntry::ToolError {
                tool_name: step.decision.instruction.clone(),
                message: reason.clone(),
            }),
            DecisionKind::RouteToAgent | DecisionKind::FinalAnswer => {
                Some(ContextEntry::AgentError {
                    agent_name: decision_agent(),
                    message: reason.clone(),
                })
            }
        },
        StepOutcome::Final { .. } => None,
    }
}
