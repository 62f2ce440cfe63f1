//! End-to-end orchestration over the real knowledge engine, prompted
//! decision engine, persona completion, and in-memory tool server.

use super::helpers::{
    ScriptedGenerator, TestKnowledgeService, knowledge_service, member, workspace,
};
use conclave::orchestration::{
    adapters::{InMemoryToolServerDirectory, PersonaCompletion, PromptedDecisionEngine},
    domain::{ChatTurnRequest, ConversationId, OrchestrationError, RoutingDecision, StepOutcome},
    services::{OrchestratorConfig, WorkspaceOrchestrator},
};
use conclave::tool_gateway::{
    adapters::InMemoryToolServer,
    domain::{ToolDescriptor, ToolServerUrl},
    services::ToolGateway,
};
use conclave::workspace::domain::AgentMember;
use mockable::DefaultClock;
use rstest::rstest;
use serde_json::json;
use std::sync::Arc;

type Orchestrator = WorkspaceOrchestrator<
    PromptedDecisionEngine<ScriptedGenerator>,
    PersonaCompletion<ScriptedGenerator>,
    TestKnowledgeService,
    InMemoryToolServer,
    InMemoryToolServerDirectory,
    DefaultClock,
>;

struct Desk {
    sales: AgentMember,
    support: AgentMember,
    router: Arc<ScriptedGenerator>,
    agents: Arc<ScriptedGenerator>,
    tools: Arc<InMemoryToolServer>,
    server: ToolServerUrl,
    knowledge: Arc<TestKnowledgeService>,
}

impl Desk {
    fn new(
        knowledge: TestKnowledgeService,
        decisions: &[RoutingDecision],
        agent_replies: &[&str],
    ) -> Self {
        let router = decisions
            .iter()
            .map(|decision| serde_json::to_string(decision).expect("decision serializes"));
        let server = ToolServerUrl::new("http://orders.local/mcp").expect("valid url");
        let tools = Arc::new(InMemoryToolServer::new());
        tools.set_tool_catalog(
            server.clone(),
            vec![
                ToolDescriptor::new(
                    "lookup-order",
                    "Returns the shipping state of an order",
                    json!({"type": "object", "properties": {"orderId": {"type": "string"}}}),
                )
                .expect("valid tool"),
            ],
        );
        Self {
            sales: member("Sales"),
            support: member("Support"),
            router: Arc::new(ScriptedGenerator::new(router)),
            agents: Arc::new(ScriptedGenerator::new(agent_replies.iter().copied())),
            tools,
            server,
            knowledge: Arc::new(knowledge),
        }
    }

    fn orchestrator(&self) -> Orchestrator {
        let directory = Arc::new(InMemoryToolServerDirectory::new());
        directory
            .register(self.support.id(), self.server.clone())
            .expect("registration should succeed");
        WorkspaceOrchestrator::new(
            Arc::new(PromptedDecisionEngine::new(Arc::clone(&self.router))),
            Arc::new(
                PersonaCompletion::new(Arc::clone(&self.agents))
                    .with_persona(self.support.id(), "You are Support. Be precise."),
            ),
            Arc::clone(&self.knowledge),
            ToolGateway::new(Arc::clone(&self.tools)),
            directory,
            Arc::new(DefaultClock),
            OrchestratorConfig::default(),
        )
        .expect("valid orchestrator config")
    }
}

#[rstest]
#[tokio::test]
async fn order_lookup_flows_through_tool_agent_and_final_answer(
    knowledge_service: TestKnowledgeService,
) {
    let desk = Desk::new(
        knowledge_service,
        &[
            RoutingDecision::invoke_tool("lookup-order", r#"{"orderId": "1042"}"#)
                .for_agent("Support"),
            RoutingDecision::route_to("Support", "Summarize the shipping state of order 1042"),
            RoutingDecision::final_answer("Order 1042 has shipped."),
        ],
        &["Order 1042 shipped on Monday by express courier."],
    );
    desk.knowledge
        .ingest("Express courier parcels arrive within two days.", desk.support.id())
        .await
        .expect("ingest should succeed");
    desk.tools
        .push_success(&desk.server, "lookup-order", r#"{"status": "shipped"}"#);
    let desk_workspace = workspace(vec![desk.sales.clone(), desk.support.clone()], false);
    let request = ChatTurnRequest::new(ConversationId::new(), "Where is order 1042?")
        .with_target_agent(desk.support.name().clone());

    let result = desk
        .orchestrator()
        .resolve(&request, &desk_workspace)
        .await
        .expect("run should succeed");

    assert_eq!(result.content, "Order 1042 has shipped.");
    assert_eq!(result.trace.len(), 3);
    let outcomes: Vec<&StepOutcome> = result.trace.iter().map(|step| &step.outcome).collect();
    assert!(matches!(
        outcomes.first(),
        Some(StepOutcome::ToolResult(tool)) if tool.succeeded && tool.payload.contains("shipped")
    ));
    assert!(matches!(
        outcomes.get(1),
        Some(StepOutcome::AgentResponse { agent_name, .. }) if agent_name == "Support"
    ));

    let invocations = desk.tools.invocations();
    let invocation = invocations.first().expect("tool was invoked");
    assert_eq!(invocation.arguments.get("orderId"), Some(&json!("1042")));

    let agent_prompts = desk.agents.prompts();
    let (system, user) = agent_prompts.first().expect("support was prompted");
    assert_eq!(system, "You are Support. Be precise.");
    assert!(user.contains("Express courier parcels arrive within two days."));

    let router_prompts = desk.router.prompts();
    let (_, last_router_prompt) = router_prompts.last().expect("router was prompted");
    assert!(last_router_prompt.contains(r#"tool lookup-order returned: {"status": "shipped"}"#));
    assert!(last_router_prompt.contains("Support answered: Order 1042 shipped on Monday"));
}

#[rstest]
#[tokio::test]
async fn sales_never_sees_support_knowledge(knowledge_service: TestKnowledgeService) {
    let desk = Desk::new(
        knowledge_service,
        &[
            RoutingDecision::route_to("Sales", "Which internal escalation code applies?"),
            RoutingDecision::final_answer("done"),
        ],
        &["I do not know."],
    );
    desk.knowledge
        .ingest("Internal escalation code is RED-7.", desk.support.id())
        .await
        .expect("ingest should succeed");
    let desk_workspace = workspace(vec![desk.sales.clone(), desk.support.clone()], false);
    let request = ChatTurnRequest::new(ConversationId::new(), "Escalation code?")
        .with_target_agent(desk.sales.name().clone());

    desk.orchestrator()
        .resolve(&request, &desk_workspace)
        .await
        .expect("run should succeed");

    let agent_prompts = desk.agents.prompts();
    assert!(agent_prompts.iter().all(|(_, user)| !user.contains("RED-7")));
}

#[rstest]
#[tokio::test]
async fn prose_from_router_aborts_as_malformed(knowledge_service: TestKnowledgeService) {
    let desk = Desk::new(knowledge_service, &[], &[]);
    let desk = Desk {
        router: Arc::new(ScriptedGenerator::new(["I would ask Support."])),
        ..desk
    };
    let desk_workspace = workspace(vec![desk.sales.clone(), desk.support.clone()], false);
    let request = ChatTurnRequest::new(ConversationId::new(), "Hello")
        .with_target_agent(desk.sales.name().clone());

    let failure = desk
        .orchestrator()
        .resolve(&request, &desk_workspace)
        .await
        .expect_err("prose is not a decision");

    assert!(matches!(failure.error, OrchestrationError::MalformedDecision(_)));
    assert!(failure.trace.is_empty());
    assert_eq!(desk.router.prompts().len(), 1);
}
