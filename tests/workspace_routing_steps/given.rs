//! Given steps for workspace routing BDD scenarios.

use super::world::{RoutingWorld, build_workspace};
use conclave::orchestration::domain::{AgentDirective, RoutingDecision};
use conclave::tool_gateway::domain::{ToolDescriptor, ToolServerUrl};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use serde_json::json;

#[given(r#"a workspace with agents "{first}" and "{second}""#)]
fn a_workspace(world: &mut RoutingWorld, first: String, second: String) -> Result<(), eyre::Report> {
    world.workspace = Some(build_workspace(&first, &second, false)?);
    Ok(())
}

#[given(r#"a group chat workspace with agents "{first}" and "{second}""#)]
fn a_group_chat_workspace(
    world: &mut RoutingWorld,
    first: String,
    second: String,
) -> Result<(), eyre::Report> {
    world.workspace = Some(build_workspace(&first, &second, true)?);
    Ok(())
}

#[given(r#""{agent}" owns a tool server exposing "{tool}""#)]
fn agent_owns_tool_server(
    world: &mut RoutingWorld,
    agent: String,
    tool: String,
) -> Result<(), eyre::Report> {
    let owner = world.member(&agent)?;
    let server = ToolServerUrl::new(format!(
        "http://{}-tools.local/mcp",
        agent.to_lowercase()
    ))?;
    let descriptor = ToolDescriptor::new(tool, "", json!({"type": "object"}))?;
    world.tools.set_tool_catalog(server.clone(), vec![descriptor]);
    world
        .directory
        .register(owner.id(), server)
        .wrap_err("register tool server for scenario")?;
    Ok(())
}

#[given(r#"the router looks up order "{order}" with "{tool}" for "{agent}""#)]
fn router_looks_up_order(world: &mut RoutingWorld, order: String, tool: String, agent: String) {
    let arguments = json!({ "orderId": order }).to_string();
    world
        .decisions
        .push(RoutingDecision::invoke_tool(tool, arguments).for_agent(agent));
}

#[given(r#"the router asks "{agent}" to summarize the result"#)]
fn router_asks_agent(world: &mut RoutingWorld, agent: String) {
    world
        .decisions
        .push(RoutingDecision::route_to(agent, "Summarize the result for the user"));
}

#[given(r#"the router asks "{first}" and "{second}" together for an update"#)]
fn router_asks_both(world: &mut RoutingWorld, first: String, second: String) {
    world.decisions.push(
        RoutingDecision::route_to(first, "Share your latest update")
            .also_addressing(AgentDirective::new(second, "Share your latest update")),
    );
}

#[given(r#"the router finally answers "{content}""#)]
fn router_finally_answers(world: &mut RoutingWorld, content: String) {
    world.decisions.push(RoutingDecision::final_answer(content));
}
