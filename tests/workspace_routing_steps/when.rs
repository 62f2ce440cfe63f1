//! When steps for workspace routing BDD scenarios.

use super::world::{RoutingWorld, run_async};
use conclave::orchestration::domain::{ChatTurnRequest, ConversationId};
use conclave::workspace::domain::{AgentName, UserId};
use rstest_bdd_macros::when;

fn resolve(world: &mut RoutingWorld, request: &ChatTurnRequest) -> Result<(), eyre::Report> {
    let orchestrator = world.orchestrator()?;
    let workspace = world.workspace()?.clone();
    world.outcome = Some(run_async(orchestrator.resolve(request, &workspace)));
    Ok(())
}

#[when(r#"the user tells "{agent}" "{message}""#)]
fn the_user_tells(world: &mut RoutingWorld, agent: String, message: String) -> Result<(), eyre::Report> {
    let request = ChatTurnRequest::new(ConversationId::new(), message)
        .with_target_agent(AgentName::new(agent)?)
        .with_user(UserId::new("alice"));
    resolve(world, &request)
}

#[when(r#"the user asks the group "{message}""#)]
fn the_user_asks_the_group(world: &mut RoutingWorld, message: String) -> Result<(), eyre::Report> {
    let request =
        ChatTurnRequest::new(ConversationId::new(), message).with_user(UserId::new("alice"));
    resolve(world, &request)
}
