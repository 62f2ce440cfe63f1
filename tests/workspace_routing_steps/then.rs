//! Then steps for workspace routing BDD scenarios.

use super::world::RoutingWorld;
use conclave::orchestration::domain::{
    FinalOrchestrationResult, OrchestrationError, OrchestrationFailure,
};
use rstest_bdd_macros::then;

fn completed(world: &RoutingWorld) -> Result<&FinalOrchestrationResult, eyre::Report> {
    match world.outcome.as_ref() {
        Some(Ok(result)) => Ok(result),
        Some(Err(failure)) => Err(eyre::eyre!("run failed unexpectedly: {failure}")),
        None => Err(eyre::eyre!("no turn was resolved in scenario world")),
    }
}

fn failed(world: &RoutingWorld) -> Result<&OrchestrationFailure, eyre::Report> {
    match world.outcome.as_ref() {
        Some(Err(failure)) => Ok(failure),
        Some(Ok(result)) => Err(eyre::eyre!(
            "expected a failure, got final answer '{}'",
            result.content
        )),
        None => Err(eyre::eyre!("no turn was resolved in scenario world")),
    }
}

#[then(r#"the final answer is "{content}""#)]
fn final_answer_is(world: &RoutingWorld, content: String) -> Result<(), eyre::Report> {
    let result = completed(world)?;
    if result.content != content {
        return Err(eyre::eyre!(
            "expected final answer '{content}', got '{}'",
            result.content
        ));
    }
    Ok(())
}

#[then("the trace records {count:usize} steps")]
fn trace_records_steps(world: &RoutingWorld, count: usize) -> Result<(), eyre::Report> {
    let result = completed(world)?;
    if result.trace.len() != count {
        return Err(eyre::eyre!(
            "expected {count} trace steps, found {}",
            result.trace.len()
        ));
    }
    Ok(())
}

#[then(r#"the tool "{tool}" was invoked {count:usize} times"#)]
fn tool_invoked(world: &RoutingWorld, tool: String, count: usize) -> Result<(), eyre::Report> {
    let invoked = world
        .tools
        .invocations()
        .iter()
        .filter(|invocation| invocation.tool_name == tool)
        .count();
    if invoked != count {
        return Err(eyre::eyre!(
            "expected {count} invocations of '{tool}', found {invoked}"
        ));
    }
    Ok(())
}

#[then(r#"the run fails because agent "{agent}" is unknown"#)]
fn run_fails_unknown_agent(world: &RoutingWorld, agent: String) -> Result<(), eyre::Report> {
    let failure = failed(world)?;
    match &failure.error {
        OrchestrationError::UnknownAgent(name) if *name == agent => Ok(()),
        other => Err(eyre::eyre!("expected unknown agent '{agent}', got {other}")),
    }
}

#[then("no agent was prompted")]
fn no_agent_prompted(world: &RoutingWorld) -> Result<(), eyre::Report> {
    let prompts = world.agents.user_prompts();
    if !prompts.is_empty() {
        return Err(eyre::eyre!("expected no agent prompts, found {}", prompts.len()));
    }
    Ok(())
}

#[then(r#""{first}" and "{second}" were both prompted"#)]
fn both_prompted(world: &RoutingWorld, first: String, second: String) -> Result<(), eyre::Report> {
    let result = completed(world)?;
    let responders: Vec<&str> = result
        .agent_transcript()
        .iter()
        .map(|entry| entry.agent_name)
        .collect();
    for expected in [&first, &second] {
        if !responders.contains(&expected.as_str()) {
            return Err(eyre::eyre!(
                "expected '{expected}' to respond, responders were {responders:?}"
            ));
        }
    }
    Ok(())
}
