//! Workspace orchestration: routing a chat turn to agents and tools.
//!
//! A [`services::WorkspaceOrchestrator`] asks a pluggable decision engine what
//! to do next, dispatches the decision to an agent's completion capability or
//! to a tool server through the tool gateway, feeds the outcome back, and
//! repeats until the engine produces a final answer or the iteration budget
//! runs out.
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - The orchestrator service in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
