//! Orchestration services.

mod config;
mod dispatch;
mod orchestrator;

pub use config::OrchestratorConfig;
pub use orchestrator::WorkspaceOrchestrator;
