//! Domain model for orchestration runs.

mod context;
mod decision;
mod error;
mod ids;
mod request;
mod trace;

pub use context::{ContextEntry, DecisionContext};
pub use decision::{AgentDirective, DecisionKind, RoutingDecision};
pub use error::{OrchestrationError, OrchestrationFailure};
pub use ids::ConversationId;
pub use request::ChatTurnRequest;
pub use trace::{FinalOrchestrationResult, StepOutcome, TraceStep, TranscriptEntry};
