//! Port contracts consumed by the orchestrator.

mod completion;
mod decision;
mod directory;
mod generator;
mod knowledge;

pub use completion::{AgentCompletion, AgentCompletionError, AgentCompletionResult};
pub use decision::{DecisionEngine, DecisionEngineError, DecisionEngineResult};
pub use directory::{ToolServerDirectory, ToolServerDirectoryError, ToolServerDirectoryResult};
pub use generator::{TextGenerationError, TextGenerationResult, TextGenerator};
pub use knowledge::{KnowledgeLookup, KnowledgeLookupError, KnowledgeLookupResult};
