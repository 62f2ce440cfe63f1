//! Adapter implementations for orchestration ports.

mod chat_completions;
mod directory;
mod persona;
mod prompted;

pub use chat_completions::{ChatCompletionsClient, ChatCompletionsConfig};
pub use directory::InMemoryToolServerDirectory;
pub use persona::PersonaCompletion;
pub use prompted::PromptedDecisionEngine;
