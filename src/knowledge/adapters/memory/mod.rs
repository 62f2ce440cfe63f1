//! In-memory knowledge store.

mod store;

pub use store::InMemoryKnowledgeStore;
