//! Per-agent private knowledge: ingestion and similarity retrieval.
//!
//! Documents are split into overlapping word windows, embedded, and stored as
//! chunks owned by exactly one agent. Retrieval embeds the query and ranks
//! only the chunks of the requesting agent, so knowledge never crosses agent
//! boundaries. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Ingestion and retrieval in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
