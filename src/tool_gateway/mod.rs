//! Discovery and invocation of tools exposed by remote tool servers.
//!
//! Tool servers are untrusted, independently versioned processes reached by
//! URL over the Model Context Protocol. The gateway keeps no catalog between
//! calls: every invocation re-lists the server's tools before calling one, so
//! schema changes made between agent configuration updates are always seen.
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - The gateway service in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
