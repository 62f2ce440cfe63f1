//! Live agent busy/idle signal and its broadcast to observers.
//!
//! Chat execution paths write the current status of each agent into an
//! [`services::AgentStatusStore`]. A single [`services::StatusBroadcastWatcher`]
//! polls the store on a fixed interval and publishes only the agents whose
//! status changed since the last successful broadcast.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

pub use services::global_store;
