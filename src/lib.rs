//! Conclave: agent orchestration and tool-integration engine.
//!
//! Given a user message inside a multi-agent workspace, the engine decides
//! which agent, tool, or direct answer should handle it, calls tools exposed
//! by remote Model Context Protocol servers, enriches agent prompts with
//! per-agent private knowledge, and keeps a live busy/idle signal for every
//! agent consistent across observers.
//!
//! # Architecture
//!
//! Each bounded context follows hexagonal architecture:
//!
//! - **Domain**: Pure types and invariants with no infrastructure dependencies
//! - **Ports**: Async trait interfaces for external capabilities
//! - **Adapters**: In-memory and HTTP implementations of ports
//! - **Services**: Coordinators built on ports
//!
//! # Modules
//!
//! - [`workspace`]: Read-only workspace roster types
//! - [`knowledge`]: Per-agent knowledge ingestion and retrieval
//! - [`tool_gateway`]: Tool discovery and invocation
//! - [`agent_status`]: Agent status store and broadcast watcher
//! - [`orchestration`]: The workspace orchestrator
//! - [`config`]: Aggregated engine configuration
//! - [`telemetry`]: Tracing subscriber bootstrap

pub mod agent_status;
pub mod config;
pub mod knowledge;
pub mod orchestration;
pub mod telemetry;
pub mod tool_gateway;
pub mod workspace;
