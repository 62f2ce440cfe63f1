//! Orchestrator behaviour tests over scripted ports.

mod support;
