//! Step definitions for workspace routing scenarios.

mod given;
mod then;
mod when;
pub mod world;
