//! Port contracts for status broadcasting.

mod publisher;

pub use publisher::{StatusPublishError, StatusPublishResult, StatusPublisher};
