//! Adapter implementations for embedding and knowledge storage ports.

pub mod memory;

mod hashing;
mod http;

pub use hashing::{DEFAULT_HASHING_DIMENSIONS, HashingEmbedder};
pub use http::{HttpEmbedder, HttpEmbedderConfig};
