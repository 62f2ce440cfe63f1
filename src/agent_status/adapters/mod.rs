//! Adapter implementations for the status publisher port.

mod channel;

pub use channel::ChannelStatusPublisher;
