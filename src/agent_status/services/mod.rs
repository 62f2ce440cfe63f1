//! Status storage and the broadcast watcher loop.

mod store;
mod watcher;

pub use store::{AgentStatusStore, global_store};
pub use watcher::{PollOutcome, StatusBroadcastWatcher, WatcherConfig, WatcherState};
