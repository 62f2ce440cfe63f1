//! Concurrent agent status store.

use crate::agent_status::domain::{AgentStatus, AgentStatusRecord};
use crate::workspace::domain::AgentId;
use dashmap::DashMap;
use mockable::{Clock, DefaultClock};
use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

static GLOBAL_STORE: LazyLock<Arc<AgentStatusStore<DefaultClock>>> =
    LazyLock::new(|| Arc::new(AgentStatusStore::new(Arc::new(DefaultClock))));

/// Returns the process-wide status store.
///
/// The store is created on first use and lives until the process exits.
#[must_use]
pub fn global_store() -> Arc<AgentStatusStore<DefaultClock>> {
    Arc::clone(&GLOBAL_STORE)
}

/// Map of agent id to latest status, safe for concurrent readers and writers.
///
/// Writes are last-writer-wins and strictly ordered per agent id. Records are
/// created on first write and never removed.
#[derive(Debug)]
pub struct AgentStatusStore<C>
where
    C: Clock + Send + Sync,
{
    records: DashMap<AgentId, AgentStatusRecord>,
    clock: Arc<C>,
}

impl<C> AgentStatusStore<C>
where
    C: Clock + Send + Sync,
{
    /// Creates an empty store.
    #[must_use]
    pub fn new(clock: Arc<C>) -> Self {
        Self {
            records: DashMap::new(),
            clock,
        }
    }

    /// Returns the latest record for an agent, if one was ever written.
    #[must_use]
    pub fn get(&self, agent_id: AgentId) -> Option<AgentStatusRecord> {
        self.records.get(&agent_id).map(|entry| *entry.value())
    }

    /// Writes the current status of an agent and returns the stored record.
    pub fn set(&self, agent_id: AgentId, status: AgentStatus) -> AgentStatusRecord {
        let record = AgentStatusRecord {
            agent_id,
            status,
            last_changed: self.clock.utc(),
        };
        self.records.insert(agent_id, record);
        record
    }

    /// Copies every record into an owned map.
    #[must_use]
    pub fn snapshot(&self) -> HashMap<AgentId, AgentStatusRecord> {
        self.records
            .iter()
            .map(|entry| (*entry.key(), *entry.value()))
            .collect()
    }

    /// Returns the number of agents with a recorded status.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` when no status was ever written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
