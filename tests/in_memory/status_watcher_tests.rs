//! Status store and broadcast watcher wired to the channel publisher.

use conclave::agent_status::{
    adapters::ChannelStatusPublisher,
    domain::{AGENT_STATUS_CHANGED_EVENT, AgentStatus},
    global_store,
    services::{AgentStatusStore, StatusBroadcastWatcher, WatcherConfig, WatcherState},
};
use conclave::workspace::domain::AgentId;
use mockable::DefaultClock;
use rstest::{fixture, rstest};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::error::TryRecvError;
use tokio_util::sync::CancellationToken;

type Watcher = StatusBroadcastWatcher<ChannelStatusPublisher, DefaultClock>;

struct Harness {
    store: Arc<AgentStatusStore<DefaultClock>>,
    publisher: Arc<ChannelStatusPublisher>,
    watcher: Arc<Watcher>,
}

#[fixture]
fn harness() -> Harness {
    let store = Arc::new(AgentStatusStore::new(Arc::new(DefaultClock)));
    let publisher = Arc::new(ChannelStatusPublisher::new());
    let watcher = Arc::new(StatusBroadcastWatcher::new(
        Arc::clone(&store),
        Arc::clone(&publisher),
        WatcherConfig::default(),
    ));
    Harness {
        store,
        publisher,
        watcher,
    }
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn one_change_is_broadcast_once_across_many_polls(harness: Harness) {
    let mut receiver = harness.publisher.subscribe();
    let agent_id = AgentId::new();
    harness.store.set(agent_id, AgentStatus::Busy);
    let cancel = CancellationToken::new();
    let handle = Arc::clone(&harness.watcher).spawn(cancel.clone());

    tokio::time::sleep(Duration::from_secs(45)).await;
    cancel.cancel();
    handle.await.expect("watcher task should join");

    let envelope = receiver.try_recv().expect("one envelope expected");
    assert_eq!(envelope.event, AGENT_STATUS_CHANGED_EVENT);
    assert_eq!(envelope.payload.agent_id, agent_id);
    assert_eq!(envelope.payload.status, AgentStatus::Busy);
    assert!(matches!(receiver.try_recv(), Err(TryRecvError::Empty)));
    assert_eq!(harness.watcher.state(), WatcherState::Stopped);
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn busy_then_idle_between_polls_broadcasts_both(harness: Harness) {
    let mut receiver = harness.publisher.subscribe();
    let agent_id = AgentId::new();
    let cancel = CancellationToken::new();
    let handle = Arc::clone(&harness.watcher).spawn(cancel.clone());

    harness.store.set(agent_id, AgentStatus::Busy);
    tokio::time::sleep(Duration::from_secs(15)).await;
    harness.store.set(agent_id, AgentStatus::Idle);
    tokio::time::sleep(Duration::from_secs(15)).await;
    cancel.cancel();
    handle.await.expect("watcher task should join");

    let first = receiver.try_recv().expect("busy envelope");
    let second = receiver.try_recv().expect("idle envelope");
    assert_eq!(first.payload.status, AgentStatus::Busy);
    assert_eq!(second.payload.status, AgentStatus::Idle);
}

#[rstest]
#[tokio::test]
async fn watcher_without_subscribers_keeps_polling(harness: Harness) {
    harness.store.set(AgentId::new(), AgentStatus::Error);

    let outcome = harness.watcher.poll_once().await;

    assert_eq!(outcome.broadcast, 1);
    assert_eq!(harness.watcher.consecutive_failures(), 0);
    assert_eq!(harness.publisher.subscriber_count(), 0);
}

#[rstest]
fn global_store_is_shared_across_callers() {
    let agent_id = AgentId::new();

    global_store().set(agent_id, AgentStatus::Busy);

    assert!(Arc::ptr_eq(&global_store(), &global_store()));
    let record = global_store().get(agent_id).expect("record written");
    assert_eq!(record.status, AgentStatus::Busy);
}
