use crate::helpers::{node_harness, recording_harness, resolve_bootstrap};

use session_core::state::ConnectionStatus;
use session_core::transport::Envelope;
use session_core::{EVENT_SERVER_CLOSED, EVENT_SERVER_STARTED};

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

/// **VALUE**: Verifies observers see Connecting before Connected — never a
/// Disconnected → Connected shortcut.
///
/// **WHY THIS MATTERS**: The UI renders a progress state from Connecting.
/// If the machine skipped it, a slow handshake would look like a dead
/// application until the moment it finished.
///
/// **BUG THIS CATCHES**: Would catch the bootstrap publishing Resolved
/// without first publishing Started, or the reducer collapsing the two
/// transitions into one snapshot.
#[tokio::test]
async fn given_bootstrap_when_watching_status_then_connecting_precedes_connected() {
    // GIVEN: A node that takes 50ms to come up, and a subscriber watching
    let harness = node_harness(Duration::from_millis(50), 5);
    let mut status = harness.tracker.subscribe();
    assert_eq!(status.borrow().status, ConnectionStatus::Disconnected);

    // WHEN: Bootstrapping in the background
    let bootstrap = Arc::clone(&harness.bootstrap);
    let handshake = tokio::spawn(async move { bootstrap.ensure_started().await });

    // THEN: The first observed transition is Connecting
    status.changed().await.expect("Reducer should publish");
    assert_eq!(
        status.borrow().status,
        ConnectionStatus::Connecting,
        "Connecting must be observable before Connected"
    );

    // THEN: The second is Connected
    status.changed().await.expect("Reducer should publish");
    assert_eq!(status.borrow().status, ConnectionStatus::Connected);

    handshake
        .await
        .expect("Handshake task panicked")
        .expect("Bootstrap should resolve");
}

/// **VALUE**: Verifies a channel-closed event from the node drops the
/// status to Disconnected as a status change, not an exception anywhere.
///
/// **WHY THIS MATTERS**: Node exits are expected over the life of the UI
/// process. Every in-flight caller keeps running; the failure travels
/// through the one status snapshot everyone subscribes to.
#[tokio::test]
async fn given_connected_when_node_reports_closed_then_disconnected() {
    // GIVEN: A connected session over a recording host
    let harness = recording_harness(5);
    resolve_bootstrap(&harness).await;
    let mut status = harness.tracker.subscribe();
    status
        .wait_for(|snapshot| snapshot.status == ConnectionStatus::Connected)
        .await
        .expect("Tracker should publish Connected");

    // WHEN: The node announces the channel is going away
    harness
        .host
        .emit(harness.pair.inbound(), &Envelope::event(EVENT_SERVER_CLOSED));

    // THEN: Status drops to Disconnected
    status
        .wait_for(|snapshot| snapshot.status == ConnectionStatus::Disconnected)
        .await
        .expect("Tracker should publish Disconnected");
}

/// **VALUE**: Verifies the account reported with readiness rides in the same
/// snapshot as Connected.
///
/// **BUG THIS CATCHES**: Would catch the readiness payload being dropped on
/// the dispatcher floor, or the account arriving in a separate, later
/// publication than the status it belongs to.
#[tokio::test]
async fn given_readiness_with_account_when_resolved_then_snapshot_carries_account() {
    let harness = recording_harness(5);
    let bootstrap = Arc::clone(&harness.bootstrap);
    let handshake = tokio::spawn(async move { bootstrap.ensure_started().await });

    tokio::time::sleep(Duration::from_millis(20)).await;

    // WHEN: The node reports readiness together with its account
    let mut started = Envelope::event(EVENT_SERVER_STARTED);
    started.payload = json!({ "account": "0xfeed" });
    harness.host.emit(harness.pair.inbound(), &started);

    handshake
        .await
        .expect("Handshake task panicked")
        .expect("Bootstrap should resolve");

    // THEN: One snapshot holds both
    let mut status = harness.tracker.subscribe();
    let snapshot = status
        .wait_for(|snapshot| snapshot.status == ConnectionStatus::Connected)
        .await
        .expect("Tracker should publish Connected");
    assert_eq!(snapshot.account.as_deref(), Some("0xfeed"));
}

/// **VALUE**: Verifies a duplicate readiness event after resolution is
/// ignored instead of disturbing the established session.
#[tokio::test]
async fn given_resolved_session_when_duplicate_readiness_then_ignored() {
    let harness = recording_harness(5);
    resolve_bootstrap(&harness).await;
    let session = harness.bootstrap.session().expect("Session should exist");

    // WHEN: The node repeats itself
    harness
        .host
        .emit(harness.pair.inbound(), &Envelope::event(EVENT_SERVER_STARTED));

    // THEN: Same session, still connected
    assert_eq!(
        harness.bootstrap.session().map(|s| s.id()),
        Some(session.id()),
        "Duplicate readiness must not replace the session"
    );
    harness
        .tracker
        .subscribe()
        .wait_for(|snapshot| snapshot.status == ConnectionStatus::Connected)
        .await
        .expect("Status must remain Connected");
}
