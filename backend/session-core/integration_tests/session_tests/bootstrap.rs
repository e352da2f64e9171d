use crate::helpers::{node_harness, recording_harness, resolve_bootstrap};

use session_core::error::session::SessionError;
use session_core::state::ConnectionStatus;
use session_core::transport::Envelope;
use session_core::{EVENT_SERVER_STARTED, METHOD_START_SERVER};

use std::sync::Arc;
use std::time::Duration;

/// **VALUE**: Verifies the happy path end to end: start signal out,
/// readiness event back after a node-like delay, session resolved, status
/// Connected.
///
/// **WHY THIS MATTERS**: This is the one flow every launch of the
/// application depends on. If the handshake cannot complete against a
/// well-behaved node, nothing else in the crate matters.
///
/// **BUG THIS CATCHES**: Would catch the waiter being armed after the start
/// signal, the readiness event being routed past the waiter, or the
/// timeout firing on the success path.
#[tokio::test]
async fn given_node_ready_after_50ms_when_bootstrapped_then_connected_within_timeout() {
    // GIVEN: A node that answers readiness 50ms after the start signal
    let harness = node_harness(Duration::from_millis(50), 5);

    // WHEN: Bootstrapping
    let session = harness
        .bootstrap
        .ensure_started()
        .await
        .expect("Bootstrap should resolve within the timeout window");

    // THEN: A session exists and the published status reaches Connected
    harness
        .tracker
        .subscribe()
        .wait_for(|snapshot| snapshot.status == ConnectionStatus::Connected)
        .await
        .expect("Tracker should publish Connected");
    assert_eq!(
        harness.bootstrap.session().map(|s| s.id()),
        Some(session.id()),
        "Resolved session should be retrievable from the bootstrap"
    );
}

/// **VALUE**: Verifies bootstrap is single-flight: two calls racing before
/// resolution share one handshake and exactly one start signal is sent.
///
/// **WHY THIS MATTERS**: A second `startZChainServer` would spawn a second
/// node window in the real host. The single-flight contract is what makes
/// the bootstrap API safe to call from anywhere in the UI without
/// coordination.
///
/// **BUG THIS CATCHES**: Would catch the in-flight slot being checked and
/// set non-atomically, or failure handling clearing a handshake that a
/// concurrent caller just started.
#[tokio::test]
async fn given_two_bootstrap_calls_when_first_in_flight_then_single_start_sent() {
    // GIVEN: A harness where the test plays the node
    let harness = recording_harness(5);
    let host = Arc::clone(&harness.host);
    let inbound = harness.pair.inbound().to_string();

    // WHEN: Two callers race, and the node answers shortly after
    let first = harness.bootstrap.ensure_started();
    let second = harness.bootstrap.ensure_started();
    let node = async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        host.emit(&inbound, &Envelope::event(EVENT_SERVER_STARTED));
    };

    let (first, second, ()) = tokio::join!(first, second, node);

    // THEN: Both callers share the one resolved session
    let first = first.expect("First caller should resolve");
    let second = second.expect("Second caller should resolve");
    assert_eq!(first.id(), second.id(), "Callers must share one session");

    // THEN: Exactly one start signal crossed the wire
    assert_eq!(
        harness
            .host
            .count_method(harness.pair.outbound(), METHOD_START_SERVER),
        1,
        "Concurrent bootstrap calls must not send a second start signal"
    );
}

/// **VALUE**: Verifies a silent node produces `BootstrapTimeout` and leaves
/// the status at Disconnected so the UI can offer a retry.
///
/// **BUG THIS CATCHES**: Would catch the timeout being surfaced as a status
/// of Connecting forever, the spinner-of-death the state machine exists to
/// prevent.
#[tokio::test]
async fn given_silent_node_when_bootstrapped_then_timeout_and_disconnected() {
    // GIVEN: A recorder that never answers
    let harness = recording_harness(1);

    // WHEN: Bootstrapping against silence
    let result = harness.bootstrap.ensure_started().await;

    // THEN: Typed timeout, Disconnected status, no session
    assert!(
        matches!(result, Err(SessionError::BootstrapTimeout { .. })),
        "Silence must surface as BootstrapTimeout"
    );
    harness
        .tracker
        .subscribe()
        .wait_for(|snapshot| snapshot.status == ConnectionStatus::Disconnected)
        .await
        .expect("Tracker should publish Disconnected");
    assert!(
        harness.bootstrap.session().is_none(),
        "No session may exist after a failed handshake"
    );
}

/// **VALUE**: Verifies failure clears the single-flight slot: a retry after
/// a timeout runs a fresh handshake and can succeed.
///
/// **WHY THIS MATTERS**: `BootstrapTimeout` is documented as retryable. If
/// the failed future stayed cached, every retry would return the same
/// stale error until process restart.
#[tokio::test]
async fn given_timed_out_bootstrap_when_retried_then_second_handshake_succeeds() {
    let harness = recording_harness(1);

    // GIVEN: A first attempt that times out
    let first = harness.bootstrap.ensure_started().await;
    assert!(first.is_err(), "First attempt should time out");

    // WHEN: Retrying with the node now answering
    resolve_bootstrap(&harness).await;

    // THEN: Connected, and two start signals total (one per attempt)
    harness
        .tracker
        .subscribe()
        .wait_for(|snapshot| snapshot.status == ConnectionStatus::Connected)
        .await
        .expect("Tracker should publish Connected");
    assert_eq!(
        harness
            .host
            .count_method(harness.pair.outbound(), METHOD_START_SERVER),
        2,
        "Each bootstrap attempt sends exactly one start signal"
    );
}

/// **VALUE**: Verifies a resolved bootstrap is cached for the process: later
/// calls return the same session without touching the wire again.
#[tokio::test]
async fn given_resolved_bootstrap_when_called_again_then_same_session_no_new_start() {
    let harness = node_harness(Duration::from_millis(10), 5);

    let first = harness
        .bootstrap
        .ensure_started()
        .await
        .expect("First call should resolve");
    let second = harness
        .bootstrap
        .ensure_started()
        .await
        .expect("Second call should resolve");

    assert_eq!(
        first.id(),
        second.id(),
        "A resolved session is never recreated silently"
    );
}

/// **VALUE**: Verifies explicit teardown cancels a pending handshake and
/// publishes Disconnected.
///
/// **BUG THIS CATCHES**: Would catch teardown leaking the armed readiness
/// waiter, which would let a late node answer resurrect a session the
/// application already abandoned.
#[tokio::test]
async fn given_pending_handshake_when_teardown_then_cancelled_and_disconnected() {
    let harness = recording_harness(30);
    let bootstrap = Arc::clone(&harness.bootstrap);

    // GIVEN: A handshake waiting on a node that will never answer
    let pending = tokio::spawn(async move { bootstrap.ensure_started().await });
    tokio::time::sleep(Duration::from_millis(50)).await;

    // WHEN: Tearing the session down
    harness.bootstrap.teardown();

    // THEN: The waiter resolves as cancelled, status is Disconnected
    let result = pending.await.expect("Handshake task panicked");
    assert!(
        matches!(result, Err(SessionError::BootstrapCancelled { .. })),
        "Teardown must cancel the pending handshake"
    );

    let mut status = harness.tracker.subscribe();
    status
        .wait_for(|snapshot| snapshot.status == ConnectionStatus::Disconnected)
        .await
        .expect("Tracker should publish Disconnected");
}

/// **VALUE**: Verifies the teardown-then-retry flow ends with the published
/// status agreeing with the session the retry resolved.
///
/// **WHY THIS MATTERS**: Teardown is documented as "the next `ensure_started`
/// runs a fresh handshake", and nothing stops the application from retrying
/// immediately. The retry's session and the published status must not
/// diverge.
///
/// **BUG THIS CATCHES**: Would catch the cancelled handshake publishing a
/// stale failure after the retry already published Started, which drops the
/// machine to Disconnected where the retry's resolution is ignored —
/// `ensure_started` hands out a live session while observers see
/// Disconnected forever.
#[tokio::test]
async fn given_teardown_mid_handshake_when_retried_immediately_then_connected_published() {
    let harness = recording_harness(5);
    let bootstrap = Arc::clone(&harness.bootstrap);

    // GIVEN: A handshake waiting on a node that never answers
    let pending = tokio::spawn(async move { bootstrap.ensure_started().await });
    tokio::time::sleep(Duration::from_millis(20)).await;

    // WHEN: Tearing down and retrying before the cancelled caller wakes,
    // with the node answering the retry shortly after
    harness.bootstrap.teardown();
    let host = Arc::clone(&harness.host);
    let inbound = harness.pair.inbound().to_string();
    let retry = harness.bootstrap.ensure_started();
    let node = async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        host.emit(&inbound, &Envelope::event(EVENT_SERVER_STARTED));
    };
    let (retry, ()) = tokio::join!(retry, node);

    // THEN: The first caller was cancelled, the retry resolved
    let cancelled = pending.await.expect("Handshake task panicked");
    assert!(
        matches!(cancelled, Err(SessionError::BootstrapCancelled { .. })),
        "Teardown must cancel the pending handshake"
    );
    let session = retry.expect("Retry should resolve");

    // THEN: The retry's session is the cached one, and the status it implies
    // is the status observers see
    assert_eq!(
        harness.bootstrap.session().map(|s| s.id()),
        Some(session.id()),
        "Retry must cache its session"
    );
    harness
        .tracker
        .subscribe()
        .wait_for(|snapshot| snapshot.status == ConnectionStatus::Connected)
        .await
        .expect("Published status must agree with the resolved session");
}
