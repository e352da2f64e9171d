// Unit tests for the connection lifecycle state machine.
// The transition table is pure and tested exhaustively; the tracker's
// actor/watch plumbing is tested through published snapshots.

use crate::state::{ConnectionEvent, ConnectionStatus, ConnectionTracker, next_status};

use ConnectionStatus::{Connected, Connecting, Disconnected};

fn resolved() -> ConnectionEvent {
    ConnectionEvent::BootstrapResolved {
        account: Some("0xfeed".to_string()),
    }
}

/// **VALUE**: Verifies every transition the machine is designed to make.
///
/// **WHY THIS MATTERS**: The UI renders reachability straight from this
/// table. A wrong edge here shows users "connected" while commands go
/// nowhere, or strands them on a spinner forever.
#[test]
fn given_designed_transitions_when_applied_then_states_advance() {
    assert_eq!(
        next_status(Disconnected, &ConnectionEvent::BootstrapStarted),
        Connecting
    );
    assert_eq!(next_status(Connecting, &resolved()), Connected);
    assert_eq!(
        next_status(Connecting, &ConnectionEvent::BootstrapFailed),
        Disconnected
    );
    assert_eq!(
        next_status(Connected, &ConnectionEvent::ChannelClosed),
        Disconnected
    );
}

/// **VALUE**: Verifies there is no Disconnected → Connected shortcut.
///
/// **WHY THIS MATTERS**: Connected must only ever be reached through an
/// actual handshake. A shortcut would let a stray or replayed resolution
/// event fake reachability.
///
/// **BUG THIS CATCHES**: Would catch the transition table being loosened to
/// key on the event alone instead of the (state, event) pair.
#[test]
fn given_disconnected_when_bootstrap_resolves_then_no_shortcut_to_connected() {
    assert_eq!(
        next_status(Disconnected, &resolved()),
        Disconnected,
        "Resolution without Connecting must not connect"
    );
}

/// **VALUE**: Verifies the function is total — out-of-table combinations
/// keep the current state instead of getting stuck or panicking.
#[test]
fn given_out_of_table_events_when_applied_then_state_unchanged() {
    assert_eq!(
        next_status(Connected, &ConnectionEvent::BootstrapStarted),
        Connected
    );
    assert_eq!(next_status(Connected, &resolved()), Connected);
    assert_eq!(
        next_status(Disconnected, &ConnectionEvent::BootstrapFailed),
        Disconnected
    );
    assert_eq!(
        next_status(Connecting, &ConnectionEvent::BootstrapStarted),
        Connecting
    );
}

/// **VALUE**: Verifies a vanished channel forces Disconnected from every
/// state, including mid-handshake.
#[test]
fn given_any_state_when_channel_closed_then_disconnected() {
    for current in [Disconnected, Connecting, Connected] {
        assert_eq!(
            next_status(current, &ConnectionEvent::ChannelClosed),
            Disconnected,
            "ChannelClosed must force Disconnected from {current:?}"
        );
    }
}

/// **VALUE**: Verifies the tracker publishes status and account as one
/// snapshot, in order, through the watch channel.
///
/// **WHY THIS MATTERS**: Observers must never see a Connected status without
/// its account, or a half-applied transition. The snapshot is the atomic
/// unit of publication.
///
/// **BUG THIS CATCHES**: Would catch the reducer publishing status and value
/// in two separate sends, or dropping the account on resolution.
#[tokio::test]
async fn given_bootstrap_events_when_published_then_snapshots_arrive_atomically() {
    // GIVEN: A fresh tracker and a subscriber
    let tracker = ConnectionTracker::new();
    let mut snapshots = tracker.subscribe();
    assert_eq!(snapshots.borrow().status, Disconnected);

    // WHEN: The bootstrap lifecycle plays out
    tracker.publish(ConnectionEvent::BootstrapStarted);
    snapshots.changed().await.expect("Reducer should be alive");
    assert_eq!(snapshots.borrow().status, Connecting);

    tracker.publish(resolved());
    snapshots.changed().await.expect("Reducer should be alive");

    // THEN: Connected arrives together with its account
    let snapshot = snapshots.borrow().clone();
    assert_eq!(snapshot.status, Connected);
    assert_eq!(
        snapshot.account.as_deref(),
        Some("0xfeed"),
        "Account should ride in the same snapshot as Connected"
    );
}

/// **VALUE**: Verifies the machine can be re-entered after a disconnect —
/// node restarts are expected over the life of the UI process.
#[tokio::test]
async fn given_disconnected_after_close_when_bootstrapped_again_then_reconnects() {
    let tracker = ConnectionTracker::new();
    let mut snapshots = tracker.subscribe();

    for event in [
        ConnectionEvent::BootstrapStarted,
        resolved(),
        ConnectionEvent::ChannelClosed,
        ConnectionEvent::BootstrapStarted,
        resolved(),
    ] {
        tracker.publish(event);
        snapshots.changed().await.expect("Reducer should be alive");
    }

    assert_eq!(
        tracker.snapshot().status,
        Connected,
        "Second bootstrap should connect again"
    );
}
