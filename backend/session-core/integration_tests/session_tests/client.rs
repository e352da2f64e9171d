use crate::helpers::{TEST_ADDRESS, recording_harness, resolve_bootstrap};

use session_core::error::session::SessionError;
use session_core::session::ChainClient;
use session_core::{METHOD_INIT, METHOD_START_SERVER};

use std::sync::Arc;

use serde_json::json;

/// **VALUE**: Verifies `connect(address)` sends exactly one `init` envelope
/// with `{address}` as payload, and no other command.
///
/// **WHY THIS MATTERS**: This is the core contract of the façade: for every
/// valid call, one well-formed command on the wire. A duplicated or
/// misnamed command would make the node connect twice or not at all.
///
/// **BUG THIS CATCHES**: Would catch payload shape drift (`addr` vs
/// `address`), a retry loop sneaking into the façade, or the command going
/// out on the wrong channel.
#[tokio::test]
async fn given_connected_session_when_connect_then_single_init_with_address() {
    // GIVEN: A bootstrapped session over a recording host
    let harness = recording_harness(5);
    resolve_bootstrap(&harness).await;
    let client = ChainClient::new(Arc::clone(&harness.bootstrap));

    // WHEN: Connecting to the test address
    client.connect(TEST_ADDRESS).expect("Connect should queue");

    // THEN: Exactly one init was recorded, carrying the address
    let outbound = harness.host.sent_on(harness.pair.outbound());
    let inits: Vec<_> = outbound
        .iter()
        .filter(|envelope| envelope.method == METHOD_INIT)
        .collect();

    assert_eq!(inits.len(), 1, "Exactly one init must be sent");
    assert_eq!(
        inits[0].payload,
        json!({ "address": TEST_ADDRESS }),
        "Payload must be exactly {{address}}"
    );
    assert!(
        inits[0].correlation_id.is_some(),
        "Commands carry a correlation id"
    );

    // THEN: Nothing but the handshake and the init crossed the wire
    assert!(
        outbound
            .iter()
            .all(|e| e.method == METHOD_INIT || e.method == METHOD_START_SERVER),
        "No other method name may be sent"
    );
}

/// **VALUE**: Verifies `connect` before bootstrap is a `NotConnected`
/// contract violation and sends nothing.
///
/// **WHY THIS MATTERS**: Commands issued into a void would be silently
/// lost; the typed error turns a timing bug in the caller into a loud,
/// attributable defect.
#[tokio::test]
async fn given_no_session_when_connect_then_not_connected_and_nothing_sent() {
    // GIVEN: A bootstrap that never ran
    let harness = recording_harness(5);
    let client = ChainClient::new(Arc::clone(&harness.bootstrap));

    // WHEN: Connecting too early
    let result = client.connect(TEST_ADDRESS);

    // THEN: Typed error, empty wire
    assert!(
        matches!(result, Err(SessionError::NotConnected { .. })),
        "Pre-bootstrap connect must fail with NotConnected"
    );
    assert_eq!(
        harness.host.count_method(harness.pair.outbound(), METHOD_INIT),
        0,
        "No init may be sent without a session"
    );
}

/// **VALUE**: Verifies the empty-address guard rejects before anything is
/// framed or sent.
#[tokio::test]
async fn given_empty_address_when_connect_then_invalid_address_and_nothing_sent() {
    let harness = recording_harness(5);
    resolve_bootstrap(&harness).await;
    let client = ChainClient::new(Arc::clone(&harness.bootstrap));

    let result = client.connect("");

    assert!(
        matches!(result, Err(SessionError::InvalidAddress { .. })),
        "Empty address must be rejected"
    );
    assert_eq!(
        harness.host.count_method(harness.pair.outbound(), METHOD_INIT),
        0,
        "Nothing may be sent for a rejected address"
    );
}

/// **VALUE**: Verifies connect after teardown fails like connect before
/// bootstrap — the session is gone, not cached.
#[tokio::test]
async fn given_torn_down_session_when_connect_then_not_connected() {
    let harness = recording_harness(5);
    resolve_bootstrap(&harness).await;
    let client = ChainClient::new(Arc::clone(&harness.bootstrap));

    harness.bootstrap.teardown();

    let result = client.connect(TEST_ADDRESS);
    assert!(
        matches!(result, Err(SessionError::NotConnected { .. })),
        "Teardown must invalidate the session for the façade"
    );
}
