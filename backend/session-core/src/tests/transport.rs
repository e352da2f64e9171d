// Unit tests for the channel pair, the in-memory host, and the transport
// facade over it.

use crate::error::transport::TransportError;
use crate::transport::{ChannelHost, ChannelPair, Envelope, InMemoryHost, Transport};

use std::sync::Arc;

use serde_json::json;
use tokio::sync::mpsc;

fn collecting_handler(tx: mpsc::UnboundedSender<String>) -> Box<dyn FnMut(String) + Send> {
    Box::new(move |text| {
        let _ = tx.send(text);
    })
}

/// **VALUE**: Verifies the echo-loop invariant: a pair cannot be built with
/// one name for both directions, nor with empty names.
#[test]
fn given_bad_names_when_building_pair_then_invalid_channel_pair() {
    let looped = ChannelPair::new("zchain-ipc", "zchain-ipc");
    assert!(
        matches!(looped, Err(TransportError::InvalidChannelPair { .. })),
        "Equal names must be rejected"
    );

    let empty = ChannelPair::new("", "reverse");
    assert!(
        matches!(empty, Err(TransportError::InvalidChannelPair { .. })),
        "Empty names must be rejected"
    );

    ChannelPair::new("forward", "reverse").expect("Distinct names should build");
}

/// **VALUE**: Verifies FIFO delivery per channel through the in-memory host.
///
/// **WHY THIS MATTERS**: The session layer assumes messages sent by one
/// sender on one channel arrive in send order. The fake used by every other
/// test must honor the same contract as the real host runtime.
#[tokio::test]
async fn given_three_sends_when_delivered_then_order_preserved() {
    // GIVEN: A subscribed channel
    let host = InMemoryHost::new();
    let (tx, mut rx) = mpsc::unbounded_channel();
    host.subscribe("zchain-ipc-transport-main", collecting_handler(tx));

    // WHEN: Sending three messages
    for text in ["first", "second", "third"] {
        host.send("zchain-ipc-transport-main", text.to_string())
            .expect("Send should succeed");
    }

    // THEN: They arrive in order
    for expected in ["first", "second", "third"] {
        let received = rx.recv().await.expect("Message should arrive");
        assert_eq!(received, expected, "FIFO order must hold");
    }
}

/// **VALUE**: Verifies last-registration-wins on subscribe.
///
/// **WHY THIS MATTERS**: The contract is one handler per channel, replaced
/// on re-registration and never silently stacked. Stacking would deliver
/// every node event twice after a re-subscribe.
#[tokio::test]
async fn given_second_handler_when_registered_then_replaces_first() {
    let host = InMemoryHost::new();

    let (old_tx, mut old_rx) = mpsc::unbounded_channel();
    let (new_tx, mut new_rx) = mpsc::unbounded_channel();
    host.subscribe("events", collecting_handler(old_tx));
    host.subscribe("events", collecting_handler(new_tx));

    host.send("events", "ping".to_string())
        .expect("Send should succeed");

    // THEN: Only the replacement sees the message
    let received = new_rx.recv().await.expect("New handler should receive");
    assert_eq!(received, "ping");
    assert!(
        old_rx.try_recv().is_err(),
        "Replaced handler must not receive anything"
    );
}

/// **VALUE**: Verifies the transport writes well-formed envelopes to the
/// outbound channel only.
///
/// **BUG THIS CATCHES**: Would catch the directions being swapped, which
/// would make the UI talk to itself.
#[tokio::test]
async fn given_transport_send_when_delivered_then_envelope_on_outbound_channel() {
    // GIVEN: A transport over the in-memory host
    let host = Arc::new(InMemoryHost::new());
    let pair = ChannelPair::zchain();
    let transport = Transport::new(Arc::clone(&host) as Arc<dyn ChannelHost>, pair.clone());

    let (out_tx, mut out_rx) = mpsc::unbounded_channel();
    let (in_tx, mut in_rx) = mpsc::unbounded_channel();
    host.subscribe(pair.outbound(), collecting_handler(out_tx));
    host.subscribe(pair.inbound(), collecting_handler(in_tx));

    // WHEN: Sending a command
    transport
        .send(&Envelope::command("init", json!({ "address": "0xabc" })))
        .expect("Send should succeed");

    // THEN: The outbound channel carries the decoded envelope; the inbound
    // channel stays silent
    let wire = out_rx.recv().await.expect("Outbound should receive");
    let envelope = Envelope::from_wire(&wire).expect("Wire text should decode");
    assert_eq!(envelope.method, "init");
    assert_eq!(envelope.payload, json!({ "address": "0xabc" }));
    assert!(
        in_rx.try_recv().is_err(),
        "Nothing may appear on the reverse channel"
    );
}
