// Unit tests for the wire envelope.
// Covers round-trip fidelity, version defaulting, and correlation ids.

use crate::error::transport::TransportError;
use crate::transport::{ENVELOPE_VERSION, Envelope};
use serde_json::json;

/// **VALUE**: Verifies that serialize → deserialize preserves `method` and
/// `payload`.
///
/// **WHY THIS MATTERS**: The envelope is the only thing crossing the process
/// boundary. If the round trip corrupts either field, every command the UI
/// issues arrives wrong at the node.
///
/// **BUG THIS CATCHES**: Would catch a field rename, a serde attribute typo,
/// or payload re-encoding that loses structure.
#[test]
fn given_command_envelope_when_round_tripped_then_method_and_payload_survive() {
    // GIVEN: A command with a structured payload
    let original = Envelope::command("init", json!({ "address": "0x000...00A" }));

    // WHEN: Serializing and deserializing
    let wire = original.to_wire().expect("Failed to serialize");
    let decoded = Envelope::from_wire(&wire).expect("Failed to deserialize");

    // THEN: method and payload are equal to the original
    assert_eq!(decoded.method, original.method, "Method should survive");
    assert_eq!(decoded.payload, original.payload, "Payload should survive");
    assert_eq!(
        decoded.correlation_id, original.correlation_id,
        "Correlation id should survive"
    );
}

/// **VALUE**: Verifies that frames from older peers (no `v`, no payload) are
/// readable.
///
/// **WHY THIS MATTERS**: The original protocol had no version field. A node
/// built against the old framing must keep working against this crate.
///
/// **BUG THIS CATCHES**: Would catch `#[serde(default)]` being dropped from
/// `v` or `payload` during refactoring.
#[test]
fn given_versionless_frame_when_decoded_then_defaults_applied() {
    // GIVEN: A minimal legacy frame
    let wire = r#"{"method":"ZChainServerStarted"}"#;

    // WHEN: Decoding
    let decoded = Envelope::from_wire(wire).expect("Failed to deserialize");

    // THEN: Version defaults to 1, payload to an empty object
    assert_eq!(decoded.v, ENVELOPE_VERSION, "Version should default");
    assert_eq!(
        decoded.payload,
        serde_json::json!({}),
        "Payload should default to empty object"
    );
    assert!(decoded.correlation_id.is_none(), "No correlation id");
}

/// **VALUE**: Verifies commands carry a correlation id and events do not.
///
/// **WHY THIS MATTERS**: Correlation ids are what will let a future
/// acknowledgement path pair responses with requests. Events are one-way and
/// must not waste bytes on an id nobody will match.
///
/// **BUG THIS CATCHES**: Would catch the constructors being swapped or the
/// `skip_serializing_if` attribute disappearing.
#[test]
fn given_event_and_command_when_serialized_then_only_command_has_correlation_id() {
    // GIVEN: One of each
    let event = Envelope::event("startZChainServer");
    let command = Envelope::command("init", json!({ "address": "0xabc" }));

    // WHEN: Serializing both
    let event_wire = event.to_wire().expect("Failed to serialize event");
    let command_wire = command.to_wire().expect("Failed to serialize command");

    // THEN: Only the command wire mentions correlationId
    assert!(
        !event_wire.contains("correlationId"),
        "Event should omit correlationId entirely"
    );
    assert!(
        command_wire.contains("correlationId"),
        "Command should carry correlationId"
    );
    assert!(
        command.correlation_id.is_some(),
        "Command constructor should assign an id"
    );
}

/// **VALUE**: Verifies two commands never share a correlation id.
///
/// **BUG THIS CATCHES**: Would catch the id generation being hoisted into a
/// constant during an overzealous cleanup.
#[test]
fn given_two_commands_when_created_then_correlation_ids_differ() {
    let first = Envelope::command("init", json!({}));
    let second = Envelope::command("init", json!({}));

    assert_ne!(
        first.correlation_id, second.correlation_id,
        "Each command should get a fresh id"
    );
}

/// **VALUE**: Verifies malformed frames surface as `Serialization` errors.
///
/// **WHY THIS MATTERS**: Inbound traffic crosses a process boundary; a
/// misbehaving peer must produce a typed local error, not a panic.
#[test]
fn given_malformed_frame_when_decoded_then_serialization_error() {
    let result = Envelope::from_wire("{not json");

    assert!(
        matches!(result, Err(TransportError::Serialization { .. })),
        "Malformed input should map to Serialization"
    );
}
