// Unit tests for session config: defaults, validation, load/save.

use crate::config::SessionConfig;
use crate::error::config::ConfigError;
use crate::{ZCHAIN_INBOUND_CHANNEL, ZCHAIN_OUTBOUND_CHANNEL};

/// **VALUE**: Verifies the defaults are the fixed zChain wiring and pass
/// validation.
///
/// **WHY THIS MATTERS**: A missing config file must yield a config that
/// talks to a real node out of the box.
#[test]
fn given_default_config_when_validated_then_ok_with_zchain_channels() {
    let config = SessionConfig::default();

    config.validate().expect("Defaults should validate");
    assert_eq!(config.channels.outbound, ZCHAIN_OUTBOUND_CHANNEL);
    assert_eq!(config.channels.inbound, ZCHAIN_INBOUND_CHANNEL);
    assert_eq!(
        config.bootstrap_timeout_secs, 30,
        "Cold start is slow; default must stay generous"
    );
}

/// **VALUE**: Verifies validation rejects the echo-loop configuration where
/// both directions share a channel name.
///
/// **WHY THIS MATTERS**: With one name for both directions, every command
/// the UI sends is delivered straight back to the UI's own handler. The
/// system looks alive while the node hears nothing.
#[test]
fn given_identical_channel_names_when_validated_then_rejected() {
    let mut config = SessionConfig::default();
    config.channels.inbound = config.channels.outbound.clone();

    let result = config.validate();

    assert!(
        matches!(result, Err(ConfigError::ValidationError { .. })),
        "Identical directional names must not validate"
    );
}

/// **VALUE**: Verifies the remaining validation bounds.
#[test]
fn given_invalid_fields_when_validated_then_rejected() {
    let mut zero_timeout = SessionConfig::default();
    zero_timeout.bootstrap_timeout_secs = 0;
    assert!(zero_timeout.validate().is_err(), "Zero timeout is invalid");

    let mut empty_channel = SessionConfig::default();
    empty_channel.channels.outbound = String::new();
    assert!(empty_channel.validate().is_err(), "Empty name is invalid");

    let mut future_version = SessionConfig::default();
    future_version.version = 99;
    assert!(
        future_version.validate().is_err(),
        "Unknown future version is invalid"
    );
}

/// **VALUE**: Verifies a missing config file yields defaults rather than an
/// error.
#[test]
fn given_missing_file_when_loaded_then_defaults_returned() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");

    let config = SessionConfig::load(dir.path()).expect("Missing file should not error");

    assert_eq!(config, SessionConfig::default());
}

/// **VALUE**: Verifies save → load round trips, including the atomic-write
/// path actually producing the final file name.
#[test]
fn given_saved_config_when_loaded_then_round_trips() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");

    let mut config = SessionConfig::default();
    config.bootstrap_timeout_secs = 5;
    config.save(dir.path()).expect("Save should succeed");

    let loaded = SessionConfig::load(dir.path()).expect("Load should succeed");
    assert_eq!(loaded, config);
}

/// **VALUE**: Verifies a corrupted file is a loud `ParseError`, not a silent
/// fall back to defaults that would mask an operator's typo.
#[test]
fn given_corrupt_file_when_loaded_then_parse_error() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    std::fs::write(dir.path().join("session.json"), "{broken").expect("Failed to write");

    let result = SessionConfig::load(dir.path());

    assert!(matches!(result, Err(ConfigError::ParseError { .. })));
}
