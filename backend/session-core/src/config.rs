//! Session layer configuration.
//!
//! Loaded from `{config_dir}/session.json`; every field has a default so a
//! missing file means a fully usable config. The channel names exist here
//! for test harnesses and unusual embeddings — production builds run on the
//! fixed zChain names.

use crate::error::config::ConfigError;
use crate::error::transport::TransportError;
use crate::transport::ChannelPair;
use crate::{ZCHAIN_INBOUND_CHANNEL, ZCHAIN_OUTBOUND_CHANNEL};

use common::ErrorLocation;

use std::path::Path;
use std::time::Duration;

use log::info;
use serde::{Deserialize, Serialize};

const CONFIG_FILE_NAME: &str = "session.json";
const CONFIG_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChannelConfig {
    #[serde(default = "default_outbound_channel")]
    pub outbound: String,

    #[serde(default = "default_inbound_channel")]
    pub inbound: String,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            outbound: default_outbound_channel(),
            inbound: default_inbound_channel(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionConfig {
    #[serde(default = "default_version")]
    pub version: u32,

    /// Node cold start is slow; the default is deliberately generous.
    #[serde(default = "default_bootstrap_timeout_secs")]
    pub bootstrap_timeout_secs: u64,

    #[serde(default)]
    pub channels: ChannelConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            bootstrap_timeout_secs: default_bootstrap_timeout_secs(),
            channels: ChannelConfig::default(),
        }
    }
}

fn default_version() -> u32 {
    CONFIG_VERSION
}
fn default_bootstrap_timeout_secs() -> u64 {
    30
}
fn default_outbound_channel() -> String {
    ZCHAIN_OUTBOUND_CHANNEL.to_string()
}
fn default_inbound_channel() -> String {
    ZCHAIN_INBOUND_CHANNEL.to_string()
}

impl SessionConfig {
    /// Load config from `{config_dir}/session.json`.
    ///
    /// A missing file yields defaults; a present but unreadable or invalid
    /// file is an error, not a silent fallback.
    pub fn load(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            info!(
                "Session config not found at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }

        let contents =
            std::fs::read_to_string(&config_path).map_err(|e| ConfigError::ReadError {
                location: ErrorLocation::caller(),
                path: config_path.clone(),
                source: e,
            })?;

        let config: SessionConfig =
            serde_json::from_str(&contents).map_err(|e| ConfigError::ParseError {
                location: ErrorLocation::caller(),
                path: config_path.clone(),
                reason: e.to_string(),
            })?;

        config.validate()?;

        info!("Session config loaded from {}", config_path.display());
        Ok(config)
    }

    /// Save config to `{config_dir}/session.json` using atomic write
    /// (temp file + rename).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if validation, serialization, or any write
    /// step fails.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        self.validate()?;

        std::fs::create_dir_all(config_dir).map_err(|e| ConfigError::WriteError {
            location: ErrorLocation::caller(),
            path: config_dir.to_path_buf(),
            source: e,
        })?;

        let config_path = config_dir.join(CONFIG_FILE_NAME);
        let temp_path = config_dir.join(format!("{}.tmp", CONFIG_FILE_NAME));

        let json = serde_json::to_string_pretty(self).map_err(|e| ConfigError::SerializeError {
            location: ErrorLocation::caller(),
            reason: e.to_string(),
        })?;

        std::fs::write(&temp_path, json).map_err(|e| ConfigError::WriteError {
            location: ErrorLocation::caller(),
            path: temp_path.clone(),
            source: e,
        })?;

        std::fs::rename(&temp_path, &config_path).map_err(|e| ConfigError::WriteError {
            location: ErrorLocation::caller(),
            path: config_path.clone(),
            source: e,
        })?;

        info!("Session config saved to {}", config_path.display());
        Ok(())
    }

    /// Validate config values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version == 0 || self.version > CONFIG_VERSION {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::caller(),
                reason: format!(
                    "Invalid version: {} (expected 1-{})",
                    self.version, CONFIG_VERSION
                ),
            });
        }

        if self.bootstrap_timeout_secs == 0 {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::caller(),
                reason: "bootstrap_timeout_secs must be at least 1".to_string(),
            });
        }

        if self.channels.outbound.is_empty() || self.channels.inbound.is_empty() {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::caller(),
                reason: "channel names must be non-empty".to_string(),
            });
        }

        if self.channels.outbound == self.channels.inbound {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::caller(),
                reason: format!(
                    "both channel directions named '{}' (echo loop)",
                    self.channels.outbound
                ),
            });
        }

        Ok(())
    }

    pub fn bootstrap_timeout(&self) -> Duration {
        Duration::from_secs(self.bootstrap_timeout_secs)
    }

    /// The configured channel names as a validated pair.
    pub fn channel_pair(&self) -> Result<ChannelPair, TransportError> {
        ChannelPair::new(&self.channels.outbound, &self.channels.inbound)
    }
}
