//! Loopback [`ChannelHost`] for tests and single-process embeddings.
//!
//! Each channel name gets an unbounded FIFO queue drained by a dedicated
//! pump task, so delivery order per channel matches send order and a
//! handler that sends on another channel can never deadlock the host.
//!
//! Matching the host runtimes this stands in for, a message sent on a
//! channel with no registered handler is dropped, not queued for a future
//! subscriber.

use crate::error::transport::TransportError;
use crate::sync::lock_unpoisoned;
use crate::transport::host::{ChannelHost, MessageHandler};

use common::ErrorLocation;

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use log::debug;
use tokio::sync::mpsc;

type HandlerSlot = Arc<Mutex<Option<MessageHandler>>>;

struct ChannelEntry {
    queue: mpsc::UnboundedSender<String>,
    handler: HandlerSlot,
}

/// In-memory message host wiring both endpoints into one process.
///
/// Must be used from within a tokio runtime: touching a channel for the
/// first time spawns its pump task.
pub struct InMemoryHost {
    channels: Mutex<HashMap<String, ChannelEntry>>,
}

impl InMemoryHost {
    pub fn new() -> Self {
        Self {
            channels: Mutex::new(HashMap::new()),
        }
    }

    /// Get or create the entry for `channel`, spawning its pump on first use.
    fn entry<'a>(
        channels: &'a mut MutexGuard<'_, HashMap<String, ChannelEntry>>,
        channel: &str,
    ) -> &'a mut ChannelEntry {
        channels.entry(channel.to_string()).or_insert_with(|| {
            let (queue, rx) = mpsc::unbounded_channel();
            let handler: HandlerSlot = Arc::new(Mutex::new(None));
            tokio::spawn(pump(channel.to_string(), rx, Arc::clone(&handler)));
            ChannelEntry { queue, handler }
        })
    }
}

impl Default for InMemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl ChannelHost for InMemoryHost {
    fn send(&self, channel: &str, text: String) -> Result<(), TransportError> {
        let mut channels = lock_unpoisoned(&self.channels);
        let entry = Self::entry(&mut channels, channel);

        entry
            .queue
            .send(text)
            .map_err(|_| TransportError::ChannelClosed {
                channel: channel.to_string(),
                location: ErrorLocation::caller(),
            })
    }

    fn subscribe(&self, channel: &str, handler: MessageHandler) {
        let slot = {
            let mut channels = lock_unpoisoned(&self.channels);
            Arc::clone(&Self::entry(&mut channels, channel).handler)
        };

        // The channels lock is released before taking the slot lock: a pump
        // invoking a handler that sends holds the locks in the opposite order.
        let mut slot = lock_unpoisoned(&slot);
        if slot.is_some() {
            debug!("replacing handler on channel {channel} (last-registration-wins)");
        }
        *slot = Some(handler);
    }
}

/// Drain one channel's queue into whatever handler is currently registered.
async fn pump(channel: String, mut rx: mpsc::UnboundedReceiver<String>, slot: HandlerSlot) {
    while let Some(text) = rx.recv().await {
        let mut guard = lock_unpoisoned(&slot);
        match guard.as_mut() {
            Some(handler) => handler(text),
            None => debug!("dropping message on {channel}: no handler registered"),
        }
    }
}
