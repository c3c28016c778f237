//! Chat-side collaborators: the outbound notifier, the inbound command
//! source and the listener loop that connects the source to the command
//! interpreter.

pub mod listener;
pub mod telegram;

pub use listener::{Checkpoint, CommandListener, Dispatcher};
pub use telegram::TelegramChannel;

use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::TransportError;

/// One update pulled from the command source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    /// Monotonic id assigned by the source, drives the checkpoint
    pub id: i64,
    /// Opaque sender identifier, kept for future authorization
    pub sender: String,
    /// Message text. Updates without text still advance the checkpoint.
    pub text: Option<String>,
}

/// Outbound "send text message" sink
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, text: &str) -> Result<(), TransportError>;
}

/// Inbound long-poll command source
#[async_trait]
pub trait CommandSource: Send + Sync {
    /// Return the updates with id >= `checkpoint` (all pending ones when
    /// `None`), waiting up to `wait` for at least one to arrive
    async fn fetch_since(
        &self,
        checkpoint: Option<i64>,
        wait: Duration,
    ) -> Result<Vec<InboundMessage>, TransportError>;
}

/// Send a notification, logging instead of propagating failures.
/// Returns whether the message went out.
pub async fn notify(notifier: &dyn Notifier, text: &str) -> bool {
    match notifier.send(text).await {
        Ok(()) => {
            debug!(chars = text.chars().count(), "Notification sent");
            true
        }
        Err(e) => {
            warn!("Failed to send notification: {e}");
            false
        }
    }
}
