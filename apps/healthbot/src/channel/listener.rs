use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::{CommandSource, InboundMessage};
use crate::error::TransportError;

/// Marker of the next update to fetch. It only ever moves forward.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Checkpoint(Option<i64>);

impl Checkpoint {
    /// Id to request next, `None` before anything was consumed
    pub fn next(&self) -> Option<i64> {
        self.0
    }

    /// Move past `id`. Ids at or behind the current position are ignored.
    pub fn advance_past(&mut self, id: i64) {
        let candidate = id.saturating_add(1);
        self.0 = Some(self.0.map_or(candidate, |current| current.max(candidate)));
    }
}

/// Receiver of the text of each inbound message, in arrival order
#[async_trait]
pub trait Dispatcher: Send + Sync {
    async fn dispatch(&self, text: &str, sender: &str);
}

/// Long-polls the command source and feeds each message to the dispatcher.
///
/// The checkpoint is moved past a whole batch before any of it is
/// dispatched, so nothing consumed is fetched again within this process.
pub struct CommandListener {
    source: Arc<dyn CommandSource>,
    dispatcher: Arc<dyn Dispatcher>,
    checkpoint: Checkpoint,
    wait: Duration,
    retry_delay: Duration,
}

impl CommandListener {
    pub fn new(
        source: Arc<dyn CommandSource>,
        dispatcher: Arc<dyn Dispatcher>,
        wait: Duration,
        retry_delay: Duration,
    ) -> Self {
        Self { source, dispatcher, checkpoint: Checkpoint::default(), wait, retry_delay }
    }

    pub fn checkpoint(&self) -> Checkpoint {
        self.checkpoint
    }

    /// Fetch one batch and dispatch it. Returns how many messages carried text.
    pub async fn poll_once(&mut self) -> Result<usize, TransportError> {
        let batch = self.source.fetch_since(self.checkpoint.next(), self.wait).await?;

        for message in &batch {
            self.checkpoint.advance_past(message.id);
        }
        if !batch.is_empty() {
            debug!(
                count = batch.len(),
                checkpoint = ?self.checkpoint.next(),
                "Checkpoint advanced"
            );
        }

        let mut dispatched = 0;
        for InboundMessage { id, sender, text } in batch {
            let Some(text) = text else {
                debug!(id, "Skipping update without text");
                continue;
            };
            debug!(id, sender = %sender, "Dispatching command message");
            self.dispatcher.dispatch(&text, &sender).await;
            dispatched += 1;
        }
        Ok(dispatched)
    }

    /// Poll forever. Transport failures are logged and retried after a fixed
    /// delay.
    pub async fn run(mut self) {
        info!(wait_secs = self.wait.as_secs(), "Listening for commands");
        loop {
            if let Err(e) = self.poll_once().await {
                warn!("Error while receiving commands: {e}");
                tokio::time::sleep(self.retry_delay).await;
            }
        }
    }

    pub fn spawn(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(self.run())
    }
}
