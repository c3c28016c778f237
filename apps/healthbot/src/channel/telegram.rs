use async_trait::async_trait;
use serde::Deserialize;
use serde::de::{DeserializeOwned, IgnoredAny};
use std::time::Duration;
use tracing::debug;

use super::{CommandSource, InboundMessage, Notifier};
use crate::error::TransportError;

pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";

/// Longest text accepted by `sendMessage`
const MAX_MESSAGE_CHARS: usize = 4096;

/// Slack added on top of the long-poll wait before the HTTP call gives up
const POLL_TIMEOUT_MARGIN: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Update {
    update_id: i64,
    message: Option<Message>,
}

#[derive(Debug, Deserialize)]
struct Message {
    text: Option<String>,
    from: Option<User>,
    chat: Chat,
}

#[derive(Debug, Deserialize)]
struct User {
    id: i64,
}

#[derive(Debug, Deserialize)]
struct Chat {
    id: i64,
}

/// Telegram Bot API client. Notifications go to one configured chat, commands
/// are long-polled with `getUpdates`.
pub struct TelegramChannel {
    token: String,
    chat_id: String,
    api_base: String,
    request_timeout: Duration,
    client: reqwest::Client,
}

impl TelegramChannel {
    pub fn new(token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            chat_id: chat_id.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            request_timeout: Duration::from_secs(10),
            client: reqwest::Client::new(),
        }
    }

    /// Point the client at another Bot API server
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Timeout of `sendMessage` calls
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    fn api_url(&self, method: &str) -> String {
        format!("{}/bot{}/{method}", self.api_base, self.token)
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        body: &serde_json::Value,
        timeout: Duration,
    ) -> Result<T, TransportError> {
        let response =
            self.client.post(self.api_url(method)).json(body).timeout(timeout).send().await?;
        let status = response.status();
        let raw = response.text().await?;

        let parsed: ApiResponse<T> = serde_json::from_str(&raw).map_err(|e| {
            if status.is_success() {
                TransportError::Decode(e.to_string())
            } else {
                TransportError::Status(status.as_u16())
            }
        })?;

        if !parsed.ok {
            return Err(TransportError::Api(
                parsed.description.unwrap_or_else(|| format!("{method} failed with HTTP {status}")),
            ));
        }

        parsed.result.ok_or_else(|| TransportError::Decode(format!("{method} returned no result")))
    }
}

#[async_trait]
impl Notifier for TelegramChannel {
    async fn send(&self, text: &str) -> Result<(), TransportError> {
        for chunk in split_message(text, MAX_MESSAGE_CHARS) {
            let body = serde_json::json!({
                "chat_id": self.chat_id,
                "text": chunk,
            });
            let _: IgnoredAny = self.call("sendMessage", &body, self.request_timeout).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl CommandSource for TelegramChannel {
    async fn fetch_since(
        &self,
        checkpoint: Option<i64>,
        wait: Duration,
    ) -> Result<Vec<InboundMessage>, TransportError> {
        let mut body = serde_json::json!({
            "timeout": wait.as_secs(),
            "allowed_updates": ["message"],
        });
        if let Some(offset) = checkpoint {
            body["offset"] = offset.into();
        }

        let updates: Vec<Update> =
            self.call("getUpdates", &body, wait + POLL_TIMEOUT_MARGIN).await?;
        debug!(count = updates.len(), ?checkpoint, "Fetched Telegram updates");

        Ok(updates
            .into_iter()
            .map(|update| {
                let (sender, text) = match update.message {
                    Some(message) => {
                        let sender = message.from.map_or(message.chat.id, |user| user.id);
                        (sender.to_string(), message.text)
                    }
                    None => (String::new(), None),
                };
                InboundMessage { id: update.update_id, sender, text }
            })
            .collect())
    }
}

/// Split text into chunks of at most `limit` characters, preferring line
/// boundaries
fn split_message(text: &str, limit: usize) -> Vec<String> {
    if text.chars().count() <= limit {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for line in text.split_inclusive('\n') {
        let mut line_len = line.chars().count();
        if current_len + line_len > limit && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }

        let mut rest = line;
        while line_len > limit {
            let cut = rest.char_indices().nth(limit).map_or(rest.len(), |(i, _)| i);
            chunks.push(rest[..cut].to_string());
            rest = &rest[cut..];
            line_len -= limit;
        }

        current.push_str(rest);
        current_len += line_len;
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}
