//! Chat transport: the Telegram Bot API behind a trait.
//!
//! The handler only needs "send a reply" and "edit a reply in place";
//! everything Telegram-specific (long polling, the response envelope)
//! stays in [`TelegramApi`].

use std::time::Duration;

use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

use crate::error::{Effect, Transience};

/// Slack added on top of the long-poll timeout so the server side, not
/// the client, ends an idle poll.
const POLL_SLACK: Duration = Duration::from_secs(10);

/// Identity of a message sender.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct OperatorId(pub i64);

/// An inbound operator message.
#[derive(Clone, Debug)]
pub struct Inbound {
    pub sender: OperatorId,
    pub chat_id: i64,
    pub text: String,
}

/// Handle to a sent reply, for in-place edits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MessageRef {
    pub chat_id: i64,
    pub message_id: i64,
}

/// Errors raised by the chat transport.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Telegram API error: {0}")]
    Api(String),
}

impl TransportError {
    pub fn transience(&self) -> Transience {
        match self {
            TransportError::Http(_) => Transience::Unknown,
            TransportError::Api(_) => Transience::Permanent,
        }
    }

    pub fn effect(&self) -> Effect {
        match self {
            TransportError::Http(_) => Effect::Unknown,
            // An `ok: false` envelope means the API rejected the call.
            TransportError::Api(_) => Effect::None,
        }
    }
}

/// Outbound side of the chat transport.
#[allow(async_fn_in_trait)]
pub trait ChatTransport {
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<MessageRef, TransportError>;

    async fn edit_message(&self, msg: MessageRef, text: &str) -> Result<(), TransportError>;
}

// =============================================================================
// Telegram Bot API wire types
// =============================================================================

#[derive(Deserialize)]
struct TgEnvelope<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

impl<T> TgEnvelope<T> {
    fn into_result(self) -> Result<T, TransportError> {
        if self.ok && let Some(result) = self.result {
            Ok(result)
        } else {
            Err(TransportError::Api(
                self.description
                    .unwrap_or_else(|| "malformed response envelope".into()),
            ))
        }
    }
}

#[derive(Deserialize)]
pub struct TgUpdate {
    pub update_id: i64,
    pub message: Option<TgMessage>,
}

#[derive(Deserialize)]
pub struct TgMessage {
    pub message_id: i64,
    pub from: Option<TgUser>,
    pub chat: TgChat,
    pub text: Option<String>,
}

#[derive(Deserialize)]
pub struct TgUser {
    pub id: i64,
}

#[derive(Deserialize)]
pub struct TgChat {
    pub id: i64,
}

/// Telegram Bot API client (long polling).
#[derive(Debug, Clone)]
pub struct TelegramApi {
    http: reqwest::Client,
    base_url: String,
    poll_timeout: Duration,
}

impl TelegramApi {
    pub fn new(
        bot_token: &str,
        poll_timeout: Duration,
        request_timeout: Duration,
    ) -> Result<Self, TransportError> {
        let http = reqwest::ClientBuilder::new()
            .timeout(request_timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: format!("https://api.telegram.org/bot{bot_token}"),
            poll_timeout,
        })
    }

    /// Long-poll for updates with `update_id >= offset`.
    ///
    /// Blocks up to the poll timeout when there is nothing to deliver.
    pub async fn poll_updates(&self, offset: i64) -> Result<Vec<TgUpdate>, TransportError> {
        let resp = self
            .http
            .get(format!("{}/getUpdates", self.base_url))
            .query(&[("timeout", self.poll_timeout.as_secs() as i64), ("offset", offset)])
            .timeout(self.poll_timeout + POLL_SLACK)
            .send()
            .await?;
        let envelope: TgEnvelope<Vec<TgUpdate>> = resp.json().await?;
        envelope.into_result()
    }
}

impl ChatTransport for TelegramApi {
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<MessageRef, TransportError> {
        let resp = self
            .http
            .post(format!("{}/sendMessage", self.base_url))
            .json(&json!({ "chat_id": chat_id, "text": text }))
            .send()
            .await?;
        let envelope: TgEnvelope<TgMessage> = resp.json().await?;
        let message = envelope.into_result()?;
        Ok(MessageRef {
            chat_id,
            message_id: message.message_id,
        })
    }

    async fn edit_message(&self, msg: MessageRef, text: &str) -> Result<(), TransportError> {
        let resp = self
            .http
            .post(format!("{}/editMessageText", self.base_url))
            .json(&json!({
                "chat_id": msg.chat_id,
                "message_id": msg.message_id,
                "text": text,
            }))
            .send()
            .await?;
        // The edit endpoint returns the message or `true`; only the
        // envelope status matters here.
        let envelope: TgEnvelope<serde_json::Value> = resp.json().await?;
        envelope.into_result().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_ok_yields_result() {
        let envelope: TgEnvelope<i64> =
            serde_json::from_str(r#"{"ok": true, "result": 7}"#).unwrap();
        assert_eq!(envelope.into_result().unwrap(), 7);
    }

    #[test]
    fn envelope_error_carries_description() {
        let envelope: TgEnvelope<i64> =
            serde_json::from_str(r#"{"ok": false, "description": "Unauthorized"}"#).unwrap();
        match envelope.into_result() {
            Err(TransportError::Api(desc)) => assert_eq!(desc, "Unauthorized"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn envelope_ok_without_result_is_an_error() {
        let envelope: TgEnvelope<i64> = serde_json::from_str(r#"{"ok": true}"#).unwrap();
        assert!(envelope.into_result().is_err());
    }
}
