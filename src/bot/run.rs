//! Long-poll run loop.

use std::time::Duration;

use crate::bot::handler::Handler;
use crate::bot::transport::{Inbound, OperatorId, TelegramApi};
use crate::store::ContentStore;

const POLL_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Serve operator messages until the surrounding task is cancelled.
///
/// Updates are handled one at a time, in arrival order; a failed poll is
/// logged and retried after a short delay. No failure is fatal.
pub async fn run<S: ContentStore>(api: &TelegramApi, handler: &Handler<S>) {
    let mut offset = 0i64;
    tracing::info!("bot started, waiting for operator messages");

    loop {
        let updates = match api.poll_updates(offset).await {
            Ok(updates) => updates,
            Err(e) => {
                tracing::warn!("poll failed: {e}");
                tokio::time::sleep(POLL_RETRY_DELAY).await;
                continue;
            }
        };

        for update in updates {
            offset = offset.max(update.update_id + 1);
            let Some(message) = update.message else {
                continue;
            };
            let (Some(from), Some(text)) = (message.from, message.text) else {
                continue;
            };
            let inbound = Inbound {
                sender: OperatorId(from.id),
                chat_id: message.chat.id,
                text,
            };
            if let Err(e) = handler.handle(api, &inbound).await {
                tracing::warn!(chat_id = inbound.chat_id, "reply delivery failed: {e}");
            }
        }
    }
}
