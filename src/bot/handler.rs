//! Command handling: allow-list gate, reconcile dispatch, replies.

use time::OffsetDateTime;

use crate::bot::command::Command;
use crate::bot::transport::{ChatTransport, Inbound, OperatorId, TransportError};
use crate::reconcile::{ReconcileError, Reconciler, Update};
use crate::store::ContentStore;

const REPLY_GREETING: &str =
    "Bot ready. Send an amount to add to today's tally (digits only), \
     or a date and amount (19.01 500) to set a day's value.";
const REPLY_WORKING: &str = "Updating the remote data...";
const REPLY_FORMAT_HELP: &str =
    "Could not read that. Send a plain amount (e.g. 500) or a date and \
     amount (e.g. 19.01 500).";

/// Routes operator messages into the reconciler.
///
/// Senders outside the allow-list are ignored without any reply, so the
/// bot stays invisible to strangers.
pub struct Handler<S> {
    reconciler: Reconciler<S>,
    admins: Vec<OperatorId>,
}

impl<S: ContentStore> Handler<S> {
    pub fn new(reconciler: Reconciler<S>, admins: Vec<OperatorId>) -> Self {
        Self { reconciler, admins }
    }

    /// Handle one inbound message to completion.
    ///
    /// Reconcile failures are reported into the chat, not returned; the
    /// error path here is reply delivery only.
    pub async fn handle<T: ChatTransport>(
        &self,
        transport: &T,
        inbound: &Inbound,
    ) -> Result<(), TransportError> {
        if !self.admins.contains(&inbound.sender) {
            tracing::debug!(sender = inbound.sender.0, "ignoring non-operator message");
            return Ok(());
        }

        let Some(command) = Command::parse(&inbound.text) else {
            transport
                .send_message(inbound.chat_id, REPLY_FORMAT_HELP)
                .await?;
            return Ok(());
        };

        let update = match command {
            Command::Start => {
                transport.send_message(inbound.chat_id, REPLY_GREETING).await?;
                return Ok(());
            }
            Command::Delta(amount) => Update::Delta { amount },
            Command::Absolute(date, amount) => Update::Absolute { date, amount },
        };

        let progress = transport.send_message(inbound.chat_id, REPLY_WORKING).await?;
        let outcome = self.run_update(update).await;
        transport
            .edit_message(progress, &render_outcome(update, outcome))
            .await
    }

    async fn run_update(&self, update: Update) -> Result<i64, ReconcileError> {
        let now = now_local();
        match update {
            Update::Delta { amount } => self.reconciler.record_delta(amount, now).await,
            Update::Absolute { date, amount } => {
                self.reconciler.record_absolute(date, amount, now).await
            }
        }
    }
}

fn render_outcome(update: Update, outcome: Result<i64, ReconcileError>) -> String {
    match (update, outcome) {
        (Update::Delta { amount }, Ok(total)) => {
            format!("Recorded +{amount}. Total collected: {total}.")
        }
        (Update::Absolute { date, amount }, Ok(total)) => {
            format!("Recorded {amount} for {date}. Total collected: {total}.")
        }
        (_, Err(e)) => format!("Update failed: {e}"),
    }
}

/// Local wall-clock time, falling back to UTC when the offset is
/// unavailable (sandboxed environments).
fn now_local() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DayDate;
    use crate::store::StoreError;

    #[test]
    fn renders_delta_success() {
        let text = render_outcome(Update::Delta { amount: 500 }, Ok(1500));
        assert_eq!(text, "Recorded +500. Total collected: 1500.");
    }

    #[test]
    fn renders_absolute_success() {
        let update = Update::Absolute {
            date: DayDate::parse("19.01").unwrap(),
            amount: 300,
        };
        let text = render_outcome(update, Ok(1300));
        assert_eq!(text, "Recorded 300 for 19.01. Total collected: 1300.");
    }

    #[test]
    fn renders_store_failure_verbatim() {
        let text = render_outcome(
            Update::Delta { amount: 1 },
            Err(ReconcileError::Store(StoreError::Get(502))),
        );
        assert_eq!(text, "Update failed: GitHub (GET) error: 502");
    }
}
