//! Read-modify-write reconciliation of the tally blob.
//!
//! Implements the update cycle with typestate guarantees:
//! - Idle → Fetched → Merged, then a write
//! - Each transition consumes `self`, returns next phase
//! - Can't write an unmerged state - enforced at compile time
//!
//! Key design:
//! - The remote blob is the source of truth; local state lives only for
//!   the duration of one cycle
//! - The version token is re-read at the start of every cycle and
//!   attached to the write; first-time creation omits it
//! - Retry on token conflict: fetch again, re-merge, bounded

use thiserror::Error;
use time::OffsetDateTime;

use crate::core::{DayDate, Ledger};
use crate::error::{Effect, Transience};
use crate::store::{Blob, ContentStore, StoreError, VersionToken, wire};

/// One operator-supplied data point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Update {
    /// Add to the running total for today.
    Delta { amount: i64 },
    /// Set the recorded value for an explicit date.
    Absolute { date: DayDate, amount: i64 },
}

/// Errors that can occur during a reconcile cycle.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ReconcileError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("too many reconcile retries ({0})")]
    TooManyRetries(usize),
}

impl ReconcileError {
    /// Whether retrying this cycle may succeed.
    pub fn transience(&self) -> Transience {
        match self {
            ReconcileError::Store(e) => e.transience(),
            ReconcileError::TooManyRetries(_) => Transience::Retryable,
        }
    }

    /// What we know about side effects when this error is returned.
    pub fn effect(&self) -> Effect {
        match self {
            ReconcileError::Store(e) => e.effect(),
            // Every attempted write was rejected.
            ReconcileError::TooManyRetries(_) => Effect::None,
        }
    }
}

// =============================================================================
// Phase markers
// =============================================================================

/// Initial phase - ready to start a cycle.
pub struct Idle;

/// Fetched phase - have the remote ledger (or a fresh one) and its token.
pub struct Fetched {
    /// Ledger as stored remotely; zero-value if the blob does not exist.
    pub ledger: Ledger,
    /// Version token of the fetched content; `None` means "create".
    pub token: Option<VersionToken>,
}

/// Merged phase - updated ledger ready to write.
pub struct Merged {
    pub ledger: Ledger,
    pub token: Option<VersionToken>,
    /// Summary of the merge for the commit message.
    pub summary: ChangeSummary,
}

/// Summary of one merge, rendered into the commit message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChangeSummary {
    Delta { added: i64, total: i64 },
    Absolute { date: DayDate, amount: i64, total: i64 },
}

impl ChangeSummary {
    const COMMIT_PREFIX: &'static str = "tally(data):";

    pub fn to_commit_message(&self) -> String {
        match self {
            ChangeSummary::Delta { added, total } => {
                format!("{} +{added}, total {total}", Self::COMMIT_PREFIX)
            }
            ChangeSummary::Absolute {
                date,
                amount,
                total,
            } => {
                format!("{} {date} = {amount}, total {total}", Self::COMMIT_PREFIX)
            }
        }
    }
}

// =============================================================================
// Reconcile - the typestate process
// =============================================================================

/// Reconcile process with typestate-enforced phases.
///
/// Use `Reconcile::new()` to start, then chain transitions:
/// ```ignore
/// let total = Reconcile::new("data.json")
///     .fetch(&store).await?
///     .merge(update, now)
///     .write(&store).await?;
/// ```
pub struct Reconcile<Phase> {
    path: String,
    pub phase: Phase,
}

impl Reconcile<Idle> {
    /// Create a new process in Idle phase for the blob at `path`.
    pub fn new(path: impl Into<String>) -> Self {
        Reconcile {
            path: path.into(),
            phase: Idle,
        }
    }

    /// Fetch the remote blob, transition to Fetched phase.
    ///
    /// A missing blob bootstraps the zero-value ledger with no token.
    pub async fn fetch<S: ContentStore>(
        self,
        store: &S,
    ) -> Result<Reconcile<Fetched>, ReconcileError> {
        let phase = match store.fetch(&self.path).await? {
            Some(Blob { bytes, token }) => Fetched {
                ledger: wire::decode_ledger(&bytes).map_err(StoreError::from)?,
                token: Some(token),
            },
            None => Fetched {
                ledger: Ledger::default(),
                token: None,
            },
        };
        Ok(Reconcile {
            path: self.path,
            phase,
        })
    }
}

impl Reconcile<Fetched> {
    /// Merge the update into the fetched ledger, transition to Merged.
    pub fn merge(self, update: Update, now: OffsetDateTime) -> Reconcile<Merged> {
        let Fetched { mut ledger, token } = self.phase;
        let summary = match update {
            Update::Delta { amount } => {
                let total = ledger.apply_delta(amount, now);
                ChangeSummary::Delta {
                    added: amount,
                    total,
                }
            }
            Update::Absolute { date, amount } => {
                let total = ledger.apply_absolute(date, amount, now);
                ChangeSummary::Absolute {
                    date,
                    amount,
                    total,
                }
            }
        };
        Reconcile {
            path: self.path,
            phase: Merged {
                ledger,
                token,
                summary,
            },
        }
    }
}

impl Reconcile<Merged> {
    /// Write the merged ledger back.
    ///
    /// The token read in the fetch phase rides along so a concurrent
    /// writer rejects us instead of being overwritten.
    ///
    /// Returns the new running total.
    pub async fn write<S: ContentStore>(self, store: &S) -> Result<i64, ReconcileError> {
        let Merged {
            ledger,
            token,
            summary,
        } = self.phase;
        let bytes = wire::encode_ledger(&ledger).map_err(StoreError::from)?;
        store
            .put(
                &self.path,
                &bytes,
                &summary.to_commit_message(),
                token.as_ref(),
            )
            .await?;
        Ok(ledger.collected)
    }
}

/// Run a full cycle, retrying on version-token conflict.
///
/// Every retry refetches and re-merges so the update lands on whatever
/// state won the race. After `max_retries` rejected writes the failure
/// surfaces to the caller.
pub async fn reconcile_with_retry<S: ContentStore>(
    store: &S,
    path: &str,
    update: Update,
    now: OffsetDateTime,
    max_retries: usize,
) -> Result<i64, ReconcileError> {
    let mut retries = 0;

    loop {
        let result = Reconcile::new(path)
            .fetch(store)
            .await?
            .merge(update, now)
            .write(store)
            .await;

        match result {
            Ok(total) => return Ok(total),
            Err(ReconcileError::Store(StoreError::Conflict)) => {
                retries += 1;
                if retries > max_retries {
                    return Err(ReconcileError::TooManyRetries(retries));
                }
                tracing::debug!(path, retries, "version conflict, refetching");
                continue;
            }
            Err(e) => return Err(e),
        }
    }
}

/// The operator-facing reconciler: two operations over one blob.
pub struct Reconciler<S> {
    store: S,
    path: String,
    max_retries: usize,
}

impl<S: ContentStore> Reconciler<S> {
    pub fn new(store: S, path: impl Into<String>, max_retries: usize) -> Self {
        Self {
            store,
            path: path.into(),
            max_retries,
        }
    }

    /// Add `amount` to the running total for the day of `now`.
    pub async fn record_delta(
        &self,
        amount: i64,
        now: OffsetDateTime,
    ) -> Result<i64, ReconcileError> {
        reconcile_with_retry(
            &self.store,
            &self.path,
            Update::Delta { amount },
            now,
            self.max_retries,
        )
        .await
    }

    /// Set the value recorded for `date`, adjusting the total by the
    /// difference from any prior value.
    pub async fn record_absolute(
        &self,
        date: DayDate,
        amount: i64,
        now: OffsetDateTime,
    ) -> Result<i64, ReconcileError> {
        reconcile_with_retry(
            &self.store,
            &self.path,
            Update::Absolute { date, amount },
            now,
            self.max_retries,
        )
        .await
    }
}
