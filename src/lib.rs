#![forbid(unsafe_code)]

pub mod bot;
pub mod config;
pub mod core;
pub mod error;
pub mod reconcile;
pub mod store;
pub mod telemetry;

pub use error::{Effect, Error, Transience};
pub type Result<T> = std::result::Result<T, Error>;

// Re-export core types at crate root for convenience
pub use crate::core::{DayDate, HISTORY_CAP, HistoryPoint, Ledger};
pub use crate::reconcile::{Reconciler, Update};
pub use crate::store::{Blob, ContentStore, GithubStore, VersionToken};
