//! Domain state for the tally.
//!
//! Pure data and merge rules: no I/O, no clock reads. Callers pass the
//! current time in.

mod date;
mod error;
mod state;

pub use date::DayDate;
pub use error::CoreError;
pub use state::{HISTORY_CAP, HistoryPoint, Ledger};
