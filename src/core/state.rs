//! The persisted tally: running total plus a rolling history window.
//!
//! INVARIANT: `history` holds at most [`HISTORY_CAP`] points, ascending by
//! date, after every merge.
//!
//! The two merge operations interpret `HistoryPoint::amount` differently:
//! delta mode records the running total as of each day, absolute mode
//! records the value entered for that day. `collected` is authoritative
//! under both.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::FormatItem;
use time::macros::format_description;

use super::date::DayDate;

/// Upper bound on history length; the blob feeds a three-bar histogram.
pub const HISTORY_CAP: usize = 3;

const UPDATED_AT_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]");

/// One point of the rolling history.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryPoint {
    pub date: DayDate,
    pub amount: i64,
}

/// The single persisted blob, in memory.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    pub collected: i64,
    pub updated_at: String,
    pub history: Vec<HistoryPoint>,
}

impl Ledger {
    /// Add `amount` to the running total for the day of `now`.
    ///
    /// The last history point tracks the running total as of each update
    /// within a day; a new day appends a fresh point.
    ///
    /// Returns the new total.
    pub fn apply_delta(&mut self, amount: i64, now: OffsetDateTime) -> i64 {
        self.collected += amount;
        let today = DayDate::from_datetime(now);
        match self.history.last_mut() {
            Some(last) if last.date == today => last.amount = self.collected,
            _ => self.history.push(HistoryPoint {
                date: today,
                amount: self.collected,
            }),
        }
        self.truncate();
        self.touch(now);
        self.collected
    }

    /// Set the recorded value for `date`, adjusting the total by the
    /// difference from any prior value for that date.
    ///
    /// Re-entering the same value is a no-op for both total and history,
    /// so corrections can be replayed safely.
    ///
    /// Returns the new total.
    pub fn apply_absolute(&mut self, date: DayDate, amount: i64, now: OffsetDateTime) -> i64 {
        match self.history.iter_mut().find(|p| p.date == date) {
            Some(entry) => {
                self.collected += amount - entry.amount;
                entry.amount = amount;
            }
            None => {
                self.history.push(HistoryPoint { date, amount });
                self.collected += amount;
            }
        }
        self.history.sort_by_key(|p| p.date);
        self.truncate();
        self.touch(now);
        self.collected
    }

    /// Drop the oldest points past the cap.
    fn truncate(&mut self) {
        if self.history.len() > HISTORY_CAP {
            let excess = self.history.len() - HISTORY_CAP;
            self.history.drain(..excess);
        }
    }

    fn touch(&mut self, now: OffsetDateTime) {
        self.updated_at = now.format(UPDATED_AT_FORMAT).unwrap_or_default();
    }
}
