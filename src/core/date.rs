//! Day-month calendar dates as they appear in the history log.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::error::CoreError;

/// A `DD.MM` calendar date with no year component.
///
/// Ordering assumes all dates fall in the current calendar year, so a
/// history window spanning a year boundary sorts "31.12" after "01.01".
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DayDate {
    day: u8,
    month: u8,
}

impl DayDate {
    pub fn new(day: u8, month: u8) -> Result<Self, CoreError> {
        if !(1..=31).contains(&day) {
            return Err(CoreError::InvalidDate {
                raw: format!("{day:02}.{month:02}"),
                reason: "day must be 1-31".into(),
            });
        }
        if !(1..=12).contains(&month) {
            return Err(CoreError::InvalidDate {
                raw: format!("{day:02}.{month:02}"),
                reason: "month must be 1-12".into(),
            });
        }
        Ok(Self { day, month })
    }

    /// Strict `DD.MM` parse: 1-2 digits, a dot, 1-2 digits, nothing else.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        let invalid = |reason: &str| CoreError::InvalidDate {
            raw: s.to_string(),
            reason: reason.into(),
        };
        let Some((day_part, month_part)) = s.split_once('.') else {
            return Err(invalid("expected DD.MM"));
        };
        for part in [day_part, month_part] {
            if part.is_empty() || part.len() > 2 || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid("expected DD.MM"));
            }
        }
        let day: u8 = day_part.parse().map_err(|_| invalid("expected DD.MM"))?;
        let month: u8 = month_part.parse().map_err(|_| invalid("expected DD.MM"))?;
        Self::new(day, month)
    }

    /// The calendar day of `now`.
    pub fn from_datetime(now: OffsetDateTime) -> Self {
        Self {
            day: now.day(),
            month: now.month() as u8,
        }
    }

    pub fn day(&self) -> u8 {
        self.day
    }

    pub fn month(&self) -> u8 {
        self.month
    }
}

impl PartialOrd for DayDate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DayDate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.month
            .cmp(&other.month)
            .then_with(|| self.day.cmp(&other.day))
    }
}

impl fmt::Debug for DayDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DayDate(\"{self}\")")
    }
}

impl fmt::Display for DayDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}.{:02}", self.day, self.month)
    }
}

impl TryFrom<String> for DayDate {
    type Error = CoreError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        DayDate::parse(&s)
    }
}

impl From<DayDate> for String {
    fn from(d: DayDate) -> String {
        d.to_string()
    }
}
