//! Operator input parsing.

use crate::core::DayDate;

/// A parsed operator message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// The `/start` greeting.
    Start,
    /// Bare amount: add to today's running total.
    Delta(i64),
    /// `DD.MM <amount>`: set the value recorded for that date.
    Absolute(DayDate, i64),
}

impl Command {
    /// Strict parse of operator text; `None` means malformed.
    ///
    /// Accepted shapes: `/start`, a bare non-negative integer, or a
    /// `DD.MM` date and an integer separated by whitespace. Anything
    /// else - wrong separators, signs, trailing garbage - is rejected.
    pub fn parse(text: &str) -> Option<Command> {
        let text = text.trim();
        if text == "/start" {
            return Some(Command::Start);
        }

        let mut parts = text.split_whitespace();
        match (parts.next(), parts.next(), parts.next()) {
            (Some(amount), None, _) => parse_amount(amount).map(Command::Delta),
            (Some(date), Some(amount), None) => {
                let date = DayDate::parse(date).ok()?;
                let amount = parse_amount(amount)?;
                Some(Command::Absolute(date, amount))
            }
            _ => None,
        }
    }
}

/// Digits only, no sign; overflow counts as malformed.
fn parse_amount(s: &str) -> Option<i64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}
