//! Wire codec for the persisted blob.
//!
//! `data.json` layout, consumed by the public histogram artifact:
//!
//! ```json
//! {
//!   "collected": 1500,
//!   "updated_at": "2026-01-19 14:02",
//!   "history": [ { "date": "19.01", "amount": 1500 } ]
//! }
//! ```

use crate::core::Ledger;

use super::error::WireError;

/// Pretty-printed UTF-8 JSON.
pub fn encode_ledger(ledger: &Ledger) -> Result<Vec<u8>, WireError> {
    Ok(serde_json::to_vec_pretty(ledger)?)
}

pub fn decode_ledger(bytes: &[u8]) -> Result<Ledger, WireError> {
    Ok(serde_json::from_slice(bytes)?)
}
