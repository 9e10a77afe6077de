//! Store error types.

use thiserror::Error;

use crate::error::{Effect, Transience};

/// Errors raised by the remote content store.
///
/// The `Get`/`Put` display strings are shown verbatim to the operator.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum StoreError {
    #[error("GitHub (GET) error: {0}")]
    Get(u16),

    #[error("GitHub (PUT) error: {0}")]
    Put(u16),

    #[error("GitHub (PUT) error: 409 (stale version token)")]
    Conflict,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Wire(#[from] WireError),
}

impl StoreError {
    /// Whether retrying this operation may succeed.
    pub fn transience(&self) -> Transience {
        match self {
            StoreError::Conflict => Transience::Retryable,
            StoreError::Http(_) => Transience::Unknown,
            StoreError::Get(_) | StoreError::Put(_) | StoreError::Wire(_) => Transience::Permanent,
        }
    }

    /// What we know about side effects when this error is returned.
    pub fn effect(&self) -> Effect {
        match self {
            // The contents API applies a PUT atomically; a rejected write
            // leaves the blob untouched.
            StoreError::Get(_) | StoreError::Put(_) | StoreError::Conflict | StoreError::Wire(_) => {
                Effect::None
            }
            StoreError::Http(_) => Effect::Unknown,
        }
    }
}

/// Errors decoding or encoding blob content.
#[derive(Error, Debug)]
pub enum WireError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("base64 error: {0}")]
    Base64(#[from] base64::DecodeError),
}
