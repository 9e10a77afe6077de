use thiserror::Error;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum CoreError {
    #[error("invalid date {raw:?}: {reason}")]
    InvalidDate { raw: String, reason: String },
}
