//! Remote content store: one versioned JSON blob.
//!
//! The store is a single-file key-value surface with optimistic
//! concurrency: every fetch yields a version token, every overwrite must
//! present the token it read, and a stale token rejects the write.

mod error;
mod github;
pub mod wire;

pub use error::{StoreError, WireError};
pub use github::GithubStore;

/// Opaque content revision identifier (the blob SHA on GitHub).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VersionToken(String);

impl VersionToken {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A fetched blob: raw bytes plus the revision they came from.
#[derive(Clone, Debug)]
pub struct Blob {
    pub bytes: Vec<u8>,
    pub token: VersionToken,
}

/// Versioned single-blob store.
///
/// `put` without a token must only succeed when the blob does not exist
/// yet; `put` with a stale token must be rejected as a conflict.
#[allow(async_fn_in_trait)]
pub trait ContentStore {
    async fn fetch(&self, path: &str) -> Result<Option<Blob>, StoreError>;

    async fn put(
        &self,
        path: &str,
        bytes: &[u8],
        message: &str,
        token: Option<&VersionToken>,
    ) -> Result<(), StoreError>;
}

impl<S: ContentStore> ContentStore for &S {
    async fn fetch(&self, path: &str) -> Result<Option<Blob>, StoreError> {
        (**self).fetch(path).await
    }

    async fn put(
        &self,
        path: &str,
        bytes: &[u8],
        message: &str,
        token: Option<&VersionToken>,
    ) -> Result<(), StoreError> {
        (**self).put(path, bytes, message, token).await
    }
}
