//! In-memory `ContentStore` with the remote's optimistic-concurrency
//! semantics: writes must present the revision they read, creation must
//! present nothing.

use std::sync::Mutex;

use tallybot::core::Ledger;
use tallybot::store::{Blob, ContentStore, StoreError, VersionToken, wire};

#[derive(Default)]
struct Inner {
    /// Blob bytes plus a revision counter standing in for the SHA.
    blob: Option<(Vec<u8>, u64)>,
    /// Number of upcoming puts to reject with a conflict, simulating a
    /// concurrent writer.
    forced_conflicts: usize,
    /// Status to fail every fetch with, when set.
    get_failure: Option<u16>,
    /// Commit messages of successful puts.
    messages: Vec<String>,
    fetches: usize,
    put_attempts: usize,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_ledger(ledger: &Ledger) -> Self {
        let bytes = wire::encode_ledger(ledger).unwrap();
        Self::with_bytes(bytes)
    }

    pub fn with_bytes(bytes: Vec<u8>) -> Self {
        let store = Self::default();
        store.inner.lock().unwrap().blob = Some((bytes, 0));
        store
    }

    /// Reject the next `n` puts with a version conflict.
    pub fn force_conflicts(&self, n: usize) {
        self.inner.lock().unwrap().forced_conflicts = n;
    }

    /// Fail every fetch with `status`.
    pub fn fail_gets_with(&self, status: u16) {
        self.inner.lock().unwrap().get_failure = Some(status);
    }

    pub fn ledger(&self) -> Option<Ledger> {
        let inner = self.inner.lock().unwrap();
        let (bytes, _) = inner.blob.as_ref()?;
        Some(wire::decode_ledger(bytes).unwrap())
    }

    pub fn messages(&self) -> Vec<String> {
        self.inner.lock().unwrap().messages.clone()
    }

    pub fn fetches(&self) -> usize {
        self.inner.lock().unwrap().fetches
    }

    pub fn put_attempts(&self) -> usize {
        self.inner.lock().unwrap().put_attempts
    }
}

impl ContentStore for MemoryStore {
    async fn fetch(&self, _path: &str) -> Result<Option<Blob>, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.fetches += 1;
        if let Some(status) = inner.get_failure {
            return Err(StoreError::Get(status));
        }
        Ok(inner.blob.as_ref().map(|(bytes, rev)| Blob {
            bytes: bytes.clone(),
            token: VersionToken::new(rev.to_string()),
        }))
    }

    async fn put(
        &self,
        _path: &str,
        bytes: &[u8],
        message: &str,
        token: Option<&VersionToken>,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.put_attempts += 1;
        if inner.forced_conflicts > 0 {
            inner.forced_conflicts -= 1;
            return Err(StoreError::Conflict);
        }
        let current_rev = inner.blob.as_ref().map(|(_, rev)| *rev);
        let accepted = match (current_rev, token) {
            (Some(rev), Some(token)) => token.as_str() == rev.to_string(),
            (None, None) => true,
            // Missing token on an existing blob, or a token for a blob
            // that does not exist.
            _ => false,
        };
        if !accepted {
            return Err(StoreError::Conflict);
        }
        inner.blob = Some((bytes.to_vec(), current_rev.map_or(0, |rev| rev + 1)));
        inner.messages.push(message.to_string());
        Ok(())
    }
}
