//! Mock implementations of common traits

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::auth::TokenStore;
use crate::security::KeychainError;

/// In-memory [`TokenStore`] that counts calls and can be told to fail
#[derive(Debug, Default)]
pub struct MockTokenStore {
    entries: Mutex<HashMap<String, String>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    gets: AtomicUsize,
    sets: AtomicUsize,
    deletes: Mutex<HashMap<String, usize>>,
}

impl MockTokenStore {
    /// Create an empty mock store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with entries.
    #[must_use]
    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let store = Self::new();
        {
            let mut map = store.entries.lock();
            for (key, value) in entries {
                map.insert(key.to_string(), value.to_string());
            }
        }
        store
    }

    /// Make every `get` fail with `KeychainError::Unavailable`.
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every `set`/`delete` fail with `KeychainError::Unavailable`.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Peek at a value without counting the read.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    /// Number of `get` calls so far.
    #[must_use]
    pub fn get_count(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    /// Number of `set` calls so far.
    #[must_use]
    pub fn set_count(&self) -> usize {
        self.sets.load(Ordering::SeqCst)
    }

    /// Number of `delete` calls for a key.
    #[must_use]
    pub fn delete_count(&self, key: &str) -> usize {
        self.deletes.lock().get(key).copied().unwrap_or(0)
    }
}

#[async_trait]
impl TokenStore for MockTokenStore {
    async fn get(&self, key: &str) -> Result<Option<String>, KeychainError> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(KeychainError::Unavailable("mock read failure".into()));
        }
        Ok(self.entries.lock().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), KeychainError> {
        self.sets.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(KeychainError::Unavailable("mock write failure".into()));
        }
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), KeychainError> {
        *self.deletes.lock().entry(key.to_string()).or_insert(0) += 1;
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(KeychainError::Unavailable("mock delete failure".into()));
        }
        self.entries.lock().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn counts_calls_and_injects_failures() {
        let store = MockTokenStore::with_entries([("auth_token", "abc")]);

        assert_eq!(store.get("auth_token").await.unwrap().as_deref(), Some("abc"));
        store.set_fail_reads(true);
        assert!(store.get("auth_token").await.is_err());
        assert_eq!(store.get_count(), 2);

        store.set_fail_writes(true);
        assert!(store.delete("auth_token").await.is_err());
        assert_eq!(store.delete_count("auth_token"), 1);
        assert_eq!(store.value("auth_token").as_deref(), Some("abc"));
    }
}
