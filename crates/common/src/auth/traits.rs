//! Traits for secret storage backends
//!
//! Abstracts the secure store (platform keychain, in-memory map) so the API
//! client can be tested without touching the system keychain.

use async_trait::async_trait;

use crate::security::KeychainError;

/// Async key/value store for secret strings
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Read a value
    ///
    /// # Returns
    /// `Ok(None)` if nothing is stored under `key`
    ///
    /// # Errors
    /// Returns error if the backend cannot be read
    async fn get(&self, key: &str) -> Result<Option<String>, KeychainError>;

    /// Write a value, replacing any previous one
    ///
    /// # Errors
    /// Returns error if the backend rejects the write
    async fn set(&self, key: &str, value: &str) -> Result<(), KeychainError>;

    /// Remove a value (idempotent)
    ///
    /// # Errors
    /// Returns error if the backend rejects the delete
    async fn delete(&self, key: &str) -> Result<(), KeychainError>;
}
