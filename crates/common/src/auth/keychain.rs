//! [`TokenStore`] on top of the platform keychain.

use async_trait::async_trait;

use crate::auth::traits::TokenStore;
use crate::security::{KeychainError, KeychainProvider};

#[async_trait]
impl TokenStore for KeychainProvider {
    async fn get(&self, key: &str) -> Result<Option<String>, KeychainError> {
        match self.get_secret(key) {
            Ok(value) => Ok(Some(value)),
            Err(KeychainError::NotFound) => Ok(None),
            Err(other) => Err(other),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), KeychainError> {
        self.set_secret(key, value)
    }

    async fn delete(&self, key: &str) -> Result<(), KeychainError> {
        self.delete_secret(key)
    }
}
