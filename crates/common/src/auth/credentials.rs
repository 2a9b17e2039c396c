//! Credential lifecycle on top of a [`TokenStore`]
//!
//! Mirrors what the API client needs from secure storage:
//! - read the access token before every request
//! - read the refresh token when a refresh starts
//! - persist rotated tokens after a refresh, login or register
//! - clear both tokens on logout or unrecoverable refresh failure

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::traits::TokenStore;
use super::types::{Credential, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};

/// Cheap-to-clone handle over the shared token store
#[derive(Clone)]
pub struct CredentialStore {
    store: Arc<dyn TokenStore>,
}

impl CredentialStore {
    /// Wrap a token store.
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self { store }
    }

    /// Underlying store, for callers that need raw errors.
    #[must_use]
    pub fn inner(&self) -> &Arc<dyn TokenStore> {
        &self.store
    }

    /// Current access token, or `None` if absent or unreadable.
    pub async fn access_token(&self) -> Option<String> {
        self.read(ACCESS_TOKEN_KEY).await
    }

    /// Current refresh token, or `None` if absent or unreadable.
    pub async fn refresh_token(&self) -> Option<String> {
        self.read(REFRESH_TOKEN_KEY).await
    }

    /// Persist a new access token. Failures are logged, not returned.
    pub async fn set_access_token(&self, token: &str) {
        self.write(ACCESS_TOKEN_KEY, token).await;
    }

    /// Persist a new refresh token. Failures are logged, not returned.
    pub async fn set_refresh_token(&self, token: &str) {
        self.write(REFRESH_TOKEN_KEY, token).await;
    }

    /// Persist both tokens of a credential.
    pub async fn store(&self, credential: &Credential) {
        self.set_access_token(&credential.access_token).await;
        self.set_refresh_token(&credential.refresh_token).await;
        debug!("Credential stored");
    }

    /// Remove both tokens (logout).
    pub async fn clear(&self) {
        for key in [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY] {
            if let Err(e) = self.store.delete(key).await {
                warn!(key, error = %e, "Failed to clear token");
            }
        }
        info!("Tokens cleared (logged out)");
    }

    /// Whether an access token is currently stored.
    pub async fn is_authenticated(&self) -> bool {
        self.access_token().await.is_some()
    }

    async fn read(&self, key: &str) -> Option<String> {
        match self.store.get(key).await {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "Failed to read token, treating as absent");
                None
            }
        }
    }

    async fn write(&self, key: &str, value: &str) {
        if let Err(e) = self.store.set(key, value).await {
            warn!(key, error = %e, "Failed to persist token");
        }
    }
}
