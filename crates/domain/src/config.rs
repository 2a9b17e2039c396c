//! Configuration management

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_API_BASE_URL, DEFAULT_APP_VERSION, DEFAULT_CLIENT_TYPE, DEFAULT_KEYCHAIN_SERVICE,
    DEFAULT_PROBE_INTERVAL_SECS, DEFAULT_TIMEOUT_SECS, PRODUCTION_API_BASE_URL, REFRESH_PATH,
    UPLOAD_TIMEOUT_SECS,
};
use crate::errors::{FarmlinkError, Result};

/// Client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub network: NetworkConfig,
    pub storage: StorageConfig,
}

/// Marketplace API configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL every relative request path is joined to
    pub base_url: String,
    pub timeout_secs: u64,
    pub upload_timeout_secs: u64,
    /// Path of the token refresh endpoint, relative to `base_url`
    pub refresh_path: String,
    pub client_type: String,
    pub platform: String,
    pub app_version: String,
}

/// Connectivity monitoring configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Poll the health endpoint to detect connectivity changes
    pub probe_enabled: bool,
    pub probe_interval_secs: u64,
}

/// Secure storage configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub keychain_service: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            upload_timeout_secs: UPLOAD_TIMEOUT_SECS,
            refresh_path: REFRESH_PATH.to_string(),
            client_type: DEFAULT_CLIENT_TYPE.to_string(),
            platform: std::env::consts::OS.to_string(),
            app_version: DEFAULT_APP_VERSION.to_string(),
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self { probe_enabled: false, probe_interval_secs: DEFAULT_PROBE_INTERVAL_SECS }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { keychain_service: DEFAULT_KEYCHAIN_SERVICE.to_string() }
    }
}

impl ApiConfig {
    /// Default per-request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Timeout applied to file uploads.
    #[must_use]
    pub fn upload_timeout(&self) -> Duration {
        Duration::from_secs(self.upload_timeout_secs)
    }
}

impl NetworkConfig {
    /// Delay between two health probes.
    #[must_use]
    pub fn probe_interval(&self) -> Duration {
        Duration::from_secs(self.probe_interval_secs)
    }
}

impl Config {
    /// Defaults pointed at the production API.
    #[must_use]
    pub fn production() -> Self {
        let mut config = Self::default();
        config.api.base_url = PRODUCTION_API_BASE_URL.to_string();
        config
    }

    /// Check invariants that serde cannot express
    ///
    /// # Errors
    /// Returns `FarmlinkError::Config` naming the first offending field
    pub fn validate(&self) -> Result<()> {
        let base = self.api.base_url.trim();
        if base.is_empty() {
            return Err(FarmlinkError::Config("api.base_url must not be empty".into()));
        }
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(FarmlinkError::Config(format!(
                "api.base_url must be an http(s) URL, got '{base}'"
            )));
        }
        if self.api.timeout_secs == 0 {
            return Err(FarmlinkError::Config("api.timeout_secs must be positive".into()));
        }
        if self.api.upload_timeout_secs == 0 {
            return Err(FarmlinkError::Config("api.upload_timeout_secs must be positive".into()));
        }
        if !self.api.refresh_path.starts_with('/') {
            return Err(FarmlinkError::Config("api.refresh_path must start with '/'".into()));
        }
        if self.network.probe_enabled && self.network.probe_interval_secs == 0 {
            return Err(FarmlinkError::Config(
                "network.probe_interval_secs must be positive when probing is enabled".into(),
            ));
        }
        if self.storage.keychain_service.trim().is_empty() {
            return Err(FarmlinkError::Config("storage.keychain_service must not be empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.api.timeout(), Duration::from_secs(30));
        assert_eq!(config.api.upload_timeout(), Duration::from_secs(60));
        assert_eq!(config.api.client_type, "mobile");
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: Config =
            serde_json::from_str(r#"{ "api": { "base_url": "https://example.com/api" } }"#)
                .unwrap();
        assert_eq!(config.api.base_url, "https://example.com/api");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.storage.keychain_service, "farmlink");
    }

    #[test]
    fn production_differs_only_in_base_url() {
        let production = Config::production();
        assert_eq!(production.api.base_url, "https://farmersmarket.com/api");
        assert!(production.validate().is_ok());

        let mut local = Config::default();
        local.api.base_url = production.api.base_url.clone();
        assert_eq!(local, production);
    }

    #[test]
    fn rejects_non_http_base_url() {
        let mut config = Config::default();
        config.api.base_url = "ftp://example.com".into();
        assert!(matches!(config.validate(), Err(FarmlinkError::Config(_))));
    }

    #[test]
    fn rejects_zero_probe_interval_when_enabled() {
        let mut config = Config::default();
        config.network.probe_enabled = true;
        config.network.probe_interval_secs = 0;
        assert!(config.validate().is_err());
    }
}
