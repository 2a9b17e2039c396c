//! Configuration loader
//!
//! Loads client configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If `FARMLINK_API_BASE_URL` is not set, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! Every field has a default, so files may be partial. The loaded config is
//! validated before it is returned.
//!
//! ## Environment Variables
//! - `FARMLINK_API_BASE_URL`: API base URL (required for env loading)
//! - `FARMLINK_API_TIMEOUT_SECS`: Default request timeout in seconds
//! - `FARMLINK_UPLOAD_TIMEOUT_SECS`: Upload timeout in seconds
//! - `FARMLINK_APP_VERSION`: Value of the `X-App-Version` header
//! - `FARMLINK_PLATFORM`: Value of the `X-Platform` header
//! - `FARMLINK_PROBE_ENABLED`: Poll the health endpoint for connectivity (true/false)
//! - `FARMLINK_PROBE_INTERVAL_SECS`: Health probe interval in seconds
//! - `FARMLINK_KEYCHAIN_SERVICE`: Keychain service name for stored tokens
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./farmlink.toml` or `./farmlink.json` (current working directory)
//! 2. `./config.toml` or `./config.json` (current working directory)
//! 3. The same names relative to the executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;

use farmlink_domain::{Config, FarmlinkError, Result};

const CONFIG_FILE_NAMES: [&str; 4] = ["farmlink.toml", "farmlink.json", "config.toml", "config.json"];

/// Load configuration with automatic fallback strategy
///
/// # Errors
/// Returns `FarmlinkError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - A value fails validation
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// Only `FARMLINK_API_BASE_URL` is required; unset variables keep their
/// defaults.
///
/// # Errors
/// Returns `FarmlinkError::Config` if the base URL is missing or a variable
/// has an invalid value.
pub fn load_from_env() -> Result<Config> {
    let mut config = Config::default();

    config.api.base_url = env_var("FARMLINK_API_BASE_URL")?;
    if let Some(secs) = env_parse("FARMLINK_API_TIMEOUT_SECS")? {
        config.api.timeout_secs = secs;
    }
    if let Some(secs) = env_parse("FARMLINK_UPLOAD_TIMEOUT_SECS")? {
        config.api.upload_timeout_secs = secs;
    }
    if let Ok(version) = std::env::var("FARMLINK_APP_VERSION") {
        config.api.app_version = version;
    }
    if let Ok(platform) = std::env::var("FARMLINK_PLATFORM") {
        config.api.platform = platform;
    }

    config.network.probe_enabled = env_bool("FARMLINK_PROBE_ENABLED", config.network.probe_enabled);
    if let Some(secs) = env_parse("FARMLINK_PROBE_INTERVAL_SECS")? {
        config.network.probe_interval_secs = secs;
    }

    if let Ok(service) = std::env::var("FARMLINK_KEYCHAIN_SERVICE") {
        config.storage.keychain_service = service;
    }

    config.validate()?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations. Format is detected
/// by file extension.
///
/// # Errors
/// Returns `FarmlinkError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - A value fails validation
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(FarmlinkError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            FarmlinkError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| FarmlinkError::Config(format!("Failed to read config file: {}", e)))?;

    let config = parse_config(&contents, &config_path)?;
    config.validate()?;
    Ok(config)
}

fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| FarmlinkError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| FarmlinkError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(FarmlinkError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe the standard locations for a configuration file
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd);
    }
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            dirs.push(exe_dir.to_path_buf());
        }
    }

    probe_in(&dirs)
}

fn probe_in(dirs: &[PathBuf]) -> Option<PathBuf> {
    dirs.iter()
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.exists())
}

fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        FarmlinkError::Config(format!("Missing required environment variable: {}", key))
    })
}

/// Parse an optional numeric variable. Unset is `Ok(None)`.
fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| FarmlinkError::Config(format!("Invalid value for {}: {}", key, e))),
        Err(_) => Ok(None),
    }
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    const ENV_KEYS: [&str; 8] = [
        "FARMLINK_API_BASE_URL",
        "FARMLINK_API_TIMEOUT_SECS",
        "FARMLINK_UPLOAD_TIMEOUT_SECS",
        "FARMLINK_APP_VERSION",
        "FARMLINK_PLATFORM",
        "FARMLINK_PROBE_ENABLED",
        "FARMLINK_PROBE_INTERVAL_SECS",
        "FARMLINK_KEYCHAIN_SERVICE",
    ];

    fn clear_env() {
        for key in ENV_KEYS {
            std::env::remove_var(key);
        }
    }

    #[test]
    fn test_env_bool_parsing() {
        let _guard = ENV_LOCK.lock().unwrap();

        std::env::set_var("FARMLINK_TEST_BOOL_YES", "YES");
        std::env::set_var("FARMLINK_TEST_BOOL_OFF", "off");

        assert!(env_bool("FARMLINK_TEST_BOOL_YES", false));
        assert!(!env_bool("FARMLINK_TEST_BOOL_OFF", true));
        assert!(env_bool("FARMLINK_TEST_BOOL_MISSING", true));

        std::env::remove_var("FARMLINK_TEST_BOOL_YES");
        std::env::remove_var("FARMLINK_TEST_BOOL_OFF");
    }

    #[test]
    fn test_load_from_env_overrides_defaults() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_env();

        std::env::set_var("FARMLINK_API_BASE_URL", "https://farmersmarket.com/api");
        std::env::set_var("FARMLINK_API_TIMEOUT_SECS", "12");
        std::env::set_var("FARMLINK_PLATFORM", "android");
        std::env::set_var("FARMLINK_PROBE_ENABLED", "true");

        let config = load_from_env().unwrap();
        assert_eq!(config.api.base_url, "https://farmersmarket.com/api");
        assert_eq!(config.api.timeout_secs, 12);
        assert_eq!(config.api.upload_timeout_secs, 60);
        assert_eq!(config.api.platform, "android");
        assert!(config.network.probe_enabled);
        assert_eq!(config.storage.keychain_service, "farmlink");

        clear_env();
    }

    #[test]
    fn test_load_from_env_missing_base_url() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_env();

        let err = load_from_env().unwrap_err();
        assert!(matches!(err, FarmlinkError::Config(_)));
    }

    #[test]
    fn test_load_from_env_invalid_number() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_env();

        std::env::set_var("FARMLINK_API_BASE_URL", "http://localhost:3001/api");
        std::env::set_var("FARMLINK_API_TIMEOUT_SECS", "soon");

        let err = load_from_env().unwrap_err();
        assert!(err.to_string().contains("FARMLINK_API_TIMEOUT_SECS"));

        clear_env();
    }

    #[test]
    fn test_load_from_env_rejects_invalid_url() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_env();

        std::env::set_var("FARMLINK_API_BASE_URL", "localhost");
        assert!(load_from_env().is_err());

        clear_env();
    }

    #[test]
    fn test_parse_config_toml() {
        let toml_content = r#"
[api]
base_url = "https://staging.farmersmarket.com/api"

[network]
probe_enabled = true
probe_interval_secs = 5
"#;

        let config = parse_config(toml_content, Path::new("farmlink.toml")).unwrap();
        assert_eq!(config.api.base_url, "https://staging.farmersmarket.com/api");
        assert_eq!(config.network.probe_interval_secs, 5);
        assert_eq!(config.api.timeout_secs, 30);
    }

    #[test]
    fn test_parse_config_unsupported_format() {
        let result = parse_config("api: {}", Path::new("farmlink.yaml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_probe_prefers_farmlink_over_generic_names() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.json"), "{}").unwrap();
        std::fs::write(dir.path().join("farmlink.json"), "{}").unwrap();

        let found = probe_in(&[dir.path().to_path_buf()]).unwrap();
        assert_eq!(found.file_name().unwrap(), "farmlink.json");
    }

    #[test]
    fn test_probe_returns_none_for_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(probe_in(&[dir.path().to_path_buf()]).is_none());
    }
}
