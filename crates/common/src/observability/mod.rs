//! Tracing subscriber setup
//!
//! Library code only emits `tracing` events. Binaries and test harnesses call
//! [`init_tracing`] once to install a subscriber. The filter comes from
//! `RUST_LOG` when set, otherwise [`DEFAULT_FILTER`].

use tracing_subscriber::EnvFilter;

use crate::error::CommonError;

/// Filter used when `RUST_LOG` is not set
pub const DEFAULT_FILTER: &str = "info,farmlink_infra=debug";

/// Output format for log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human readable, one line per event
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

/// Install the global tracing subscriber
///
/// # Errors
/// Returns `CommonError::Config` if a global subscriber is already set
pub fn init_tracing(format: LogFormat) -> Result<(), CommonError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let result = match format {
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).try_init(),
        LogFormat::Json => tracing_subscriber::fmt().json().with_env_filter(filter).try_init(),
    };

    result.map_err(|e| CommonError::config(format!("Failed to install tracing subscriber: {e}")))
}

/// Install a test-writer subscriber, ignoring "already installed" errors
///
/// Safe to call from every test.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_install_reports_config_error() {
        init_test_tracing();
        let result = init_tracing(LogFormat::Json);
        assert!(matches!(result, Err(CommonError::Config { .. })));
    }
}
