//! Integration tests for error classification

#![cfg(feature = "foundation")]

use farmlink_common::error::{CommonError, ErrorClassification, ErrorSeverity};

#[test]
fn config_errors_are_not_retryable() {
    let err = CommonError::config("api.timeout_secs must be positive");
    assert!(!err.is_retryable());
    assert_eq!(err.severity(), ErrorSeverity::Error);
    assert_eq!(err.retry_after(), None);
    assert!(err.to_string().contains("api.timeout_secs"));
}

#[test]
fn severity_labels_match_log_levels() {
    let labels: Vec<String> =
        [ErrorSeverity::Info, ErrorSeverity::Warning, ErrorSeverity::Error, ErrorSeverity::Critical]
            .iter()
            .map(ToString::to_string)
            .collect();
    assert_eq!(labels, ["INFO", "WARN", "ERROR", "CRITICAL"]);
}
