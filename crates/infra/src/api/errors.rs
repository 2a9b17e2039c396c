//! API error normalization
//!
//! Every failure leaving [`ApiClient`](super::ApiClient) is an [`ApiError`],
//! decided once from the transport outcome. [`ApiError::body`] gives the
//! uniform `{ message, statusCode, errors, code }` shape the app renders.

use std::time::Duration;

use farmlink_common::{ErrorClassification, ErrorSeverity};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::http::{TransportError, TransportResponse};

pub const DEFAULT_SERVER_MESSAGE: &str = "An error occurred";
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please check your connection.";
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// Categories of API errors for retry logic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorCategory {
    /// 401 and 403
    Authentication,
    /// 429
    RateLimit,
    /// 5xx
    Server,
    /// Other 4xx
    Client,
    /// No response received
    Network,
    /// Request could not be built, or its response could not be read
    Setup,
    Cancelled,
}

/// API operation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The server answered with a non-2xx status
    #[error("{message} (status {status_code})")]
    Server { message: String, status_code: u16, errors: Vec<String>, code: Option<String> },

    /// No response was received
    #[error("{message}")]
    Network { message: String },

    /// The request could not be constructed
    #[error("{message}")]
    Setup { message: String },

    /// A 2xx body did not match the expected type
    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    /// The client shut down before the request settled
    #[error("Request cancelled")]
    Cancelled,
}

/// Serializable error shape handed to the UI layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub message: String,
    pub status_code: u16,
    pub errors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ApiError {
    /// Normalize a non-2xx response.
    pub fn from_response(response: &TransportResponse) -> Self {
        let body = response.json_value();
        let field = |name: &str| body.as_ref().and_then(|b| b.get(name));

        let message = field("message")
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_SERVER_MESSAGE)
            .to_string();
        let errors = field("errors")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .map(|item| item.as_str().map_or_else(|| item.to_string(), str::to_string))
                    .collect()
            })
            .unwrap_or_default();
        let code = field("code").and_then(Value::as_str).map(str::to_string);

        Self::Server { message, status_code: response.status, errors, code }
    }

    pub fn network() -> Self {
        Self::Network { message: NETWORK_ERROR_MESSAGE.to_string() }
    }

    pub fn setup(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.is_empty() {
            return Self::Setup { message: UNEXPECTED_ERROR_MESSAGE.to_string() };
        }
        Self::Setup { message }
    }

    pub fn decode(err: &serde_json::Error) -> Self {
        Self::Decode { message: err.to_string() }
    }

    /// HTTP status, or 0 when no response was received.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Server { status_code, .. } => *status_code,
            Self::Network { .. } | Self::Setup { .. } | Self::Decode { .. } | Self::Cancelled => 0,
        }
    }

    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Server { code, .. } => code.as_deref(),
            Self::Network { .. } => Some("NETWORK_ERROR"),
            Self::Setup { .. } => Some("UNKNOWN_ERROR"),
            Self::Decode { .. } => Some("DECODE_ERROR"),
            Self::Cancelled => Some("CANCELLED"),
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::Server { message, .. }
            | Self::Network { message }
            | Self::Setup { message } => message.clone(),
            Self::Decode { .. } | Self::Cancelled => self.to_string(),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status_code() == 401
    }

    pub fn body(&self) -> ErrorBody {
        let errors = match self {
            Self::Server { errors, .. } => errors.clone(),
            _ => Vec::new(),
        };
        ErrorBody {
            message: self.message(),
            status_code: self.status_code(),
            errors,
            code: self.code().map(str::to_string),
        }
    }

    /// Get the error category for this error
    pub fn category(&self) -> ApiErrorCategory {
        match self {
            Self::Server { status_code: 401 | 403, .. } => ApiErrorCategory::Authentication,
            Self::Server { status_code: 429, .. } => ApiErrorCategory::RateLimit,
            Self::Server { status_code, .. } if *status_code >= 500 => ApiErrorCategory::Server,
            Self::Server { .. } => ApiErrorCategory::Client,
            Self::Network { .. } => ApiErrorCategory::Network,
            Self::Setup { .. } | Self::Decode { .. } => ApiErrorCategory::Setup,
            Self::Cancelled => ApiErrorCategory::Cancelled,
        }
    }
}

impl From<TransportError> for ApiError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Status(response) => Self::from_response(&response),
            TransportError::NoResponse(_) => Self::network(),
            TransportError::Setup(message) => Self::setup(message),
        }
    }
}

/// Request bodies that fail to serialize never reach the transport.
impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::setup(format!("Failed to serialize request: {err}"))
    }
}

impl ErrorClassification for ApiError {
    fn is_retryable(&self) -> bool {
        matches!(
            self.category(),
            ApiErrorCategory::RateLimit | ApiErrorCategory::Server | ApiErrorCategory::Network
        )
    }

    fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ApiErrorCategory::Cancelled => ErrorSeverity::Info,
            ApiErrorCategory::Authentication
            | ApiErrorCategory::RateLimit
            | ApiErrorCategory::Client
            | ApiErrorCategory::Network => ErrorSeverity::Warning,
            ApiErrorCategory::Server | ApiErrorCategory::Setup => ErrorSeverity::Error,
        }
    }

    fn is_critical(&self) -> bool {
        false
    }

    fn retry_after(&self) -> Option<Duration> {
        match self.category() {
            ApiErrorCategory::RateLimit => Some(Duration::from_secs(60)),
            ApiErrorCategory::Server => Some(Duration::from_secs(10)),
            ApiErrorCategory::Network => Some(Duration::from_secs(5)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn server_error_reads_body_fields() {
        let response = TransportResponse::json_body(
            400,
            &json!({ "message": "Invalid quantity", "errors": ["quantity"], "code": "VALIDATION" }),
        );
        let err = ApiError::from(TransportError::Status(response));

        assert_eq!(
            err.body(),
            ErrorBody {
                message: "Invalid quantity".into(),
                status_code: 400,
                errors: vec!["quantity".into()],
                code: Some("VALIDATION".into()),
            }
        );
    }

    #[test]
    fn server_error_defaults_when_body_is_not_json() {
        let response = TransportResponse::new(502, "<html>Bad gateway</html>");
        let err = ApiError::from(TransportError::Status(response));

        assert_eq!(err.message(), DEFAULT_SERVER_MESSAGE);
        assert_eq!(err.status_code(), 502);
        assert_eq!(err.code(), None);
        assert_eq!(err.category(), ApiErrorCategory::Server);
    }

    #[test]
    fn no_response_becomes_network_error() {
        let err = ApiError::from(TransportError::NoResponse("connection refused".into()));

        let body = serde_json::to_value(err.body()).unwrap();
        assert_eq!(
            body,
            json!({
                "message": NETWORK_ERROR_MESSAGE,
                "statusCode": 0,
                "errors": [],
                "code": "NETWORK_ERROR"
            })
        );
    }

    #[test]
    fn setup_error_keeps_its_message() {
        let err = ApiError::from(TransportError::Setup("invalid URL".into()));
        assert_eq!(err.message(), "invalid URL");
        assert_eq!(err.code(), Some("UNKNOWN_ERROR"));
        assert_eq!(ApiError::setup("").message(), UNEXPECTED_ERROR_MESSAGE);
    }

    #[test]
    fn classification() {
        assert!(ApiError::network().is_retryable());
        assert!(!ApiError::Cancelled.is_retryable());

        let unauthorized = ApiError::from_response(&TransportResponse::new(401, ""));
        assert!(unauthorized.is_unauthorized());
        assert!(!unauthorized.is_retryable());
        assert_eq!(unauthorized.category(), ApiErrorCategory::Authentication);

        let limited = ApiError::from_response(&TransportResponse::new(429, ""));
        assert_eq!(limited.retry_after(), Some(Duration::from_secs(60)));
        assert_eq!(limited.severity(), ErrorSeverity::Warning);
    }
}
