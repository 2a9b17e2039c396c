//! Test doubles for the transport and refresh seams
//!
//! Available under `cfg(test)` and the `test-utils` feature.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::Method;

use crate::api::{ApiError, RefreshEndpoint, RefreshedTokens};
use crate::http::{HttpTransport, RequestBody, RequestConfig, TransportError, TransportResponse};

type Handler = dyn Fn(&RequestConfig) -> Result<TransportResponse, TransportError> + Send + Sync;

/// What the transport saw for one send
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: Method,
    pub url: String,
    pub bearer: Option<String>,
    pub body: Option<serde_json::Value>,
    pub timeout: Option<Duration>,
}

/// Scripted [`HttpTransport`] that records every call in order
pub struct MockTransport {
    handler: Box<Handler>,
    delay: Option<Duration>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockTransport {
    /// Answer every request with `handler`.
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&RequestConfig) -> Result<TransportResponse, TransportError> + Send + Sync + 'static,
    {
        Self { handler: Box::new(handler), delay: None, calls: Mutex::new(Vec::new()) }
    }

    /// 200 with `body` for every request.
    pub fn ok(body: serde_json::Value) -> Self {
        Self::new(move |_| Ok(TransportResponse::json_body(200, &body)))
    }

    /// 401 unless the request carries `Bearer {valid_token}`, in which case
    /// 200 with `body`.
    pub fn requiring_token(valid_token: &str, body: serde_json::Value) -> Self {
        let valid = valid_token.to_string();
        Self::new(move |request| {
            if request.bearer() == Some(valid.as_str()) {
                Ok(TransportResponse::json_body(200, &body))
            } else {
                Err(TransportError::Status(TransportResponse::json_body(
                    401,
                    &serde_json::json!({ "message": "Token expired" }),
                )))
            }
        })
    }

    /// Sleep before answering each request.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Calls whose URL equals `url`, in order.
    pub fn calls_to(&self, url: &str) -> Vec<RecordedCall> {
        self.calls.lock().iter().filter(|call| call.url == url).cloned().collect()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: &RequestConfig) -> Result<TransportResponse, TransportError> {
        let body = match &request.body {
            Some(RequestBody::Json(value)) => Some(value.clone()),
            Some(RequestBody::Multipart(_)) | None => None,
        };
        self.calls.lock().push(RecordedCall {
            method: request.method.clone(),
            url: request.url.clone(),
            bearer: request.bearer().map(str::to_string),
            body,
            timeout: request.timeout,
        });

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        (self.handler)(request)
    }
}

/// Scripted [`RefreshEndpoint`] that counts calls
pub struct MockRefreshEndpoint {
    outcome: Mutex<Result<RefreshedTokens, ApiError>>,
    delay: Duration,
    calls: AtomicUsize,
    received: Mutex<Vec<String>>,
}

impl MockRefreshEndpoint {
    /// Refresh succeeds with `access_token`, rotating the refresh token if
    /// `refresh_token` is set.
    pub fn succeeding(access_token: &str, refresh_token: Option<&str>) -> Self {
        Self::with_outcome(Ok(RefreshedTokens {
            access_token: access_token.to_string(),
            refresh_token: refresh_token.map(str::to_string),
        }))
    }

    /// Refresh is rejected with a 401.
    pub fn failing() -> Self {
        Self::with_outcome(Err(ApiError::from_response(&TransportResponse::new(401, ""))))
    }

    fn with_outcome(outcome: Result<RefreshedTokens, ApiError>) -> Self {
        Self {
            outcome: Mutex::new(outcome),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
            received: Mutex::new(Vec::new()),
        }
    }

    /// Hold every refresh for `delay`, keeping it in flight.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Refresh tokens presented so far, in order.
    pub fn received_tokens(&self) -> Vec<String> {
        self.received.lock().clone()
    }

    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }
}

#[async_trait]
impl RefreshEndpoint for MockRefreshEndpoint {
    async fn refresh(&self, refresh_token: &str) -> Result<RefreshedTokens, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.received.lock().push(refresh_token.to_string());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.outcome.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn requiring_token_rejects_other_bearers() {
        let transport = MockTransport::requiring_token("good", serde_json::json!({}));

        let mut request = RequestConfig::get("/cart");
        request.set_bearer("bad").unwrap();
        assert_eq!(transport.send(&request).await.unwrap_err().status(), Some(401));

        request.set_bearer("good").unwrap();
        assert!(transport.send(&request).await.is_ok());

        let calls = transport.calls_to("/cart");
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].bearer.as_deref(), Some("bad"));
    }

    #[tokio::test]
    async fn refresh_double_counts_calls() {
        let endpoint = MockRefreshEndpoint::succeeding("a2", None);
        let tokens = endpoint.refresh("r1").await.unwrap();

        assert_eq!(tokens.access_token, "a2");
        assert_eq!(endpoint.call_count(), 1);
        assert_eq!(endpoint.received_tokens(), vec!["r1".to_string()]);
    }
}
