//! Token refresh endpoint
//!
//! The refresh call goes straight to a transport, never through
//! [`ApiClient::request`](super::ApiClient::request): a 401 from the refresh
//! endpoint must not trigger another refresh.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use farmlink_domain::constants::REFRESH_PATH;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::errors::ApiError;
use crate::http::{HttpTransport, RequestConfig};

/// Token pair returned by a successful refresh
///
/// `refresh_token` is only present when the server rotates it.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshedTokens {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

impl fmt::Debug for RefreshedTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshedTokens")
            .field("access_token", &"<redacted>")
            .field("rotated", &self.refresh_token.is_some())
            .finish()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

/// Exchanges a refresh token for a new token pair
#[async_trait]
pub trait RefreshEndpoint: Send + Sync {
    async fn refresh(&self, refresh_token: &str) -> Result<RefreshedTokens, ApiError>;
}

/// `POST /auth/refresh` over a bare transport
pub struct HttpRefreshEndpoint {
    transport: Arc<dyn HttpTransport>,
    path: String,
}

impl HttpRefreshEndpoint {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self::with_path(transport, REFRESH_PATH)
    }

    pub fn with_path(transport: Arc<dyn HttpTransport>, path: impl Into<String>) -> Self {
        Self { transport, path: path.into() }
    }
}

#[async_trait]
impl RefreshEndpoint for HttpRefreshEndpoint {
    #[instrument(skip_all, fields(path = %self.path))]
    async fn refresh(&self, refresh_token: &str) -> Result<RefreshedTokens, ApiError> {
        let request = RequestConfig::post(self.path.clone()).with_json(&RefreshRequest { refresh_token })?;

        let response = self.transport.send(&request).await?;
        debug!(status = response.status, "Refresh endpoint answered");

        response.json().map_err(|err| ApiError::decode(&err))
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::http::HttpClient;

    async fn endpoint_for(server: &MockServer) -> HttpRefreshEndpoint {
        let client = HttpClient::builder().base_url(format!("{}/api", server.uri())).build().unwrap();
        HttpRefreshEndpoint::new(Arc::new(client))
    }

    #[tokio::test]
    async fn posts_refresh_token_and_reads_rotated_pair() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/refresh"))
            .and(body_json(serde_json::json!({ "refreshToken": "r1" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                serde_json::json!({ "accessToken": "a2", "refreshToken": "r2" }),
            ))
            .expect(1)
            .mount(&server)
            .await;

        let tokens = endpoint_for(&server).await.refresh("r1").await.unwrap();
        assert_eq!(tokens.access_token, "a2");
        assert_eq!(tokens.refresh_token.as_deref(), Some("r2"));
    }

    #[tokio::test]
    async fn missing_rotation_leaves_refresh_token_unset() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "accessToken": "a2" })),
            )
            .mount(&server)
            .await;

        let tokens = endpoint_for(&server).await.refresh("r1").await.unwrap();
        assert!(tokens.refresh_token.is_none());
    }

    #[tokio::test]
    async fn rejected_refresh_is_a_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let err = endpoint_for(&server).await.refresh("stale").await.unwrap_err();
        assert!(err.is_unauthorized());
    }
}
