use std::time::Duration;

use async_trait::async_trait;
use farmlink_domain::constants::{
    DEFAULT_TIMEOUT_SECS, HEADER_APP_VERSION, HEADER_CLIENT_TYPE, HEADER_PLATFORM, HEALTH_PATH,
    HEALTH_TIMEOUT_SECS,
};
use farmlink_domain::ApiConfig;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use reqwest::{Client as ReqwestClient, Method};
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::request::{FormPart, RequestBody, RequestConfig};
use super::response::TransportResponse;
use super::transport::{HttpTransport, TransportError};

/// reqwest-backed transport bound to one API base URL.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: ReqwestClient,
    base_url: String,
    timeout: Duration,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Client for the configured API, with the marketplace default headers.
    ///
    /// # Errors
    /// Returns `TransportError::Setup` if a header value is invalid or the
    /// underlying client cannot be built.
    pub fn from_config(config: &ApiConfig) -> Result<Self, TransportError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(HeaderName::from_static(HEADER_CLIENT_TYPE), header_value(&config.client_type)?);
        headers.insert(HeaderName::from_static(HEADER_PLATFORM), header_value(&config.platform)?);
        headers.insert(HeaderName::from_static(HEADER_APP_VERSION), header_value(&config.app_version)?);

        Self::builder()
            .base_url(config.base_url.clone())
            .timeout(config.timeout())
            .default_headers(headers)
            .build()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Join a relative path onto the base URL; absolute URLs pass through.
    ///
    /// # Errors
    /// Returns `TransportError::Setup` if the result is not a valid URL.
    pub fn resolve_url(&self, target: &str) -> Result<Url, TransportError> {
        let joined = if target.starts_with("http://") || target.starts_with("https://") {
            target.to_string()
        } else {
            format!("{}/{}", self.base_url.trim_end_matches('/'), target.trim_start_matches('/'))
        };
        Url::parse(&joined)
            .map_err(|err| TransportError::Setup(format!("invalid request URL '{joined}': {err}")))
    }

    /// Health check for the API
    ///
    /// # Returns
    ///
    /// `true` if the API answered with a success status, `false` if it
    /// answered with anything else
    ///
    /// # Errors
    ///
    /// Returns the transport error if no response was received
    #[instrument(skip(self))]
    pub async fn health_check(&self) -> Result<bool, TransportError> {
        let request = RequestConfig::get(HEALTH_PATH)
            .with_timeout(Duration::from_secs(HEALTH_TIMEOUT_SECS));

        match self.send(&request).await {
            Ok(_) => {
                debug!("API is healthy");
                Ok(true)
            }
            Err(TransportError::Status(response)) => {
                warn!(status = response.status, "API returned non-success status");
                Ok(false)
            }
            Err(err) => {
                debug!(error = %err, "Health check failed");
                Err(err)
            }
        }
    }
}

#[async_trait]
impl HttpTransport for HttpClient {
    async fn send(&self, request: &RequestConfig) -> Result<TransportResponse, TransportError> {
        let url = self.resolve_url(&request.url)?;
        let method = request.method.clone();

        let mut builder = self
            .client
            .request(method.clone(), url.clone())
            .headers(request.headers.clone())
            .timeout(request.timeout.unwrap_or(self.timeout));

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        match &request.body {
            Some(RequestBody::Json(body)) => builder = builder.json(body),
            Some(RequestBody::Multipart(parts)) => builder = builder.multipart(build_form(parts)?),
            None => {}
        }

        debug!(%method, %url, "sending HTTP request");

        let response = builder.send().await.map_err(|err| {
            debug!(%method, %url, error = %err, "HTTP request failed");
            classify_error(&err)
        })?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(|err| classify_error(&err))?;

        debug!(%method, %url, %status, "received HTTP response");

        let response = TransportResponse { status: status.as_u16(), headers, body: body.to_vec() };
        if status.is_success() {
            Ok(response)
        } else {
            Err(TransportError::Status(response))
        }
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    base_url: String,
    timeout: Duration,
    user_agent: Option<String>,
    default_headers: Option<HeaderMap>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            base_url: farmlink_domain::constants::DEFAULT_API_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: None,
            default_headers: None,
        }
    }
}

impl HttpClientBuilder {
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Timeout used when a request does not carry its own.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn default_headers(mut self, headers: HeaderMap) -> Self {
        self.default_headers = Some(headers);
        self
    }

    /// # Errors
    /// Returns `TransportError::Setup` if the base URL is invalid or reqwest
    /// rejects the configuration.
    pub fn build(self) -> Result<HttpClient, TransportError> {
        Url::parse(&self.base_url).map_err(|err| {
            TransportError::Setup(format!("invalid base URL '{}': {err}", self.base_url))
        })?;

        let mut builder = ReqwestClient::builder().timeout(self.timeout);

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        if let Some(headers) = self.default_headers {
            builder = builder.default_headers(headers);
        }

        let client = builder.build().map_err(|err| TransportError::Setup(err.to_string()))?;

        info!(base_url = %self.base_url, timeout_secs = self.timeout.as_secs(), "HTTP client ready");

        Ok(HttpClient { client, base_url: self.base_url, timeout: self.timeout })
    }
}

fn header_value(value: &str) -> Result<HeaderValue, TransportError> {
    HeaderValue::from_str(value)
        .map_err(|err| TransportError::Setup(format!("invalid header value '{value}': {err}")))
}

fn build_form(parts: &[FormPart]) -> Result<Form, TransportError> {
    let mut form = Form::new();
    for part in parts {
        form = match part {
            FormPart::Text { name, value } => form.text(name.clone(), value.clone()),
            FormPart::File { name, file_name, mime_type, bytes } => {
                let file = Part::bytes(bytes.clone())
                    .file_name(file_name.clone())
                    .mime_str(mime_type)
                    .map_err(|err| classify_error(&err))?;
                form.part(name.clone(), file)
            }
        };
    }
    Ok(form)
}

fn classify_error(err: &reqwest::Error) -> TransportError {
    if err.is_builder() {
        return TransportError::Setup(err.to_string());
    }
    TransportError::NoResponse(err.to_string())
}
