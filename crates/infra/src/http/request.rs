use std::fmt;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

/// Body of an outgoing request
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Json(Value),
    Multipart(Vec<FormPart>),
}

/// One part of a multipart form
#[derive(Clone, PartialEq, Eq)]
pub enum FormPart {
    Text { name: String, value: String },
    File { name: String, file_name: String, mime_type: String, bytes: Vec<u8> },
}

impl fmt::Debug for FormPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text { name, value } => {
                f.debug_struct("Text").field("name", name).field("value", value).finish()
            }
            Self::File { name, file_name, mime_type, bytes } => f
                .debug_struct("File")
                .field("name", name)
                .field("file_name", file_name)
                .field("mime_type", mime_type)
                .field("len", &bytes.len())
                .finish(),
        }
    }
}

/// Everything needed to send (and later replay) a request
///
/// A config is self-contained: it can sit in the offline queue and be sent
/// again verbatim. `url` is either absolute or relative to the transport's
/// base URL.
#[derive(Debug, Clone)]
pub struct RequestConfig {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub query: Vec<(String, String)>,
    pub body: Option<RequestBody>,
    /// Per-request timeout; the client's default applies when unset
    pub timeout: Option<Duration>,
    pub(crate) retried: bool,
}

impl RequestConfig {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HeaderMap::new(),
            query: Vec::new(),
            body: None,
            timeout: None,
            retried: false,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST, url)
    }

    pub fn put(url: impl Into<String>) -> Self {
        Self::new(Method::PUT, url)
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(Method::DELETE, url)
    }

    /// Serialize `body` as the JSON payload.
    ///
    /// # Errors
    /// Returns the `serde_json` error if `body` cannot be serialized.
    pub fn with_json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, serde_json::Error> {
        self.body = Some(RequestBody::Json(serde_json::to_value(body)?));
        Ok(self)
    }

    /// Flatten `params` (a struct or map) into query pairs.
    ///
    /// `null` fields are dropped and arrays repeat their key.
    ///
    /// # Errors
    /// Fails if `params` does not serialize to a JSON object.
    pub fn with_query<T: Serialize + ?Sized>(mut self, params: &T) -> Result<Self, serde_json::Error> {
        match serde_json::to_value(params)? {
            Value::Object(map) => {
                for (key, value) in map {
                    push_query_value(&mut self.query, &key, value);
                }
                Ok(self)
            }
            Value::Null => Ok(self),
            _ => Err(<serde_json::Error as serde::ser::Error>::custom(
                "query parameters must serialize to an object",
            )),
        }
    }

    pub fn with_multipart(mut self, parts: Vec<FormPart>) -> Self {
        self.body = Some(RequestBody::Multipart(parts));
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Set `Authorization: Bearer <token>`, replacing any previous value.
    ///
    /// # Errors
    /// Fails if the token contains bytes that are not valid in a header.
    pub fn set_bearer(&mut self, token: &str) -> Result<(), reqwest::header::InvalidHeaderValue> {
        let mut value = HeaderValue::from_str(&format!("Bearer {token}"))?;
        value.set_sensitive(true);
        self.headers.insert(AUTHORIZATION, value);
        Ok(())
    }

    pub fn bearer(&self) -> Option<&str> {
        self.headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
    }

    /// Whether this request has already been replayed after a 401.
    pub fn is_retried(&self) -> bool {
        self.retried
    }
}

fn push_query_value(query: &mut Vec<(String, String)>, key: &str, value: Value) {
    match value {
        Value::Null => {}
        Value::String(text) => query.push((key.to_string(), text)),
        Value::Array(items) => {
            for item in items {
                push_query_value(query, key, item);
            }
        }
        other => query.push((key.to_string(), other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn set_bearer_replaces_existing_header() {
        let mut config = RequestConfig::get("/cart");
        config.set_bearer("old").unwrap();
        config.set_bearer("new").unwrap();

        assert_eq!(config.headers.get_all(AUTHORIZATION).iter().count(), 1);
        assert_eq!(config.bearer(), Some("new"));
    }

    #[test]
    fn query_flattening_skips_nulls_and_stringifies_scalars() {
        let config = RequestConfig::get("/products")
            .with_query(&json!({ "page": 2, "inStock": true, "q": "kale", "farmId": null }))
            .unwrap();

        assert!(config.query.contains(&("page".into(), "2".into())));
        assert!(config.query.contains(&("inStock".into(), "true".into())));
        assert!(config.query.contains(&("q".into(), "kale".into())));
        assert_eq!(config.query.len(), 3);
    }

    #[test]
    fn query_rejects_non_object_params() {
        assert!(RequestConfig::get("/x").with_query(&[1, 2]).is_err());
    }

    #[test]
    fn new_config_is_not_retried() {
        assert!(!RequestConfig::post("/orders").is_retried());
    }
}
