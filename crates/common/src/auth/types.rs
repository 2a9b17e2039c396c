//! Credential types

use std::fmt;

use serde::{Deserialize, Serialize};

/// Store key for the short-lived access token
pub const ACCESS_TOKEN_KEY: &str = "auth_token";

/// Store key for the long-lived refresh token
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";

/// Access/refresh token pair issued by login, register or refresh
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    /// Bearer token attached to every authenticated request
    pub access_token: String,

    /// Token exchanged for a new access token once the current one expires
    pub refresh_token: String,
}

impl Credential {
    /// Create a credential from both tokens.
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self { access_token: access_token.into(), refresh_token: refresh_token.into() }
    }
}

// Tokens never reach logs.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}
