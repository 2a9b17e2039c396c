use farmlink_common::Credential;
use farmlink_domain::{
    AuthSession, ForgotPasswordRequest, LoginRequest, LoginResponse, RegisterData,
    ResetPasswordRequest,
};
use serde::de::DeserializeOwned;
use tracing::{info, instrument};

use crate::api::{ApiClient, ApiError};
use crate::http::RequestConfig;

/// Authentication endpoints
pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AuthApi<'a> {
    pub(super) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Log in and persist the returned token pair
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails or the body lacks tokens
    #[instrument(skip_all)]
    pub async fn login<U: DeserializeOwned>(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession<U>, ApiError> {
        let body = LoginRequest { email: email.to_string(), password: password.to_string() };
        let request = RequestConfig::post("/auth/login").with_json(&body)?;

        let response: LoginResponse<U> = self.client.request_json(request).await?;
        Ok(self.start_session(response).await)
    }

    /// Create an account and persist the returned token pair
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails or the body lacks tokens
    #[instrument(skip_all, fields(role = ?data.role))]
    pub async fn register<U: DeserializeOwned>(
        &self,
        data: &RegisterData,
    ) -> Result<AuthSession<U>, ApiError> {
        let request = RequestConfig::post("/auth/register").with_json(data)?;

        let response: LoginResponse<U> = self.client.request_json(request).await?;
        Ok(self.start_session(response).await)
    }

    /// Notify the server, then clear local tokens whatever the outcome
    ///
    /// # Errors
    ///
    /// Returns the logout request's error; tokens are cleared regardless
    #[instrument(skip_all)]
    pub async fn logout(&self) -> Result<(), ApiError> {
        let result = self.client.request(RequestConfig::post("/auth/logout")).await;
        self.client.clear_tokens().await;
        result.map(|_| ())
    }

    pub async fn forgot_password<R: DeserializeOwned>(&self, email: &str) -> Result<R, ApiError> {
        let body = ForgotPasswordRequest { email: email.to_string() };
        self.client.request_json(RequestConfig::post("/auth/forgot-password").with_json(&body)?).await
    }

    pub async fn reset_password<R: DeserializeOwned>(
        &self,
        token: &str,
        password: &str,
    ) -> Result<R, ApiError> {
        let body = ResetPasswordRequest { token: token.to_string(), password: password.to_string() };
        self.client.request_json(RequestConfig::post("/auth/reset-password").with_json(&body)?).await
    }

    pub async fn current_user<U: DeserializeOwned>(&self) -> Result<U, ApiError> {
        self.client.request_json(RequestConfig::get("/auth/me")).await
    }

    async fn start_session<U>(&self, response: LoginResponse<U>) -> AuthSession<U> {
        let LoginResponse { access_token, refresh_token, user } = response;
        self.client.credentials().store(&Credential::new(access_token.clone(), refresh_token)).await;
        info!("Session started");
        AuthSession { user, access_token }
    }
}
