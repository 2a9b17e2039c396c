use farmlink_domain::{NotificationPreferences, PushTokenRegistration};
use serde::de::DeserializeOwned;
use tracing::instrument;

use super::segment;
use crate::api::{ApiClient, ApiError};
use crate::http::RequestConfig;

/// Notification endpoints
pub struct NotificationsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> NotificationsApi<'a> {
    pub(super) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list<R: DeserializeOwned>(&self) -> Result<R, ApiError> {
        self.client.request_json(RequestConfig::get("/notifications")).await
    }

    pub async fn mark_read<R: DeserializeOwned>(&self, id: &str) -> Result<R, ApiError> {
        let path = format!("/notifications/{}/read", segment(id));
        self.client.request_json(RequestConfig::put(path)).await
    }

    pub async fn mark_all_read<R: DeserializeOwned>(&self) -> Result<R, ApiError> {
        self.client.request_json(RequestConfig::put("/notifications/read-all")).await
    }

    /// Register this device's push token, tagged with the configured platform
    #[instrument(skip_all)]
    pub async fn update_push_token<R: DeserializeOwned>(&self, token: &str) -> Result<R, ApiError> {
        let body = PushTokenRegistration {
            token: token.to_string(),
            platform: self.client.platform().to_string(),
        };
        self.client.request_json(RequestConfig::post("/notifications/push-token").with_json(&body)?).await
    }

    pub async fn preferences(&self) -> Result<NotificationPreferences, ApiError> {
        self.client.request_json(RequestConfig::get("/notifications/preferences")).await
    }

    pub async fn update_preferences<R: DeserializeOwned>(
        &self,
        preferences: &NotificationPreferences,
    ) -> Result<R, ApiError> {
        let request = RequestConfig::put("/notifications/preferences").with_json(preferences)?;
        self.client.request_json(request).await
    }
}
