use farmlink_domain::{AddressData, ChangePassword, ImageUpload, UpdateProfileData};
use serde::de::DeserializeOwned;
use tracing::instrument;

use super::segment;
use crate::api::{ApiClient, ApiError};
use crate::http::{FormPart, RequestConfig};

const AVATAR_FILE_NAME: &str = "avatar.jpg";
const AVATAR_MIME_TYPE: &str = "image/jpeg";

/// Current-user profile endpoints
pub struct UserApi<'a> {
    client: &'a ApiClient,
}

impl<'a> UserApi<'a> {
    pub(super) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn profile<R: DeserializeOwned>(&self) -> Result<R, ApiError> {
        self.client.request_json(RequestConfig::get("/users/me")).await
    }

    pub async fn update_profile<R: DeserializeOwned>(&self, data: &UpdateProfileData) -> Result<R, ApiError> {
        self.client.request_json(RequestConfig::put("/users/me").with_json(data)?).await
    }

    #[instrument(skip_all)]
    pub async fn change_password<R: DeserializeOwned>(
        &self,
        current_password: &str,
        new_password: &str,
    ) -> Result<R, ApiError> {
        let body = ChangePassword {
            current_password: current_password.to_string(),
            new_password: new_password.to_string(),
        };
        self.client.request_json(RequestConfig::put("/users/me/password").with_json(&body)?).await
    }

    /// Upload a new avatar; always sent as `avatar.jpg` / `image/jpeg`
    #[instrument(skip_all, fields(bytes = image.bytes.len()))]
    pub async fn upload_avatar<R: DeserializeOwned>(&self, image: &ImageUpload) -> Result<R, ApiError> {
        let request = RequestConfig::post("/users/me/avatar").with_multipart(vec![FormPart::File {
            name: "avatar".into(),
            file_name: AVATAR_FILE_NAME.into(),
            mime_type: AVATAR_MIME_TYPE.into(),
            bytes: image.bytes.clone(),
        }]);
        self.client.request_json(request).await
    }

    pub async fn addresses<R: DeserializeOwned>(&self) -> Result<R, ApiError> {
        self.client.request_json(RequestConfig::get("/users/me/addresses")).await
    }

    pub async fn add_address<R: DeserializeOwned>(&self, data: &AddressData) -> Result<R, ApiError> {
        self.client.request_json(RequestConfig::post("/users/me/addresses").with_json(data)?).await
    }

    pub async fn update_address<R: DeserializeOwned>(&self, id: &str, data: &AddressData) -> Result<R, ApiError> {
        let request = RequestConfig::put(format!("/users/me/addresses/{}", segment(id))).with_json(data)?;
        self.client.request_json(request).await
    }

    pub async fn delete_address<R: DeserializeOwned>(&self, id: &str) -> Result<R, ApiError> {
        self.client
            .request_json(RequestConfig::delete(format!("/users/me/addresses/{}", segment(id))))
            .await
    }
}
