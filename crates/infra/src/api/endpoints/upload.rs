use farmlink_domain::constants::DEFAULT_UPLOAD_FOLDER;
use farmlink_domain::ImageUpload;
use serde::de::DeserializeOwned;
use tracing::instrument;

use crate::api::{ApiClient, ApiError};
use crate::http::{FormPart, RequestConfig};

/// File upload endpoint
pub struct UploadApi<'a> {
    client: &'a ApiClient,
}

impl<'a> UploadApi<'a> {
    pub(super) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Upload an image into `folder` (`products` by default)
    ///
    /// Sent as multipart with the longer upload timeout. The MIME type
    /// follows the file extension.
    ///
    /// # Errors
    ///
    /// Returns error if the upload fails or times out
    #[instrument(skip_all, fields(file = %image.base_name(), bytes = image.bytes.len()))]
    pub async fn image<R: DeserializeOwned>(
        &self,
        image: &ImageUpload,
        folder: Option<&str>,
    ) -> Result<R, ApiError> {
        let parts = vec![
            FormPart::File {
                name: "file".into(),
                file_name: image.base_name().to_string(),
                mime_type: image.mime_type(),
                bytes: image.bytes.clone(),
            },
            FormPart::Text {
                name: "folder".into(),
                value: folder.unwrap_or(DEFAULT_UPLOAD_FOLDER).to_string(),
            },
        ];

        let request = RequestConfig::post("/upload")
            .with_multipart(parts)
            .with_timeout(self.client.upload_timeout());
        self.client.request_json(request).await
    }
}
