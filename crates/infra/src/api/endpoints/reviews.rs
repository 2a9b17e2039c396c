use farmlink_domain::{CreateReviewData, UpdateReviewData};
use serde::de::DeserializeOwned;

use super::segment;
use crate::api::{ApiClient, ApiError};
use crate::http::RequestConfig;

/// Review endpoints
pub struct ReviewsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> ReviewsApi<'a> {
    pub(super) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn for_product<R: DeserializeOwned>(&self, product_id: &str) -> Result<R, ApiError> {
        let path = format!("/products/{}/reviews", segment(product_id));
        self.client.request_json(RequestConfig::get(path)).await
    }

    pub async fn for_farm<R: DeserializeOwned>(&self, farm_id: &str) -> Result<R, ApiError> {
        self.client.request_json(RequestConfig::get(format!("/farms/{}/reviews", segment(farm_id)))).await
    }

    pub async fn create<R: DeserializeOwned>(&self, data: &CreateReviewData) -> Result<R, ApiError> {
        self.client.request_json(RequestConfig::post("/reviews").with_json(data)?).await
    }

    pub async fn update<R: DeserializeOwned>(&self, id: &str, data: &UpdateReviewData) -> Result<R, ApiError> {
        let request = RequestConfig::put(format!("/reviews/{}", segment(id))).with_json(data)?;
        self.client.request_json(request).await
    }

    pub async fn delete<R: DeserializeOwned>(&self, id: &str) -> Result<R, ApiError> {
        self.client.request_json(RequestConfig::delete(format!("/reviews/{}", segment(id)))).await
    }
}
