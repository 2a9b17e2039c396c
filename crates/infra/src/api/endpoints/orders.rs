use farmlink_domain::{CreateOrderData, OrderQueryParams, UpdateOrderStatus};
use serde::de::DeserializeOwned;
use tracing::instrument;

use super::segment;
use crate::api::{ApiClient, ApiError};
use crate::http::RequestConfig;

/// Order endpoints
pub struct OrdersApi<'a> {
    client: &'a ApiClient,
}

impl<'a> OrdersApi<'a> {
    pub(super) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list<R: DeserializeOwned>(&self, params: Option<&OrderQueryParams>) -> Result<R, ApiError> {
        self.client.request_json(RequestConfig::get("/orders").with_query(&params)?).await
    }

    #[instrument(skip(self))]
    pub async fn get<R: DeserializeOwned>(&self, id: &str) -> Result<R, ApiError> {
        self.client.request_json(RequestConfig::get(format!("/orders/{}", segment(id)))).await
    }

    #[instrument(skip_all, fields(items = data.items.len()))]
    pub async fn create<R: DeserializeOwned>(&self, data: &CreateOrderData) -> Result<R, ApiError> {
        self.client.request_json(RequestConfig::post("/orders").with_json(data)?).await
    }

    #[instrument(skip(self))]
    pub async fn cancel<R: DeserializeOwned>(&self, id: &str) -> Result<R, ApiError> {
        self.client.request_json(RequestConfig::post(format!("/orders/{}/cancel", segment(id)))).await
    }

    pub async fn track<R: DeserializeOwned>(&self, id: &str) -> Result<R, ApiError> {
        self.client.request_json(RequestConfig::get(format!("/orders/{}/track", segment(id)))).await
    }

    #[instrument(skip(self))]
    pub async fn update_status<R: DeserializeOwned>(&self, id: &str, status: &str) -> Result<R, ApiError> {
        let body = UpdateOrderStatus { status: status.to_string() };
        let request = RequestConfig::put(format!("/orders/{}/status", segment(id))).with_json(&body)?;
        self.client.request_json(request).await
    }
}
