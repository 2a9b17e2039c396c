use farmlink_domain::constants::DEFAULT_TOP_PRODUCTS_LIMIT;
use farmlink_domain::SalesPeriod;
use serde::de::DeserializeOwned;

use crate::api::{ApiClient, ApiError};
use crate::http::RequestConfig;

/// Farmer analytics endpoints
pub struct AnalyticsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AnalyticsApi<'a> {
    pub(super) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn sales_summary<R: DeserializeOwned>(&self, period: SalesPeriod) -> Result<R, ApiError> {
        let request = RequestConfig::get("/analytics/sales")
            .with_query(&serde_json::json!({ "period": period.as_str() }))?;
        self.client.request_json(request).await
    }

    /// Best-selling products; `limit` defaults to 10
    pub async fn top_products<R: DeserializeOwned>(&self, limit: Option<u32>) -> Result<R, ApiError> {
        let limit = limit.unwrap_or(DEFAULT_TOP_PRODUCTS_LIMIT);
        let request =
            RequestConfig::get("/analytics/products/top").with_query(&serde_json::json!({ "limit": limit }))?;
        self.client.request_json(request).await
    }

    pub async fn order_stats<R: DeserializeOwned>(&self) -> Result<R, ApiError> {
        self.client.request_json(RequestConfig::get("/analytics/orders")).await
    }
}
