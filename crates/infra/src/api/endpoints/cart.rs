use farmlink_domain::{
    AddCartItem, CartMergeStrategy, CartSyncItem, CartSyncRequest, CartValidationResult,
    UpdateCartItem,
};
use serde::de::DeserializeOwned;
use tracing::instrument;

use super::segment;
use crate::api::{ApiClient, ApiError};
use crate::http::RequestConfig;

/// Shopping cart endpoints
pub struct CartApi<'a> {
    client: &'a ApiClient,
}

impl<'a> CartApi<'a> {
    pub(super) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn get<R: DeserializeOwned>(&self) -> Result<R, ApiError> {
        self.client.request_json(RequestConfig::get("/cart")).await
    }

    #[instrument(skip(self))]
    pub async fn add<R: DeserializeOwned>(
        &self,
        product_id: &str,
        quantity: u32,
        farm_id: Option<&str>,
    ) -> Result<R, ApiError> {
        let body = AddCartItem {
            product_id: product_id.to_string(),
            quantity,
            farm_id: farm_id.map(str::to_string),
        };
        self.client.request_json(RequestConfig::post("/cart").with_json(&body)?).await
    }

    #[instrument(skip(self))]
    pub async fn update<R: DeserializeOwned>(&self, item_id: &str, quantity: u32) -> Result<R, ApiError> {
        let request =
            RequestConfig::put(format!("/cart/{}", segment(item_id))).with_json(&UpdateCartItem { quantity })?;
        self.client.request_json(request).await
    }

    #[instrument(skip(self))]
    pub async fn remove<R: DeserializeOwned>(&self, item_id: &str) -> Result<R, ApiError> {
        self.client.request_json(RequestConfig::delete(format!("/cart/{}", segment(item_id)))).await
    }

    pub async fn clear<R: DeserializeOwned>(&self) -> Result<R, ApiError> {
        self.client.request_json(RequestConfig::delete("/cart")).await
    }

    /// Merge the device-local cart into the server cart after login
    ///
    /// Without a strategy the server sums quantities of items present in
    /// both carts.
    #[instrument(skip(self, local_items), fields(items = local_items.len()))]
    pub async fn sync<R: DeserializeOwned>(
        &self,
        local_items: &[CartSyncItem],
        strategy: Option<CartMergeStrategy>,
    ) -> Result<R, ApiError> {
        let body = CartSyncRequest { local_items, strategy };
        self.client.request_json(RequestConfig::post("/cart/sync").with_json(&body)?).await
    }

    /// Check stock and availability; the server may adjust quantities
    pub async fn validate(&self) -> Result<CartValidationResult, ApiError> {
        self.client.request_json(RequestConfig::get("/cart/validate")).await
    }

    /// Extend item reservations so they do not expire during checkout
    pub async fn refresh_reservations<R: DeserializeOwned>(&self) -> Result<R, ApiError> {
        self.client.request_json(RequestConfig::post("/cart/refresh-reservations")).await
    }
}
