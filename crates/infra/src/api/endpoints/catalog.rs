use farmlink_domain::constants::DEFAULT_NEARBY_RADIUS_KM;
use farmlink_domain::{
    CreateFarmData, CreateProductData, FarmQueryParams, NearbyQuery, ProductFilters,
    ProductQueryParams, SearchQuery, UpdateFarmData, UpdateProductData,
};
use serde::de::DeserializeOwned;
use tracing::instrument;

use super::segment;
use crate::api::{ApiClient, ApiError};
use crate::http::RequestConfig;

/// Product catalog endpoints
pub struct ProductsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> ProductsApi<'a> {
    pub(super) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list<R: DeserializeOwned>(
        &self,
        params: Option<&ProductQueryParams>,
    ) -> Result<R, ApiError> {
        self.client.request_json(RequestConfig::get("/products").with_query(&params)?).await
    }

    #[instrument(skip(self))]
    pub async fn get<R: DeserializeOwned>(&self, id: &str) -> Result<R, ApiError> {
        self.client.request_json(RequestConfig::get(format!("/products/{}", segment(id)))).await
    }

    /// Free-text search; filters are merged into the query string
    #[instrument(skip(self, filters))]
    pub async fn search<R: DeserializeOwned>(
        &self,
        query: &str,
        filters: Option<&ProductFilters>,
    ) -> Result<R, ApiError> {
        let params = SearchQuery { q: query, filters };
        self.client.request_json(RequestConfig::get("/products/search").with_query(&params)?).await
    }

    pub async fn by_category<R: DeserializeOwned>(
        &self,
        category: &str,
        params: Option<&ProductQueryParams>,
    ) -> Result<R, ApiError> {
        let request =
            RequestConfig::get(format!("/products/category/{}", segment(category))).with_query(&params)?;
        self.client.request_json(request).await
    }

    pub async fn featured<R: DeserializeOwned>(&self) -> Result<R, ApiError> {
        self.client.request_json(RequestConfig::get("/products/featured")).await
    }

    #[instrument(skip_all, fields(farm_id = %data.farm_id))]
    pub async fn create<R: DeserializeOwned>(&self, data: &CreateProductData) -> Result<R, ApiError> {
        self.client.request_json(RequestConfig::post("/products").with_json(data)?).await
    }

    #[instrument(skip(self, data))]
    pub async fn update<R: DeserializeOwned>(
        &self,
        id: &str,
        data: &UpdateProductData,
    ) -> Result<R, ApiError> {
        let request = RequestConfig::put(format!("/products/{}", segment(id))).with_json(data)?;
        self.client.request_json(request).await
    }

    #[instrument(skip(self))]
    pub async fn delete<R: DeserializeOwned>(&self, id: &str) -> Result<R, ApiError> {
        self.client.request_json(RequestConfig::delete(format!("/products/{}", segment(id)))).await
    }
}

/// Farm endpoints
pub struct FarmsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> FarmsApi<'a> {
    pub(super) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list<R: DeserializeOwned>(&self, params: Option<&FarmQueryParams>) -> Result<R, ApiError> {
        self.client.request_json(RequestConfig::get("/farms").with_query(&params)?).await
    }

    #[instrument(skip(self))]
    pub async fn get<R: DeserializeOwned>(&self, id: &str) -> Result<R, ApiError> {
        self.client.request_json(RequestConfig::get(format!("/farms/{}", segment(id)))).await
    }

    /// Farms around a point; `radius` defaults to 50
    pub async fn nearby<R: DeserializeOwned>(
        &self,
        latitude: f64,
        longitude: f64,
        radius: Option<u32>,
    ) -> Result<R, ApiError> {
        let params = NearbyQuery {
            lat: latitude,
            lng: longitude,
            radius: radius.unwrap_or(DEFAULT_NEARBY_RADIUS_KM),
        };
        self.client.request_json(RequestConfig::get("/farms/nearby").with_query(&params)?).await
    }

    pub async fn search<R: DeserializeOwned>(&self, query: &str) -> Result<R, ApiError> {
        let params: SearchQuery<'_> = SearchQuery { q: query, filters: None };
        self.client.request_json(RequestConfig::get("/farms/search").with_query(&params)?).await
    }

    /// The farm owned by the current user
    pub async fn mine<R: DeserializeOwned>(&self) -> Result<R, ApiError> {
        self.client.request_json(RequestConfig::get("/farms/me")).await
    }

    #[instrument(skip_all)]
    pub async fn create<R: DeserializeOwned>(&self, data: &CreateFarmData) -> Result<R, ApiError> {
        self.client.request_json(RequestConfig::post("/farms").with_json(data)?).await
    }

    #[instrument(skip(self, data))]
    pub async fn update<R: DeserializeOwned>(
        &self,
        id: &str,
        data: &UpdateFarmData,
    ) -> Result<R, ApiError> {
        let request = RequestConfig::put(format!("/farms/{}", segment(id))).with_json(data)?;
        self.client.request_json(request).await
    }
}
