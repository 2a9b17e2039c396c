//! Typed endpoint groups
//!
//! Each group borrows an [`ApiClient`] and turns a method call into a
//! [`RequestConfig`](crate::http::RequestConfig). Response bodies are
//! deserialized into whatever the caller asks for (`R: DeserializeOwned`);
//! `serde_json::Value` works when no model type exists.

mod analytics;
mod auth;
mod cart;
mod catalog;
mod notifications;
mod orders;
mod payments;
mod reviews;
mod upload;
mod users;

pub use analytics::AnalyticsApi;
pub use auth::AuthApi;
pub use cart::CartApi;
pub use catalog::{FarmsApi, ProductsApi};
pub use notifications::NotificationsApi;
pub use orders::OrdersApi;
pub use payments::PaymentsApi;
pub use reviews::ReviewsApi;
pub use upload::UploadApi;
pub use users::UserApi;

use super::client::ApiClient;

impl ApiClient {
    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(self)
    }

    pub fn products(&self) -> ProductsApi<'_> {
        ProductsApi::new(self)
    }

    pub fn farms(&self) -> FarmsApi<'_> {
        FarmsApi::new(self)
    }

    pub fn cart(&self) -> CartApi<'_> {
        CartApi::new(self)
    }

    pub fn orders(&self) -> OrdersApi<'_> {
        OrdersApi::new(self)
    }

    pub fn payments(&self) -> PaymentsApi<'_> {
        PaymentsApi::new(self)
    }

    pub fn reviews(&self) -> ReviewsApi<'_> {
        ReviewsApi::new(self)
    }

    pub fn user(&self) -> UserApi<'_> {
        UserApi::new(self)
    }

    pub fn notifications(&self) -> NotificationsApi<'_> {
        NotificationsApi::new(self)
    }

    pub fn analytics(&self) -> AnalyticsApi<'_> {
        AnalyticsApi::new(self)
    }

    pub fn upload(&self) -> UploadApi<'_> {
        UploadApi::new(self)
    }
}

/// Percent-encode one path segment.
fn segment(id: &str) -> std::borrow::Cow<'_, str> {
    urlencoding::encode(id)
}
