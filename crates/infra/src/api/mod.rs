//! Marketplace API client
//!
//! This module provides the authenticated client the app talks to the
//! marketplace through, plus typed wrappers for every endpoint group.
//!
//! # Architecture
//!
//! - Sends through [`HttpTransport`](crate::http::HttpTransport) (no direct reqwest)
//! - Bearer token from the credential store on every request
//! - Single-flight token refresh on 401, with waiters replaying themselves
//! - Offline queue for mutating requests, replayed FIFO on reconnect
//! - Errors normalized once into [`ApiError`]

pub mod client;
pub mod endpoints;
pub mod errors;
pub mod refresh;

pub use client::{ApiClient, ApiClientBuilder, ApiResponse};
pub use endpoints::{
    AnalyticsApi, AuthApi, CartApi, FarmsApi, NotificationsApi, OrdersApi, PaymentsApi,
    ProductsApi, ReviewsApi, UploadApi, UserApi,
};
pub use errors::{ApiError, ApiErrorCategory, ErrorBody};
pub use refresh::{HttpRefreshEndpoint, RefreshEndpoint, RefreshedTokens};
