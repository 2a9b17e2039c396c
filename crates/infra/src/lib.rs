//! # Farmlink Infrastructure
//!
//! I/O side of the marketplace client.
//!
//! This crate contains:
//! - The reqwest-backed HTTP transport
//! - The authenticated API client and its endpoint groups
//! - Connectivity observers
//! - Configuration loading
//!
//! ## Architecture
//! - Shares request/response shapes from `farmlink-domain`
//! - Token storage and error classification come from `farmlink-common`

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]

pub mod api;
pub mod config;
pub mod http;
pub mod network;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

// Re-export commonly used items
pub use api::{ApiClient, ApiClientBuilder, ApiError, ApiErrorCategory, ApiResponse};
pub use http::{HttpClient, HttpTransport, RequestConfig, TransportError, TransportResponse};
pub use network::{ConnectivityObserver, NetworkMonitor, ProbeMonitor};
