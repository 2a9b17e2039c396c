//! # Farmlink Domain
//!
//! Marketplace domain types shared by the Farmlink client crates.
//!
//! This crate contains:
//! - Request payloads and response models for the marketplace API
//! - Client configuration structures
//! - Domain error types and Result definitions
//! - Client-level constants (header names, default timeouts)
//!
//! ## Architecture
//! - No dependencies on other Farmlink crates
//! - Only serde-level external dependencies
//! - Pure data structures; no I/O

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::{ApiConfig, Config, NetworkConfig, StorageConfig};
pub use errors::{FarmlinkError, Result};
pub use types::*;
