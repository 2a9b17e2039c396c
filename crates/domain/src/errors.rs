//! Error types used outside the request path

use thiserror::Error;

/// Error raised while assembling a client (configuration, local I/O)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FarmlinkError {
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for Farmlink setup operations
pub type Result<T> = std::result::Result<T, FarmlinkError>;
