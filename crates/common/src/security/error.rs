use thiserror::Error;

/// Failure reported by a secret backend
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeychainError {
    /// The backend could not be reached or refused the operation
    #[error("Secure storage unavailable: {0}")]
    Unavailable(String),

    /// Nothing is stored under the requested key
    #[error("No secret stored under this key")]
    NotFound,
}
