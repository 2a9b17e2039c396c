//! Secure credential storage
//!
//! - [`keychain`]: platform keychain provider (`platform` feature)
//! - [`KeychainError`]: failures shared by every secret backend, including
//!   the in-memory store used by tests and headless builds

mod error;
#[cfg(feature = "platform")]
pub mod keychain;

pub use error::KeychainError;
#[cfg(feature = "platform")]
pub use keychain::KeychainProvider;
