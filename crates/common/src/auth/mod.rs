//! Token storage for authenticated API access
//!
//! The API client keeps exactly one [`Credential`] (access + refresh token)
//! in a [`TokenStore`]. Stores are plain async key/value secret backends;
//! [`CredentialStore`] layers the credential keys and the failure policy on
//! top of them.
//!
//! ```text
//! ┌──────────────────┐
//! │ CredentialStore  │  get/set/clear credential, swallow + log failures
//! └────────┬─────────┘
//!          │
//!          └──► dyn TokenStore
//!                 ├──► KeychainProvider   (platform keychain, `platform`)
//!                 └──► MemoryTokenStore   (process-local)
//! ```
//!
//! # Failure policy
//!
//! Read failures are treated as "no token". Write and delete failures are
//! logged and swallowed. Callers that need the raw error talk to the
//! [`TokenStore`] directly.

mod credentials;
#[cfg(feature = "platform")]
mod keychain;
mod memory;
pub mod traits;
pub mod types;

pub use credentials::CredentialStore;
pub use memory::MemoryTokenStore;
pub use traits::TokenStore;
pub use types::{Credential, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};
