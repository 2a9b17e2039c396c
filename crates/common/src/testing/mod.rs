//! Testing utilities and helpers
//!
//! - **[`mocks`]**: token store doubles with failure injection and call
//!   counting

pub mod mocks;

pub use mocks::MockTokenStore;
