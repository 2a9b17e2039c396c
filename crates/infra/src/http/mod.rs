//! HTTP transport
//!
//! [`HttpTransport`] is the seam the API client sends through. The
//! production implementation is [`HttpClient`] (reqwest); tests substitute
//! a scripted transport.
//!
//! Every failure is classified here, once:
//! - a response with a non-2xx status → [`TransportError::Status`]
//! - no response at all (timeout, connect, I/O) → [`TransportError::NoResponse`]
//! - the request could not be built → [`TransportError::Setup`]

mod client;
mod request;
mod response;
mod transport;

pub use client::{HttpClient, HttpClientBuilder};
pub use request::{FormPart, RequestBody, RequestConfig};
pub use response::TransportResponse;
pub use transport::{HttpTransport, TransportError};
