//! HTTP transport module
//!
//! Sends [`ApiRequest`]s to the Mallory API and classifies failures.
//!
//! # Clients
//!
//! - [`HttpClient`]: async, one boxed future per call
//! - [`BlockingHttpClient`]: blocking, built on `reqwest::blocking`
//!
//! Both implement [`Transport`], so resource code is shared. Both resolve the
//! API key when constructed and attach `Authorization: Bearer <key>` plus JSON
//! `Content-Type`/`Accept` headers to every request.

mod blocking;
mod client;
mod rate_limit;
mod request;
mod transport;

pub use blocking::BlockingHttpClient;
pub use client::{
    HttpClient, HttpClientConfig, HttpClientConfigBuilder, DEFAULT_BASE_URL, DEFAULT_TIMEOUT,
};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
pub use request::ApiRequest;
pub(crate) use request::split_route;
pub use transport::{AsyncCall, FromBody, Transport};
