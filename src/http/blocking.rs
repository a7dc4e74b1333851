//! Blocking HTTP client
//!
//! Same request and decoding rules as [`HttpClient`](super::HttpClient),
//! built on `reqwest::blocking`. Must not be created or dropped inside an
//! async runtime.

use super::client::{decode_response, HttpClientConfig};
use super::rate_limit::RateLimiter;
use super::request::ApiRequest;
use super::transport::{FromBody, Transport};
use crate::error::{Error, Result};
use crate::types::JsonValue;
use reqwest::blocking::Client;
use std::fmt;
use tracing::debug;

/// Blocking HTTP client
#[derive(Clone)]
pub struct BlockingHttpClient {
    client: Client,
    config: HttpClientConfig,
    rate_limiter: Option<RateLimiter>,
}

impl BlockingHttpClient {
    /// Create a client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(HttpClientConfig::default())
    }

    /// Create a client with custom configuration.
    ///
    /// Fails with [`Error::Config`] when no API key can be resolved.
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .default_headers(config.headers()?)
            .build()?;

        let rate_limiter = config.rate_limit.as_ref().map(RateLimiter::new);

        Ok(Self {
            client,
            config,
            rate_limiter,
        })
    }

    /// The configuration this client was built from
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Check if rate limiting is enabled
    pub fn has_rate_limiter(&self) -> bool {
        self.rate_limiter.is_some()
    }

    /// Send a request and return the decoded body
    pub fn execute(&self, request: ApiRequest) -> Result<JsonValue> {
        let url = self.config.url_for(&request)?;

        if let Some(ref limiter) = self.rate_limiter {
            limiter.wait_blocking();
        }

        debug!(method = %request.method, %url, "Sending request");

        let mut req = self.client.request(request.method.into(), url);
        if let Some(ref body) = request.body {
            req = req.json(body);
        }

        let response = req.send()?;
        let status = response.status().as_u16();
        let text = response.text()?;
        debug!(status, bytes = text.len(), "Received response");

        decode_response(status, &text)
    }
}

impl Transport for BlockingHttpClient {
    type Call<'a, T> = Result<T>
    where
        Self: 'a,
        T: 'a;

    fn send<'a, T>(&'a self, request: ApiRequest) -> Self::Call<'a, T>
    where
        T: FromBody + Send + 'a,
    {
        self.execute(request).map(T::from_body)
    }

    fn reject<'a, T>(&'a self, error: Error) -> Self::Call<'a, T>
    where
        T: Send + 'a,
    {
        Err(error)
    }
}

impl fmt::Debug for BlockingHttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockingHttpClient")
            .field("config", &self.config)
            .field("has_rate_limiter", &self.rate_limiter.is_some())
            .finish_non_exhaustive()
    }
}
