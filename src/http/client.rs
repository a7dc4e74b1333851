//! Async HTTP client for the Mallory API
//!
//! Handles:
//! - Base URL joining and query encoding
//! - Bearer authentication and JSON content negotiation headers
//! - Optional client-side rate limiting
//! - Response decoding and error classification
//!
//! Requests are sent once. There is no retry or backoff.

use super::rate_limit::{RateLimiter, RateLimiterConfig};
use super::request::ApiRequest;
use super::transport::{AsyncCall, FromBody, Transport};
use crate::auth::{ApiKey, Authenticator, API_KEY_ENV};
use crate::error::{decode_error_body, Error, Result};
use crate::types::JsonValue;
use reqwest::header::HeaderMap;
use reqwest::Client;
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Production API root
pub const DEFAULT_BASE_URL: &str = "https://api.mallory.ai/v1";

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration shared by the async and blocking clients
#[derive(Clone)]
pub struct HttpClientConfig {
    /// API root all request paths are joined onto
    pub base_url: String,
    /// Explicit API key; when absent the environment is consulted
    pub api_key: Option<String>,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Request timeout
    pub timeout: Duration,
    /// User agent string
    pub user_agent: String,
    /// Extra headers sent with every request
    pub default_headers: HashMap<String, String>,
    /// Client-side throttle, off by default
    pub rate_limit: Option<RateLimiterConfig>,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            api_key_env: API_KEY_ENV.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("mallory-api/{}", env!("CARGO_PKG_VERSION")),
            default_headers: HashMap::new(),
            rate_limit: None,
        }
    }
}

impl fmt::Debug for HttpClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClientConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("api_key_env", &self.api_key_env)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .field("default_headers", &self.default_headers)
            .field("rate_limit", &self.rate_limit)
            .finish()
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }

    /// Resolve the API key and build the header set for every request
    pub(super) fn headers(&self) -> Result<HeaderMap> {
        let key = ApiKey::resolve(self.api_key.as_deref(), &self.api_key_env)?;
        Authenticator::new(key).headers(&self.default_headers)
    }

    /// Build the absolute URL for a request
    pub(super) fn url_for(&self, request: &ApiRequest) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)?;
        url.path_segments_mut()
            .map_err(|()| {
                Error::config(format!("Base URL cannot carry a path: {}", self.base_url))
            })?
            .pop_if_empty()
            .extend(&request.segments);

        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&request.query);
        }
        Ok(url)
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Set the API key
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    /// Read the API key from a different environment variable
    pub fn api_key_env(mut self, name: impl Into<String>) -> Self {
        self.config.api_key_env = name.into();
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set rate limiter
    pub fn rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.config.rate_limit = Some(config);
        self
    }

    /// Disable rate limiting
    pub fn no_rate_limit(mut self) -> Self {
        self.config.rate_limit = None;
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// Decode a finished response.
///
/// A 2xx body is parsed as JSON, with an empty body read as `Null`.
/// Anything else becomes a classified error carrying the decoded body.
pub(super) fn decode_response(status: u16, text: &str) -> Result<JsonValue> {
    if (200..300).contains(&status) {
        if text.trim().is_empty() {
            return Ok(JsonValue::Null);
        }
        return Ok(serde_json::from_str(text)?);
    }

    let err = Error::from_status(status, decode_error_body(text));
    warn!(status, error = %err, "API request failed");
    Err(err)
}

/// Async HTTP client
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
    rate_limiter: Option<RateLimiter>,
}

impl HttpClient {
    /// Create a client with default configuration.
    ///
    /// The key is read from `MALLORY_API_KEY`.
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
    pub async fn execute(&self, request: ApiRequest) -> Result<JsonValue> {
        let url = self.config.url_for(&request)?;

        if let Some(ref limiter) = self.rate_limiter {
            limiter.wait().await;
        }

        debug!(method = %request.method, %url, "Sending request");

        let mut req = self.client.request(request.method.into(), url);
        if let Some(ref body) = request.body {
            req = req.json(body);
        }

        let response = req.send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;
        debug!(status, bytes = text.len(), "Received response");

        decode_response(status, &text)
    }
}

impl Transport for HttpClient {
    type Call<'a, T> = AsyncCall<'a, T>
    where
        Self: 'a,
        T: 'a;

    fn send<'a, T>(&'a self, request: ApiRequest) -> Self::Call<'a, T>
    where
        T: FromBody + Send + 'a,
    {
        Box::pin(async move { self.execute(request).await.map(T::from_body) })
    }

    fn reject<'a, T>(&'a self, error: Error) -> Self::Call<'a, T>
    where
        T: Send + 'a,
    {
        Box::pin(async move { Err(error) })
    }
}

impl fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .field("has_rate_limiter", &self.rate_limiter.is_some())
            .finish_non_exhaustive()
    }
}
