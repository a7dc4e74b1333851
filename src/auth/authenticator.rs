//! Authenticator implementation
//!
//! Builds the header set every API request carries.

use super::types::ApiKey;
use crate::error::{Error, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use std::collections::HashMap;

/// Authenticator applies the bearer key and JSON content negotiation headers
#[derive(Debug, Clone)]
pub struct Authenticator {
    api_key: ApiKey,
}

impl Authenticator {
    /// Create a new authenticator for the given key
    pub fn new(api_key: ApiKey) -> Self {
        Self { api_key }
    }

    /// The key this authenticator injects
    pub fn api_key(&self) -> &ApiKey {
        &self.api_key
    }

    /// Value of the `Authorization` header
    pub fn bearer_value(&self) -> String {
        format!("Bearer {}", self.api_key.expose())
    }

    /// Build the default header map for a client.
    ///
    /// `extra` headers are added first so they can never override
    /// the authorization header.
    pub fn headers(&self, extra: &HashMap<String, String>) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();

        for (key, value) in extra {
            let name = HeaderName::from_bytes(key.as_bytes())
                .map_err(|e| Error::config(format!("Invalid header name '{key}': {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| Error::config(format!("Invalid value for header '{key}': {e}")))?;
            headers.insert(name, value);
        }

        let mut auth = HeaderValue::from_str(&self.bearer_value())
            .map_err(|_| Error::config("API key contains characters not allowed in a header"))?;
        auth.set_sensitive(true);

        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        Ok(headers)
    }
}
