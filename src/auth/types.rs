//! API key type and resolution

use crate::error::{Error, Result};
use std::fmt;

/// Environment variable consulted when no key is passed explicitly
pub const API_KEY_ENV: &str = "MALLORY_API_KEY";

/// A resolved, non-empty API key.
///
/// `Debug` output is redacted so keys never end up in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wrap a key value. Empty or whitespace-only values are rejected.
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(missing_key_error(API_KEY_ENV));
        }
        Ok(Self(value))
    }

    /// Resolve a key from an explicit value, falling back to `env_var`.
    pub fn resolve(explicit: Option<&str>, env_var: &str) -> Result<Self> {
        Self::resolve_with(explicit, env_var, |name| std::env::var(name).ok())
    }

    /// Resolve a key with a custom environment lookup.
    ///
    /// An empty explicit value counts as absent.
    pub fn resolve_with<F>(explicit: Option<&str>, env_var: &str, lookup: F) -> Result<Self>
    where
        F: FnOnce(&str) -> Option<String>,
    {
        if let Some(key) = explicit.filter(|k| !k.trim().is_empty()) {
            return Ok(Self(key.to_string()));
        }

        match lookup(env_var).filter(|k| !k.trim().is_empty()) {
            Some(key) => Ok(Self(key)),
            None => Err(missing_key_error(env_var)),
        }
    }

    /// The raw key value
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

fn missing_key_error(env_var: &str) -> Error {
    Error::config(format!(
        "No API key provided. Pass api_key or set the {env_var} environment variable."
    ))
}
