//! Error types for the Mallory API client
//!
//! This module defines the error hierarchy for the entire crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.
//!
//! Non-2xx responses are classified once, at the HTTP boundary, by
//! [`Error::from_status`]. Resource code never sees a raw error response.

use serde_json::Value;
use thiserror::Error;

/// The main error type for the Mallory API client
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Classified API Errors
    // ============================================================================
    #[error("{message}")]
    Authentication {
        message: String,
        status: u16,
        body: Value,
    },

    #[error("{message}")]
    NotFound {
        message: String,
        status: u16,
        body: Value,
    },

    #[error("{message}")]
    Validation {
        message: String,
        status: u16,
        body: Value,
    },

    #[error("{message}")]
    RateLimited {
        message: String,
        status: u16,
        body: Value,
    },

    #[error("{message}")]
    Api {
        message: String,
        status: u16,
        body: Value,
    },

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Dispatch Errors
    // ============================================================================
    #[error("Unknown resource: {name}")]
    UnknownResource { name: String },

    #[error("Unknown method '{operation}' on resource '{resource}'")]
    UnknownOperation { resource: String, operation: String },

    #[error("{message}")]
    MissingArgument { message: String },

    #[error("{message}")]
    Usage { message: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing argument error
    pub fn missing_argument(message: impl Into<String>) -> Self {
        Self::MissingArgument {
            message: message.into(),
        }
    }

    /// Create a command-line usage error
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage {
            message: message.into(),
        }
    }

    /// Create an unknown operation error
    pub fn unknown_operation(resource: impl Into<String>, operation: impl Into<String>) -> Self {
        Self::UnknownOperation {
            resource: resource.into(),
            operation: operation.into(),
        }
    }

    /// Classify a non-2xx response.
    ///
    /// 401 and 403 are authentication failures, 404 not-found, 422
    /// validation, 429 rate limiting. Every other status is a generic
    /// API failure.
    pub fn from_status(status: u16, body: Value) -> Self {
        match status {
            401 | 403 => Self::Authentication {
                message: format!("Authentication failed ({status})"),
                status,
                body,
            },
            404 => Self::NotFound {
                message: "Resource not found".to_string(),
                status,
                body,
            },
            422 => Self::Validation {
                message: format!("Validation error: {}", display_body(&body)),
                status,
                body,
            },
            429 => Self::RateLimited {
                message: "Rate limit exceeded".to_string(),
                status,
                body,
            },
            _ => Self::Api {
                message: format!("API request failed ({status})"),
                status,
                body,
            },
        }
    }

    /// HTTP status code of a classified API failure
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Authentication { status, .. }
            | Error::NotFound { status, .. }
            | Error::Validation { status, .. }
            | Error::RateLimited { status, .. }
            | Error::Api { status, .. } => Some(*status),
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Decoded response body of a classified API failure
    pub fn response_body(&self) -> Option<&Value> {
        match self {
            Error::Authentication { body, .. }
            | Error::NotFound { body, .. }
            | Error::Validation { body, .. }
            | Error::RateLimited { body, .. }
            | Error::Api { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Check if this error came from a classified non-2xx response
    pub fn is_api_error(&self) -> bool {
        self.response_body().is_some()
    }
}

/// Raw text bodies are shown without JSON quoting.
fn display_body(body: &Value) -> String {
    match body {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Decode an error body: JSON if it parses, the raw text otherwise,
/// `Null` when empty.
pub fn decode_error_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

/// Result type alias for the Mallory API client
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error, turning it into a configuration error
    fn context(self, message: impl Into<String>) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::config(format!("{}: {}", message.into(), inner))
        })
    }
}
