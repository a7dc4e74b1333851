//! A single API request, independent of how it is sent

use crate::types::{JsonValue, Method, Params};

/// One call against the Mallory API.
///
/// `segments` are appended to the client's base URL one by one and
/// percent-encoded there, so a segment never introduces `/`, `?` or `#`.
/// Query pairs keep their insertion order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ApiRequest {
    pub method: Method,
    pub segments: Vec<String>,
    pub query: Vec<(String, String)>,
    pub body: Option<JsonValue>,
}

impl ApiRequest {
    /// Create a request for a `/`-separated route, with no query and no body
    pub fn new(method: Method, route: &str) -> Self {
        Self {
            method,
            segments: split_route(route),
            query: Vec::new(),
            body: None,
        }
    }

    /// GET request
    pub fn get(route: &str) -> Self {
        Self::new(Method::GET, route)
    }

    /// POST request with a JSON body
    pub fn post(route: &str, body: JsonValue) -> Self {
        Self::new(Method::POST, route).json(body)
    }

    /// Append one path segment, taken verbatim
    #[must_use]
    pub fn segment(mut self, segment: impl Into<String>) -> Self {
        self.segments.push(segment.into());
        self
    }

    /// Unencoded path, for logs and assertions
    pub fn path(&self) -> String {
        self.segments.iter().fold(String::new(), |mut path, segment| {
            path.push('/');
            path.push_str(segment);
            path
        })
    }

    /// Add a query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Add every parameter of `params`, skipping empty values
    #[must_use]
    pub fn params(mut self, params: &Params) -> Self {
        self.query.extend(
            params
                .iter()
                .filter(|(_, v)| !v.is_empty())
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        self
    }

    /// Set JSON body
    #[must_use]
    pub fn json(mut self, body: JsonValue) -> Self {
        self.body = Some(body);
        self
    }
}

/// Static route segments; empty pieces from doubled or edge slashes are dropped
pub(crate) fn split_route(route: &str) -> Vec<String> {
    route
        .split('/')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
