//! Pagination types
//!
//! Defines the canonical page shape and the values exchanged between the
//! driver and a fetch operation.

use crate::types::{JsonValue, Params};
use serde::ser::{Serialize, SerializeStruct, Serializer};

/// Default `limit` assumed when an envelope does not carry one
const ENVELOPE_DEFAULT_LIMIT: u64 = 100;

/// Canonical paginated result.
///
/// Built fresh for every response and immutable afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PagedResult {
    items: Vec<JsonValue>,
    total: u64,
    offset: u64,
    limit: u64,
}

impl PagedResult {
    /// Create a page from its parts
    pub fn new(items: Vec<JsonValue>, total: u64, offset: u64, limit: u64) -> Self {
        Self {
            items,
            total,
            offset,
            limit,
        }
    }

    /// Wrap a bare list as a single complete page
    pub fn from_list(items: Vec<JsonValue>) -> Self {
        let len = items.len() as u64;
        Self::new(items, len, 0, len)
    }

    /// Records on this page, in document order
    pub fn items(&self) -> &[JsonValue] {
        &self.items
    }

    /// Consume the page, keeping only its records
    pub fn into_items(self) -> Vec<JsonValue> {
        self.items
    }

    /// Server-declared total number of matching records
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Zero-based index of the first record on this page
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Page size requested/returned
    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Whether another page exists: `offset + limit < total`.
    ///
    /// Pure arithmetic over the counters; the number of items actually
    /// returned is not consulted.
    pub fn has_more(&self) -> bool {
        self.offset.saturating_add(self.limit) < self.total
    }

    /// Number of records on this page
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether this page has no records
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate over the records on this page
    pub fn iter(&self) -> std::slice::Iter<'_, JsonValue> {
        self.items.iter()
    }
}

impl IntoIterator for PagedResult {
    type Item = JsonValue;
    type IntoIter = std::vec::IntoIter<JsonValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a PagedResult {
    type Item = &'a JsonValue;
    type IntoIter = std::slice::Iter<'a, JsonValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl Serialize for PagedResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("PagedResult", 5)?;
        state.serialize_field("total", &self.total)?;
        state.serialize_field("offset", &self.offset)?;
        state.serialize_field("limit", &self.limit)?;
        state.serialize_field("has_more", &self.has_more())?;
        state.serialize_field("items", &self.items)?;
        state.end()
    }
}

/// Normalize a decoded response body into a [`PagedResult`].
///
/// - Object: `items` (or `data` when `items` is absent), `total` (default 0),
///   `offset` (default 0), `limit` (default 100). Other keys are ignored.
///   Counters are non-negative integers; `5.0` reads as 5, while negative,
///   fractional or non-numeric values fall back to the default.
/// - Array: a single complete page (`total = limit = len`, `offset = 0`).
/// - Anything else: an empty page with all counters at 0.
///
/// Never fails.
pub fn normalize(body: JsonValue) -> PagedResult {
    match body {
        JsonValue::Object(mut map) => {
            let items = match map.remove("items").or_else(|| map.remove("data")) {
                Some(JsonValue::Array(items)) => items,
                _ => Vec::new(),
            };
            let counter =
                |key: &str, default: u64| map.get(key).and_then(as_counter).unwrap_or(default);
            PagedResult::new(
                items,
                counter("total", 0),
                counter("offset", 0),
                counter("limit", ENVELOPE_DEFAULT_LIMIT),
            )
        }
        JsonValue::Array(items) => PagedResult::from_list(items),
        _ => PagedResult::default(),
    }
}

/// A non-negative integral number, whether encoded as `5` or `5.0`
fn as_counter(value: &JsonValue) -> Option<u64> {
    value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f < u64::MAX as f64)
            .map(|f| f as u64)
    })
}

/// What a fetch operation hands back to the driver.
///
/// The variant comes from the fetch operation's declared return type
/// through the `From` impls below.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchResult {
    /// A page envelope with continuation counters
    Page(PagedResult),
    /// A bare list: a single terminal page
    RawList(Vec<JsonValue>),
}

impl From<PagedResult> for FetchResult {
    fn from(page: PagedResult) -> Self {
        Self::Page(page)
    }
}

impl From<Vec<JsonValue>> for FetchResult {
    fn from(items: Vec<JsonValue>) -> Self {
        Self::RawList(items)
    }
}

/// Arguments for one page fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Zero-based offset of the requested page
    pub offset: u64,
    /// Page size
    pub limit: u64,
    /// Caller filters, forwarded verbatim on every fetch
    pub filters: Params,
}

impl PageRequest {
    /// Query parameters for this page: the filters plus `offset` and `limit`
    pub fn to_params(&self) -> Params {
        let mut params = self.filters.clone();
        params.insert("offset".to_string(), self.offset.to_string());
        params.insert("limit".to_string(), self.limit.to_string());
        params
    }
}
