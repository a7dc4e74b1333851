//! Resource handle
//!
//! [`Resource`] binds a catalog entry to a transport. The same code serves
//! the async and blocking clients; only auto-paging differs, as a `Stream`
//! on [`HttpClient`] and an `Iterator` on [`BlockingHttpClient`].

use super::catalog::{BodyKind, Operation, QueryStyle, ResourceDef};
use crate::error::{Error, Result};
use crate::http::{ApiRequest, BlockingHttpClient, FromBody, HttpClient, Transport};
use crate::pagination::{self, normalize, PagedResult, DEFAULT_PAGE_SIZE};
use crate::types::{JsonValue, Params, TrendingPeriod};
use futures::Stream;
use serde::Serialize;

/// Query parameters for list-style operations.
///
/// Values are sent as given; empty values are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListParams {
    params: Params,
}

impl ListParams {
    /// Create empty params
    pub fn new() -> Self {
        Self::default()
    }

    /// Zero-based offset of the first record
    #[must_use]
    pub fn offset(self, offset: u64) -> Self {
        self.param("offset", offset.to_string())
    }

    /// Page size
    #[must_use]
    pub fn limit(self, limit: u64) -> Self {
        self.param("limit", limit.to_string())
    }

    /// Sort field
    #[must_use]
    pub fn sort(self, sort: impl Into<String>) -> Self {
        self.param("sort", sort)
    }

    /// Sort order (`asc` or `desc`)
    #[must_use]
    pub fn order(self, order: impl Into<String>) -> Self {
        self.param("order", order)
    }

    /// Server-side filter expression
    #[must_use]
    pub fn filter(self, filter: impl Into<String>) -> Self {
        self.param("filter", filter)
    }

    /// Trending window, used by `trending`
    #[must_use]
    pub fn period(self, period: TrendingPeriod) -> Self {
        self.param("period", period.as_str())
    }

    /// Any other query parameter
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Look up a parameter
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// The underlying parameters
    pub fn as_params(&self) -> &Params {
        &self.params
    }

    /// Split into a page size and the filters forwarded on every page.
    ///
    /// A walk always starts at offset 0, so any `offset` is dropped.
    pub fn into_walk(mut self) -> (u64, Params) {
        self.params.remove("offset");
        let limit = self
            .params
            .remove("limit")
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_PAGE_SIZE);
        (limit, self.params)
    }
}

impl From<Params> for ListParams {
    fn from(params: Params) -> Self {
        Self { params }
    }
}

/// Arguments to a generic [`Resource::invoke`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Invocation {
    pub params: ListParams,
    pub body: Option<JsonValue>,
    pub urls: Vec<String>,
}

impl Invocation {
    /// Create empty arguments
    pub fn new() -> Self {
        Self::default()
    }

    /// Set query parameters
    #[must_use]
    pub fn params(mut self, params: ListParams) -> Self {
        self.params = params;
        self
    }

    /// Set the JSON body
    #[must_use]
    pub fn body(mut self, body: JsonValue) -> Self {
        self.body = Some(body);
        self
    }

    /// Set the URL list for `references.create`
    #[must_use]
    pub fn urls<I, S>(mut self, urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.urls = urls.into_iter().map(Into::into).collect();
        self
    }
}

impl From<ListParams> for Invocation {
    fn from(params: ListParams) -> Self {
        Self::new().params(params)
    }
}

/// Result of a generic invocation, shaped by the operation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Output {
    Page(PagedResult),
    Value(JsonValue),
}

impl Output {
    /// Shape a decoded body the way `op` declares
    pub fn from_body(op: &Operation, body: JsonValue) -> Self {
        if op.is_paged() {
            Output::Page(normalize(body))
        } else {
            Output::Value(body)
        }
    }
}

/// Build the request for one operation.
pub fn build_request(
    def: &ResourceDef,
    op: &Operation,
    identifier: Option<&str>,
    args: &Invocation,
) -> Result<ApiRequest> {
    let segments = op.segments(def.path, identifier)?;
    let caller = args.params.as_params();

    if let Some(param) = op.required_param {
        if caller.get(param).map_or(true, |v| v.trim().is_empty()) {
            return Err(Error::missing_argument(format!(
                "Method '{}' requires parameter '{param}'",
                op.name
            )));
        }
    }

    let query = match op.query {
        QueryStyle::None => Params::new(),
        QueryStyle::Passthrough => caller.clone(),
        QueryStyle::Paged => paged_query(caller),
        QueryStyle::Trending => {
            let mut query = paged_query(caller);
            let period = match query.remove("period") {
                Some(p) => p.parse::<TrendingPeriod>()?,
                None => TrendingPeriod::default(),
            };
            query.insert("sort".to_string(), period.sort_key());
            query
        }
    };

    let body = match op.body {
        BodyKind::None => None,
        BodyKind::Json => Some(args.body.clone().ok_or_else(|| {
            Error::missing_argument(format!("Method '{}' requires a JSON body", op.name))
        })?),
        BodyKind::Urls if !args.urls.is_empty() => Some(serde_json::json!({ "urls": &args.urls })),
        BodyKind::Urls => Some(args.body.clone().ok_or_else(|| {
            Error::missing_argument(format!("Method '{}' requires a list of URLs", op.name))
        })?),
    };

    Ok(ApiRequest {
        method: op.method,
        segments,
        query: Vec::new(),
        body,
    }
    .params(&query))
}

fn paged_query(caller: &Params) -> Params {
    let mut query = Params::new();
    query.insert("offset".to_string(), "0".to_string());
    query.insert("limit".to_string(), DEFAULT_PAGE_SIZE.to_string());
    query.extend(caller.iter().map(|(k, v)| (k.clone(), v.clone())));
    query
}

/// A catalog resource bound to a transport
pub struct Resource<'c, T> {
    transport: &'c T,
    def: &'static ResourceDef,
}

impl<T> Clone for Resource<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Resource<'_, T> {}

impl<T> std::fmt::Debug for Resource<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resource")
            .field("name", &self.def.name)
            .field("path", &self.def.path)
            .finish_non_exhaustive()
    }
}

impl<'c, T: Transport> Resource<'c, T> {
    /// Bind `def` to `transport`
    pub fn new(transport: &'c T, def: &'static ResourceDef) -> Self {
        Self { transport, def }
    }

    /// Canonical resource name
    pub fn name(&self) -> &'static str {
        self.def.name
    }

    /// The catalog entry
    pub fn definition(&self) -> &'static ResourceDef {
        self.def
    }

    /// Look up an operation, failing with [`Error::UnknownOperation`]
    pub fn operation(&self, name: &str) -> Result<&'static Operation> {
        self.def
            .operation(name)
            .ok_or_else(|| Error::unknown_operation(self.def.name, name))
    }

    fn call<R>(&self, operation: &str, identifier: Option<&str>, args: &Invocation) -> T::Call<'c, R>
    where
        R: FromBody + Send + 'c,
    {
        let request = self
            .operation(operation)
            .and_then(|op| build_request(self.def, op, identifier, args));

        match request {
            Ok(request) => self.transport.send(request),
            Err(e) => self.transport.reject(e),
        }
    }

    /// Call any operation by name and get the decoded body back.
    ///
    /// Use [`Output::from_body`] to apply the operation's response shape.
    pub fn invoke(
        &self,
        operation: &str,
        identifier: Option<&str>,
        args: &Invocation,
    ) -> T::Call<'c, JsonValue> {
        self.call(operation, identifier, args)
    }

    /// One page of records
    pub fn list(&self, params: &ListParams) -> T::Call<'c, PagedResult> {
        self.call("list", None, &params.clone().into())
    }

    /// One page of records sorted by trend over `period`
    pub fn trending(&self, period: TrendingPeriod, params: &ListParams) -> T::Call<'c, PagedResult> {
        self.call("trending", None, &params.clone().period(period).into())
    }

    /// A single record
    pub fn get(&self, identifier: &str) -> T::Call<'c, JsonValue> {
        self.call("get", Some(identifier), &Invocation::new())
    }

    /// Full export of a record
    pub fn export(&self, identifier: &str) -> T::Call<'c, JsonValue> {
        self.call("export", Some(identifier), &Invocation::new())
    }

    /// Request on-demand enrichment of a record
    pub fn enrich(&self, identifier: &str) -> T::Call<'c, JsonValue> {
        self.call("enrich", Some(identifier), &Invocation::new())
    }

    /// Partially update a record
    pub fn update(&self, identifier: &str, data: JsonValue) -> T::Call<'c, JsonValue> {
        self.call("update", Some(identifier), &Invocation::new().body(data))
    }

    /// Submit URLs for ingestion
    pub fn create<S: AsRef<str>>(&self, urls: &[S]) -> T::Call<'c, JsonValue> {
        let args = Invocation::new().urls(urls.iter().map(|u| u.as_ref().to_string()));
        self.call("create", None, &args)
    }

    /// Records related to `identifier` through the `relation` operation
    pub fn related(
        &self,
        identifier: &str,
        relation: &str,
        params: &ListParams,
    ) -> T::Call<'c, JsonValue> {
        self.call(relation, Some(identifier), &params.clone().into())
    }

    fn page_fetcher(
        self,
        operation: &str,
        identifier: Option<&str>,
    ) -> impl FnMut(pagination::PageRequest) -> T::Call<'c, PagedResult> + 'c
    where
        T: 'c,
    {
        let operation = operation.to_string();
        let identifier = identifier.map(str::to_string);
        move |page| {
            let args = Invocation::from(ListParams::from(page.to_params()));
            self.call(&operation, identifier.as_deref(), &args)
        }
    }
}

impl<'c> Resource<'c, HttpClient> {
    /// Every record of `list`, fetched page by page
    pub fn list_all(&self, params: ListParams) -> impl Stream<Item = Result<JsonValue>> + 'c {
        self.paginate("list", None, params)
    }

    /// Every record of a list-style operation, fetched page by page.
    ///
    /// The stream is not `Unpin`; pin it before calling `next`.
    pub fn paginate(
        &self,
        operation: &str,
        identifier: Option<&str>,
        params: ListParams,
    ) -> impl Stream<Item = Result<JsonValue>> + 'c {
        let (limit, filters) = params.into_walk();
        pagination::paginate_stream(self.page_fetcher(operation, identifier), limit, filters)
    }
}

impl<'c> Resource<'c, BlockingHttpClient> {
    /// Every record of `list`, fetched page by page
    pub fn list_all(&self, params: ListParams) -> impl Iterator<Item = Result<JsonValue>> + 'c {
        self.paginate("list", None, params)
    }

    /// Every record of a list-style operation, fetched page by page
    pub fn paginate(
        &self,
        operation: &str,
        identifier: Option<&str>,
        params: ListParams,
    ) -> impl Iterator<Item = Result<JsonValue>> + 'c {
        let (limit, filters) = params.into_walk();
        pagination::paginate(self.page_fetcher(operation, identifier), limit, filters)
    }
}
