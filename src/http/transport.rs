//! Transport abstraction shared by the async and blocking clients
//!
//! Resource code is written once against [`Transport`]. The async client
//! hands back a boxed future, the blocking client the finished result.

use super::request::ApiRequest;
use crate::error::{Error, Result};
use crate::pagination::{normalize, PagedResult};
use crate::types::JsonValue;
use futures::future::BoxFuture;

/// Conversion from a decoded 2xx body into the caller's return type
pub trait FromBody: Sized {
    fn from_body(body: JsonValue) -> Self;
}

impl FromBody for JsonValue {
    fn from_body(body: JsonValue) -> Self {
        body
    }
}

impl FromBody for PagedResult {
    fn from_body(body: JsonValue) -> Self {
        normalize(body)
    }
}

/// Something that can send an [`ApiRequest`].
///
/// `Call` is what a call site gets back: `BoxFuture<Result<T>>` for
/// [`HttpClient`](super::HttpClient), `Result<T>` for
/// [`BlockingHttpClient`](super::BlockingHttpClient).
pub trait Transport {
    type Call<'a, T>
    where
        Self: 'a,
        T: 'a;

    /// Send the request and decode a 2xx body into `T`.
    ///
    /// Non-2xx responses come back as classified errors.
    fn send<'a, T>(&'a self, request: ApiRequest) -> Self::Call<'a, T>
    where
        T: FromBody + Send + 'a;

    /// A call that fails with `error` without touching the network
    fn reject<'a, T>(&'a self, error: Error) -> Self::Call<'a, T>
    where
        T: Send + 'a;
}

/// Async calls
pub type AsyncCall<'a, T> = BoxFuture<'a, Result<T>>;
