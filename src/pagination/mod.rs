//! Pagination module
//!
//! Two pieces:
//!
//! - **Normalizer**: [`normalize`] turns any decoded list-style body (a page
//!   envelope, a bare array, or anything else) into a [`PagedResult`].
//! - **Driver**: [`PageWalk`] holds the offset bookkeeping for an exhaustive
//!   walk. [`paginate`] drives it with a blocking fetch and yields an
//!   `Iterator`; [`paginate_stream`] drives it with an async fetch and yields
//!   a `Stream`. Ordering and termination rules live in `PageWalk` only.
//!
//! # Termination
//!
//! A walk stops when a page has no items, when a page reports
//! `has_more == false` (after its items are emitted), when the fetch returns
//! a bare list, or when a fetch fails (the error is yielded once).

mod driver;
mod types;

pub use driver::{paginate, paginate_stream, PageWalk, Paginate, Step, DEFAULT_PAGE_SIZE};
pub use types::{normalize, FetchResult, PageRequest, PagedResult};
