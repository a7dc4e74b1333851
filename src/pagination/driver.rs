//! Pagination driver
//!
//! `PageWalk` is the shared algorithm. The blocking and async front ends
//! only differ in how they wait for a fetch to complete.

use super::types::{FetchResult, PageRequest};
use crate::error::Result;
use crate::types::{JsonValue, Params};
use futures::stream::{self, Stream};
use std::collections::VecDeque;
use std::future::Future;
use tracing::debug;

/// Page size used when the caller does not choose one
pub const DEFAULT_PAGE_SIZE: u64 = 100;

/// Next action for a walk
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Hand this record to the consumer
    Emit(JsonValue),
    /// Fetch this page, then report it through [`PageWalk::accept`]
    Fetch(PageRequest),
    /// The walk is over
    Done,
}

/// Offset bookkeeping for one exhaustive walk.
///
/// Each walk starts at offset 0 and owns its state; walks are not
/// restartable or shared.
#[derive(Debug, Clone)]
pub struct PageWalk {
    offset: u64,
    limit: u64,
    filters: Params,
    buffered: VecDeque<JsonValue>,
    finished: bool,
    pages_fetched: usize,
}

impl PageWalk {
    /// Start a walk with the given page size and filters.
    ///
    /// A page size of 0 is raised to 1 so the offset always advances.
    pub fn new(limit: u64, filters: Params) -> Self {
        Self {
            offset: 0,
            limit: limit.max(1),
            filters,
            buffered: VecDeque::new(),
            finished: false,
            pages_fetched: 0,
        }
    }

    /// Decide what happens next
    pub fn step(&mut self) -> Step {
        if let Some(item) = self.buffered.pop_front() {
            return Step::Emit(item);
        }
        if self.finished {
            return Step::Done;
        }
        Step::Fetch(PageRequest {
            offset: self.offset,
            limit: self.limit,
            filters: self.filters.clone(),
        })
    }

    /// Record the result of the fetch requested by the last [`Step::Fetch`]
    pub fn accept(&mut self, result: FetchResult) {
        self.pages_fetched += 1;

        match result {
            FetchResult::Page(page) => {
                let has_more = page.has_more();
                let items = page.into_items();
                debug!(
                    offset = self.offset,
                    limit = self.limit,
                    items = items.len(),
                    has_more,
                    "Fetched page"
                );

                if items.is_empty() {
                    self.finished = true;
                    return;
                }

                self.buffered.extend(items);
                match self.offset.checked_add(self.limit) {
                    Some(next) if has_more => self.offset = next,
                    _ => self.finished = true,
                }
            }
            FetchResult::RawList(items) => {
                debug!(items = items.len(), "Fetched bare list, stopping");
                self.buffered.extend(items);
                self.finished = true;
            }
        }
    }

    /// End the walk after a failed fetch
    pub fn fail(&mut self) {
        self.buffered.clear();
        self.finished = true;
    }

    /// Offset of the next page to fetch
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Number of fetches reported so far
    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    /// Whether no further fetch will be requested
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

/// Blocking walk over every record; see [`paginate`]
pub struct Paginate<F> {
    walk: PageWalk,
    fetch: F,
}

impl<F> Paginate<F> {
    /// The underlying walk state
    pub fn walk(&self) -> &PageWalk {
        &self.walk
    }
}

impl<F, R> Iterator for Paginate<F>
where
    F: FnMut(PageRequest) -> Result<R>,
    R: Into<FetchResult>,
{
    type Item = Result<JsonValue>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.walk.step() {
                Step::Emit(item) => return Some(Ok(item)),
                Step::Done => return None,
                Step::Fetch(request) => match (self.fetch)(request) {
                    Ok(result) => self.walk.accept(result.into()),
                    Err(e) => {
                        self.walk.fail();
                        return Some(Err(e));
                    }
                },
            }
        }
    }
}

/// Walk every page of a blocking fetch operation.
///
/// Pages are fetched lazily as the iterator is consumed. A failed fetch is
/// yielded once as `Err`, after which the iterator ends.
pub fn paginate<F, R>(fetch: F, limit: u64, filters: Params) -> Paginate<F>
where
    F: FnMut(PageRequest) -> Result<R>,
    R: Into<FetchResult>,
{
    Paginate {
        walk: PageWalk::new(limit, filters),
        fetch,
    }
}

/// Walk every page of an async fetch operation.
///
/// Same rules as [`paginate`]. Dropping the stream between items stops the
/// walk; a fetch already in flight runs to completion.
pub fn paginate_stream<F, Fut, R>(
    fetch: F,
    limit: u64,
    filters: Params,
) -> impl Stream<Item = Result<JsonValue>>
where
    F: FnMut(PageRequest) -> Fut,
    Fut: Future<Output = Result<R>>,
    R: Into<FetchResult>,
{
    let walk = PageWalk::new(limit, filters);

    stream::unfold((walk, fetch), |(mut walk, mut fetch)| async move {
        loop {
            match walk.step() {
                Step::Emit(item) => return Some((Ok(item), (walk, fetch))),
                Step::Done => return None,
                Step::Fetch(request) => match fetch(request).await {
                    Ok(result) => walk.accept(result.into()),
                    Err(e) => {
                        walk.fail();
                        return Some((Err(e), (walk, fetch)));
                    }
                },
            }
        }
    })
}
