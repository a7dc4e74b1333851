// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # mallory-api
//!
//! Typed client and command-line tool for the Mallory threat intelligence
//! REST API: vulnerabilities, threat actors, malware, exploits, products,
//! advisories, stories and the rest of the catalog.
//!
//! ## Features
//!
//! - **Async and blocking clients**: one resource layer over both transports
//! - **Page normalization**: envelopes, bare lists and odd shapes all become
//!   a [`PagedResult`]
//! - **Auto-paging**: `list_all` as a `Stream` (async) or `Iterator` (blocking)
//! - **Classified errors**: 401/403, 404, 422, 429 and other failures map to
//!   distinct [`Error`] variants carrying status and body
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use futures::TryStreamExt;
//! use mallory_api::{ListParams, MalloryClient, Result, TrendingPeriod};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     // Key from MALLORY_API_KEY
//!     let client = MalloryClient::new()?;
//!
//!     let record = client.vulnerabilities().get("CVE-2021-44228").await?;
//!
//!     let hot = client
//!         .threat_actors()
//!         .trending(TrendingPeriod::Week, &ListParams::new().limit(10))
//!         .await?;
//!
//!     let every_kev: Vec<_> = client
//!         .vulnerabilities()
//!         .list_all(ListParams::new().filter("kev"))
//!         .try_collect()
//!         .await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │ MalloryClient<T>   vulnerabilities() threat_actors() ...    │
//! └──────────────────────────────┬──────────────────────────────┘
//!                                │
//! ┌──────────────┬───────────────┴──────────┬───────────────────┐
//! │  Resources   │        Pagination        │       HTTP        │
//! ├──────────────┼──────────────────────────┼───────────────────┤
//! │ Catalog      │ normalize → PagedResult  │ HttpClient        │
//! │ Resource<T>  │ PageWalk                 │ BlockingHttpClient│
//! │ Invocation   │ Stream / Iterator        │ Auth, Rate limit  │
//! └──────────────┴──────────────────────────┴───────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(missing_docs)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types and status classification
pub mod error;

/// Common types and type aliases
pub mod types;

/// API key resolution and request headers
pub mod auth;

/// HTTP transports with optional rate limiting
pub mod http;

/// Response normalization and auto-paging
pub mod pagination;

/// Resource catalog and resource handles
pub mod resources;

/// Client facade
pub mod client;

/// Configuration file
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use client::{BlockingMalloryClient, MalloryClient};
pub use error::{Error, Result};
pub use http::{BlockingHttpClient, HttpClient, HttpClientConfig};
pub use pagination::{normalize, PagedResult};
pub use resources::{Invocation, ListParams, Resource};
pub use types::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
