//! Resources module
//!
//! The Mallory API is a set of resources (vulnerabilities, threat actors,
//! products, ...) that share a handful of operation patterns:
//!
//! - `list` / `trending`: paged collections under the resource path
//! - `get` / `export` / `enrich`: one record by identifier
//! - related collections under `{path}/{id}/{relation}`
//!
//! [`catalog`] declares every resource and operation as data. [`Resource`]
//! turns a catalog entry plus a transport into calls.

pub mod catalog;
mod resource;

pub use catalog::{lookup, BodyKind, Operation, QueryStyle, ResourceDef, Route, Shape};
pub use resource::{build_request, Invocation, ListParams, Output, Resource};

#[cfg(test)]
mod tests;
