//! CLI module
//!
//! `mallory [flags] <resource> <method> [identifier] [params]`
//!
//! Results go to stdout as JSON. Failures go to stderr as a single JSON
//! line, `{"error": ..., "status_code": ...}`, with exit code 1.
//!
//! `--help-resources` prints every resource, its methods and the aliases,
//! without needing an API key.

mod commands;
mod runner;

pub use commands::{Cli, ParamArgs};
pub use runner::{error_payload, resource_help, Runner};
