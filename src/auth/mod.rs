//! Authentication module
//!
//! The Mallory API authenticates every request with a bearer API key.
//! The key is resolved once, when a client is built, from an explicit value
//! or the `MALLORY_API_KEY` environment variable. A client never exists
//! without a key, so a missing credential fails before any network call.

mod authenticator;
mod types;

pub use authenticator::Authenticator;
pub use types::{ApiKey, API_KEY_ENV};
