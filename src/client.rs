//! Mallory API client facade
//!
//! One accessor per resource, plus search and the current user.
//!
//! ```no_run
//! # async fn demo() -> mallory_api::Result<()> {
//! use mallory_api::{ListParams, MalloryClient};
//!
//! let client = MalloryClient::new()?;
//! let page = client.vulnerabilities().list(&ListParams::new().limit(10)).await?;
//! for vuln in &page {
//!     println!("{}", vuln["cve_id"]);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! The blocking flavor has the same accessors:
//!
//! ```no_run
//! # fn demo() -> mallory_api::Result<()> {
//! use mallory_api::{BlockingMalloryClient, MalloryClient};
//!
//! let client: BlockingMalloryClient = MalloryClient::blocking()?;
//! let record = client.vulnerabilities().get("CVE-2021-44228")?;
//! # Ok(())
//! # }
//! ```

use crate::error::Result;
use crate::http::{BlockingHttpClient, HttpClient, HttpClientConfig, Transport};
use crate::resources::{catalog, Invocation, ListParams, Resource};
use crate::types::JsonValue;

macro_rules! resource_accessors {
    ($($(#[$meta:meta])* $name:ident => $def:ident),* $(,)?) => {
        $(
            $(#[$meta])*
            pub fn $name(&self) -> Resource<'_, T> {
                Resource::new(&self.transport, &catalog::$def)
            }
        )*
    };
}

/// Client for the Mallory API.
///
/// `T` is the transport: [`HttpClient`] (async, the default) or
/// [`BlockingHttpClient`]. Async clients come from `new`/`with_config`,
/// blocking ones from `blocking`/`blocking_with_config`.
#[derive(Debug, Clone)]
pub struct MalloryClient<T = HttpClient> {
    transport: T,
}

/// Client whose calls block the current thread
pub type BlockingMalloryClient = MalloryClient<BlockingHttpClient>;

impl MalloryClient<HttpClient> {
    /// Client with default settings and the key from `MALLORY_API_KEY`
    pub fn new() -> Result<Self> {
        Self::with_config(HttpClientConfig::default())
    }

    /// Client with an explicit API key
    pub fn with_api_key(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(HttpClientConfig::builder().api_key(api_key).build())
    }

    /// Client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        Ok(Self::from_transport(HttpClient::with_config(config)?))
    }
}

impl MalloryClient<BlockingHttpClient> {
    /// Blocking client with default settings and the key from `MALLORY_API_KEY`
    pub fn blocking() -> Result<Self> {
        Self::blocking_with_config(HttpClientConfig::default())
    }

    /// Blocking client with an explicit API key
    pub fn blocking_with_api_key(api_key: impl Into<String>) -> Result<Self> {
        Self::blocking_with_config(HttpClientConfig::builder().api_key(api_key).build())
    }

    /// Blocking client with custom configuration
    pub fn blocking_with_config(config: HttpClientConfig) -> Result<Self> {
        Ok(Self::from_transport(BlockingHttpClient::with_config(config)?))
    }
}

impl<T: Transport> MalloryClient<T> {
    /// Wrap an existing transport
    pub fn from_transport(transport: T) -> Self {
        Self { transport }
    }

    /// The underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Any resource by name or alias
    pub fn resource(&self, name: &str) -> Result<Resource<'_, T>> {
        Ok(Resource::new(&self.transport, catalog::require(name)?))
    }

    resource_accessors! {
        /// CVE records
        vulnerabilities => VULNERABILITIES,
        /// Threat actor profiles
        threat_actors => THREAT_ACTORS,
        malware => MALWARE,
        exploits => EXPLOITS,
        exploitations => EXPLOITATIONS,
        organizations => ORGANIZATIONS,
        /// Technology products
        products => PRODUCTS,
        /// MITRE ATT&CK techniques
        attack_patterns => ATTACK_PATTERNS,
        breaches => BREACHES,
        detection_signatures => DETECTION_SIGNATURES,
        /// Technology product advisories
        advisories => ADVISORIES,
        /// CWE weaknesses
        weaknesses => WEAKNESSES,
        stories => STORIES,
        references => REFERENCES,
        sources => SOURCES,
        content_chunks => CONTENT_CHUNKS,
        mentions => MENTIONS,
    }

    /// Search across all entity types
    pub fn search(&self, q: &str, params: &ListParams) -> T::Call<'_, JsonValue> {
        let args = Invocation::from(params.clone().param("q", q));
        self.resource_handle(&catalog::SEARCH).invoke("query", None, &args)
    }

    /// Profile of the user owning the API key
    pub fn me(&self) -> T::Call<'_, JsonValue> {
        self.resource_handle(&catalog::USER)
            .invoke("me", None, &Invocation::new())
    }

    fn resource_handle(&self, def: &'static catalog::ResourceDef) -> Resource<'_, T> {
        Resource::new(&self.transport, def)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_default_transport_constructors() {
        let client = MalloryClient::with_api_key("test-key").unwrap();
        let _: &HttpClient = client.transport();
        assert_eq!(client.vulnerabilities().name(), "vulnerabilities");
    }

    #[test]
    fn test_blocking_constructors() {
        let client = MalloryClient::blocking_with_api_key("test-key").unwrap();
        let _: &BlockingHttpClient = client.transport();
        assert_eq!(client.resource("vulns").unwrap().name(), "vulnerabilities");
    }

    #[test]
    fn test_constructors_require_key() {
        let config = HttpClientConfig::builder()
            .api_key_env("MALLORY_API_KEY_TEST_UNSET_CLIENT")
            .build();
        assert!(matches!(
            MalloryClient::with_config(config.clone()),
            Err(Error::Config { .. })
        ));
        assert!(matches!(
            MalloryClient::blocking_with_config(config),
            Err(Error::Config { .. })
        ));
    }
}
