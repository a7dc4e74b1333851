//! Client configuration file
//!
//! A small YAML (or JSON) document holding connection settings:
//!
//! ```yaml
//! api_key: mk_live_...
//! base_url: https://api.mallory.ai/v1
//! timeout_secs: 30
//! requests_per_second: 5
//! ```
//!
//! Every field is optional. Missing fields keep the client defaults.

use crate::error::{Error, Result, ResultExt};
use crate::http::{HttpClientConfig, RateLimiterConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Connection settings loaded from a file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// API key; the environment is consulted when absent
    #[serde(default)]
    pub api_key: Option<String>,

    /// API root
    #[serde(default)]
    pub base_url: Option<String>,

    /// Request timeout in seconds
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Client-side throttle
    #[serde(default)]
    pub requests_per_second: Option<u32>,
}

impl ConfigFile {
    /// Load from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(Error::Io)?;
        Self::from_str(&content).context(format!("Invalid config file {}", path.display()))
    }

    /// Parse from a YAML or JSON string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Fold these settings into `config`, overriding what they set
    pub fn apply(&self, mut config: HttpClientConfig) -> HttpClientConfig {
        if let Some(ref key) = self.api_key {
            config.api_key = Some(key.clone());
        }
        if let Some(ref url) = self.base_url {
            config.base_url = url.clone();
        }
        if let Some(secs) = self.timeout_secs {
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(rps) = self.requests_per_second {
            config.rate_limit = Some(RateLimiterConfig::per_second(rps));
        }
        config
    }

    /// Client configuration from these settings over the defaults
    pub fn to_http_config(&self) -> HttpClientConfig {
        self.apply(HttpClientConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_parse_yaml() {
        let yaml = r"
api_key: mk_test
base_url: https://staging.mallory.ai/v1
timeout_secs: 5
requests_per_second: 2
";
        let file = ConfigFile::from_str(yaml).unwrap();
        assert_eq!(
            file,
            ConfigFile {
                api_key: Some("mk_test".to_string()),
                base_url: Some("https://staging.mallory.ai/v1".to_string()),
                timeout_secs: Some(5),
                requests_per_second: Some(2),
            }
        );
    }

    #[test]
    fn test_parse_json() {
        let file = ConfigFile::from_str(r#"{"base_url": "http://localhost:8080"}"#).unwrap();
        assert_eq!(file.base_url.as_deref(), Some("http://localhost:8080"));
        assert!(file.api_key.is_none());
    }

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(ConfigFile::from_str("  \n").unwrap(), ConfigFile::default());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = ConfigFile::from_str("apikey: typo").unwrap_err();
        assert!(matches!(err, Error::YamlParse(_)));
    }

    #[test]
    fn test_apply_overrides_only_set_fields() {
        let file = ConfigFile {
            timeout_secs: Some(3),
            requests_per_second: Some(4),
            ..Default::default()
        };
        let config = file.apply(HttpClientConfig::builder().api_key("cli-key").build());

        assert_eq!(config.api_key.as_deref(), Some("cli-key"));
        assert_eq!(config.base_url, "https://api.mallory.ai/v1");
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.rate_limit, Some(RateLimiterConfig::new(4, 4)));
    }

    #[test]
    fn test_to_http_config_defaults() {
        let config = ConfigFile::default().to_http_config();
        assert_eq!(config.base_url, "https://api.mallory.ai/v1");
        assert!(config.rate_limit.is_none());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "api_key: from-file").unwrap();
        writeln!(file, "timeout_secs: 12").unwrap();

        let config = ConfigFile::load(file.path()).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("from-file"));
        assert_eq!(config.timeout_secs, Some(12));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ConfigFile::load(dir.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_load_invalid_file_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.yaml");
        std::fs::write(&path, "timeout_secs: [1, 2]").unwrap();

        let err = ConfigFile::load(&path).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
        assert!(err.to_string().contains("bad.yaml"));
    }
}
