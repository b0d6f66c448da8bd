//! Client configuration: defaults, JSON file loading, and environment overrides.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::catalog::{
    DEFAULT_BASE_URL, DEFAULT_BATCH_DELAY_MS, DEFAULT_RETRIES, DEFAULT_RETRY_DELAY_MS,
    DEFAULT_TIMEOUT_MS,
};
use crate::classifier::is_valid_url;
use crate::transport::RetryPolicy;

/// Upper bound accepted for `retries`.
pub const MAX_RETRIES: u32 = 10;

pub const ENV_BASE_URL: &str = "MEDIA_DL_BASE_URL";
pub const ENV_TIMEOUT_MS: &str = "MEDIA_DL_TIMEOUT_MS";
pub const ENV_RETRIES: &str = "MEDIA_DL_RETRIES";
pub const ENV_RETRY_DELAY_MS: &str = "MEDIA_DL_RETRY_DELAY_MS";
pub const ENV_BATCH_DELAY_MS: &str = "MEDIA_DL_BATCH_DELAY_MS";

/// Errors loading or validating a [`ClientConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Settings for one [`DownloadClient`](super::DownloadClient).
///
/// Every field has a default, so partial JSON files are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Service base URL.
    pub base_url: String,
    /// Overall per-request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Retries after the first attempt.
    pub retries: u32,
    /// Base delay for linear retry backoff, in milliseconds.
    pub retry_delay_ms: u64,
    /// Pause between batch items, in milliseconds.
    pub batch_delay_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            retries: DEFAULT_RETRIES,
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
            batch_delay_ms: DEFAULT_BATCH_DELAY_MS,
        }
    }
}

impl ClientConfig {
    /// Default configuration pointed at `base_url`.
    #[must_use]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Loads a JSON config file and validates it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read, parsed, or holds
    /// out-of-range values.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        debug!(path = %path.display(), "loaded client config");
        Ok(config)
    }

    /// Defaults overridden by `MEDIA_DL_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for unparsable or out-of-range values.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_overrides(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Applies overrides from `lookup` (an environment-like source) and
    /// validates the result.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for unparsable or out-of-range values.
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        let value_of = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        if let Some(base_url) = value_of(ENV_BASE_URL) {
            self.base_url = base_url;
        }
        if let Some(value) = value_of(ENV_TIMEOUT_MS) {
            self.timeout_ms = parse_number("timeout_ms", &value)?;
        }
        if let Some(value) = value_of(ENV_RETRIES) {
            self.retries = parse_number("retries", &value)?;
        }
        if let Some(value) = value_of(ENV_RETRY_DELAY_MS) {
            self.retry_delay_ms = parse_number("retry_delay_ms", &value)?;
        }
        if let Some(value) = value_of(ENV_BATCH_DELAY_MS) {
            self.batch_delay_ms = parse_number("batch_delay_ms", &value)?;
        }

        self.validate()
    }

    /// Validates values against what the transport accepts.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_valid_url(&self.base_url) {
            return Err(ConfigError::invalid(
                "base_url",
                format!("'{}' is not an http(s) URL", self.base_url),
            ));
        }
        if self.timeout_ms == 0 {
            return Err(ConfigError::invalid("timeout_ms", "must be greater than 0"));
        }
        if self.retries > MAX_RETRIES {
            return Err(ConfigError::invalid(
                "retries",
                format!("{} exceeds the maximum of {MAX_RETRIES}", self.retries),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    #[must_use]
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    #[must_use]
    pub fn batch_delay(&self) -> Duration {
        Duration::from_millis(self.batch_delay_ms)
    }

    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.retries, self.retry_delay())
    }
}

fn parse_number<T: std::str::FromStr>(field: &'static str, value: &str) -> Result<T, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::invalid(field, format!("'{value}' is not a valid number")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:3000");
        assert_eq!(config.timeout(), Duration::from_secs(180));
        assert_eq!(config.retries, 3);
        assert_eq!(config.retry_delay(), Duration::from_secs(1));
        assert_eq!(config.batch_delay(), Duration::from_secs(1));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_apply_overrides() {
        let mut config = ClientConfig::default();
        config
            .apply_overrides(lookup_from(&[
                (ENV_BASE_URL, "https://dl.example.com"),
                (ENV_TIMEOUT_MS, "5000"),
                (ENV_RETRIES, " 1 "),
                (ENV_RETRY_DELAY_MS, "10"),
                (ENV_BATCH_DELAY_MS, "0"),
            ]))
            .unwrap();

        assert_eq!(config.base_url, "https://dl.example.com");
        assert_eq!(config.timeout_ms, 5000);
        assert_eq!(config.retries, 1);
        assert_eq!(config.retry_delay_ms, 10);
        assert_eq!(config.batch_delay_ms, 0);
    }

    #[test]
    fn test_apply_overrides_ignores_blank_values() {
        let mut config = ClientConfig::default();
        config
            .apply_overrides(lookup_from(&[(ENV_RETRIES, "  ")]))
            .unwrap();
        assert_eq!(config.retries, 3);
    }

    #[test]
    fn test_apply_overrides_rejects_garbage() {
        let mut config = ClientConfig::default();
        let error = config
            .apply_overrides(lookup_from(&[(ENV_TIMEOUT_MS, "soon")]))
            .unwrap_err();
        assert!(matches!(error, ConfigError::Invalid { field: "timeout_ms", .. }));
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let config = ClientConfig {
            retries: 11,
            ..ClientConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "retries", .. })
        ));

        let config = ClientConfig::with_base_url("ftp://files.example.com");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "base_url", .. })
        ));

        let config = ClientConfig {
            timeout_ms: 0,
            ..ClientConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"base_url": "http://10.0.0.5:3001", "retries": 0}}"#).unwrap();

        let config = ClientConfig::load(file.path()).unwrap();
        assert_eq!(config.base_url, "http://10.0.0.5:3001");
        assert_eq!(config.retries, 0);
        assert_eq!(config.timeout_ms, DEFAULT_TIMEOUT_MS);
    }

    #[test]
    fn test_load_reports_parse_and_io_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(
            ClientConfig::load(file.path()),
            Err(ConfigError::Parse { .. })
        ));

        let dir = tempfile::TempDir::new().unwrap();
        assert!(matches!(
            ClientConfig::load(&dir.path().join("missing.json")),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn test_retry_policy_from_config() {
        let config = ClientConfig {
            retries: 2,
            retry_delay_ms: 50,
            ..ClientConfig::default()
        };
        let policy = config.retry_policy();
        assert_eq!(policy.max_retries(), 2);
        assert_eq!(policy.base_delay(), Duration::from_millis(50));
    }
}
