//! Configuration validation rules.
//!
//! Checks `AppConfig` values after they have been loaded from environment,
//! files, or defaults.

use std::fmt::Display;
use std::ops::RangeInclusive;

use crate::config::AppConfig;
use thiserror::Error;
use url::Url;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

const MAX_BYTES: RangeInclusive<usize> = 1..=50 * 1024 * 1024;
const TIMEOUT_MS: RangeInclusive<u64> = 100..=300_000;

fn invalid(field: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid { field: field.into(), reason: reason.into() }
}

fn check_range<T>(field: &str, value: T, range: &RangeInclusive<T>) -> Result<(), ConfigError>
where
    T: PartialOrd + Display,
{
    if range.contains(&value) {
        Ok(())
    } else {
        Err(invalid(field, format!("{value} is outside {}..={}", range.start(), range.end())))
    }
}

fn check_base_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value).map_err(|e| invalid(field, format!("{value:?} is not a valid URL: {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(invalid(field, format!("scheme {scheme:?} is not allowed, use http or https"))),
    }
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// `ConfigError::Invalid` naming the first field that is out of range
    /// (`max_bytes` 1 byte..=50MB, `timeout_ms` 100..=300000), an empty
    /// `user_agent`, or a base URL that is not http(s).
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("max_bytes", self.max_bytes, &MAX_BYTES)?;
        check_range("timeout_ms", self.timeout_ms, &TIMEOUT_MS)?;

        if self.user_agent.trim().is_empty() {
            return Err(invalid("user_agent", "must not be empty"));
        }

        check_base_url("metadata_base_url", &self.metadata_base_url)?;
        check_base_url("scrape_base_url", &self.scrape_base_url)?;

        if !self.scrape_base_url.ends_with('/') {
            tracing::warn!(
                scrape_base_url = %self.scrape_base_url,
                "scrape_base_url has no trailing slash; external IDs are appended verbatim"
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_default_config() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_max_bytes_zero() {
        let config = AppConfig { max_bytes: 0, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "max_bytes"));
    }

    #[test]
    fn test_validate_max_bytes_exceeds_limit() {
        let config = AppConfig { max_bytes: 51 * 1024 * 1024, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "max_bytes"));
    }

    #[test]
    fn test_validate_timeout_bounds() {
        let too_small = AppConfig { timeout_ms: 50, ..Default::default() };
        assert!(matches!(too_small.validate(), Err(ConfigError::Invalid { field, .. }) if field == "timeout_ms"));

        let too_large = AppConfig { timeout_ms: 301_000, ..Default::default() };
        assert!(matches!(too_large.validate(), Err(ConfigError::Invalid { field, .. }) if field == "timeout_ms"));
    }

    #[test]
    fn test_validate_empty_user_agent() {
        let config = AppConfig { user_agent: String::new(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "user_agent"));
    }

    #[test]
    fn test_validate_base_url_scheme() {
        let config = AppConfig { metadata_base_url: "ftp://omdb.example".into(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "metadata_base_url"));

        let config = AppConfig { scrape_base_url: "imdb.com/title/".into(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "scrape_base_url"));
    }

    #[test]
    fn test_validate_rejects_unparseable_base_url() {
        let config = AppConfig { scrape_base_url: "http://bad host/title/".into(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "scrape_base_url"));

        let config = AppConfig { metadata_base_url: "https://".into(), ..Default::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_edge_case_values() {
        let config = AppConfig { max_bytes: 1, timeout_ms: 100, ..Default::default() };
        assert!(config.validate().is_ok());

        let config = AppConfig { max_bytes: 50 * 1024 * 1024, timeout_ms: 300_000, ..Default::default() };
        assert!(config.validate().is_ok());
    }
}
