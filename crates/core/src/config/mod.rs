//! Application configuration with layered loading.
//!
//! Configuration is assembled with figment from, in increasing precedence:
//!
//! 1. Built-in defaults
//! 2. TOML config file (if REELSCOUT_CONFIG_FILE set)
//! 3. Environment variables (REELSCOUT_*)

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// OMDb API key sent as the `apikey` query parameter.
    ///
    /// Set via REELSCOUT_OMDB_API_KEY environment variable.
    /// Required only when a title lookup actually reaches the network.
    #[serde(default)]
    pub omdb_api_key: Option<String>,

    /// Base URL of the metadata API.
    #[serde(default = "default_metadata_base_url")]
    pub metadata_base_url: String,

    /// Base URL of the title pages that get scraped; the external ID is appended.
    #[serde(default = "default_scrape_base_url")]
    pub scrape_base_url: String,

    /// Path to the JSON request cache.
    ///
    /// Set via REELSCOUT_CACHE_PATH environment variable.
    #[serde(default = "default_cache_path")]
    pub cache_path: PathBuf,

    /// Path to the SQLite catalog.
    ///
    /// Set via REELSCOUT_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// User-Agent string for HTTP requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Maximum bytes to accept per response.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    /// HTTP request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_metadata_base_url() -> String {
    "http://www.omdbapi.com/".into()
}

fn default_scrape_base_url() -> String {
    "https://www.imdb.com/title/".into()
}

fn default_cache_path() -> PathBuf {
    PathBuf::from("cache.json")
}

fn default_db_path() -> PathBuf {
    PathBuf::from("movie_director.sqlite")
}

fn default_user_agent() -> String {
    "reelscout/0.1".into()
}

fn default_max_bytes() -> usize {
    5_242_880 // 5MB
}

fn default_timeout_ms() -> u64 {
    20_000
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            omdb_api_key: None,
            metadata_base_url: default_metadata_base_url(),
            scrape_base_url: default_scrape_base_url(),
            cache_path: default_cache_path(),
            db_path: default_db_path(),
            user_agent: default_user_agent(),
            max_bytes: default_max_bytes(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configuration file cannot be read,
    /// environment variables cannot be parsed, or validation fails.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment()
            .extract()
            .map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("REELSCOUT_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment.merge(
            Env::prefixed("REELSCOUT_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into()),
        )
    }

    /// Return the OMDb API key (for deferred validation).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if the key is not set.
    pub fn require_omdb_api_key(&self) -> Result<&str, ConfigError> {
        self.omdb_api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| ConfigError::Missing {
                field: "omdb_api_key".into(),
                hint: "Set REELSCOUT_OMDB_API_KEY environment variable".into(),
            })
    }
}
