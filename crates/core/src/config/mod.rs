//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (FEEDKIT_*)
//! 2. TOML config file (if FEEDKIT_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::cache::FeedCachePolicy;

mod validation;

pub use validation::ConfigError;

/// Which storage engine backs the feed cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    Sqlite,
    File,
    Memory,
}

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (FEEDKIT_*)
/// 2. TOML config file (if FEEDKIT_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Remote feed endpoint.
    ///
    /// Set via FEEDKIT_FEED_URL environment variable.
    /// Required only when the remote feed is loaded.
    #[serde(default)]
    pub feed_url: Option<String>,

    /// Storage engine for the feed cache.
    ///
    /// Set via FEEDKIT_STORE environment variable (`sqlite`, `file` or `memory`).
    #[serde(default = "default_store")]
    pub store: StoreKind,

    /// Path to SQLite cache database.
    ///
    /// Set via FEEDKIT_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Path to the JSON cache file used by the file store.
    ///
    /// Set via FEEDKIT_FILE_PATH environment variable.
    #[serde(default = "default_file_path")]
    pub file_path: PathBuf,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via FEEDKIT_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Maximum bytes to fetch per request.
    ///
    /// Set via FEEDKIT_MAX_BYTES environment variable.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via FEEDKIT_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Maximum number of redirects the transport follows.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,

    /// Days a cached feed stays valid.
    ///
    /// Set via FEEDKIT_MAX_CACHE_AGE_DAYS environment variable.
    #[serde(default = "default_max_cache_age_days")]
    pub max_cache_age_days: u64,
}

fn default_store() -> StoreKind {
    StoreKind::Sqlite
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./feedkit-cache.sqlite")
}

fn default_file_path() -> PathBuf {
    PathBuf::from("./feedkit-cache.json")
}

fn default_user_agent() -> String {
    "feedkit/0.1".into()
}

fn default_max_bytes() -> usize {
    5_242_880 // 5MB
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_max_redirects() -> usize {
    5
}

fn default_max_cache_age_days() -> u64 {
    7
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            feed_url: None,
            store: default_store(),
            db_path: default_db_path(),
            file_path: default_file_path(),
            user_agent: default_user_agent(),
            max_bytes: default_max_bytes(),
            timeout_ms: default_timeout_ms(),
            max_redirects: default_max_redirects(),
            max_cache_age_days: default_max_cache_age_days(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Cache validity policy derived from `max_cache_age_days`.
    pub fn cache_policy(&self) -> FeedCachePolicy {
        FeedCachePolicy::new(self.max_cache_age_days)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `FEEDKIT_`
    /// 2. TOML file from `FEEDKIT_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("FEEDKIT_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("FEEDKIT_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Check if the feed URL is available (for deferred validation).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if the feed URL is not set.
    pub fn require_feed_url(&self) -> Result<&str, ConfigError> {
        self.feed_url.as_deref().ok_or_else(|| ConfigError::Missing {
            field: "feed_url".into(),
            hint: "Set FEEDKIT_FEED_URL environment variable".into(),
        })
    }
}
