//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (FOLIO_*)
//! 2. TOML config file (if FOLIO_CONFIG_FILE set)
//! 3. Built-in defaults

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
///
/// Loading precedence (highest wins):
/// 1. Environment variables (FOLIO_*)
/// 2. TOML config file (if FOLIO_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the SQLite cache database.
    ///
    /// Set via FOLIO_DB_PATH environment variable. When unset, the cache is
    /// disabled entirely and every cache operation reports a miss.
    #[serde(default)]
    pub db_path: Option<PathBuf>,

    /// Steam Web API key for the game shelf.
    ///
    /// Set via FOLIO_STEAM_API_KEY environment variable.
    /// Required only when the game shelf is built.
    #[serde(default)]
    pub steam_api_key: Option<String>,

    /// Steam account id whose library is shown.
    ///
    /// Set via FOLIO_STEAM_ID environment variable.
    #[serde(default)]
    pub steam_id: String,

    /// URL of the film diary page to scrape.
    ///
    /// Set via FOLIO_DIARY_URL environment variable.
    #[serde(default = "default_diary_url")]
    pub diary_url: String,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via FOLIO_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Maximum bytes to fetch per request.
    ///
    /// Set via FOLIO_MAX_BYTES environment variable.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via FOLIO_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Number of games shown on the shelf.
    ///
    /// Set via FOLIO_SHELF_SLOTS environment variable.
    #[serde(default = "default_shelf_slots")]
    pub shelf_slots: usize,

    /// Validity window in hours for timestamped local cache entries.
    ///
    /// Set via FOLIO_LOCAL_MAX_AGE_HOURS environment variable.
    #[serde(default = "default_local_max_age_hours")]
    pub local_max_age_hours: i64,
}

fn default_diary_url() -> String {
    "https://letterboxd.com/da_ni/films/diary/".into()
}

fn default_user_agent() -> String {
    "folio/0.1".into()
}

fn default_max_bytes() -> usize {
    2_097_152 // 2MB
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_shelf_slots() -> usize {
    4
}

fn default_local_max_age_hours() -> i64 {
    24
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            steam_api_key: None,
            steam_id: String::new(),
            diary_url: default_diary_url(),
            user_agent: default_user_agent(),
            max_bytes: default_max_bytes(),
            timeout_ms: default_timeout_ms(),
            shelf_slots: default_shelf_slots(),
            local_max_age_hours: default_local_max_age_hours(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `FOLIO_`
    /// 2. TOML file from `FOLIO_CONFIG_FILE` (if set)
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

        if let Ok(config_path) = std::env::var("FOLIO_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("FOLIO_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Check that Steam credentials are available (for deferred validation).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if the Steam API key is not set.
    pub fn require_steam_api_key(&self) -> Result<&str, ConfigError> {
        self.steam_api_key.as_deref().ok_or_else(|| ConfigError::Missing {
            field: "steam_api_key".into(),
            hint: "Set FOLIO_STEAM_API_KEY environment variable".into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.db_path.is_none());
        assert!(config.steam_api_key.is_none());
        assert_eq!(config.diary_url, "https://letterboxd.com/da_ni/films/diary/");
        assert_eq!(config.user_agent, "folio/0.1");
        assert_eq!(config.max_bytes, 2_097_152);
        assert_eq!(config.timeout_ms, 20_000);
        assert_eq!(config.shelf_slots, 4);
        assert_eq!(config.local_max_age_hours, 24);
    }

    #[test]
    fn test_timeout_duration() {
        let config = AppConfig::default();
        assert_eq!(config.timeout(), Duration::from_millis(20_000));
    }

    #[test]
    fn test_require_steam_api_key_missing() {
        let config = AppConfig::default();
        let result = config.require_steam_api_key();
        assert!(matches!(result, Err(ConfigError::Missing { .. })));
    }

    #[test]
    fn test_require_steam_api_key_present() {
        let config = AppConfig { steam_api_key: Some("test-key".into()), ..Default::default() };
        let result = config.require_steam_api_key();
        assert_eq!(result.unwrap(), "test-key");
    }
}
