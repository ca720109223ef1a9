//! Game-library statistics client.
//!
//! Talks to a Steam-style player-service API for the two views the site
//! needs: recently played games and the full owned library. Responses are
//! normalized into [`Game`] records; everything else (shelf assembly,
//! caching, fallback) lives in [`library`].

pub mod library;
pub mod response;
pub mod select;

pub use library::GameShelf;
pub use response::Game;
pub use select::DEFAULT_FAVORITES;

use async_trait::async_trait;
use response::PlayerServiceEnvelope;
use std::time::Duration;

use folio_core::Error;
use folio_core::config::{AppConfig, ConfigError};

/// Default base URL for the player-service API.
const DEFAULT_BASE_URL: &str = "https://api.steampowered.com";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default user agent.
const DEFAULT_USER_AGENT: &str = "folio/0.1";

/// Player-service API client configuration.
#[derive(Debug, Clone)]
pub struct SteamConfig {
    /// Web API key.
    pub api_key: String,
    /// Account whose library is queried.
    pub steam_id: String,
    /// Base URL (default: https://api.steampowered.com).
    pub base_url: String,
    /// Request timeout (default: 10s).
    pub timeout: Duration,
    /// User-agent string.
    pub user_agent: String,
}

impl Default for SteamConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            steam_id: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl SteamConfig {
    /// Build from the application configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` when no API key is configured.
    pub fn from_app(config: &AppConfig) -> Result<Self, ConfigError> {
        let api_key = config.require_steam_api_key()?.to_string();

        Ok(Self {
            api_key,
            steam_id: config.steam_id.clone(),
            user_agent: config.user_agent.clone(),
            ..Default::default()
        })
    }
}

/// Source of game-library data, implemented by [`SteamClient`] and by
/// fixtures in tests.
#[async_trait]
pub trait GameSource: Send + Sync {
    /// Games played in the last two weeks, at most `count` of them.
    async fn recently_played(&self, count: usize) -> Result<Vec<Game>, Error>;

    /// Every game the account owns.
    async fn owned_games(&self) -> Result<Vec<Game>, Error>;
}

/// Player-service API client.
#[derive(Debug, Clone)]
pub struct SteamClient {
    http: reqwest::Client,
    config: SteamConfig,
}

impl SteamClient {
    /// Create a new client with the given configuration.
    pub fn new(config: SteamConfig) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| Error::Fetch(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    async fn player_service(&self, method: &str, extra: &[(&str, &str)]) -> Result<Vec<Game>, Error> {
        let url = format!("{}/IPlayerService/{}/v0001/", self.config.base_url, method);

        let mut query: Vec<(&str, &str)> = vec![
            ("key", self.config.api_key.as_str()),
            ("steamid", self.config.steam_id.as_str()),
            ("format", "json"),
        ];
        query.extend_from_slice(extra);

        let response = self
            .http
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(|e| Error::Fetch(format!("network error: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus(status.as_u16()));
        }

        let envelope: PlayerServiceEnvelope = response
            .json()
            .await
            .map_err(|e| Error::Fetch(format!("undecodable response: {}", e)))?;

        Ok(envelope.response.games.unwrap_or_default())
    }
}

#[async_trait]
impl GameSource for SteamClient {
    async fn recently_played(&self, count: usize) -> Result<Vec<Game>, Error> {
        let count = count.to_string();
        self.player_service("GetRecentlyPlayedGames", &[("count", count.as_str())])
            .await
    }

    async fn owned_games(&self) -> Result<Vec<Game>, Error> {
        self.player_service(
            "GetOwnedGames",
            &[("include_appinfo", "1"), ("include_played_free_games", "1")],
        )
        .await
    }
}
