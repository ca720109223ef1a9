//! Player-service API response types.

use serde::{Deserialize, Serialize};

/// One game from the player-service API.
///
/// Recently-played entries carry two-week playtime; owned-library entries
/// usually do not, and names can be missing for delisted titles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub appid: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub playtime_2weeks: u32,
    #[serde(default)]
    pub playtime_forever: u32,
    #[serde(default)]
    pub img_icon_url: String,
    #[serde(default)]
    pub img_logo_url: String,
}

/// Raw API envelope: `{ "response": { "games": [...] } }`.
#[derive(Debug, Deserialize)]
pub struct PlayerServiceEnvelope {
    #[serde(default)]
    pub response: PlayerServiceResponse,
}

/// Inner response object; every field is optional on the wire.
#[derive(Debug, Default, Deserialize)]
pub struct PlayerServiceResponse {
    #[serde(default)]
    pub total_count: Option<u32>,
    #[serde(default)]
    pub game_count: Option<u32>,
    #[serde(default)]
    pub games: Option<Vec<Game>>,
}
