// Steam Web API client
// Request format: https://api.steampowered.com/<interface>/<method>/<version>?<params>

use anyhow::Result;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::models::profile::PlayerDataSource;

pub const BASE_URL: &str = "https://api.steampowered.com";

// Interfaces
const ISTEAM_USER: &str = "ISteamUser";
const IPLAYER_SERVICE: &str = "IPlayerService";

// Methods
const GET_PLAYER_SUMMARIES: &str = "GetPlayerSummaries";
const GET_FRIEND_LIST: &str = "GetFriendList";
const RESOLVE_VANITY_URL: &str = "ResolveVanityURL";
const GET_OWNED_GAMES: &str = "GetOwnedGames";
const GET_RECENTLY_PLAYED_GAMES: &str = "GetRecentlyPlayedGames";

// Method versions
const V1: &str = "v0001";
const V2: &str = "v0002";

/// Vanity URL lookup result codes
pub const NAME_SUCCESS_MATCH: i32 = 1;
#[allow(dead_code)]
pub const NAME_NO_MATCH: i32 = 42;

/// Profile data is only disclosed when communityvisibilitystate has this value
pub const COMMUNITY_VISIBILITY_STATE_PUBLIC: i32 = 3;

#[derive(Debug, Error)]
pub enum SteamApiError {
    #[error("steam api returned status {0}")]
    InvalidResponse(StatusCode),
    #[error("could not validate steam id: {0}")]
    InvalidUser(String),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Basic profile info for one player, as returned by GetPlayerSummaries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerSummary {
    #[serde(rename = "steamid")]
    pub steam_id: String,
    #[serde(rename = "personaname")]
    pub persona_name: Option<String>,
    #[serde(rename = "profileurl")]
    pub profile_url: Option<String>,
    pub avatar: Option<String>,
    #[serde(rename = "avatarmedium")]
    pub avatar_medium: Option<String>,
    #[serde(rename = "avatarfull")]
    pub avatar_full: Option<String>,
    #[serde(rename = "communityvisibilitystate")]
    pub visibility_state: i32,
    #[serde(rename = "timecreated")]
    pub time_created: Option<i64>,
}

/// One game from GetOwnedGames / GetRecentlyPlayedGames.
/// The name and image hashes are only present with include_appinfo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnedGame {
    #[serde(rename = "appid")]
    pub app_id: u32,
    pub name: Option<String>,
    pub img_icon_url: Option<String>,
    pub img_logo_url: Option<String>,
    #[serde(rename = "playtime_forever")]
    pub playtime_mins: u64,
    #[serde(rename = "playtime_2weeks")]
    pub playtime_mins_two_weeks: Option<u64>,
}

/// One entry from GetFriendList
#[derive(Debug, Clone, Deserialize)]
#[allow(dead_code)]
pub struct Friend {
    #[serde(rename = "steamid")]
    pub steam_id: String,
    pub relationship: Option<String>,
    pub friend_since: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct PlayerSummariesEnvelope {
    response: PlayerSummariesPayload,
}

#[derive(Debug, Deserialize)]
struct PlayerSummariesPayload {
    #[serde(default)]
    players: Vec<PlayerSummary>,
}

#[derive(Debug, Deserialize)]
struct OwnedGamesEnvelope {
    response: OwnedGamesPayload,
}

#[derive(Debug, Default, Deserialize)]
struct OwnedGamesPayload {
    #[serde(default)]
    games: Vec<OwnedGame>,
}

#[derive(Debug, Deserialize)]
struct FriendListEnvelope {
    #[serde(rename = "friendslist")]
    friends_list: Option<FriendListPayload>,
}

#[derive(Debug, Deserialize)]
struct FriendListPayload {
    #[serde(default)]
    friends: Vec<Friend>,
}

#[derive(Debug, Deserialize)]
struct VanityEnvelope {
    response: VanityPayload,
}

#[derive(Debug, Deserialize)]
struct VanityPayload {
    success: i32,
    #[serde(rename = "steamid")]
    steam_id: Option<String>,
}

/// Steam Web API client
pub struct SteamClient {
    http: Client,
    api_key: String,
}

impl SteamClient {
    pub fn new(http: Client, api_key: impl Into<String>) -> Self {
        Self {
            http,
            api_key: api_key.into(),
        }
    }

    fn build_url(&self, interface: &str, method: &str, version: &str) -> String {
        format!("{}/{}/{}/{}", BASE_URL, interface, method, version)
    }

    /// Make a GET request to the Steam API.
    /// The key and format params are added fresh on every call.
    async fn get(
        &self,
        interface: &str,
        method: &str,
        version: &str,
        params: &[(&str, String)],
    ) -> Result<reqwest::Response, SteamApiError> {
        let mut query: Vec<(&str, String)> = vec![
            ("key", self.api_key.clone()),
            ("format", "json".to_string()),
        ];
        query.extend(params.iter().cloned());

        let response = self
            .http
            .get(self.build_url(interface, method, version))
            .query(&query)
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            return Err(SteamApiError::InvalidResponse(response.status()));
        }

        Ok(response)
    }

    ///////////// ISteamUser interface /////////////

    /// Basic profile info for up to 100 players in one request
    pub async fn get_player_summaries(
        &self,
        steam_ids: &[&str],
    ) -> Result<Vec<PlayerSummary>, SteamApiError> {
        let response = self
            .get(
                ISTEAM_USER,
                GET_PLAYER_SUMMARIES,
                V2,
                &[("steamids", steam_ids.join(","))],
            )
            .await?;

        let data: PlayerSummariesEnvelope = response.json().await?;
        debug!("fetched {} player summaries", data.response.players.len());
        Ok(data.response.players)
    }

    /// Steam ids of a player's friends
    pub async fn get_friend_list(&self, steam_id: &str) -> Result<Vec<Friend>, SteamApiError> {
        let response = self
            .get(
                ISTEAM_USER,
                GET_FRIEND_LIST,
                V1,
                &[
                    ("steamid", steam_id.to_string()),
                    ("relationship", "friend".to_string()),
                ],
            )
            .await?;

        let data: FriendListEnvelope = response.json().await?;
        Ok(data.friends_list.map(|list| list.friends).unwrap_or_default())
    }

    /// Look up a 64-bit Steam ID from a vanity URL name.
    /// A success code other than 1 (42 = no match) yields None.
    pub async fn resolve_vanity_url(
        &self,
        vanity_url_name: &str,
    ) -> Result<Option<String>, SteamApiError> {
        let response = self
            .get(
                ISTEAM_USER,
                RESOLVE_VANITY_URL,
                V1,
                &[("vanityurl", vanity_url_name.to_string())],
            )
            .await?;

        let data: VanityEnvelope = response.json().await?;
        if data.response.success == NAME_SUCCESS_MATCH {
            Ok(data.response.steam_id)
        } else {
            Ok(None)
        }
    }

    /// Confirm a user-provided 64-bit Steam ID refers to a real player and
    /// return the id echoed by the API
    pub async fn validate_steam_id(&self, steam_id: &str) -> Result<String, SteamApiError> {
        let players = self.get_player_summaries(&[steam_id]).await?;
        players
            .into_iter()
            .next()
            .map(|player| player.steam_id)
            .ok_or_else(|| SteamApiError::InvalidUser(steam_id.to_string()))
    }

    ///////////// IPlayerService interface /////////////

    /// All games owned by a player, with lifetime and two-week playtime
    pub async fn get_owned_games(&self, steam_id: &str) -> Result<Vec<OwnedGame>, SteamApiError> {
        let response = self
            .get(
                IPLAYER_SERVICE,
                GET_OWNED_GAMES,
                V1,
                &[
                    ("steamid", steam_id.to_string()),
                    ("include_appinfo", "1".to_string()),
                    ("include_played_free_games", "1".to_string()),
                ],
            )
            .await?;

        let data: OwnedGamesEnvelope = response.json().await?;
        debug!("fetched {} owned games", data.response.games.len());
        Ok(data.response.games)
    }

    /// Games played in the last two weeks
    #[allow(dead_code)]
    pub async fn get_recently_played_games(
        &self,
        steam_id: &str,
    ) -> Result<Vec<OwnedGame>, SteamApiError> {
        let response = self
            .get(
                IPLAYER_SERVICE,
                GET_RECENTLY_PLAYED_GAMES,
                V1,
                &[("steamid", steam_id.to_string())],
            )
            .await?;

        let data: OwnedGamesEnvelope = response.json().await?;
        Ok(data.response.games)
    }
}

impl PlayerDataSource for SteamClient {
    async fn fetch_profile(&self, steam_id: &str) -> Result<Option<PlayerSummary>> {
        let players = self.get_player_summaries(&[steam_id]).await?;
        Ok(players.into_iter().next())
    }

    async fn fetch_owned_games(&self, steam_id: &str) -> Result<Vec<OwnedGame>> {
        Ok(self.get_owned_games(steam_id).await?)
    }

    async fn fetch_friends(&self, steam_id: &str) -> Result<Vec<PlayerSummary>> {
        // Two requests: friend ids first, then one batched summaries call
        let friends = self.get_friend_list(steam_id).await?;
        if friends.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<String> = friends.into_iter().map(|friend| friend.steam_id).collect();
        let id_refs: Vec<&str> = ids.iter().map(String::as_str).collect();
        Ok(self.get_player_summaries(&id_refs).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_player_summaries() {
        let json = r#"{
            "response": {
                "players": [{
                    "steamid": "76561197960435530",
                    "personaname": "Robin",
                    "profileurl": "https://steamcommunity.com/id/robinwalker/",
                    "avatar": "https://avatars.steamstatic.com/x.jpg",
                    "avatarmedium": "https://avatars.steamstatic.com/x_medium.jpg",
                    "avatarfull": "https://avatars.steamstatic.com/x_full.jpg",
                    "communityvisibilitystate": 3,
                    "timecreated": 1063407589
                }]
            }
        }"#;

        let data: PlayerSummariesEnvelope = serde_json::from_str(json).unwrap();
        let player = &data.response.players[0];
        assert_eq!(player.steam_id, "76561197960435530");
        assert_eq!(player.persona_name.as_deref(), Some("Robin"));
        assert_eq!(player.visibility_state, COMMUNITY_VISIBILITY_STATE_PUBLIC);
        assert_eq!(player.time_created, Some(1063407589));
    }

    #[test]
    fn test_parse_private_player_summary() {
        // Private profiles omit timecreated
        let json = r#"{
            "response": {
                "players": [{
                    "steamid": "76561197960435531",
                    "personaname": "ghost",
                    "communityvisibilitystate": 1
                }]
            }
        }"#;

        let data: PlayerSummariesEnvelope = serde_json::from_str(json).unwrap();
        let player = &data.response.players[0];
        assert_ne!(player.visibility_state, COMMUNITY_VISIBILITY_STATE_PUBLIC);
        assert_eq!(player.time_created, None);
        assert_eq!(player.profile_url, None);
    }

    #[test]
    fn test_parse_owned_games() {
        let json = r#"{
            "response": {
                "game_count": 2,
                "games": [
                    {
                        "appid": 70,
                        "name": "Half-Life",
                        "img_icon_url": "95be6d131fc61f145797317ca437c9765f24b41c",
                        "img_logo_url": "bd5f4fa8e5668b64fcfcdd999bb5db442ebf4aa5",
                        "playtime_forever": 1200,
                        "playtime_2weeks": 35
                    },
                    { "appid": 220, "playtime_forever": 0 }
                ]
            }
        }"#;

        let data: OwnedGamesEnvelope = serde_json::from_str(json).unwrap();
        assert_eq!(data.response.games.len(), 2);
        assert_eq!(data.response.games[0].playtime_mins, 1200);
        assert_eq!(data.response.games[0].playtime_mins_two_weeks, Some(35));
        assert_eq!(data.response.games[1].name, None);
        assert_eq!(data.response.games[1].playtime_mins_two_weeks, None);
    }

    #[test]
    fn test_parse_empty_owned_games() {
        // Private profiles answer with an empty response object
        let json = r#"{ "response": {} }"#;
        let data: OwnedGamesEnvelope = serde_json::from_str(json).unwrap();
        assert!(data.response.games.is_empty());
    }

    #[test]
    fn test_parse_friend_list() {
        let json = r#"{
            "friendslist": {
                "friends": [
                    { "steamid": "76561197960265731", "relationship": "friend", "friend_since": 0 },
                    { "steamid": "76561197960265738", "relationship": "friend", "friend_since": 1585508613 }
                ]
            }
        }"#;

        let data: FriendListEnvelope = serde_json::from_str(json).unwrap();
        let friends = data.friends_list.unwrap().friends;
        assert_eq!(friends.len(), 2);
        assert_eq!(friends[1].friend_since, Some(1585508613));
    }

    #[test]
    fn test_parse_vanity_match() {
        let json = r#"{ "response": { "steamid": "76561197969470540", "success": 1 } }"#;
        let data: VanityEnvelope = serde_json::from_str(json).unwrap();
        assert_eq!(data.response.success, NAME_SUCCESS_MATCH);
        assert_eq!(data.response.steam_id.as_deref(), Some("76561197969470540"));
    }

    #[test]
    fn test_parse_vanity_no_match() {
        let json = r#"{ "response": { "message": "No match", "success": 42 } }"#;
        let data: VanityEnvelope = serde_json::from_str(json).unwrap();
        assert_eq!(data.response.success, NAME_NO_MATCH);
        assert_eq!(data.response.steam_id, None);
    }
}
