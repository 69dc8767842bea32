// Player profile model and data source abstraction
//
// A profile is populated from the upstream API (or cache) on every request
// and never persisted, since only current data should be shown. Friends are
// loaded with basic info only; games and friend lists are only available
// for public profiles.

use anyhow::Result;
use futures::future;
use tracing::debug;

use crate::api::steam::{OwnedGame, PlayerSummary, COMMUNITY_VISIBILITY_STATE_PUBLIC};
use crate::models::game::Game;
use crate::utils::config::STEAM_ID_LEN;

/// Upstream supplier of player data. Lets profile loading run against the
/// real Steam client, a caching wrapper, or a test stub interchangeably.
pub trait PlayerDataSource {
    /// Basic profile info, or None when the id matches no player
    async fn fetch_profile(&self, steam_id: &str) -> Result<Option<PlayerSummary>>;

    /// All games owned by the player
    async fn fetch_owned_games(&self, steam_id: &str) -> Result<Vec<OwnedGame>>;

    /// Basic profile info for each of the player's friends
    async fn fetch_friends(&self, steam_id: &str) -> Result<Vec<PlayerSummary>>;
}

/// A player's profile with games owned and friend list
#[derive(Debug, Clone, Default)]
#[allow(dead_code)]
pub struct PlayerProfile {
    pub steam_id: String,
    pub public: bool,
    pub persona_name: Option<String>,
    pub profile_url: Option<String>,
    pub avatar: Option<String>,
    pub avatar_medium: Option<String>,
    pub avatar_full: Option<String>,
    /// Epoch seconds the account was created; public profiles only
    pub time_joined: Option<i64>,
    pub games_owned: Vec<Game>,
    pub friend_list: Vec<PlayerProfile>,
}

impl PlayerProfile {
    /// Build a profile carrying basic info only, with no games or friends
    pub fn from_summary(summary: PlayerSummary) -> Self {
        let public = summary.visibility_state == COMMUNITY_VISIBILITY_STATE_PUBLIC;
        Self {
            steam_id: summary.steam_id,
            public,
            persona_name: summary.persona_name,
            profile_url: summary.profile_url,
            avatar: summary.avatar,
            avatar_medium: summary.avatar_medium,
            avatar_full: summary.avatar_full,
            // Join date is only disclosed on public profiles
            time_joined: if public { summary.time_created } else { None },
            games_owned: Vec::new(),
            friend_list: Vec::new(),
        }
    }

    ///////// Time played /////////

    /// Total lifetime playtime across all games, in minutes
    pub fn total_playtime_mins(&self) -> u64 {
        self.games_owned.iter().map(|game| game.playtime_mins).sum()
    }

    /// Total playtime over the trailing two weeks, in minutes
    pub fn two_week_playtime_mins(&self) -> u64 {
        self.games_owned
            .iter()
            .map(|game| game.playtime_mins_two_weeks)
            .sum()
    }

    ///////// Game collection stats /////////

    /// Games played for one or more minutes
    pub fn games_played(&self) -> Vec<&Game> {
        self.games_owned.iter().filter(|game| game.played()).collect()
    }

    /// Games never played
    pub fn games_unplayed(&self) -> Vec<&Game> {
        self.games_owned.iter().filter(|game| !game.played()).collect()
    }

    /// The most played games, highest lifetime minutes first
    pub fn top_played_games(&self, num_games: usize) -> Vec<&Game> {
        let mut games: Vec<&Game> = self.games_owned.iter().collect();
        games.sort_by(|a, b| b.playtime_mins.cmp(&a.playtime_mins));
        games.truncate(num_games);
        games
    }
}

/// True when the input already looks like a 64-bit Steam ID (17 digits)
pub fn looks_like_steam_id(input: &str) -> bool {
    input.len() == STEAM_ID_LEN && input.bytes().all(|b| b.is_ascii_digit())
}

/// Fetch and assemble a player's full profile.
/// Games and friends are only requested for public profiles; friends are
/// loaded shallow (no games or friend lists of their own).
pub async fn load_profile<S: PlayerDataSource>(
    source: &S,
    steam_id: &str,
) -> Result<Option<PlayerProfile>> {
    let Some(summary) = source.fetch_profile(steam_id).await? else {
        return Ok(None);
    };

    let mut profile = PlayerProfile::from_summary(summary);

    if profile.public {
        let (games, friends) = future::try_join(
            source.fetch_owned_games(&profile.steam_id),
            source.fetch_friends(&profile.steam_id),
        )
        .await?;

        profile.games_owned = games.into_iter().map(Game::from).collect();
        profile.friend_list = friends
            .into_iter()
            .map(PlayerProfile::from_summary)
            .collect();
        debug!(
            "loaded {} games and {} friends for {}",
            profile.games_owned.len(),
            profile.friend_list.len(),
            profile.steam_id
        );
    }

    Ok(Some(profile))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StubSource {
        summary: Option<PlayerSummary>,
        games: Vec<OwnedGame>,
        friends: Vec<PlayerSummary>,
    }

    impl PlayerDataSource for StubSource {
        async fn fetch_profile(&self, _steam_id: &str) -> Result<Option<PlayerSummary>> {
            Ok(self.summary.clone())
        }

        async fn fetch_owned_games(&self, _steam_id: &str) -> Result<Vec<OwnedGame>> {
            Ok(self.games.clone())
        }

        async fn fetch_friends(&self, _steam_id: &str) -> Result<Vec<PlayerSummary>> {
            Ok(self.friends.clone())
        }
    }

    fn summary(steam_id: &str, visibility_state: i32, time_created: Option<i64>) -> PlayerSummary {
        PlayerSummary {
            steam_id: steam_id.to_string(),
            persona_name: Some("gabe".to_string()),
            profile_url: None,
            avatar: None,
            avatar_medium: None,
            avatar_full: None,
            visibility_state,
            time_created,
        }
    }

    fn owned(app_id: u32, playtime_mins: u64, two_weeks: Option<u64>) -> OwnedGame {
        OwnedGame {
            app_id,
            name: Some(format!("Game {}", app_id)),
            img_icon_url: None,
            img_logo_url: None,
            playtime_mins,
            playtime_mins_two_weeks: two_weeks,
        }
    }

    fn profile_with_games(games: Vec<OwnedGame>) -> PlayerProfile {
        PlayerProfile {
            games_owned: games.into_iter().map(Game::from).collect(),
            ..PlayerProfile::default()
        }
    }

    #[tokio::test]
    async fn test_load_public_profile() {
        let source = StubSource {
            summary: Some(summary("76561197960287930", 3, Some(1_063_407_589))),
            games: vec![owned(70, 600, Some(30)), owned(220, 0, None)],
            friends: vec![summary("76561197960265731", 1, None)],
        };

        let profile = load_profile(&source, "76561197960287930")
            .await
            .unwrap()
            .unwrap();
        assert!(profile.public);
        assert_eq!(profile.time_joined, Some(1_063_407_589));
        assert_eq!(profile.games_owned.len(), 2);
        assert_eq!(profile.friend_list.len(), 1);
        // Friends come back shallow
        assert!(profile.friend_list[0].games_owned.is_empty());
        assert_eq!(profile.friend_list[0].time_joined, None);
    }

    #[tokio::test]
    async fn test_load_private_profile() {
        let source = StubSource {
            summary: Some(summary("76561197960287930", 1, Some(1_063_407_589))),
            games: vec![owned(70, 600, Some(30))],
            friends: vec![summary("76561197960265731", 3, None)],
        };

        let profile = load_profile(&source, "76561197960287930")
            .await
            .unwrap()
            .unwrap();
        assert!(!profile.public);
        // Nothing beyond basic info is loaded for private profiles
        assert!(profile.games_owned.is_empty());
        assert!(profile.friend_list.is_empty());
        assert_eq!(profile.time_joined, None);
    }

    #[tokio::test]
    async fn test_load_unknown_player() {
        let source = StubSource {
            summary: None,
            games: Vec::new(),
            friends: Vec::new(),
        };

        assert!(load_profile(&source, "76561197960287930")
            .await
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_playtime_totals() {
        let profile = profile_with_games(vec![
            owned(1, 100, Some(40)),
            owned(2, 250, None),
            owned(3, 0, None),
        ]);
        assert_eq!(profile.total_playtime_mins(), 350);
        assert_eq!(profile.two_week_playtime_mins(), 40);
    }

    #[test]
    fn test_played_and_unplayed_split() {
        let profile = profile_with_games(vec![owned(1, 1, None), owned(2, 0, None)]);
        assert_eq!(profile.games_played().len(), 1);
        assert_eq!(profile.games_unplayed().len(), 1);
        assert_eq!(profile.games_unplayed()[0].app_id, 2);
    }

    #[test]
    fn test_top_played_games() {
        let profile = profile_with_games(vec![
            owned(1, 50, None),
            owned(2, 900, None),
            owned(3, 300, None),
        ]);

        let top = profile.top_played_games(2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].app_id, 2);
        assert_eq!(top[1].app_id, 3);

        // Asking for more than owned just returns everything
        assert_eq!(profile.top_played_games(10).len(), 3);
    }

    #[test]
    fn test_looks_like_steam_id() {
        assert!(looks_like_steam_id("76561197960287930"));
        assert!(!looks_like_steam_id("7656119796028793")); // 16 digits
        assert!(!looks_like_steam_id("765611979602879300")); // 18 digits
        assert!(!looks_like_steam_id("gaben"));
        assert!(!looks_like_steam_id("7656119796028793x"));
    }
}
