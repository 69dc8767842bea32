// Game model
// One owned game with its player-specific playtime counters

use serde::{Deserialize, Serialize};

use crate::api::steam::OwnedGame;

/// Base URL for Steam's app image CDN
pub const MEDIA_BASE_URL: &str =
    "https://media.steampowered.com/steamcommunity/public/images/apps";

/// An owned game together with the player's lifetime and trailing
/// two-week playtime, both in minutes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[allow(dead_code)]
pub struct Game {
    pub app_id: u32,
    pub name: String,
    pub icon_img: Option<String>,
    pub logo_img: Option<String>,
    pub playtime_mins: u64,
    pub playtime_mins_two_weeks: u64,
}

impl Game {
    /// Played for one or more minutes
    pub fn played(&self) -> bool {
        self.playtime_mins >= 1
    }
}

impl From<OwnedGame> for Game {
    fn from(owned: OwnedGame) -> Self {
        Self {
            name: owned
                .name
                .unwrap_or_else(|| format!("App {}", owned.app_id)),
            icon_img: image_url(owned.app_id, owned.img_icon_url.as_deref()),
            logo_img: image_url(owned.app_id, owned.img_logo_url.as_deref()),
            app_id: owned.app_id,
            playtime_mins: owned.playtime_mins,
            playtime_mins_two_weeks: owned.playtime_mins_two_weeks.unwrap_or(0),
        }
    }
}

fn image_url(app_id: u32, hash: Option<&str>) -> Option<String> {
    let hash = hash.filter(|h| !h.is_empty())?;
    Some(format!("{}/{}/{}.jpg", MEDIA_BASE_URL, app_id, hash))
}
