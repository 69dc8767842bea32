// Runtime configuration for the dashboard

use std::env;

use anyhow::{Context, Result};

/// Number of games shown in the top played panel
pub const TOP_PLAYED_GAMES_DEFAULT: usize = 5;

/// 64-bit Steam IDs are always 17 digits
pub const STEAM_ID_LEN: usize = 17;

/// How long a cached API response stays fresh, in seconds
pub const CACHE_TTL_SECS_DEFAULT: u64 = 300;

/// Upper bound on cached API responses
pub const CACHE_CAPACITY: usize = 100;

pub const USER_AGENT: &str = "steamdash-rs/0.1";

/// Settings read from the environment at startup
#[derive(Debug, Clone)]
pub struct Config {
    pub steam_api_key: String,
    pub cache_ttl_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let steam_api_key = env::var("STEAM_API_KEY").context("STEAM_API_KEY must be set")?;
        let cache_ttl_secs = match env::var("CACHE_TTL_SECS") {
            Ok(raw) => raw
                .parse()
                .context("CACHE_TTL_SECS must be a number of seconds")?,
            Err(_) => CACHE_TTL_SECS_DEFAULT,
        };

        Ok(Self {
            steam_api_key,
            cache_ttl_secs,
        })
    }
}
