// steamdash - Steam playtime stats dashboard
// Resolves a player, loads their profile, and prints the playtime panels

mod api;
mod models;
mod utils;

use std::env;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use chrono::DateTime;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api::steam::SteamClient;
use crate::models::profile::{self, PlayerProfile};
use crate::utils::cache::CachedPlayerSource;
use crate::utils::config::{self, Config};
use crate::utils::formatters::{
    format_breakdown, format_duration, format_hours, format_number, truncate,
};
use crate::utils::panel_data::PanelData;

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            env::var("RUST_LOG").unwrap_or_else(|_| "steamdash_rs=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    if let Err(e) = run().await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let config = Config::from_env()?;
    let input = env::args()
        .nth(1)
        .context("usage: steamdash-rs <steam-id-or-vanity-name>")?;

    // Build HTTP client for API calls
    let http = reqwest::Client::builder()
        .user_agent(config::USER_AGENT)
        .build()
        .context("failed to create HTTP client")?;

    let steam = SteamClient::new(http, config.steam_api_key.clone());
    let steam_id = resolve_steam_id(&steam, input.trim()).await?;
    info!("resolved player {}", steam_id);

    let source = CachedPlayerSource::new(
        steam,
        config::CACHE_CAPACITY,
        Duration::from_secs(config.cache_ttl_secs),
    );

    let Some(player) = profile::load_profile(&source, &steam_id).await? else {
        bail!("no profile data for steam id {}", steam_id);
    };

    render_dashboard(&player);
    Ok(())
}

/// Resolve user input to a 64-bit Steam ID. A 17-digit input is validated
/// against the API; anything else is treated as a vanity URL name.
async fn resolve_steam_id(steam: &SteamClient, input: &str) -> Result<String> {
    if profile::looks_like_steam_id(input) {
        Ok(steam.validate_steam_id(input).await?)
    } else {
        steam
            .resolve_vanity_url(input)
            .await?
            .with_context(|| format!("could not resolve '{}' to a steam id", input))
    }
}

fn render_dashboard(player: &PlayerProfile) {
    let name = player.persona_name.as_deref().unwrap_or(&player.steam_id);
    println!("Steam stats - {}", name);

    if !player.public {
        // Private profiles expose nothing beyond their persona name
        println!();
        println!("This profile is private; there is no playtime data to display.");
        return;
    }

    if let Some(joined) = player.time_joined {
        if let Some(date) = DateTime::from_timestamp(joined, 0) {
            println!("Member since {}", date.format("%Y-%m-%d"));
        }
    }

    let panels = PanelData::new(player);

    println!();
    println!("Lifetime");
    println!(
        "  total hours    : {}",
        format_hours(panels.time_played_hours_total())
    );
    println!(
        "  total played   : {}",
        format_breakdown(&panels.time_played_total())
    );
    match panels.avg_daily_hours_total() {
        Ok(Some(avg)) => println!("  daily average  : {:.2} h", avg),
        Ok(None) => println!("  daily average  : n/a"),
        Err(e) => warn!("skipping lifetime daily average: {}", e),
    }

    println!();
    println!("Past two weeks");
    println!(
        "  played         : {}",
        format_breakdown(&panels.time_played_two_weeks())
    );
    match panels.avg_daily_time_two_weeks() {
        Ok(breakdown) => println!("  daily average  : {}", format_breakdown(&breakdown)),
        Err(e) => warn!("skipping two-week daily average: {}", e),
    }

    println!();
    println!("Top played games");
    for game in player.top_played_games(config::TOP_PLAYED_GAMES_DEFAULT) {
        println!(
            "  {:<32} {}",
            truncate(&game.name, 32),
            format_duration(game.playtime_mins)
        );
    }

    println!();
    println!(
        "{} games owned ({} played, {} never played), {} friends",
        format_number(player.games_owned.len() as u64),
        format_number(player.games_played().len() as u64),
        format_number(player.games_unplayed().len() as u64),
        format_number(player.friend_list.len() as u64)
    );
}
