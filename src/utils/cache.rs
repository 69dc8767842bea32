// Cache keys and a bounded TTL cache for raw API responses
// Derived stats are never cached; only upstream payloads are.

use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

use anyhow::Result;
use lru::LruCache;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::debug;

use crate::api::steam::{OwnedGame, PlayerSummary};
use crate::models::profile::PlayerDataSource;

/// Object names used as the first segment of cache keys
pub mod object {
    pub const USER: &str = "user";
    #[allow(dead_code)]
    pub const GAME: &str = "game";
}

/// Build a cache key from its parts.
///
/// Example result: "user:123:friend_list"
pub fn build_key(
    object_name: &str,
    identifier: impl std::fmt::Display,
    object_value_name: &str,
) -> String {
    format!("{}:{}:{}", object_name, identifier, object_value_name)
}

struct CacheEntry {
    value: Value,
    expires_at: Instant,
}

/// LRU-bounded store of raw JSON responses with a fixed time-to-live
pub struct ResponseCache {
    entries: Mutex<LruCache<String, CacheEntry>>,
    ttl: Duration,
}

impl ResponseCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(LruCache::new(
                NonZeroUsize::new(capacity.max(1)).unwrap(),
            )),
            ttl,
        }
    }

    /// A still-fresh value for the key; expired entries are dropped
    pub async fn get(&self, key: &str) -> Option<Value> {
        let mut entries = self.entries.lock().await;
        if let Some(entry) = entries.get(key) {
            if entry.expires_at > Instant::now() {
                return Some(entry.value.clone());
            }
            entries.pop(key);
        }
        None
    }

    pub async fn put(&self, key: String, value: Value) {
        let mut entries = self.entries.lock().await;
        entries.put(
            key,
            CacheEntry {
                value,
                expires_at: Instant::now() + self.ttl,
            },
        );
    }
}

/// Caching decorator around a player data source. Raw responses are stored
/// keyed by steam id and payload name; misses fall through to the inner
/// source and populate the cache.
pub struct CachedPlayerSource<S> {
    inner: S,
    cache: ResponseCache,
}

impl<S> CachedPlayerSource<S> {
    pub fn new(inner: S, capacity: usize, ttl: Duration) -> Self {
        Self {
            inner,
            cache: ResponseCache::new(capacity, ttl),
        }
    }

    async fn lookup<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.cache.get(key).await?;
        debug!("cache hit for {}", key);
        serde_json::from_value(value).ok()
    }
}

impl<S: PlayerDataSource> PlayerDataSource for CachedPlayerSource<S> {
    async fn fetch_profile(&self, steam_id: &str) -> Result<Option<PlayerSummary>> {
        let key = build_key(object::USER, steam_id, "profile_data");
        if let Some(cached) = self.lookup(&key).await {
            return Ok(cached);
        }

        let profile = self.inner.fetch_profile(steam_id).await?;
        self.cache.put(key, serde_json::to_value(&profile)?).await;
        Ok(profile)
    }

    async fn fetch_owned_games(&self, steam_id: &str) -> Result<Vec<OwnedGame>> {
        let key = build_key(object::USER, steam_id, "games_owned");
        if let Some(cached) = self.lookup(&key).await {
            return Ok(cached);
        }

        let games = self.inner.fetch_owned_games(steam_id).await?;
        self.cache.put(key, serde_json::to_value(&games)?).await;
        Ok(games)
    }

    async fn fetch_friends(&self, steam_id: &str) -> Result<Vec<PlayerSummary>> {
        let key = build_key(object::USER, steam_id, "friend_list");
        if let Some(cached) = self.lookup(&key).await {
            return Ok(cached);
        }

        let friends = self.inner.fetch_friends(steam_id).await?;
        self.cache.put(key, serde_json::to_value(&friends)?).await;
        Ok(friends)
    }
}
