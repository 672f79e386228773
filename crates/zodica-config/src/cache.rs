use serde::Deserialize;
use url::Url;

/// Horoscope cache configuration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CacheConfig {
    /// Whether generated content is cached at all
    ///
    /// With caching off every request generates fresh content and the
    /// store is never read or written.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Storage backend
    #[serde(default)]
    pub storage: CacheStorage,
    /// Namespace prefix applied to every key
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
    /// TTL for daily content (e.g. "24h")
    #[serde(default = "default_daily_ttl")]
    pub daily_ttl: String,
    /// TTL for weekly and monthly content (e.g. "7d")
    #[serde(default = "default_extended_ttl")]
    pub extended_ttl: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            storage: CacheStorage::default(),
            key_prefix: default_key_prefix(),
            daily_ttl: default_daily_ttl(),
            extended_ttl: default_extended_ttl(),
        }
    }
}

/// Cache storage backend
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CacheStorage {
    /// In-process storage (single instance only)
    #[default]
    Memory,
    /// Redis-backed storage (shared across instances)
    Redis(RedisStorageConfig),
}

/// Redis connection settings shared by cache and rate-limit backends
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RedisStorageConfig {
    /// Redis connection URL (redis:// or rediss://)
    pub url: Url,
}

#[allow(clippy::missing_const_for_fn)]
fn default_enabled() -> bool {
    true
}

fn default_key_prefix() -> String {
    "zodica".to_string()
}

fn default_daily_ttl() -> String {
    "24h".to_string()
}

fn default_extended_ttl() -> String {
    "7d".to_string()
}
