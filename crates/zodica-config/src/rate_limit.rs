use serde::Deserialize;

use crate::cache::RedisStorageConfig;

/// Rate limiting configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RateLimitConfig {
    /// Storage backend
    #[serde(default)]
    pub storage: RateLimitStorage,
    /// Global rate limit (all requests)
    #[serde(default)]
    pub global: Option<RequestRateLimit>,
    /// Per-IP rate limit
    #[serde(default)]
    pub per_ip: Option<RequestRateLimit>,
}

/// Rate limit storage backend
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RateLimitStorage {
    /// In-memory storage (single instance only)
    #[default]
    Memory,
    /// Redis-backed storage (distributed)
    Redis(RedisStorageConfig),
}

/// Request-based rate limit
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RequestRateLimit {
    /// Maximum requests per window
    pub requests: u32,
    /// Window duration (e.g. "1m", "1h")
    pub window: String,
}
