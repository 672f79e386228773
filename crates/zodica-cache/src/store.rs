use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use thiserror::Error;
use zodica_config::{CacheConfig, CacheStorage};

/// Cache errors
///
/// Only construction surfaces these; read and write operations absorb
/// backend failures and degrade to miss/no-op instead.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Redis connection or command error
    #[error("cache backend: {0}")]
    Backend(String),
}

/// TTL key-value store for generated content
///
/// Backed by an in-process map or by redis. All operations are
/// best-effort: failures are logged at warn level and reported as a miss
/// (reads) or a no-op (writes and deletes), never as an error.
#[derive(Clone)]
pub struct ContentCache {
    backend: Backend,
    key_prefix: String,
}

#[derive(Clone)]
enum Backend {
    Memory(MemoryStore),
    Redis(redis::Client),
}

impl ContentCache {
    /// Build a cache from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the redis URL is rejected by the client
    pub fn from_config(config: &CacheConfig) -> Result<Self, CacheError> {
        let backend = match &config.storage {
            CacheStorage::Memory => Backend::Memory(MemoryStore::default()),
            CacheStorage::Redis(redis) => {
                let client = redis::Client::open(redis.url.as_str())
                    .map_err(|e| CacheError::Backend(format!("invalid URL: {e}")))?;
                Backend::Redis(client)
            }
        };

        Ok(Self {
            backend,
            key_prefix: config.key_prefix.clone(),
        })
    }

    /// In-process cache with the given namespace
    pub fn memory(key_prefix: impl Into<String>) -> Self {
        Self {
            backend: Backend::Memory(MemoryStore::default()),
            key_prefix: key_prefix.into(),
        }
    }

    /// Look up a value; backend failures read as a miss
    pub async fn get(&self, key: &str) -> Option<String> {
        match self.try_get(key).await {
            Ok(Some(value)) => {
                tracing::debug!(key, "cache hit");
                Some(value)
            }
            Ok(None) => {
                tracing::debug!(key, "cache miss");
                None
            }
            Err(e) => {
                tracing::warn!(key, error = %e, "cache read failed, treating as miss");
                None
            }
        }
    }

    /// Store a value with a per-entry TTL; returns whether the write landed
    pub async fn set(&self, key: &str, value: &str, ttl: Duration) -> bool {
        match self.try_set(key, value, ttl).await {
            Ok(()) => {
                tracing::debug!(key, ttl_secs = ttl.as_secs(), "cached entry");
                true
            }
            Err(e) => {
                tracing::warn!(key, error = %e, "cache write failed, skipping");
                false
            }
        }
    }

    /// Remove a value; returns whether a live entry was actually removed
    pub async fn delete(&self, key: &str) -> bool {
        match self.try_delete(key).await {
            Ok(removed) => {
                tracing::debug!(key, removed, "cache delete");
                removed
            }
            Err(e) => {
                tracing::warn!(key, error = %e, "cache delete failed, skipping");
                false
            }
        }
    }

    /// Whether a live entry exists; backend failures read as absent
    pub async fn exists(&self, key: &str) -> bool {
        match self.try_exists(key).await {
            Ok(present) => present,
            Err(e) => {
                tracing::warn!(key, error = %e, "cache existence check failed, treating as absent");
                false
            }
        }
    }

    fn namespaced(&self, key: &str) -> String {
        format!("{}:{key}", self.key_prefix)
    }

    async fn try_get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let key = self.namespaced(key);
        match &self.backend {
            Backend::Memory(store) => Ok(store.get(&key)),
            Backend::Redis(client) => {
                use redis::AsyncCommands;

                let mut conn = connect(client).await?;
                conn.get(&key)
                    .await
                    .map_err(|e| CacheError::Backend(format!("GET failed: {e}")))
            }
        }
    }

    async fn try_set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let key = self.namespaced(key);
        match &self.backend {
            Backend::Memory(store) => {
                store.set(key, value.to_owned(), ttl);
                Ok(())
            }
            Backend::Redis(client) => {
                use redis::AsyncCommands;

                let mut conn = connect(client).await?;
                let _: () = conn
                    .set_ex(&key, value, ttl.as_secs())
                    .await
                    .map_err(|e| CacheError::Backend(format!("SET failed: {e}")))?;
                Ok(())
            }
        }
    }

    async fn try_delete(&self, key: &str) -> Result<bool, CacheError> {
        let key = self.namespaced(key);
        match &self.backend {
            Backend::Memory(store) => Ok(store.remove(&key)),
            Backend::Redis(client) => {
                use redis::AsyncCommands;

                let mut conn = connect(client).await?;
                let removed: usize = conn
                    .del(&key)
                    .await
                    .map_err(|e| CacheError::Backend(format!("DEL failed: {e}")))?;
                Ok(removed > 0)
            }
        }
    }

    async fn try_exists(&self, key: &str) -> Result<bool, CacheError> {
        let key = self.namespaced(key);
        match &self.backend {
            Backend::Memory(store) => Ok(store.contains(&key)),
            Backend::Redis(client) => {
                use redis::AsyncCommands;

                let mut conn = connect(client).await?;
                conn.exists(&key)
                    .await
                    .map_err(|e| CacheError::Backend(format!("EXISTS failed: {e}")))
            }
        }
    }
}

async fn connect(client: &redis::Client) -> Result<redis::aio::MultiplexedConnection, CacheError> {
    client
        .get_multiplexed_async_connection()
        .await
        .map_err(|e| CacheError::Backend(format!("connection failed: {e}")))
}

/// Per-entry TTL map; expired entries are dropped lazily on access
#[derive(Clone, Default)]
struct MemoryStore {
    entries: Arc<DashMap<String, MemoryEntry>>,
}

struct MemoryEntry {
    value: String,
    expires_at: Instant,
}

impl MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.drop_if_expired(key);
        self.entries.get(key).map(|entry| entry.value.clone())
    }

    fn set(&self, key: String, value: String, ttl: Duration) {
        let expires_at = Instant::now() + ttl;
        self.entries.insert(key, MemoryEntry { value, expires_at });
    }

    fn remove(&self, key: &str) -> bool {
        self.drop_if_expired(key);
        self.entries.remove(key).is_some()
    }

    fn contains(&self, key: &str) -> bool {
        self.entries
            .get(key)
            .is_some_and(|entry| entry.expires_at > Instant::now())
    }

    fn drop_if_expired(&self, key: &str) {
        self.entries.remove_if(key, |_, entry| entry.expires_at <= Instant::now());
    }
}
