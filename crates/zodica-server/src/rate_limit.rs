//! Request rate limiting
//!
//! Global and per-IP limits, backed by governor in-process or by a redis
//! INCR/EXPIRE window when multiple instances share a budget.

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use governor::{Quota, RateLimiter, clock::DefaultClock, state::keyed::DashMapStateStore};
use http::StatusCode;
use thiserror::Error;
use zodica_config::{RateLimitConfig, RateLimitStorage, RequestRateLimit};

/// Rate limiting errors
#[derive(Debug, Error)]
pub enum RateLimitError {
    /// Configuration error
    #[error("rate limit configuration error: {0}")]
    Config(String),

    /// Redis connection error
    #[error("redis connection error: {0}")]
    Redis(String),

    /// Rate limit exceeded
    #[error("rate limit exceeded")]
    Exceeded {
        /// Seconds until the limit resets
        retry_after: u64,
    },
}

/// HTTP request-level rate limiter (global and per-IP)
#[derive(Debug)]
pub struct RequestLimiter {
    global: Option<Limiter>,
    per_ip: Option<Limiter>,
}

#[derive(Debug)]
enum Limiter {
    Memory(MemoryLimiter),
    Redis(RedisLimiter),
}

impl RequestLimiter {
    /// Create from configuration
    pub fn new(config: &RateLimitConfig) -> Result<Self, RateLimitError> {
        let global = config
            .global
            .as_ref()
            .map(|rl| build_limiter(&config.storage, rl))
            .transpose()?;

        let per_ip = config
            .per_ip
            .as_ref()
            .map(|rl| build_limiter(&config.storage, rl))
            .transpose()?;

        Ok(Self { global, per_ip })
    }

    /// Check global rate limit
    pub async fn check_global(&self) -> Result<(), RateLimitError> {
        if let Some(ref limiter) = self.global {
            check_limiter(limiter, "global").await?;
        }
        Ok(())
    }

    /// Check per-IP rate limit
    pub async fn check_ip(&self, ip: &str) -> Result<(), RateLimitError> {
        if let Some(ref limiter) = self.per_ip {
            check_limiter(limiter, ip).await?;
        }
        Ok(())
    }
}

fn build_limiter(storage: &RateLimitStorage, rate_limit: &RequestRateLimit) -> Result<Limiter, RateLimitError> {
    let window = parse_duration(&rate_limit.window)?;

    match storage {
        RateLimitStorage::Memory => Ok(Limiter::Memory(MemoryLimiter::new(rate_limit.requests, window)?)),
        RateLimitStorage::Redis(redis_config) => Ok(Limiter::Redis(RedisLimiter::new(
            redis_config.url.as_str(),
            rate_limit.requests,
            window,
        )?)),
    }
}

async fn check_limiter(limiter: &Limiter, key: &str) -> Result<(), RateLimitError> {
    match limiter {
        Limiter::Memory(m) => m.check(key),
        Limiter::Redis(r) => r.check(key).await,
    }
}

fn parse_duration(s: &str) -> Result<Duration, RateLimitError> {
    duration_str::parse(s).map_err(|e| RateLimitError::Config(format!("invalid duration '{s}': {e}")))
}

type KeyedLimiter = RateLimiter<String, DashMapStateStore<String>, DefaultClock>;

/// In-memory rate limiter backed by governor
#[derive(Debug)]
struct MemoryLimiter {
    limiter: Arc<KeyedLimiter>,
}

impl MemoryLimiter {
    fn new(max_requests: u32, window: Duration) -> Result<Self, RateLimitError> {
        if window.as_secs() == 0 {
            return Err(RateLimitError::Config("rate limit window must be > 0".to_string()));
        }
        let per_second = f64::from(max_requests.max(1)) / window.as_secs_f64();

        // Convert to governor's quota format
        let replenish_interval = Duration::from_secs_f64(1.0 / per_second);
        let burst = NonZeroU32::new(max_requests.max(1))
            .ok_or_else(|| RateLimitError::Config("max_requests must be > 0".to_string()))?;

        let quota = Quota::with_period(replenish_interval)
            .ok_or_else(|| RateLimitError::Config("invalid rate limit period".to_string()))?
            .allow_burst(burst);

        Ok(Self {
            limiter: Arc::new(RateLimiter::dashmap(quota)),
        })
    }

    fn check(&self, key: &str) -> Result<(), RateLimitError> {
        match self.limiter.check_key(&key.to_string()) {
            Ok(()) => Ok(()),
            Err(not_until) => {
                let retry_after =
                    not_until.wait_time_from(governor::clock::Clock::now(&governor::clock::DefaultClock::default()));
                Err(RateLimitError::Exceeded {
                    retry_after: retry_after.as_secs().max(1),
                })
            }
        }
    }
}

/// Redis-backed rate limiter using sliding window counters
#[derive(Debug)]
struct RedisLimiter {
    client: redis::Client,
    max_requests: u32,
    window: Duration,
}

impl RedisLimiter {
    fn new(url: &str, max_requests: u32, window: Duration) -> Result<Self, RateLimitError> {
        let client =
            redis::Client::open(url).map_err(|e| RateLimitError::Redis(format!("failed to connect to Redis: {e}")))?;

        Ok(Self {
            client,
            max_requests,
            window,
        })
    }

    async fn check(&self, key: &str) -> Result<(), RateLimitError> {
        use redis::AsyncCommands;

        let mut conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| RateLimitError::Redis(format!("failed to get connection: {e}")))?;

        let rate_key = format!("zodica:ratelimit:{key}");
        let window_secs = self.window.as_secs().max(1);

        // Increment counter and set expiry atomically
        let count: u32 = redis::cmd("INCR")
            .arg(&rate_key)
            .query_async(&mut conn)
            .await
            .map_err(|e| RateLimitError::Redis(format!("INCR failed: {e}")))?;

        // Set expiry on first request in window
        if count == 1 {
            let _: () = conn
                .expire(&rate_key, i64::try_from(window_secs).unwrap_or(i64::MAX))
                .await
                .map_err(|e| RateLimitError::Redis(format!("EXPIRE failed: {e}")))?;
        }

        if count > self.max_requests {
            let ttl: i64 = conn
                .ttl(&rate_key)
                .await
                .map_err(|e| RateLimitError::Redis(format!("TTL failed: {e}")))?;

            return Err(RateLimitError::Exceeded {
                retry_after: u64::try_from(ttl.max(1)).unwrap_or(1),
            });
        }

        Ok(())
    }
}

/// Rate limiting middleware using an Arc-wrapped limiter
pub async fn rate_limit_middleware(limiter: Arc<RequestLimiter>, request: Request, next: Next) -> Response {
    // Check global rate limit
    if let Err(e) = limiter.check_global().await {
        return rate_limit_response(&e);
    }

    // Check per-IP rate limit
    if let Some(ip) = extract_client_ip(&request)
        && let Err(e) = limiter.check_ip(&ip).await
    {
        return rate_limit_response(&e);
    }

    next.run(request).await
}

fn extract_client_ip(request: &Request) -> Option<String> {
    // Try X-Forwarded-For first
    if let Some(forwarded) = request.headers().get("x-forwarded-for")
        && let Ok(val) = forwarded.to_str()
        && let Some(first) = val.split(',').next()
    {
        return Some(first.trim().to_string());
    }

    // Try X-Real-IP
    if let Some(real_ip) = request.headers().get("x-real-ip")
        && let Ok(val) = real_ip.to_str()
    {
        return Some(val.trim().to_string());
    }

    None
}

fn rate_limit_response(error: &RateLimitError) -> Response {
    match error {
        RateLimitError::Exceeded { retry_after } => {
            let body = serde_json::json!({
                "success": false,
                "error": {
                    "type": "rate_limited",
                    "message": format!("rate limit exceeded, retry after {retry_after}s"),
                }
            });

            let mut response = (StatusCode::TOO_MANY_REQUESTS, axum::Json(body)).into_response();

            if let Ok(val) = retry_after.to_string().parse() {
                response.headers_mut().insert("retry-after", val);
            }

            response
        }
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "rate limiter error").into_response(),
    }
}
