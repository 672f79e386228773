//! Horoscope service: the read path and the batch coordinator
//!
//! Owns the generator, the cache handle, and the generation policy. The
//! read path resolves the date bucket, consults the cache, and decides
//! between single-shot and full-batch generation on a miss. The batch
//! coordinator walks the twelve signs sequentially so the author ledger
//! can observe prior outcomes before each generation.

use std::sync::Arc;
use std::time::{Duration, Instant};

use jiff::civil::Date;
use strum::IntoEnumIterator;
use zodica_cache::{ContentCache, horoscope_key};
use zodica_config::Config;
use zodica_core::{Horoscope, HoroscopeKind, Sign, timezone};
use zodica_telemetry::{Counter, Histogram, KeyValue, metrics};

use crate::batch::{AuthorLedger, BatchOutcome};
use crate::client::{CompletionClient, OpenAiCompatClient};
use crate::error::HoroscopeError;
use crate::generator::Generator;

/// Shared state for horoscope route handlers
#[derive(Clone)]
pub struct HoroscopeService {
    inner: Arc<ServiceInner>,
}

struct ServiceInner {
    generator: Generator,
    cache: ContentCache,
    cache_enabled: bool,
    timezone_aware: bool,
    max_author_uses: u32,
    regen_attempts: u32,
    daily_ttl: Duration,
    extended_ttl: Duration,
    metrics: ServiceMetrics,
}

struct ServiceMetrics {
    cache_hits: Counter<u64>,
    cache_misses: Counter<u64>,
    generations: Counter<u64>,
    generation_duration: Histogram<f64>,
    batch_regens: Counter<u64>,
}

impl ServiceMetrics {
    fn new() -> Self {
        let meter = metrics::global_meter();
        Self {
            cache_hits: meter.u64_counter(metrics::CACHE_HIT_COUNT).build(),
            cache_misses: meter.u64_counter(metrics::CACHE_MISS_COUNT).build(),
            generations: meter.u64_counter(metrics::GENERATION_COUNT).build(),
            generation_duration: meter.f64_histogram(metrics::GENERATION_DURATION).build(),
            batch_regens: meter.u64_counter(metrics::BATCH_REGEN_COUNT).build(),
        }
    }
}

/// One served horoscope plus how it was obtained
#[derive(Debug)]
pub struct HoroscopeReply {
    pub record: Horoscope,
    /// Served from the cache rather than generated for this request
    pub cached: bool,
    /// Produced by a full-batch run triggered by this request
    pub batch_generated: bool,
    /// Whether the date bucket followed the requester's timezone
    pub timezone_aware: bool,
    /// Timezone actually used (after the safety fallback)
    pub timezone: String,
    /// Calendar date the record was bucketed under
    pub local_date: Date,
}

impl HoroscopeService {
    /// Build the service from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the upstream client or cache backend cannot be
    /// constructed, or a TTL string fails to parse
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let client = OpenAiCompatClient::from_config(&config.llm)
            .map_err(|e| anyhow::anyhow!("failed to build completion client: {e}"))?;
        let cache = ContentCache::from_config(&config.cache)
            .map_err(|e| anyhow::anyhow!("failed to build cache: {e}"))?;
        Self::new(Arc::new(client), cache, config)
    }

    /// Build the service with explicit collaborators
    ///
    /// # Errors
    ///
    /// Returns an error if a configured TTL string fails to parse
    pub fn new(client: Arc<dyn CompletionClient>, cache: ContentCache, config: &Config) -> anyhow::Result<Self> {
        let daily_ttl = duration_str::parse(&config.cache.daily_ttl)
            .map_err(|e| anyhow::anyhow!("invalid cache.daily_ttl: {e}"))?;
        let extended_ttl = duration_str::parse(&config.cache.extended_ttl)
            .map_err(|e| anyhow::anyhow!("invalid cache.extended_ttl: {e}"))?;

        Ok(Self {
            inner: Arc::new(ServiceInner {
                generator: Generator::new(client),
                cache,
                cache_enabled: config.cache.enabled,
                timezone_aware: config.content.timezone_aware,
                max_author_uses: config.content.max_author_uses,
                regen_attempts: config.content.regen_attempts,
                daily_ttl,
                extended_ttl,
                metrics: ServiceMetrics::new(),
            }),
        })
    }

    /// Serve one horoscope, generating on a cache miss
    ///
    /// # Errors
    ///
    /// Returns `GenerationFailed` when no cached record exists and every
    /// generation path (batch extraction plus the single-shot fallback)
    /// failed for this sign
    pub async fn get_horoscope(
        &self,
        sign: Sign,
        kind: HoroscopeKind,
        requested_timezone: &str,
    ) -> Result<HoroscopeReply, HoroscopeError> {
        let tz = timezone::safe_timezone(requested_timezone).to_owned();
        let timezone_aware = self.inner.timezone_aware && kind == HoroscopeKind::Daily;
        let date = if timezone_aware {
            timezone::local_date(&tz)
        } else {
            timezone::utc_date()
        };
        let key = horoscope_key(sign, kind, date);
        let kind_attr = [KeyValue::new("type", kind.as_str())];

        if self.inner.cache_enabled {
            if let Some(record) = self.cached_record(&key).await {
                self.inner.metrics.cache_hits.add(1, &kind_attr);
                return Ok(HoroscopeReply {
                    record,
                    cached: true,
                    batch_generated: false,
                    timezone_aware,
                    timezone: tz,
                    local_date: date,
                });
            }
            self.inner.metrics.cache_misses.add(1, &kind_attr);

            // Timezone-aware daily misses warm the whole bucket: the other
            // eleven cards for this local date will be requested shortly.
            if timezone_aware {
                let outcome = self.generate_batch(date, kind).await;
                if let Some(record) = outcome.results.get(&sign) {
                    return Ok(HoroscopeReply {
                        record: record.clone(),
                        cached: false,
                        batch_generated: true,
                        timezone_aware,
                        timezone: tz,
                        local_date: date,
                    });
                }
                tracing::warn!(%sign, %date, "batch missed this sign, falling back to single-shot");
            }
        }

        let record = self.generate_once(sign, kind, date).await?;
        if self.inner.cache_enabled {
            self.cache_record(&key, &record, kind).await;
        }

        Ok(HoroscopeReply {
            record,
            cached: false,
            batch_generated: false,
            timezone_aware,
            timezone: tz,
            local_date: date,
        })
    }

    /// Generate content for all twelve signs for one date bucket
    ///
    /// Walks the signs sequentially, spreading quote authors via the
    /// ledger, and caches each accepted record. Always terminates with an
    /// entry per sign: a record on success, a reason on failure.
    pub async fn generate_batch(&self, date: Date, kind: HoroscopeKind) -> BatchOutcome {
        let mut ledger = AuthorLedger::new(self.inner.max_author_uses);
        let mut outcome = BatchOutcome::default();

        for sign in Sign::iter() {
            match self.generate_with_variety(sign, kind, date, &mut ledger).await {
                Ok(record) => {
                    if self.inner.cache_enabled {
                        let key = horoscope_key(sign, kind, date);
                        self.cache_record(&key, &record, kind).await;
                    }
                    outcome.results.insert(sign, record);
                }
                Err(e) => {
                    tracing::warn!(%sign, %date, error = %e, "batch generation failed for sign");
                    outcome.errors.insert(sign, e.to_string());
                }
            }
        }

        tracing::info!(
            %date,
            generated = outcome.results.len(),
            failed = outcome.errors.len(),
            "batch complete"
        );
        outcome
    }

    /// Remove one cached record; returns whether a live entry existed
    ///
    /// Debug/cache-busting path, the only explicit delete in the system.
    pub async fn purge(&self, sign: Sign, kind: HoroscopeKind, requested_timezone: &str) -> bool {
        let tz = timezone::safe_timezone(requested_timezone);
        let date = if self.inner.timezone_aware && kind == HoroscopeKind::Daily {
            timezone::local_date(tz)
        } else {
            timezone::utc_date()
        };
        self.inner.cache.delete(&horoscope_key(sign, kind, date)).await
    }

    /// Today's date in the (safe-guarded) requested timezone
    pub fn resolve_date(&self, requested_timezone: &str) -> (String, Date) {
        let tz = timezone::safe_timezone(requested_timezone).to_owned();
        let date = timezone::local_date(&tz);
        (tz, date)
    }

    /// One generation attempt, plus cap-driven regeneration
    ///
    /// On a cap violation the budget buys extra attempts; the first retry
    /// crediting an acceptable author replaces the original. An exhausted
    /// budget keeps the over-cap record, so a sign that generated once
    /// never fails here.
    async fn generate_with_variety(
        &self,
        sign: Sign,
        kind: HoroscopeKind,
        date: Date,
        ledger: &mut AuthorLedger,
    ) -> Result<Horoscope, HoroscopeError> {
        let record = self.generate_once(sign, kind, date).await?;
        ledger.record(&record.quote_author);
        if !ledger.exceeds_cap(&record.quote_author) {
            return Ok(record);
        }

        let over_used = record.quote_author.clone();
        for attempt in 1..=self.inner.regen_attempts {
            match self.generate_once(sign, kind, date).await {
                Ok(retry) if ledger.accepts_replacement(&retry.quote_author, &over_used) => {
                    ledger.replace(&over_used, &retry.quote_author);
                    self.inner
                        .metrics
                        .batch_regens
                        .add(1, &[KeyValue::new("sign", sign.as_str())]);
                    tracing::debug!(
                        %sign,
                        from = %over_used,
                        to = %retry.quote_author,
                        attempt,
                        "regenerated to spread quote authors"
                    );
                    return Ok(retry);
                }
                Ok(retry) => {
                    tracing::debug!(%sign, author = %retry.quote_author, attempt, "retry author not acceptable");
                }
                Err(e) => {
                    tracing::warn!(%sign, attempt, error = %e, "regeneration attempt failed");
                }
            }
        }

        tracing::debug!(%sign, author = %over_used, "retry budget exhausted, keeping over-cap author");
        Ok(record)
    }

    async fn generate_once(&self, sign: Sign, kind: HoroscopeKind, date: Date) -> Result<Horoscope, HoroscopeError> {
        let start = Instant::now();
        let result = self.inner.generator.generate(sign, kind, date).await;

        let outcome = if result.is_ok() { "ok" } else { "error" };
        let attrs = [
            KeyValue::new("type", kind.as_str()),
            KeyValue::new("outcome", outcome),
        ];
        self.inner.metrics.generations.add(1, &attrs);
        metrics::record_duration(&self.inner.metrics.generation_duration, start, &attrs);

        result
    }

    /// Cached value for `key`, treating unparseable entries as misses
    async fn cached_record(&self, key: &str) -> Option<Horoscope> {
        let raw = self.inner.cache.get(key).await?;
        match serde_json::from_str(&raw) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(key, error = %e, "cached value unparseable, regenerating");
                None
            }
        }
    }

    async fn cache_record(&self, key: &str, record: &Horoscope, kind: HoroscopeKind) {
        let ttl = match kind {
            HoroscopeKind::Daily => self.inner.daily_ttl,
            HoroscopeKind::Weekly | HoroscopeKind::Monthly => self.inner.extended_ttl,
        };
        match serde_json::to_string(record) {
            Ok(serialized) => {
                self.inner.cache.set(key, &serialized, ttl).await;
            }
            Err(e) => tracing::warn!(key, error = %e, "failed to serialize record for caching"),
        }
    }
}
