//! Metric name constants and recording helpers

use std::time::Instant;

use opentelemetry::metrics::{Histogram, Meter};

/// Meter shared by every zodica component
pub fn global_meter() -> Meter {
    opentelemetry::global::meter("zodica")
}

/// Record a duration measurement on a histogram
pub fn record_duration(histogram: &Histogram<f64>, start: Instant, attributes: &[opentelemetry::KeyValue]) {
    let duration = start.elapsed().as_secs_f64();
    histogram.record(duration, attributes);
}

// Cache metric names
pub const CACHE_HIT_COUNT: &str = "cache.hit.count";
pub const CACHE_MISS_COUNT: &str = "cache.miss.count";

// Generation metric names
pub const GENERATION_DURATION: &str = "horoscope.generation.duration";
pub const GENERATION_COUNT: &str = "horoscope.generation.count";
pub const BATCH_REGEN_COUNT: &str = "horoscope.batch.regeneration.count";
