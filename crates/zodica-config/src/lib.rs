#![allow(clippy::must_use_candidate)]

pub mod cache;
pub mod content;
pub mod cors;
mod env;
pub mod health;
pub mod llm;
mod loader;
pub mod rate_limit;
pub mod server;
pub mod telemetry;

use serde::Deserialize;

pub use cache::*;
pub use content::*;
pub use cors::*;
pub use health::*;
pub use llm::*;
pub use rate_limit::*;
pub use server::*;
pub use telemetry::TelemetryConfig;

/// Top-level zodica configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Upstream completion model configuration
    #[serde(default)]
    pub llm: LlmConfig,
    /// Horoscope cache configuration
    #[serde(default)]
    pub cache: CacheConfig,
    /// Content generation policy
    #[serde(default)]
    pub content: ContentConfig,
    /// Telemetry configuration
    #[serde(default)]
    pub telemetry: Option<TelemetryConfig>,
}
