//! Programmatic configuration builder for integration tests

use std::net::SocketAddr;

use secrecy::SecretString;
use zodica_config::{
    CacheConfig, Config, ContentConfig, CorsConfig, HealthConfig, LlmConfig, RateLimitConfig, ServerConfig,
};

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder pointed at a mock completion backend
    pub fn new(llm_base_url: &str) -> Self {
        Self {
            config: Config {
                server: ServerConfig {
                    listen_address: Some(SocketAddr::from(([127, 0, 0, 1], 0))),
                    health: HealthConfig {
                        enabled: true,
                        ..HealthConfig::default()
                    },
                    ..ServerConfig::default()
                },
                llm: LlmConfig {
                    base_url: Some(llm_base_url.parse().expect("valid URL")),
                    api_key: Some(SecretString::from("test-key")),
                    model: "mock-model".to_owned(),
                    ..LlmConfig::default()
                },
                cache: CacheConfig::default(),
                content: ContentConfig::default(),
                telemetry: None,
            },
        }
    }

    /// Disable the content cache entirely
    pub fn without_cache(mut self) -> Self {
        self.config.cache.enabled = false;
        self
    }

    /// Bucket daily content by UTC instead of the requester's timezone
    pub fn without_timezone_awareness(mut self) -> Self {
        self.config.content.timezone_aware = false;
        self
    }

    /// Set CORS configuration
    pub fn with_cors(mut self, config: CorsConfig) -> Self {
        self.config.server.cors = Some(config);
        self
    }

    /// Set rate limit configuration
    pub fn with_rate_limit(mut self, config: RateLimitConfig) -> Self {
        self.config.server.rate_limit = Some(config);
        self
    }

    /// Disable health endpoint
    pub fn without_health(mut self) -> Self {
        self.config.server.health.enabled = false;
        self
    }

    /// Use a custom health endpoint path
    pub fn with_health_path(mut self, path: &str) -> Self {
        self.config.server.health.path = path.to_owned();
        self
    }

    /// Build the final config
    pub fn build(self) -> Config {
        self.config
    }
}
