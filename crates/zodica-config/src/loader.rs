use std::path::Path;

use crate::{Config, RequestRateLimit};

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, environment variable
    /// expansion fails, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        let expanded =
            crate::env::expand_env(&raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error if the model name is blank, a TTL or rate-limit
    /// window fails to parse, or the generation policy is out of range
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_llm()?;
        self.validate_cache()?;
        self.validate_content()?;
        self.validate_rate_limit()?;
        Ok(())
    }

    fn validate_llm(&self) -> anyhow::Result<()> {
        if self.llm.model.trim().is_empty() {
            anyhow::bail!("llm.model must not be empty");
        }
        if self.llm.timeout_secs == 0 {
            anyhow::bail!("llm.timeout_secs must be greater than 0");
        }
        Ok(())
    }

    fn validate_cache(&self) -> anyhow::Result<()> {
        if self.cache.key_prefix.trim().is_empty() {
            anyhow::bail!("cache.key_prefix must not be empty");
        }
        validate_duration("cache.daily_ttl", &self.cache.daily_ttl)?;
        validate_duration("cache.extended_ttl", &self.cache.extended_ttl)?;
        Ok(())
    }

    fn validate_content(&self) -> anyhow::Result<()> {
        if self.content.max_author_uses == 0 {
            anyhow::bail!("content.max_author_uses must be at least 1");
        }
        if self.content.regen_attempts > 10 {
            anyhow::bail!("content.regen_attempts exceeds maximum of 10");
        }
        Ok(())
    }

    fn validate_rate_limit(&self) -> anyhow::Result<()> {
        let Some(ref rate_limit) = self.server.rate_limit else {
            return Ok(());
        };

        if let Some(ref global) = rate_limit.global {
            validate_request_limit("server.rate_limit.global", global)?;
        }
        if let Some(ref per_ip) = rate_limit.per_ip {
            validate_request_limit("server.rate_limit.per_ip", per_ip)?;
        }
        Ok(())
    }
}

fn validate_request_limit(field: &str, limit: &RequestRateLimit) -> anyhow::Result<()> {
    if limit.requests == 0 {
        anyhow::bail!("{field}.requests must be at least 1");
    }
    validate_duration(&format!("{field}.window"), &limit.window)
}

fn validate_duration(field: &str, value: &str) -> anyhow::Result<()> {
    duration_str::parse(value).map_err(|e| anyhow::anyhow!("invalid duration for {field} ('{value}'): {e}"))?;
    Ok(())
}
