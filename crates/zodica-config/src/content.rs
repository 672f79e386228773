use serde::Deserialize;

/// Content generation policy
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContentConfig {
    /// Bucket daily content by the requester's local calendar date
    ///
    /// When off, daily content is keyed by the UTC date for everyone.
    #[serde(default = "default_timezone_aware")]
    pub timezone_aware: bool,
    /// Soft cap on how many signs may credit the same quote author within
    /// one batch run
    #[serde(default = "default_max_author_uses")]
    pub max_author_uses: u32,
    /// Extra generation attempts allowed per sign when the cap is exceeded
    #[serde(default = "default_regen_attempts")]
    pub regen_attempts: u32,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            timezone_aware: true,
            max_author_uses: default_max_author_uses(),
            regen_attempts: default_regen_attempts(),
        }
    }
}

#[allow(clippy::missing_const_for_fn)]
fn default_timezone_aware() -> bool {
    true
}

#[allow(clippy::missing_const_for_fn)]
fn default_max_author_uses() -> u32 {
    2
}

#[allow(clippy::missing_const_for_fn)]
fn default_regen_attempts() -> u32 {
    3
}
