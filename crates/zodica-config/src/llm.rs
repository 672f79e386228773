use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// Upstream completion model configuration
///
/// Any OpenAI-compatible chat completions endpoint works; `base_url`
/// selects the vendor and `model` the deployment.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LlmConfig {
    /// Base URL of the chat completions API
    #[serde(default)]
    pub base_url: Option<Url>,
    /// API key for authentication
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// Model identifier sent upstream
    #[serde(default = "default_model")]
    pub model: String,
    /// Sampling temperature
    #[serde(default)]
    pub temperature: Option<f64>,
    /// Upper bound on completion tokens
    #[serde(default)]
    pub max_tokens: Option<u32>,
    /// Upstream request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            api_key: None,
            model: default_model(),
            temperature: None,
            max_tokens: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_timeout_secs() -> u64 {
    30
}
