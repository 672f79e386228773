//! Upstream completion client
//!
//! One OpenAI-compatible chat completions backend behind a trait, so the
//! generator and its tests can swap in scripted clients.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use url::Url;
use zodica_config::LlmConfig;

use crate::error::HoroscopeError;

/// Default `OpenAI` API base URL
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Opaque text-completion capability
///
/// Implementations take a prompt and return the raw completion text; all
/// parsing and validation happens in the generator.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send a completion request and return the assistant text
    async fn complete(&self, prompt: &str) -> Result<String, HoroscopeError>;
}

/// OpenAI-compatible chat completions client
pub struct OpenAiCompatClient {
    client: Client,
    base_url: Url,
    api_key: Option<SecretString>,
    model: String,
    temperature: Option<f64>,
    max_tokens: Option<u32>,
}

impl OpenAiCompatClient {
    /// Create from upstream model configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed
    ///
    /// # Panics
    ///
    /// Panics if the hardcoded default base URL is invalid (should never happen)
    pub fn from_config(config: &LlmConfig) -> Result<Self, HoroscopeError> {
        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| Url::parse(DEFAULT_BASE_URL).expect("valid default URL"));

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| HoroscopeError::Internal(anyhow::anyhow!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    /// Build the chat completions URL
    fn completions_url(&self) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        format!("{base}/chat/completions")
    }
}

#[async_trait]
impl CompletionClient for OpenAiCompatClient {
    async fn complete(&self, prompt: &str) -> Result<String, HoroscopeError> {
        let wire_request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_owned(),
                content: prompt.to_owned(),
            }],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let mut builder = self.client.post(self.completions_url()).json(&wire_request);

        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key.expose_secret());
        }

        let response = builder.send().await.map_err(|e| {
            tracing::error!(model = %self.model, error = %e, "upstream request failed");
            HoroscopeError::GenerationFailed(e.to_string())
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(model = %self.model, status = %status, "upstream returned error");
            return Err(HoroscopeError::GenerationFailed(format!(
                "upstream returned {status}: {body}"
            )));
        }

        let wire_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| HoroscopeError::GenerationFailed(format!("failed to parse response: {e}")))?;

        wire_response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| HoroscopeError::GenerationFailed("no choices in response".to_owned()))
    }
}

// -- Wire types (the subset of the chat completions format zodica uses) --

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

/// Scripted client shared by generator, batch, and service tests
#[cfg(test)]
pub(crate) mod tests_support {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    use async_trait::async_trait;

    use super::CompletionClient;
    use crate::error::HoroscopeError;

    /// Replays canned completions in order; the last one repeats once the
    /// script runs out. An empty script fails every call.
    pub struct ScriptedClient {
        responses: Mutex<Vec<String>>,
        cursor: AtomicU32,
        calls: AtomicU32,
    }

    impl ScriptedClient {
        pub fn with_responses(responses: &[&str]) -> Self {
            Self {
                responses: Mutex::new(responses.iter().map(ToString::to_string).collect()),
                cursor: AtomicU32::new(0),
                calls: AtomicU32::new(0),
            }
        }

        pub fn failing() -> Self {
            Self::with_responses(&[])
        }

        /// Number of completion calls made so far
        pub fn calls(&self) -> u32 {
            self.calls.load(Ordering::Relaxed)
        }
    }

    #[async_trait]
    impl CompletionClient for ScriptedClient {
        async fn complete(&self, _prompt: &str) -> Result<String, HoroscopeError> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            let responses = self.responses.lock().expect("script lock");
            if responses.is_empty() {
                return Err(HoroscopeError::GenerationFailed("scripted failure".to_owned()));
            }
            let index = self.cursor.fetch_add(1, Ordering::Relaxed) as usize;
            Ok(responses[index.min(responses.len() - 1)].clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completions_url_handles_trailing_slash() {
        let config = LlmConfig {
            base_url: Some("http://localhost:9000/v1/".parse().unwrap()),
            ..LlmConfig::default()
        };
        let client = OpenAiCompatClient::from_config(&config).unwrap();
        assert_eq!(client.completions_url(), "http://localhost:9000/v1/chat/completions");
    }

    #[test]
    fn default_base_url_is_openai() {
        let client = OpenAiCompatClient::from_config(&LlmConfig::default()).unwrap();
        assert_eq!(client.completions_url(), "https://api.openai.com/v1/chat/completions");
    }

    #[test]
    fn response_parsing_takes_the_first_choice() {
        let raw = serde_json::json!({
            "id": "chatcmpl-1",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "first"}, "finish_reason": "stop"},
                {"index": 1, "message": {"role": "assistant", "content": "second"}, "finish_reason": "stop"}
            ]
        });
        let parsed: ChatResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(parsed.choices[0].message.content, "first");
    }
}
