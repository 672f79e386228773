//! Mock completion backend for integration tests
//!
//! Implements the minimal OpenAI-compatible chat completions surface and
//! returns scripted horoscope JSON. The handler infers which sign is
//! being generated from the prompt text, so responses always satisfy the
//! "not your own sign" rule unless a test asks for broken output.

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Json, Router, routing};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

const SIGNS: [&str; 12] = [
    "aries",
    "taurus",
    "gemini",
    "cancer",
    "leo",
    "virgo",
    "libra",
    "scorpio",
    "sagittarius",
    "capricorn",
    "aquarius",
    "pisces",
];

const AUTHORS: [&str; 14] = [
    "Marcus Aurelius",
    "Seneca",
    "Epictetus",
    "Confucius",
    "Lao Tzu",
    "Socrates",
    "Plato",
    "Aristotle",
    "Rumi",
    "Buddha",
    "Heraclitus",
    "Pythagoras",
    "Cicero",
    "Epicurus",
];

/// How the mock answers completion requests
#[derive(Clone, Copy)]
enum Mode {
    /// Well-formed JSON, authors rotating through the allow-list
    Rotating,
    /// Well-formed JSON, every record credits the same author
    FixedAuthor,
    /// Plain prose with no JSON object
    Malformed,
    /// HTTP 500 on every request
    Failing,
}

/// Mock completion backend that returns predictable responses
pub struct MockLlm {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockLlmState>,
}

struct MockLlmState {
    completion_count: AtomicU32,
    mode: Mode,
}

impl MockLlm {
    /// Start the mock server with rotating authors
    pub async fn start() -> anyhow::Result<Self> {
        Self::start_inner(Mode::Rotating).await
    }

    /// Start a mock whose every record credits the same author
    pub async fn start_fixed_author() -> anyhow::Result<Self> {
        Self::start_inner(Mode::FixedAuthor).await
    }

    /// Start a mock that returns prose instead of JSON
    pub async fn start_malformed() -> anyhow::Result<Self> {
        Self::start_inner(Mode::Malformed).await
    }

    /// Start a mock that fails every request with 500
    pub async fn start_failing() -> anyhow::Result<Self> {
        Self::start_inner(Mode::Failing).await
    }

    async fn start_inner(mode: Mode) -> anyhow::Result<Self> {
        let state = Arc::new(MockLlmState {
            completion_count: AtomicU32::new(0),
            mode,
        });

        let app = Router::new()
            .route("/v1/chat/completions", routing::post(handle_chat_completions))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown, state })
    }

    /// Base URL for configuring the mock as the upstream
    ///
    /// Includes `/v1` since the client appends `/chat/completions`
    pub fn base_url(&self) -> String {
        format!("http://{}/v1", self.addr)
    }

    /// Number of completion requests received
    pub fn completion_count(&self) -> u32 {
        self.state.completion_count.load(Ordering::Relaxed)
    }
}

impl Drop for MockLlm {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

// -- Wire types matching the chat completions format --

#[derive(Debug, Deserialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[allow(dead_code)]
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatCompletionResponse {
    id: String,
    object: String,
    created: u64,
    model: String,
    choices: Vec<Choice>,
}

#[derive(Debug, Serialize)]
struct Choice {
    index: u32,
    message: ResponseMessage,
    finish_reason: String,
}

#[derive(Debug, Serialize)]
struct ResponseMessage {
    role: String,
    content: String,
}

async fn handle_chat_completions(
    State(state): State<Arc<MockLlmState>>,
    Json(request): Json<ChatCompletionRequest>,
) -> impl IntoResponse {
    let count = state.completion_count.fetch_add(1, Ordering::Relaxed);

    if matches!(state.mode, Mode::Failing) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({"error": {"message": "mock upstream failure"}})),
        )
            .into_response();
    }

    let prompt = request.messages.first().map(|m| m.content.as_str()).unwrap_or_default();
    let content = match state.mode {
        Mode::Malformed => "The stars are quiet today.".to_owned(),
        Mode::FixedAuthor => horoscope_json(prompt, "Seneca"),
        Mode::Rotating | Mode::Failing => horoscope_json(prompt, AUTHORS[count as usize % AUTHORS.len()]),
    };

    let response = ChatCompletionResponse {
        id: format!("chatcmpl-mock-{count}"),
        object: "chat.completion".to_owned(),
        created: 1_700_000_000,
        model: request.model,
        choices: vec![Choice {
            index: 0,
            message: ResponseMessage {
                role: "assistant".to_owned(),
                content,
            },
            finish_reason: "stop".to_owned(),
        }],
    };

    Json(response).into_response()
}

/// Build a well-formed horoscope completion for the sign named in the prompt
fn horoscope_json(prompt: &str, author: &str) -> String {
    let sign = SIGNS
        .iter()
        .copied()
        .find(|sign| prompt.contains(sign))
        .unwrap_or("aries");

    let best_match: Vec<&str> = SIGNS.iter().copied().filter(|&s| s != sign).take(3).collect();

    serde_json::json!({
        "message": format!("A promising stretch ahead for {sign}: focus pays off."),
        "bestMatch": best_match.join(", "),
        "inspirationalQuote": "The obstacle is the way.",
        "quoteAuthor": author,
        "peacefulThought": "Still water reflects the sky.",
        "luckyNumber": 7,
        "luckyColor": "teal"
    })
    .to_string()
}
