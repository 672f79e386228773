use http::StatusCode;
use thiserror::Error;
use zodica_core::HttpError;

/// Errors that can occur while serving horoscope content
#[derive(Debug, Error)]
pub enum HoroscopeError {
    /// Client sent a malformed sign, type, or parameter
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Upstream generation produced an unusable response
    #[error("generation failed: {0}")]
    GenerationFailed(String),

    /// Unexpected internal error
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl HttpError for HoroscopeError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::GenerationFailed(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_type(&self) -> &str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::GenerationFailed(_) => "generation_failed",
            Self::Internal(_) => "internal_error",
        }
    }

    fn client_message(&self) -> String {
        match self {
            Self::Internal(_) => "an internal error occurred".to_owned(),
            other => other.to_string(),
        }
    }
}
