//! AI gateway error types

use thiserror::Error;

/// Errors surfaced by AI operations. None of them are retried.
#[derive(Debug, Error)]
pub enum AiError {
    #[error("AI API key not configured. Set OPENAI_API_KEY or add api_key to config.toml")]
    NotConfigured,

    #[error("{0}")]
    EmptyInput(&'static str),

    #[error("Failed to reach the AI service: {0}")]
    Http(#[from] reqwest::Error),

    #[error("AI service rejected the credentials: {0}")]
    Unauthorized(String),

    #[error("AI service error ({status}): {message}")]
    Remote { status: u16, message: String },

    #[error("AI service returned no content")]
    EmptyResponse,

    #[error("Malformed AI output: {0}")]
    MalformedOutput(String),
}

/// Result type alias for AI operations
pub type AiResult<T> = Result<T, AiError>;
