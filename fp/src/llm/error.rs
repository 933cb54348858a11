//! LLM error types

use std::time::Duration;
use thiserror::Error;

/// Errors from a completion request
///
/// Every variant is recoverable: the caller shows the message and the
/// session carries on.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Rate limited ({message}), retry after {retry_after:?}")]
    RateLimited { retry_after: Duration, message: String },

    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LlmError {
    /// Check if this is a rate limit error
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, LlmError::RateLimited { .. })
    }

    /// Check if the service rejected the credential
    pub fn is_auth_error(&self) -> bool {
        matches!(self, LlmError::ApiError { status: 401 | 403, .. })
    }

    /// Get the retry duration if this is a rate limit error
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            LlmError::RateLimited { retry_after, .. } => Some(*retry_after),
            _ => None,
        }
    }
}
