//! LLM request/response types
//!
//! Provider-agnostic; `openai.rs` maps them onto the chat completions format.

use tracing::debug;

/// A completion request - everything needed for one LLM call
///
/// The rendered prompt is sent as a single user message; all context the
/// model needs is already inside it.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Rendered prompt text
    pub prompt: String,

    /// Max tokens for response (capped by config)
    pub max_tokens: u32,
}

impl CompletionRequest {
    pub fn from_prompt(prompt: impl Into<String>, max_tokens: u32) -> Self {
        debug!(%max_tokens, "CompletionRequest::from_prompt: called");
        Self {
            prompt: prompt.into(),
            max_tokens,
        }
    }
}

/// Why the model stopped generating
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StopReason {
    #[default]
    EndTurn,
    MaxTokens,
}

/// Token accounting reported by the API
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

/// The result of one completion call
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionResponse {
    pub content: Option<String>,
    pub stop_reason: StopReason,
    pub usage: TokenUsage,
}

impl CompletionResponse {
    /// Plain text response, as returned by a successful call
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            stop_reason: StopReason::EndTurn,
            usage: TokenUsage::default(),
        }
    }
}
