//! LLM Client module for FitPlanner
//!
//! Provides the completion client abstraction and the OpenAI-compatible
//! implementation used to reach Groq.

use std::sync::Arc;

use tracing::debug;

pub mod client;
mod error;
mod openai;
mod types;

pub use client::LlmClient;
pub use error::LlmError;
pub use openai::OpenAIClient;
pub use types::{CompletionRequest, CompletionResponse, StopReason, TokenUsage};

use crate::config::{ConfigError, LlmConfig};

/// Create an LLM client based on the provider specified in config
///
/// "openai" and "groq" share a wire format; only the base URL and key differ.
pub fn create_client(config: &LlmConfig) -> Result<Arc<dyn LlmClient>, ConfigError> {
    debug!(provider = %config.provider, model = %config.model, "create_client: called");
    match config.provider.as_str() {
        "openai" | "groq" => Ok(Arc::new(OpenAIClient::from_config(config)?)),
        other => {
            debug!(provider = %other, "create_client: unknown provider");
            Err(ConfigError::UnknownProvider(other.to_string()))
        }
    }
}

/// Send a rendered prompt as a single user message and return the reply text
///
/// A reply without text is treated as a malformed response.
pub async fn complete_prompt(llm: &dyn LlmClient, prompt: &str, max_tokens: u32) -> Result<String, LlmError> {
    debug!(prompt_len = prompt.len(), "complete_prompt: called");
    let response = llm.complete(CompletionRequest::from_prompt(prompt, max_tokens)).await?;
    debug!(
        input_tokens = response.usage.input_tokens,
        output_tokens = response.usage.output_tokens,
        "complete_prompt: token usage"
    );

    if response.stop_reason == StopReason::MaxTokens {
        tracing::warn!("complete_prompt: response truncated at max tokens");
    }

    match response.content {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => {
            debug!("complete_prompt: empty completion");
            Err(LlmError::InvalidResponse("completion contained no text".to_string()))
        }
    }
}
