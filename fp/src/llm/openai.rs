//! OpenAI-compatible chat completions client
//!
//! Works against any endpoint that speaks the OpenAI Chat Completions format,
//! including Groq's `/openai/v1/chat/completions`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{CompletionRequest, CompletionResponse, LlmClient, LlmError, StopReason, TokenUsage};
use crate::config::{ConfigError, LlmConfig};

/// Retry-After fallback when a 429 carries no usable header
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// OpenAI-compatible API client
pub struct OpenAIClient {
    model: String,
    api_key: String,
    base_url: String,
    http: Client,
    max_tokens: u32,
}

impl OpenAIClient {
    pub fn new(
        model: impl Into<String>,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        max_tokens: u32,
    ) -> Self {
        Self {
            model: model.into(),
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
            max_tokens,
        }
    }

    /// Use a preconfigured HTTP client (proxies, TLS roots)
    pub fn with_http_client(mut self, http: Client) -> Self {
        self.http = http;
        self
    }

    /// Create a client from configuration
    ///
    /// Fails when the credential environment variable is not set.
    pub fn from_config(config: &LlmConfig) -> Result<Self, ConfigError> {
        debug!(provider = %config.provider, model = %config.model, "OpenAIClient::from_config: called");
        let api_key = config.get_api_key()?;
        Ok(Self::new(&config.model, api_key, &config.base_url, config.max_tokens))
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }

    /// Build the request body for the chat completions API
    fn build_request_body(&self, request: &CompletionRequest) -> serde_json::Value {
        debug!(%self.model, %request.max_tokens, "build_request_body: called");

        serde_json::json!({
            "model": self.model,
            "messages": [{
                "role": "user",
                "content": request.prompt,
            }],
            "max_tokens": request.max_tokens.min(self.max_tokens),
        })
    }

    /// Parse the API response
    fn parse_response(&self, api_response: OpenAIResponse) -> CompletionResponse {
        debug!(choice_count = api_response.choices.len(), "parse_response: called");
        let (content, stop_reason) = match api_response.choices.into_iter().next() {
            Some(c) => {
                let stop_reason = match c.finish_reason.as_deref() {
                    Some("length") => StopReason::MaxTokens,
                    Some("stop") | None => StopReason::EndTurn,
                    Some(other) => {
                        debug!(finish_reason = %other, "parse_response: unrecognized finish reason");
                        StopReason::EndTurn
                    }
                };
                (c.message.content, stop_reason)
            }
            None => (None, StopReason::EndTurn),
        };

        let usage = api_response
            .usage
            .map(|u| TokenUsage {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
            })
            .unwrap_or_default();

        CompletionResponse {
            content,
            stop_reason,
            usage,
        }
    }
}

#[async_trait]
impl LlmClient for OpenAIClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        debug!(%self.model, %request.max_tokens, "complete: called");
        let body = self.build_request_body(&request);

        let response = self
            .http
            .post(self.endpoint())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status().as_u16();

        if status == 429 {
            debug!("complete: rate limited (429)");
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
            let text = response.text().await.unwrap_or_default();

            return Err(LlmError::RateLimited {
                retry_after: Duration::from_secs(retry_after),
                message: extract_error_message(&text),
            });
        }

        if !response.status().is_success() {
            debug!(%status, "complete: API error");
            let text = response.text().await.unwrap_or_default();
            return Err(LlmError::ApiError {
                status,
                message: extract_error_message(&text),
            });
        }

        let text = response.text().await?;
        let api_response: OpenAIResponse = serde_json::from_str(&text)?;
        debug!("complete: success");
        Ok(self.parse_response(api_response))
    }
}

/// Pull `error.message` out of an error body, falling back to the raw text
fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<OpenAIErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| body.trim().to_string())
}

// OpenAI API response types

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    choices: Vec<OpenAIChoice>,
    usage: Option<OpenAIUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIUsage {
    prompt_tokens: u64,
    completion_tokens: u64,
}

#[derive(Debug, Deserialize)]
struct OpenAIErrorBody {
    error: OpenAIErrorDetail,
}

#[derive(Debug, Deserialize)]
struct OpenAIErrorDetail {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(max_tokens: u32) -> OpenAIClient {
        OpenAIClient::new("llama3-8b-8192", "test-key", "https://api.groq.com/openai/", max_tokens)
    }

    #[test]
    fn test_endpoint_strips_trailing_slash() {
        let client = test_client(4096);
        assert_eq!(client.endpoint(), "https://api.groq.com/openai/v1/chat/completions");
    }

    #[test]
    fn test_build_request_body_basic() {
        let client = test_client(4096);
        let request = CompletionRequest::from_prompt("Plan please", 1000);

        let body = client.build_request_body(&request);

        assert_eq!(body["model"], "llama3-8b-8192");
        assert_eq!(body["max_tokens"], 1000);
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "Plan please");
    }

    #[test]
    fn test_max_tokens_capped() {
        let client = test_client(1000);
        let request = CompletionRequest::from_prompt("Test", 5000);

        let body = client.build_request_body(&request);
        assert_eq!(body["max_tokens"], 1000);
    }

    #[test]
    fn test_parse_response_text() {
        let client = test_client(4096);
        let api_response: OpenAIResponse = serde_json::from_str(
            r#"{
                "choices": [{"message": {"role": "assistant", "content": "Week 1: oats"}, "finish_reason": "stop"}],
                "usage": {"prompt_tokens": 120, "completion_tokens": 45, "total_tokens": 165}
            }"#,
        )
        .unwrap();

        let response = client.parse_response(api_response);

        assert_eq!(response.content.as_deref(), Some("Week 1: oats"));
        assert_eq!(response.stop_reason, StopReason::EndTurn);
        assert_eq!(response.usage.input_tokens, 120);
        assert_eq!(response.usage.output_tokens, 45);
    }

    #[test]
    fn test_parse_response_truncated() {
        let client = test_client(4096);
        let api_response: OpenAIResponse = serde_json::from_str(
            r#"{"choices": [{"message": {"content": "partial"}, "finish_reason": "length"}]}"#,
        )
        .unwrap();

        let response = client.parse_response(api_response);
        assert_eq!(response.stop_reason, StopReason::MaxTokens);
        assert_eq!(response.usage, TokenUsage::default());
    }

    #[test]
    fn test_parse_response_no_choices() {
        let client = test_client(4096);
        let api_response: OpenAIResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();

        let response = client.parse_response(api_response);
        assert!(response.content.is_none());
    }

    #[test]
    fn test_parse_response_unknown_finish_reason() {
        let client = test_client(4096);
        let api_response: OpenAIResponse = serde_json::from_str(
            r#"{"choices": [{"message": {"content": "done"}, "finish_reason": "tool_calls"}]}"#,
        )
        .unwrap();

        let response = client.parse_response(api_response);
        assert_eq!(response.stop_reason, StopReason::EndTurn);
    }

    #[test]
    fn test_extract_error_message() {
        let body = r#"{"error": {"message": "Invalid API Key", "type": "invalid_request_error"}}"#;
        assert_eq!(extract_error_message(body), "Invalid API Key");
        assert_eq!(extract_error_message("  Bad Gateway \n"), "Bad Gateway");
    }
}
