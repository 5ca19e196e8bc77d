//! OpenRouter LLM provider implementation.
//!
//! OpenRouter exposes an OpenAI-compatible chat completions API:
//! https://openrouter.ai/docs/api-reference/chat-completion

use crate::client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
use faqgate_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default OpenRouter API base.
pub const DEFAULT_OPENROUTER_URL: &str = "https://openrouter.ai/api/v1";

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    #[serde(default)]
    message: Option<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

/// OpenRouter chat-completions client.
pub struct OpenRouterClient {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl OpenRouterClient {
    /// Create a client against the public OpenRouter endpoint.
    pub fn new(api_key: Option<String>) -> Self {
        Self::with_base_url(DEFAULT_OPENROUTER_URL, api_key, Duration::from_secs(60))
    }

    /// Create a client with a custom base URL and request timeout.
    pub fn with_base_url(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Falling back to default HTTP client for OpenRouter: {}", e);
                reqwest::Client::new()
            });

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            client,
        }
    }

    /// The rendered prompt goes out as a single user message.
    fn to_chat_request(&self, request: &LlmRequest) -> ChatRequest {
        ChatRequest {
            model: request.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: Some(request.prompt.clone()),
            }],
        }
    }

    /// Extract the first choice's content; a response without one is an error.
    fn convert_response(&self, response: ChatResponse, requested_model: &str) -> AppResult<LlmResponse> {
        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .ok_or_else(|| AppError::Llm("OpenRouter response contained no choices".to_string()))?;

        let usage = response
            .usage
            .map(|u| LlmUsage::new(u.prompt_tokens, u.completion_tokens))
            .unwrap_or_default();

        Ok(LlmResponse {
            content: content.trim().to_string(),
            model: response.model.unwrap_or_else(|| requested_model.to_string()),
            usage,
        })
    }
}

#[async_trait::async_trait]
impl LlmClient for OpenRouterClient {
    fn provider_name(&self) -> &str {
        "openrouter"
    }

    #[tracing::instrument(skip(self, request), fields(model = %request.model))]
    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::Llm("OpenRouter API key is not configured".to_string()))?;

        let url = format!("{}/chat/completions", self.base_url);
        tracing::debug!("Sending chat completion request to {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&self.to_chat_request(request))
            .send()
            .await
            .map_err(|e| AppError::Llm(format!("Failed to send request to OpenRouter: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::warn!("OpenRouter returned {}", status);
            return Err(AppError::Llm(format!(
                "OpenRouter API error ({}): {}",
                status, error_text
            )));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| AppError::Llm(format!("Failed to parse OpenRouter response: {}", e)))?;

        self.convert_response(chat_response, &request.model)
    }
}
