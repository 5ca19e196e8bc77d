//! Ollama completions via `POST /api/generate` with streaming off.

use crate::client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
use faqgate_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default local Ollama endpoint.
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    response: String,
    #[serde(default)]
    prompt_eval_count: u32,
    #[serde(default)]
    eval_count: u32,
}

impl GenerateResponse {
    fn into_llm_response(self, requested_model: &str) -> LlmResponse {
        LlmResponse {
            content: self.response,
            model: self.model.unwrap_or_else(|| requested_model.to_string()),
            usage: LlmUsage::new(self.prompt_eval_count, self.eval_count),
        }
    }
}

pub struct OllamaClient {
    url: String,
    client: reqwest::Client,
}

impl OllamaClient {
    pub fn with_base_url(base_url: &str, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Falling back to default HTTP client for Ollama: {}", e);
                reqwest::Client::new()
            });

        Self {
            url: format!("{}/api/generate", base_url.trim_end_matches('/')),
            client,
        }
    }
}

#[async_trait::async_trait]
impl LlmClient for OllamaClient {
    fn provider_name(&self) -> &str {
        "ollama"
    }

    #[tracing::instrument(skip(self, request), fields(model = %request.model))]
    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        let body = GenerateRequest {
            model: &request.model,
            prompt: &request.prompt,
            stream: false,
        };

        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Llm(format!("Ollama unreachable at {}: {}", self.url, e)))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(AppError::Llm(format!("Ollama generate failed ({}): {}", status, detail)));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| AppError::Llm(format!("Unreadable Ollama generate response: {}", e)))?;

        tracing::debug!("Ollama answered with {} chars", parsed.response.len());
        Ok(parsed.into_llm_response(&request.model))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_url_from_base() {
        let client = OllamaClient::with_base_url("http://gpu-box:11434/", Duration::from_secs(1));
        assert_eq!(client.url, "http://gpu-box:11434/api/generate");
        assert_eq!(client.provider_name(), "ollama");
    }

    #[test]
    fn test_request_disables_streaming() {
        let json = serde_json::to_value(GenerateRequest {
            model: "llama3.2",
            prompt: "How do I export data?",
            stream: false,
        })
        .unwrap();

        assert_eq!(json["stream"], false);
        assert_eq!(json["prompt"], "How do I export data?");
    }

    #[test]
    fn test_response_conversion() {
        let raw = r#"{"model":"llama3.2","response":"Use the Export menu.","done":true,"prompt_eval_count":10,"eval_count":5}"#;
        let parsed: GenerateResponse = serde_json::from_str(raw).unwrap();

        let response = parsed.into_llm_response("ignored");
        assert_eq!(response.content, "Use the Export menu.");
        assert_eq!(response.model, "llama3.2");
        assert_eq!(response.usage.total_tokens, 15);
    }

    #[test]
    fn test_response_without_model_uses_requested() {
        let parsed: GenerateResponse = serde_json::from_str(r#"{"response":""}"#).unwrap();
        let response = parsed.into_llm_response("llama3.2");
        assert_eq!(response.model, "llama3.2");
        assert!(response.content.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_server_is_llm_error() {
        let client = OllamaClient::with_base_url("http://127.0.0.1:9", Duration::from_secs(1));
        let result = client.complete(&LlmRequest::new("hi", "llama3.2")).await;
        assert!(matches!(result, Err(AppError::Llm(_))));
    }
}
