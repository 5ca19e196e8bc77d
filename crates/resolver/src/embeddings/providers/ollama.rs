//! Ollama embedding provider.
//!
//! Sends a whole batch of questions to `POST /api/embed` in one request and
//! expects one vector per question back, in order. No retries: a failed
//! call surfaces to the engine, which reports the query as unembeddable or
//! keeps the previous index.

use crate::embeddings::{EmbeddingConfig, EmbeddingProvider};
use faqgate_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

/// Transport timeout when the provider config does not set one.
pub const DEFAULT_EMBED_TIMEOUT_SECS: u64 = 30;

#[derive(Debug)]
pub struct OllamaProvider {
    client: reqwest::Client,
    url: String,
    model: String,
    dimensions: usize,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbedResponse {
    #[serde(default)]
    embeddings: Vec<Vec<f32>>,
}

impl OllamaProvider {
    /// Build a provider; no request is made until the first embedding.
    ///
    /// The endpoint comes from the config, then `OLLAMA_URL`, then the
    /// local default.
    pub fn new(config: EmbeddingConfig) -> AppResult<Self> {
        let timeout = Duration::from_secs(config.timeout_secs.unwrap_or(DEFAULT_EMBED_TIMEOUT_SECS));
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Embedding(format!("Failed to build Ollama HTTP client: {}", e)))?;

        let base_url = config
            .endpoint
            .or_else(|| std::env::var("OLLAMA_URL").ok())
            .unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string());

        Ok(Self {
            client,
            url: format!("{}/api/embed", base_url.trim_end_matches('/')),
            model: config.model,
            dimensions: config.dimensions,
        })
    }

    /// Check a response body against the batch that produced it.
    fn vectors_from(&self, body: EmbedResponse, expected: usize) -> AppResult<Vec<Vec<f32>>> {
        if body.embeddings.len() != expected {
            return Err(AppError::Embedding(format!(
                "Ollama returned {} embeddings for {} inputs",
                body.embeddings.len(),
                expected
            )));
        }

        if let Some(bad) = body.embeddings.iter().find(|v| v.len() != self.dimensions) {
            return Err(AppError::Embedding(format!(
                "Model '{}' produced {} dimensions, configured for {}",
                self.model,
                bad.len(),
                self.dimensions
            )));
        }

        Ok(body.embeddings)
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for OllamaProvider {
    fn provider_name(&self) -> &str {
        "ollama"
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    #[instrument(skip(self, texts), fields(batch = texts.len(), model = %self.model))]
    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let response = self
            .client
            .post(&self.url)
            .json(&EmbedRequest {
                model: &self.model,
                input: texts,
            })
            .send()
            .await
            .map_err(|e| AppError::Embedding(format!("Ollama unreachable at {}: {}", self.url, e)))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(AppError::Embedding(format!(
                "Ollama embed failed ({}): {}",
                status, detail
            )));
        }

        let body: EmbedResponse = response
            .json()
            .await
            .map_err(|e| AppError::Embedding(format!("Unreadable Ollama embed response: {}", e)))?;

        debug!("Embedded {} texts", texts.len());
        self.vectors_from(body, texts.len())
    }
}
