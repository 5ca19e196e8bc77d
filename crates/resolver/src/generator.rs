//! Answer generation collaborator.
//!
//! Every kind of generation trouble (transport error, non-success status,
//! structurally empty response) collapses into `AppError::GenerationFailed`.

use faqgate_core::{AppError, AppResult};
use faqgate_llm::{LlmClient, LlmRequest};
use std::sync::Arc;

/// Produces an answer for a rendered prompt.
#[async_trait::async_trait]
pub trait AnswerGenerator: Send + Sync {
    async fn complete(&self, prompt: &str) -> AppResult<String>;
}

/// [`AnswerGenerator`] backed by an LLM completion client.
pub struct LlmGenerator {
    client: Arc<dyn LlmClient>,
    model: String,
}

impl LlmGenerator {
    pub fn new(client: Arc<dyn LlmClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }
}

#[async_trait::async_trait]
impl AnswerGenerator for LlmGenerator {
    async fn complete(&self, prompt: &str) -> AppResult<String> {
        let request = LlmRequest::new(prompt, &self.model);

        let response = self.client.complete(&request).await.map_err(|e| {
            tracing::warn!(
                provider = self.client.provider_name(),
                "Generation request failed: {}",
                e
            );
            AppError::GenerationFailed(e.to_string())
        })?;

        let content = response.content.trim();
        if content.is_empty() {
            return Err(AppError::GenerationFailed(format!(
                "{} returned an empty answer",
                self.client.provider_name()
            )));
        }

        tracing::debug!(
            model = %response.model,
            tokens = response.usage.total_tokens,
            "Generated answer"
        );
        Ok(content.to_string())
    }
}
