//! Completion client seam used by the answer generator.

use faqgate_core::AppResult;

/// One prompt for one model. The rendered prompt already carries any
/// instructions, so there is no separate system message.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmRequest {
    pub prompt: String,
    pub model: String,
}

impl LlmRequest {
    pub fn new(prompt: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            model: model.into(),
        }
    }
}

/// Raw completion text and the model that produced it.
#[derive(Debug, Clone)]
pub struct LlmResponse {
    /// Untrimmed; may be empty
    pub content: String,
    pub model: String,
    pub usage: LlmUsage,
}

/// Token counts as reported by the provider; zero when it reports none.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LlmUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl LlmUsage {
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens.saturating_add(completion_tokens),
        }
    }
}

/// A text-completion service.
///
/// Transport failures and non-success statuses are `AppError::Llm`.
#[async_trait::async_trait]
pub trait LlmClient: Send + Sync {
    fn provider_name(&self) -> &str;

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse>;
}
