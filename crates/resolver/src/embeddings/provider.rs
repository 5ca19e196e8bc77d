//! Embedding provider trait and factory.

use crate::embeddings::config::EmbeddingConfig;
use faqgate_core::{AppError, AppResult};
use std::sync::Arc;

/// Trait for embedding providers.
///
/// Implementations must return vectors of the same dimensionality for every
/// call within a process lifetime.
#[async_trait::async_trait]
pub trait EmbeddingProvider: Send + Sync + std::fmt::Debug {
    /// Get provider name (e.g., "trigram", "ollama")
    fn provider_name(&self) -> &str;

    /// Get model identifier
    fn model_name(&self) -> &str;

    /// Get embedding dimensions
    fn dimensions(&self) -> usize;

    /// Generate embeddings for multiple texts in a batch, in input order.
    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>>;

    /// Generate embedding for a single text (convenience method).
    async fn embed(&self, text: &str) -> AppResult<Vec<f32>> {
        let mut results = self.embed_batch(&[text.to_string()]).await?;
        results
            .pop()
            .ok_or_else(|| AppError::Embedding("No embedding returned".to_string()))
    }
}

/// Create an embedding provider based on configuration.
///
/// Network-backed providers are built without contacting their endpoint.
pub async fn create_provider(config: &EmbeddingConfig) -> AppResult<Arc<dyn EmbeddingProvider>> {
    match config.provider.as_str() {
        "trigram" => {
            let provider = super::providers::TrigramProvider::new(config.dimensions);
            Ok(Arc::new(provider))
        }

        "ollama" => {
            let provider = super::providers::OllamaProvider::new(config.clone())?;
            Ok(Arc::new(provider))
        }

        _ => Err(AppError::Embedding(format!(
            "Unknown embedding provider: '{}'. Supported providers: trigram, ollama",
            config.provider
        ))),
    }
}
