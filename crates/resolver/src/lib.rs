//! FAQ answer resolution.
//!
//! Answers a question from a cache of curated question/answer pairs by
//! embedding similarity, falls back to a generation service on a miss and
//! queues anything still unanswered for admin review.

pub mod config;
pub mod embeddings;
pub mod engine;
pub mod generator;
pub mod index;
pub mod matcher;
pub mod prompt;
pub mod repository;
pub mod storage;
pub mod types;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use config::{ResolverConfig, DEFERRED_MESSAGE};
pub use engine::ResolutionEngine;
pub use generator::{AnswerGenerator, LlmGenerator};
pub use index::{IndexSnapshot, VectorStore};
pub use repository::FaqRepository;
pub use storage::{JsonFileStore, MemoryStore, SetStore};
pub use types::{AnswerSource, CacheStats, Entry, PendingQuestion, Resolution};

use embeddings::{create_provider, EmbeddingConfig};
use faqgate_core::{AppConfig, AppError, AppResult};
use faqgate_llm::create_client;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Open the repository over the configured JSON data directory.
///
/// Touches no provider, so it works while the embedding and generation
/// services are down.
pub fn open_repository(config: &AppConfig) -> AppResult<FaqRepository> {
    let data_dir = config.data_dir();
    tracing::info!("Opening FAQ data at {:?}", data_dir);
    let store = JsonFileStore::open(&data_dir)?;
    Ok(FaqRepository::new(Arc::new(store)))
}

/// Wire up an engine over the JSON data directory with the configured
/// embedding and generation providers. Embeds the whole corpus.
pub async fn open_engine(config: &AppConfig) -> AppResult<ResolutionEngine> {
    let start = Instant::now();
    let repository = Arc::new(open_repository(config)?);

    let embedding_config = EmbeddingConfig::from_app_config(config);
    let embedder = create_provider(&embedding_config).await?;

    let api_key = config.resolve_api_key(&config.provider);
    let endpoint = config.endpoint_for(&config.provider);
    let client = create_client(
        &config.provider,
        endpoint.as_deref(),
        api_key.as_deref(),
        Duration::from_secs(config.request_timeout_secs(&config.provider)),
    )
    .map_err(|e| AppError::Config(format!("Failed to create generation client: {}", e)))?;
    let generator = Arc::new(LlmGenerator::new(client, &config.model));

    let engine = ResolutionEngine::new(
        repository,
        embedder,
        generator,
        ResolverConfig::from_app_config(config),
    )
    .await?;

    tracing::debug!("Engine opened in {}ms", start.elapsed().as_millis());
    Ok(engine)
}
