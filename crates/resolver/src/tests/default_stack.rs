//! Resolution with the embedder and threshold a fresh install gets.

use super::support::ScriptedGenerator;
use crate::config::ResolverConfig;
use crate::embeddings::{create_provider, EmbeddingConfig};
use crate::engine::ResolutionEngine;
use crate::repository::FaqRepository;
use crate::storage::{MemoryStore, BASE_SET};
use crate::types::AnswerSource;
use faqgate_core::AppConfig;
use serde_json::json;
use std::sync::Arc;

async fn default_engine(generator: ScriptedGenerator) -> ResolutionEngine {
    let app = AppConfig::default();
    let store = MemoryStore::with_sets([(
        BASE_SET.to_string(),
        vec![
            json!({"question": "How do I reset my password?", "answer": "Click 'forgot password'."}),
            json!({"question": "How do I change my billing plan?", "answer": "Open Billing and pick a plan."}),
        ],
    )]);

    let embedder = create_provider(&EmbeddingConfig::from_app_config(&app))
        .await
        .unwrap();
    assert_eq!(embedder.provider_name(), "trigram");

    ResolutionEngine::new(
        Arc::new(FaqRepository::new(Arc::new(store))),
        embedder,
        Arc::new(generator),
        ResolverConfig::from_app_config(&app),
    )
    .await
    .unwrap()
}

#[tokio::test]
async fn test_paraphrase_hits_cache_with_default_embedder() {
    let generator = ScriptedGenerator::failing();
    let prompts = generator.prompts();
    let engine = default_engine(generator).await;

    let resolution = engine.resolve("I forgot my password").await.unwrap();

    assert_eq!(resolution.source, AnswerSource::Cache);
    assert_eq!(resolution.answer, "Click 'forgot password'.");
    assert!(resolution.score.unwrap() >= engine.config().similarity_threshold);
    assert!(prompts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_unrelated_question_misses_with_default_embedder() {
    let engine = default_engine(ScriptedGenerator::failing()).await;

    let resolution = engine.resolve("Where can I download invoices?").await.unwrap();

    assert_eq!(resolution.source, AnswerSource::Deferred);
    assert_eq!(engine.list_pending().len(), 1);
}
