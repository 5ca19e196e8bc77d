//! Test doubles for the embedding and generation collaborators.

use crate::embeddings::EmbeddingProvider;
use crate::generator::AnswerGenerator;
use faqgate_core::{AppError, AppResult};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

const KEYED_DIMENSIONS: usize = 256;

/// Embedder with pinned vectors for chosen texts.
///
/// Any other text gets a one-hot vector of its own, so distinct unpinned
/// texts never resemble each other.
#[derive(Debug, Default)]
pub struct KeyedEmbedder {
    pinned: HashMap<String, Vec<f32>>,
    slots: Mutex<HashMap<String, usize>>,
    failing: AtomicBool,
    calls: AtomicUsize,
}

impl KeyedEmbedder {
    pub fn with(mut self, text: &str, direction: &[f32]) -> Self {
        let mut vector = vec![0.0; KEYED_DIMENSIONS];
        vector[..direction.len()].copy_from_slice(direction);
        self.pinned.insert(text.to_string(), vector);
        self
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn vector_for(&self, text: &str) -> Vec<f32> {
        if let Some(vector) = self.pinned.get(text) {
            return vector.clone();
        }

        let mut slots = self.slots.lock().unwrap();
        // Slot 0 is left to pinned directions
        let next = slots.len() + 1;
        let slot = *slots.entry(text.to_string()).or_insert(next);

        let mut vector = vec![0.0; KEYED_DIMENSIONS];
        vector[slot % KEYED_DIMENSIONS] = 1.0;
        vector
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for KeyedEmbedder {
    fn provider_name(&self) -> &str {
        "keyed"
    }

    fn model_name(&self) -> &str {
        "keyed"
    }

    fn dimensions(&self) -> usize {
        KEYED_DIMENSIONS
    }

    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::Embedding("embedder offline".to_string()));
        }
        Ok(texts.iter().map(|t| self.vector_for(t)).collect())
    }
}

enum Script {
    Answer(String),
    Numbered,
    Fail,
    Slow(Duration),
}

/// Generator with a fixed behavior that records every prompt it sees.
pub struct ScriptedGenerator {
    script: Script,
    prompts: Arc<Mutex<Vec<String>>>,
    calls: AtomicUsize,
}

impl ScriptedGenerator {
    fn scripted(script: Script) -> Self {
        Self {
            script,
            prompts: Arc::new(Mutex::new(Vec::new())),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn answering(answer: &str) -> Self {
        Self::scripted(Script::Answer(answer.to_string()))
    }

    /// Answers "Generated answer N" with a fresh N per call.
    pub fn numbered() -> Self {
        Self::scripted(Script::Numbered)
    }

    pub fn failing() -> Self {
        Self::scripted(Script::Fail)
    }

    /// Sleeps for `delay` and then answers.
    pub fn slow(delay: Duration) -> Self {
        Self::scripted(Script::Slow(delay))
    }

    pub fn prompts(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.prompts)
    }
}

#[async_trait::async_trait]
impl AnswerGenerator for ScriptedGenerator {
    async fn complete(&self, prompt: &str) -> AppResult<String> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());

        match &self.script {
            Script::Answer(answer) => Ok(answer.clone()),
            Script::Numbered => Ok(format!("Generated answer {}", call)),
            Script::Fail => Err(AppError::GenerationFailed("HTTP 503".to_string())),
            Script::Slow(delay) => {
                tokio::time::sleep(*delay).await;
                Ok("Too late.".to_string())
            }
        }
    }
}
