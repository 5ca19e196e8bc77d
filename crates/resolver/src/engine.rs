//! The resolution engine.
//!
//! Per question: embed, match against the published index, and on a miss
//! fall back to generation, caching the generated answer or deferring the
//! question to the pending queue.
//!
//! The (corpus, vectors) pair is an immutable [`IndexSnapshot`] behind an
//! `Arc`. Readers clone the `Arc` once per lookup; rebuilds construct a new
//! snapshot without holding any lock and swap it in. Embedding and
//! generation calls never run under a lock.

use crate::config::ResolverConfig;
use crate::embeddings::EmbeddingProvider;
use crate::generator::AnswerGenerator;
use crate::index::IndexSnapshot;
use crate::matcher::best_match;
use crate::prompt::PromptTemplate;
use crate::repository::FaqRepository;
use crate::types::{CacheStats, Entry, PendingQuestion, Resolution};
use faqgate_core::{AppError, AppResult};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, info, instrument, warn};

pub struct ResolutionEngine {
    repository: Arc<FaqRepository>,
    embedder: Arc<dyn EmbeddingProvider>,
    generator: Arc<dyn AnswerGenerator>,
    prompt: PromptTemplate,
    config: ResolverConfig,
    snapshot: RwLock<Arc<IndexSnapshot>>,
}

impl ResolutionEngine {
    /// Create an engine and build the initial index from the repository.
    pub async fn new(
        repository: Arc<FaqRepository>,
        embedder: Arc<dyn EmbeddingProvider>,
        generator: Arc<dyn AnswerGenerator>,
        config: ResolverConfig,
    ) -> AppResult<Self> {
        let prompt = PromptTemplate::new(&config.prompt_template)?;

        let revision = repository.curated_revision();
        let snapshot = IndexSnapshot::build(repository.load(), embedder.as_ref(), revision).await?;

        info!(
            entries = snapshot.len(),
            threshold = config.similarity_threshold,
            embedder = embedder.provider_name(),
            "Resolution engine ready"
        );

        Ok(Self {
            repository,
            embedder,
            generator,
            prompt,
            config,
            snapshot: RwLock::new(Arc::new(snapshot)),
        })
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn repository(&self) -> &FaqRepository {
        &self.repository
    }

    /// The currently published index.
    pub fn snapshot(&self) -> Arc<IndexSnapshot> {
        let guard = self.snapshot.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Answer a question from the cache, the generator, or by deferring it.
    ///
    /// Generation problems never surface here; they end in deferral.
    #[instrument(skip(self, question), fields(question_len = question.len()))]
    pub async fn resolve(&self, question: &str) -> AppResult<Resolution> {
        let question = question.trim();
        if question.is_empty() {
            return Err(AppError::EmptyInput);
        }

        let snapshot = self.snapshot();
        if let Some(hit) = self.lookup(&snapshot, question).await? {
            return Ok(hit);
        }

        match self.generate(question).await {
            Ok(answer) => {
                self.store_answer(question, &answer).await?;
                info!("Answered by generator and cached");
                Ok(Resolution::generated(answer))
            }
            Err(e) => {
                warn!("Deferring question: {}", e);
                self.repository
                    .append_pending(&PendingQuestion::now(question))?;
                Ok(Resolution::deferred(self.config.deferred_message.clone()))
            }
        }
    }

    /// Questions waiting for an admin.
    pub fn list_pending(&self) -> Vec<PendingQuestion> {
        self.repository.load_pending()
    }

    /// Store an admin-written answer, then clear the matching pending rows.
    #[instrument(skip_all)]
    pub async fn answer_pending(&self, question: &str, answer: &str) -> AppResult<()> {
        let removed = self.repository.record_answer(question, answer)?;
        self.refresh_index().await;
        info!(removed, "Pending question answered by admin");
        Ok(())
    }

    /// Retry generation for a pending question.
    ///
    /// Unlike [`resolve`](Self::resolve), failure is returned as
    /// `GenerationFailed` and the pending rows are left in place.
    #[instrument(skip_all)]
    pub async fn generate_for_pending(&self, question: &str) -> AppResult<String> {
        let question = question.trim();
        if question.is_empty() {
            return Err(AppError::MissingField("question"));
        }

        let answer = self.generate(question).await?;
        self.store_answer(question, &answer).await?;
        let removed = self.repository.remove_pending(question)?;
        info!(removed, "Pending question answered by generator");
        Ok(answer)
    }

    /// Rebuild the index from the repository and publish it.
    ///
    /// Returns the snapshot that is published afterwards, which is this
    /// rebuild's unless a rebuild of a newer curated revision already won.
    pub async fn rebuild_index(&self) -> AppResult<Arc<IndexSnapshot>> {
        // Revision first: the corpus loaded next holds at least this many appends
        let revision = self.repository.curated_revision();
        let corpus = self.repository.load();

        let fresh = IndexSnapshot::build(corpus, self.embedder.as_ref(), revision).await?;
        Ok(self.publish(Arc::new(fresh)))
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            indexed_vectors: self.snapshot().store().len(),
            ..self.repository.stats(self.config.similarity_threshold)
        }
    }

    async fn lookup(&self, snapshot: &IndexSnapshot, question: &str) -> AppResult<Option<Resolution>> {
        if snapshot.is_empty() {
            debug!("Index is empty, skipping similarity search");
            return Ok(None);
        }

        let query = self
            .embedder
            .embed(question)
            .await
            .map_err(|e| AppError::EmbeddingUnavailable(e.to_string()))?;

        let Some(found) = best_match(&query, snapshot.store()) else {
            return Ok(None);
        };

        if found.score < self.config.similarity_threshold {
            debug!(
                score = found.score,
                threshold = self.config.similarity_threshold,
                "Best match below threshold"
            );
            return Ok(None);
        }

        let entry = snapshot.entry(found.index).ok_or_else(|| {
            AppError::Other(format!("Match index {} outside corpus", found.index))
        })?;

        info!(score = found.score, index = found.index, "Served from cache");
        Ok(Some(Resolution::cached(entry.answer.clone(), found.score)))
    }

    /// Run the generator under the configured timeout. Every failure mode,
    /// including an empty answer, comes back as `GenerationFailed`.
    async fn generate(&self, question: &str) -> AppResult<String> {
        let prompt = self
            .prompt
            .render(question)
            .map_err(|e| AppError::GenerationFailed(e.to_string()))?;

        let outcome =
            tokio::time::timeout(self.config.generation_timeout, self.generator.complete(&prompt))
                .await;

        match outcome {
            Ok(Ok(answer)) => {
                let answer = answer.trim();
                if answer.is_empty() {
                    return Err(AppError::GenerationFailed("empty answer".to_string()));
                }
                Ok(answer.to_string())
            }
            Ok(Err(AppError::GenerationFailed(msg))) => Err(AppError::GenerationFailed(msg)),
            Ok(Err(e)) => Err(AppError::GenerationFailed(e.to_string())),
            Err(_) => Err(AppError::GenerationFailed(format!(
                "timed out after {:?}",
                self.config.generation_timeout
            ))),
        }
    }

    /// Persist a new curated entry, then refresh the index.
    ///
    /// The entry is durable before this returns. A failed rebuild keeps the
    /// previous index published; the entry is picked up by the next rebuild.
    async fn store_answer(&self, question: &str, answer: &str) -> AppResult<()> {
        self.repository
            .append_curated(&Entry::new(question, answer))?;
        self.refresh_index().await;
        Ok(())
    }

    async fn refresh_index(&self) {
        if let Err(e) = self.rebuild_index().await {
            warn!("Index rebuild failed, previous index stays published: {}", e);
        }
    }

    fn publish(&self, fresh: Arc<IndexSnapshot>) -> Arc<IndexSnapshot> {
        let mut current = self.snapshot.write().unwrap_or_else(PoisonError::into_inner);

        if fresh.revision() >= current.revision() {
            debug!(
                entries = fresh.len(),
                revision = fresh.revision(),
                "Publishing rebuilt index"
            );
            *current = fresh;
        } else {
            debug!(
                stale = fresh.revision(),
                published = current.revision(),
                "Discarding stale index rebuild"
            );
        }

        Arc::clone(&current)
    }
}
