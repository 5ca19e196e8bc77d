//! FAQ repository: the corpus and the pending queue over a [`SetStore`].
//!
//! The corpus is the base set followed by the curated set. Mutations of the
//! curated and pending sets go through [`SetStore::update_set`], which
//! serializes them across threads and processes, and are persisted before
//! the call returns. Reads take no lock.

use crate::storage::{SetStore, BASE_SET, CURATED_SET, PENDING_SET};
use crate::types::{CacheStats, Entry, PendingQuestion};
use faqgate_core::{AppError, AppResult};
use serde::Deserialize;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Lenient shape of a stored entry; absent fields read as empty.
#[derive(Debug, Deserialize)]
struct StoredEntry {
    #[serde(default)]
    question: String,
    #[serde(default)]
    answer: String,
}

pub struct FaqRepository {
    store: Arc<dyn SetStore>,
    /// Bumped after every durable curated append
    curated_revision: AtomicU64,
}

impl FaqRepository {
    pub fn new(store: Arc<dyn SetStore>) -> Self {
        Self {
            store,
            curated_revision: AtomicU64::new(0),
        }
    }

    /// The searchable corpus: base entries, then curated entries.
    pub fn load(&self) -> Vec<Entry> {
        let mut corpus = self.load_base();
        corpus.extend(self.load_curated());
        corpus
    }

    pub fn load_base(&self) -> Vec<Entry> {
        self.load_entries(BASE_SET)
    }

    pub fn load_curated(&self) -> Vec<Entry> {
        self.load_entries(CURATED_SET)
    }

    /// Number of curated appends made through this repository.
    ///
    /// Read it before [`load`](Self::load): the corpus then holds at least
    /// that many appends.
    pub fn curated_revision(&self) -> u64 {
        self.curated_revision.load(Ordering::Acquire)
    }

    /// Append an entry to the curated set and persist it.
    ///
    /// Returns the curated revision that includes this entry.
    pub fn append_curated(&self, entry: &Entry) -> AppResult<u64> {
        let record = serde_json::to_value(entry)?;
        let mut stored = 0;
        self.store.update_set(CURATED_SET, &mut |records: &mut Vec<Value>| {
            records.push(record.clone());
            stored = records.len();
            true
        })?;

        let revision = self.curated_revision.fetch_add(1, Ordering::AcqRel) + 1;
        tracing::debug!(
            "Curated set now holds {} entries (revision {})",
            stored,
            revision
        );
        Ok(revision)
    }

    pub fn load_pending(&self) -> Vec<PendingQuestion> {
        self.store
            .load_set(PENDING_SET)
            .into_iter()
            .filter_map(|record| match serde_json::from_value(record) {
                Ok(pending) => Some(pending),
                Err(e) => {
                    tracing::warn!("Skipping malformed pending record: {}", e);
                    None
                }
            })
            .collect()
    }

    /// Queue a question for review. Duplicates are kept.
    pub fn append_pending(&self, pending: &PendingQuestion) -> AppResult<()> {
        let record = serde_json::to_value(pending)?;
        self.store.update_set(PENDING_SET, &mut |records: &mut Vec<Value>| {
            records.push(record.clone());
            true
        })
    }

    /// Remove every pending record whose trimmed question equals `question`
    /// exactly. Returns how many were removed.
    pub fn remove_pending(&self, question: &str) -> AppResult<usize> {
        let mut removed = 0;
        self.store.update_set(PENDING_SET, &mut |records: &mut Vec<Value>| {
            let before = records.len();
            records.retain(|record| {
                record
                    .get("question")
                    .and_then(Value::as_str)
                    .map(str::trim)
                    != Some(question)
            });
            removed = before - records.len();
            removed > 0
        })?;
        Ok(removed)
    }

    /// Store an admin answer as a curated entry and clear the pending rows
    /// for its question. Returns how many pending rows were removed.
    pub fn record_answer(&self, question: &str, answer: &str) -> AppResult<usize> {
        let question = question.trim();
        let answer = answer.trim();
        if question.is_empty() {
            return Err(AppError::MissingField("question"));
        }
        if answer.is_empty() {
            return Err(AppError::MissingField("answer"));
        }

        self.append_curated(&Entry::new(question, answer))?;
        self.remove_pending(question)
    }

    /// Counters read straight from storage. `indexed_vectors` is the number
    /// of entries an index built now would hold.
    pub fn stats(&self, similarity_threshold: f32) -> CacheStats {
        let base_entries = self.load_base().len();
        let curated_entries = self.load_curated().len();
        CacheStats {
            base_entries,
            curated_entries,
            indexed_vectors: base_entries + curated_entries,
            pending_questions: self.load_pending().len(),
            similarity_threshold,
        }
    }

    fn load_entries(&self, name: &str) -> Vec<Entry> {
        self.store
            .load_set(name)
            .into_iter()
            .filter_map(|record| match serde_json::from_value::<StoredEntry>(record) {
                Ok(stored) => Some(stored),
                Err(e) => {
                    tracing::warn!("Skipping malformed record in set '{}': {}", name, e);
                    None
                }
            })
            .filter_map(|stored| {
                let question = stored.question.trim();
                if question.is_empty() {
                    return None;
                }
                Some(Entry::new(question, stored.answer.trim()))
            })
            .collect()
    }
}

impl std::fmt::Debug for FaqRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FaqRepository")
            .field("curated_revision", &self.curated_revision())
            .finish_non_exhaustive()
    }
}
