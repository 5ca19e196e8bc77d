//! Vector store and the published (corpus, vectors) snapshot.
//!
//! The store is derived data: it is always rebuilt in full from the corpus
//! and never edited in place. A rebuilt store is paired with the corpus it
//! came from in an [`IndexSnapshot`], which is what readers share.

use crate::embeddings::EmbeddingProvider;
use crate::types::Entry;
use faqgate_core::{AppError, AppResult};

/// Embedding vectors aligned 1:1 with a corpus.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VectorStore {
    vectors: Vec<Vec<f32>>,
}

impl VectorStore {
    /// A store with no entries. Lookups against it report no candidates.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_vectors(vectors: Vec<Vec<f32>>) -> Self {
        Self { vectors }
    }

    /// Embed every corpus question into a new store.
    ///
    /// An empty corpus gives an empty store without calling the embedder.
    pub async fn rebuild(corpus: &[Entry], embedder: &dyn EmbeddingProvider) -> AppResult<Self> {
        if corpus.is_empty() {
            return Ok(Self::empty());
        }

        let questions: Vec<String> = corpus.iter().map(|e| e.question.clone()).collect();
        let vectors = embedder
            .embed_batch(&questions)
            .await
            .map_err(|e| AppError::EmbeddingUnavailable(e.to_string()))?;

        if vectors.len() != corpus.len() {
            return Err(AppError::EmbeddingUnavailable(format!(
                "Embedder returned {} vectors for {} questions",
                vectors.len(),
                corpus.len()
            )));
        }

        Ok(Self { vectors })
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn vectors(&self) -> &[Vec<f32>] {
        &self.vectors
    }
}

/// A corpus and the vector store built from it, published together.
#[derive(Debug, Clone, Default)]
pub struct IndexSnapshot {
    corpus: Vec<Entry>,
    store: VectorStore,
    /// Curated revision the corpus was loaded at
    revision: u64,
}

impl IndexSnapshot {
    /// Pair a corpus with its store; their lengths must agree.
    pub fn new(corpus: Vec<Entry>, store: VectorStore, revision: u64) -> AppResult<Self> {
        if corpus.len() != store.len() {
            return Err(AppError::Other(format!(
                "Index misaligned: {} entries, {} vectors",
                corpus.len(),
                store.len()
            )));
        }

        Ok(Self {
            corpus,
            store,
            revision,
        })
    }

    /// Load-and-embed in one step.
    pub async fn build(
        corpus: Vec<Entry>,
        embedder: &dyn EmbeddingProvider,
        revision: u64,
    ) -> AppResult<Self> {
        let store = VectorStore::rebuild(&corpus, embedder).await?;
        Self::new(corpus, store, revision)
    }

    pub fn corpus(&self) -> &[Entry] {
        &self.corpus
    }

    pub fn store(&self) -> &VectorStore {
        &self.store
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn entry(&self, index: usize) -> Option<&Entry> {
        self.corpus.get(index)
    }

    pub fn len(&self) -> usize {
        self.corpus.len()
    }

    pub fn is_empty(&self) -> bool {
        self.corpus.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeddings::TrigramProvider;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Default)]
    struct CountingEmbedder {
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl EmbeddingProvider for CountingEmbedder {
        fn provider_name(&self) -> &str {
            "counting"
        }

        fn model_name(&self) -> &str {
            "counting"
        }

        fn dimensions(&self) -> usize {
            2
        }

        async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            // Drops the last text to simulate a misbehaving provider
            Ok(texts.iter().skip(1).map(|_| vec![1.0, 0.0]).collect())
        }
    }

    fn corpus(questions: &[&str]) -> Vec<Entry> {
        questions.iter().map(|q| Entry::new(*q, "answer")).collect()
    }

    #[tokio::test]
    async fn test_rebuild_aligns_with_corpus() {
        let embedder = TrigramProvider::new(64);
        let entries = corpus(&["reset password", "export data", "billing plan"]);

        let store = VectorStore::rebuild(&entries, &embedder).await.unwrap();
        assert_eq!(store.len(), entries.len());
        assert!(store.vectors().iter().all(|v| v.len() == 64));
    }

    #[tokio::test]
    async fn test_rebuild_is_deterministic() {
        let embedder = TrigramProvider::new(64);
        let entries = corpus(&["reset password", "export data"]);

        let first = VectorStore::rebuild(&entries, &embedder).await.unwrap();
        let second = VectorStore::rebuild(&entries, &embedder).await.unwrap();

        let bits = |s: &VectorStore| -> Vec<Vec<u32>> {
            s.vectors()
                .iter()
                .map(|v| v.iter().map(|x| x.to_bits()).collect())
                .collect()
        };
        assert_eq!(bits(&first), bits(&second));
    }

    #[tokio::test]
    async fn test_rebuild_empty_corpus_skips_embedder() {
        let embedder = CountingEmbedder::default();

        let store = VectorStore::rebuild(&[], &embedder).await.unwrap();
        assert!(store.is_empty());
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_rebuild_rejects_short_batches() {
        let embedder = CountingEmbedder::default();
        let entries = corpus(&["a question", "another question"]);

        let result = VectorStore::rebuild(&entries, &embedder).await;
        assert!(matches!(result, Err(AppError::EmbeddingUnavailable(_))));
    }

    #[test]
    fn test_snapshot_rejects_misalignment() {
        let result = IndexSnapshot::new(
            corpus(&["one"]),
            VectorStore::from_vectors(vec![vec![1.0], vec![0.0]]),
            0,
        );
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_snapshot_build() {
        let embedder = TrigramProvider::new(32);
        let snapshot = IndexSnapshot::build(corpus(&["export data"]), &embedder, 3)
            .await
            .unwrap();

        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.store().len(), 1);
        assert_eq!(snapshot.revision(), 3);
        assert_eq!(snapshot.entry(0).unwrap().question, "export data");
        assert!(snapshot.entry(1).is_none());
    }
}
