//! Trigram embedding provider for local, offline operation.

use crate::embeddings::provider::EmbeddingProvider;
use faqgate_core::AppResult;
use std::collections::BTreeMap;
use unicode_segmentation::UnicodeSegmentation;

const STOP_WORDS: &[&str] = &[
    "the", "is", "at", "which", "on", "a", "an", "as", "are", "was", "were", "for", "to", "of",
    "in", "and", "or", "but", "with", "by", "from", "this", "that", "be", "have", "has", "had",
    "it", "its", "their", "they", "them", "can", "you", "your", "how", "what", "does", "did",
];

/// Trigram-based embedding provider.
///
/// Hashes character trigrams and whole words of each non-stop word into a
/// fixed number of buckets, then normalizes to a unit vector. Not semantic
/// in the neural sense, but deterministic, content-dependent and free of
/// any network dependency. Text without usable words embeds to the zero
/// vector.
#[derive(Debug)]
pub struct TrigramProvider {
    dimensions: usize,
}

impl TrigramProvider {
    /// Create a new trigram provider with specified dimensions.
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
        }
    }

    /// Lowercased words, punctuation stripped, stop words and short words removed.
    ///
    /// A `BTreeMap` keeps accumulation order stable so equal inputs give
    /// bit-identical vectors.
    fn word_frequencies(text: &str) -> BTreeMap<String, u32> {
        let lower = text.to_lowercase();
        let mut freq = BTreeMap::new();

        for word in lower.unicode_words() {
            if word.chars().count() <= 2 || STOP_WORDS.contains(&word) {
                continue;
            }
            *freq.entry(word.to_string()).or_insert(0) += 1;
        }

        freq
    }

    fn bucket(&self, bytes: &[u8], multiplier: u64) -> usize {
        let hash = bytes
            .iter()
            .fold(0u64, |acc, &b| acc.wrapping_mul(multiplier).wrapping_add(b as u64));
        (hash % self.dimensions as u64) as usize
    }

    fn generate_trigram_embedding(&self, text: &str) -> Vec<f32> {
        let mut embedding = vec![0.0f32; self.dimensions];

        for (word, freq) in Self::word_frequencies(text) {
            let chars: Vec<char> = word.chars().collect();
            for window in chars.windows(3) {
                let trigram: String = window.iter().collect();
                let dim_idx = self.bucket(trigram.as_bytes(), 37);
                embedding[dim_idx] += (freq as f32).sqrt();
            }

            let base_dim = self.bucket(word.as_bytes(), 31);
            embedding[base_dim] += freq as f32;
        }

        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut embedding {
                *v /= norm;
            }
        }

        embedding
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for TrigramProvider {
    fn provider_name(&self) -> &str {
        "trigram"
    }

    fn model_name(&self) -> &str {
        "trigram-v1"
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        Ok(texts
            .iter()
            .map(|text| self.generate_trigram_embedding(text))
            .collect())
    }
}
