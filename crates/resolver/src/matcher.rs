//! Linear-scan cosine similarity matching.

use crate::index::VectorStore;

/// Best candidate found for a query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Match {
    /// Position in the corpus
    pub index: usize,
    /// Cosine similarity, in [-1, 1]
    pub score: f32,
}

/// Cosine similarity between two vectors.
///
/// Mismatched lengths, empty vectors and zero vectors score 0.0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

/// Score `query` against every stored vector and return the maximum.
///
/// Ties keep the lowest index. An empty store returns `None` without
/// touching the query.
pub fn best_match(query: &[f32], store: &VectorStore) -> Option<Match> {
    if store.is_empty() {
        return None;
    }

    let mut best: Option<Match> = None;
    for (index, vector) in store.vectors().iter().enumerate() {
        let score = cosine_similarity(query, vector);
        match best {
            Some(current) if score <= current.score => {}
            _ => best = Some(Match { index, score }),
        }
    }

    best
}
