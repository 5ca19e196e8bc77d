//! Resolver type definitions.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A cached question/answer pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub question: String,
    pub answer: String,
}

impl Entry {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// A question that neither the cache nor the generator could answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingQuestion {
    pub question: String,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
}

/// Accept RFC 3339 timestamps as well as offset-less ISO 8601 ones, which
/// are taken to be UTC.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;

    if let Ok(parsed) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(parsed.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(serde::de::Error::custom)
}

impl PendingQuestion {
    /// Stamp a question with the current time.
    pub fn now(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            created_at: Utc::now(),
        }
    }
}

/// Where a resolved answer came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerSource {
    /// Reused from the cached corpus
    Cache,
    /// Produced by the generation service and now cached
    Generator,
    /// Saved for admin review
    Deferred,
}

impl AnswerSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cache => "cache",
            Self::Generator => "generator",
            Self::Deferred => "deferred",
        }
    }
}

impl std::fmt::Display for AnswerSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of resolving one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub answer: String,
    pub source: AnswerSource,
    /// Similarity of the matched entry; only present for cache hits
    pub score: Option<f32>,
}

impl Resolution {
    pub fn cached(answer: impl Into<String>, score: f32) -> Self {
        Self {
            answer: answer.into(),
            source: AnswerSource::Cache,
            score: Some(score),
        }
    }

    pub fn generated(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            source: AnswerSource::Generator,
            score: None,
        }
    }

    pub fn deferred(message: impl Into<String>) -> Self {
        Self {
            answer: message.into(),
            source: AnswerSource::Deferred,
            score: None,
        }
    }
}

/// Snapshot counters for the cache and pending queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheStats {
    pub base_entries: usize,
    pub curated_entries: usize,
    pub indexed_vectors: usize,
    pub pending_questions: usize,
    pub similarity_threshold: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_serializes_source_lowercase() {
        let json = serde_json::to_value(Resolution::cached("Click 'forgot password'.", 0.91))
            .unwrap();
        assert_eq!(json["source"], "cache");
        assert!((json["score"].as_f64().unwrap() - 0.91).abs() < 1e-6);

        let json = serde_json::to_value(Resolution::deferred("saved")).unwrap();
        assert_eq!(json["source"], "deferred");
        assert!(json["score"].is_null());
    }

    #[test]
    fn test_pending_question_roundtrips_timestamp() {
        let raw = r#"{"question":"How do I export data?","created_at":"2024-05-01T12:30:00Z"}"#;
        let pending: PendingQuestion = serde_json::from_str(raw).unwrap();

        assert_eq!(pending.question, "How do I export data?");
        assert_eq!(pending.created_at.to_rfc3339(), "2024-05-01T12:30:00+00:00");
    }

    #[test]
    fn test_pending_question_accepts_naive_timestamp() {
        let raw = r#"{"question":"q","created_at":"2024-05-01T12:30:00.250000"}"#;
        let pending: PendingQuestion = serde_json::from_str(raw).unwrap();

        assert_eq!(pending.created_at.timestamp_millis() % 1000, 250);
    }

    #[test]
    fn test_answer_source_display() {
        assert_eq!(AnswerSource::Generator.to_string(), "generator");
    }
}
