//! Error types for faqgate.
//!
//! This module defines a unified error enum covering configuration, I/O,
//! provider, storage and resolution errors.

use thiserror::Error;

/// Unified error type for faqgate.
///
/// All fallible functions return `Result<T, AppError>`.
/// We never panic; errors must be represented and propagated.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// LLM provider errors
    #[error("LLM error: {0}")]
    Llm(String),

    /// Embedding provider errors
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Persistence errors other than raw I/O
    #[error("Storage error: {0}")]
    Storage(String),

    /// Prompt template errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The question was empty after trimming whitespace
    #[error("Question is empty")]
    EmptyInput,

    /// A required field of an admin request was empty or missing
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// The query could not be embedded; fatal to the request
    #[error("Embedding unavailable: {0}")]
    EmbeddingUnavailable(String),

    /// Answer generation produced no usable content
    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_message() {
        let err = AppError::MissingField("answer");
        assert_eq!(err.to_string(), "Missing required field: answer");
    }

    #[test]
    fn test_from_serde_json() {
        let parse_err = serde_json::from_str::<Vec<u32>>("not json").unwrap_err();
        let err: AppError = parse_err.into();
        assert!(matches!(err, AppError::Serialization(_)));
    }
}
