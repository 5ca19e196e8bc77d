//! Embedding configuration.

use faqgate_core::config::{AppConfig, ProviderConfig};
use serde::{Deserialize, Serialize};

/// Dimensions of the offline trigram embedder unless configured otherwise.
pub const DEFAULT_TRIGRAM_DIMENSIONS: usize = 384;

/// Dimensions produced by `nomic-embed-text`.
pub const DEFAULT_OLLAMA_DIMENSIONS: usize = 768;

/// Embedding configuration resolved from the application config.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbeddingConfig {
    /// Provider name: "trigram", "ollama"
    pub provider: String,

    /// Model identifier (provider-specific)
    pub model: String,

    /// Embedding vector dimensions
    pub dimensions: usize,

    /// Provider endpoint, for providers that call out
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Per-request transport timeout, for providers that call out
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: "trigram".to_string(),
            model: "trigram-v1".to_string(),
            dimensions: DEFAULT_TRIGRAM_DIMENSIONS,
            endpoint: None,
            timeout_secs: None,
        }
    }
}

impl EmbeddingConfig {
    /// Build the embedding config for the active embedding provider.
    pub fn from_app_config(config: &AppConfig) -> Self {
        let provider = config.embedding_provider.as_str();

        match (provider, config.get_provider_config(provider)) {
            ("trigram", Some(ProviderConfig::Trigram { dimensions })) => Self {
                dimensions,
                ..Self::default()
            },
            ("ollama", Some(ProviderConfig::Ollama {
                endpoint,
                embedding_model,
                embedding_dimensions,
                timeout,
                ..
            })) => Self {
                provider: "ollama".to_string(),
                model: embedding_model.unwrap_or_else(|| "nomic-embed-text".to_string()),
                dimensions: embedding_dimensions.unwrap_or(DEFAULT_OLLAMA_DIMENSIONS),
                endpoint: Some(endpoint),
                timeout_secs: timeout,
            },
            ("ollama", _) => Self {
                provider: "ollama".to_string(),
                model: "nomic-embed-text".to_string(),
                dimensions: DEFAULT_OLLAMA_DIMENSIONS,
                endpoint: None,
                timeout_secs: None,
            },
            (other, _) => Self {
                provider: other.to_string(),
                ..Self::default()
            },
        }
    }
}
