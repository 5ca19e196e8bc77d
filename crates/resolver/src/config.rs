//! Resolution policy settings.

use crate::prompt::DEFAULT_PROMPT_TEMPLATE;
use faqgate_core::config::{
    AppConfig, DEFAULT_GENERATION_TIMEOUT_SECS, DEFAULT_SIMILARITY_THRESHOLD,
};
use std::time::Duration;

/// Reply given when a question is queued for review.
pub const DEFERRED_MESSAGE: &str =
    "I don't know the exact answer yet. I've saved your question for admin review.";

/// Tunables of the resolution engine.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolverConfig {
    /// Minimum cosine similarity for a cache hit; equality counts as a hit
    pub similarity_threshold: f32,

    /// Bound on each generation call; expiry counts as a failed generation
    pub generation_timeout: Duration,

    /// Handlebars template with a `{{question}}` placeholder
    pub prompt_template: String,

    /// Answer returned on deferral
    pub deferred_message: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            generation_timeout: Duration::from_secs(DEFAULT_GENERATION_TIMEOUT_SECS),
            prompt_template: DEFAULT_PROMPT_TEMPLATE.to_string(),
            deferred_message: DEFERRED_MESSAGE.to_string(),
        }
    }
}

impl ResolverConfig {
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            similarity_threshold: config.effective_threshold(),
            generation_timeout: Duration::from_secs(config.generation_timeout_secs),
            prompt_template: config
                .prompt_template
                .clone()
                .unwrap_or_else(|| DEFAULT_PROMPT_TEMPLATE.to_string()),
            ..Self::default()
        }
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.similarity_threshold = threshold;
        self
    }

    pub fn with_generation_timeout(mut self, timeout: Duration) -> Self {
        self.generation_timeout = timeout;
        self
    }
}
