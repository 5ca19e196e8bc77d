//! Configuration management for faqgate.
//!
//! Configuration is merged from several sources, later ones winning:
//! - Built-in defaults
//! - Config file (`.faqgate/config.yaml` in the workspace, or `FAQGATE_CONFIG`)
//! - Environment variables
//! - Command-line flags
//!
//! All state lives under the workspace's `.faqgate/` directory.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Cosine similarity at or above which a cached answer is reused, for
/// model-backed embedders.
pub const DEFAULT_SIMILARITY_THRESHOLD: f32 = 0.72;

/// Hit threshold for the lexical trigram embedder. Trigram vectors score
/// paraphrases lower than a language model does ("How do I reset my
/// password?" against "I forgot my password" scores about 0.61).
pub const TRIGRAM_SIMILARITY_THRESHOLD: f32 = 0.6;

/// Upper bound on a single generation call, in seconds.
pub const DEFAULT_GENERATION_TIMEOUT_SECS: u64 = 60;

/// Environment variable holding the OpenRouter API key when no config names one.
pub const DEFAULT_OPENROUTER_KEY_ENV: &str = "OPENROUTER_KEY";

const KNOWN_PROVIDERS: [&str; 2] = ["openrouter", "ollama"];
const KNOWN_EMBEDDING_PROVIDERS: [&str; 2] = ["trigram", "ollama"];

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the workspace root (contains .faqgate/)
    pub workspace: PathBuf,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Answer generation provider ("openrouter", "ollama")
    pub provider: String,

    /// Generation model identifier
    pub model: String,

    /// Embedding provider ("trigram", "ollama")
    pub embedding_provider: String,

    /// API key for the generation provider
    pub api_key: Option<String>,

    /// Explicit minimum cosine similarity for a cache hit (inclusive);
    /// `None` uses the embedding provider's default
    pub similarity_threshold: Option<f32>,

    /// Timeout applied to every generation call
    pub generation_timeout_secs: u64,

    /// Handlebars template wrapping the question; `{{question}}` is substituted
    pub prompt_template: Option<String>,

    /// Override for the directory holding the JSON sets
    pub data_dir: Option<PathBuf>,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,

    /// Provider configurations from config.yaml
    pub llm: Option<LlmConfig>,
}

/// LLM configuration from config.yaml.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(rename = "activeProvider")]
    pub active_provider: String,

    #[serde(rename = "activeEmbeddingProvider")]
    pub active_embedding_provider: String,

    pub providers: HashMap<String, ProviderConfig>,
}

/// Provider-specific configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProviderConfig {
    OpenRouter {
        #[serde(rename = "apiKeyEnv")]
        api_key_env: String,
        model: String,
        endpoint: Option<String>,
    },
    Ollama {
        endpoint: String,
        model: String,
        #[serde(rename = "embeddingModel")]
        embedding_model: Option<String>,
        #[serde(rename = "embeddingDimensions")]
        embedding_dimensions: Option<usize>,
        timeout: Option<u64>,
    },
    Trigram {
        dimensions: usize,
    },
}

/// Full configuration file structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ConfigFile {
    llm: Option<LlmConfig>,
    cache: Option<CacheConfig>,
    workspace: Option<WorkspaceConfig>,
    logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheConfig {
    #[serde(rename = "similarityThreshold")]
    similarity_threshold: Option<f32>,
    #[serde(rename = "generationTimeoutSecs")]
    generation_timeout_secs: Option<u64>,
    #[serde(rename = "promptTemplate")]
    prompt_template: Option<String>,
    #[serde(rename = "dataDir")]
    data_dir: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WorkspaceConfig {
    path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingConfig {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workspace: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config_file: None,
            provider: "openrouter".to_string(),
            model: "mistralai/mistral-7b-instruct:free".to_string(),
            embedding_provider: "trigram".to_string(),
            api_key: None,
            similarity_threshold: None,
            generation_timeout_secs: DEFAULT_GENERATION_TIMEOUT_SECS,
            prompt_template: None,
            data_dir: None,
            log_level: None,
            verbose: false,
            no_color: false,
            llm: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables and defaults.
    ///
    /// Environment variables:
    /// - `FAQGATE_WORKSPACE`: Override workspace path
    /// - `FAQGATE_CONFIG`: Path to config file
    /// - `FAQGATE_PROVIDER`: Generation provider
    /// - `FAQGATE_MODEL`: Model identifier
    /// - `FAQGATE_API_KEY`: API key
    /// - `FAQGATE_THRESHOLD`: Similarity threshold
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    ///
    /// # Example
    /// ```no_run
    /// use faqgate_core::config::AppConfig;
    ///
    /// let config = AppConfig::load().expect("Failed to load config");
    /// println!("Threshold: {}", config.effective_threshold());
    /// ```
    pub fn load() -> AppResult<Self> {
        Self::load_with(None, None)
    }

    /// Load configuration, with explicit workspace and config file paths
    /// taking precedence over their environment variables.
    pub fn load_with(workspace: Option<PathBuf>, config_file: Option<PathBuf>) -> AppResult<Self> {
        let mut config = Self::default();

        if let Some(workspace) = workspace.or_else(|| env_path("FAQGATE_WORKSPACE")) {
            config.workspace = workspace;
        }

        config.config_file = config_file.or_else(|| env_path("FAQGATE_CONFIG"));

        if !config.workspace.exists() {
            return Err(AppError::Config(format!(
                "Workspace directory does not exist: {:?}",
                config.workspace
            )));
        }

        let config_path = match config.config_file {
            Some(ref cf) => cf.clone(),
            None => config.faqgate_dir().join("config.yaml"),
        };

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        }

        // Environment variables override YAML config
        if let Ok(provider) = std::env::var("FAQGATE_PROVIDER") {
            config.provider = provider;
        }

        if let Ok(model) = std::env::var("FAQGATE_MODEL") {
            config.model = model;
        }

        if let Ok(threshold) = std::env::var("FAQGATE_THRESHOLD") {
            let threshold = threshold.trim().parse().map_err(|_| {
                AppError::Config(format!("FAQGATE_THRESHOLD is not a number: {}", threshold))
            })?;
            config.similarity_threshold = Some(threshold);
        }

        config.api_key = std::env::var("FAQGATE_API_KEY").ok();
        if let Ok(level) = std::env::var("RUST_LOG") {
            config.log_level = Some(level);
        }

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge a YAML configuration file into this config.
    fn merge_yaml(&self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        self.merge_yaml_str(&contents)
            .map_err(|e| AppError::Config(format!("Failed to parse config file {:?}: {}", path, e)))
    }

    fn merge_yaml_str(&self, contents: &str) -> AppResult<Self> {
        let config_file: ConfigFile = serde_yaml::from_str(contents)?;

        let mut result = self.clone();

        if let Some(path) = config_file.workspace.and_then(|ws| ws.path) {
            result.workspace = PathBuf::from(path);
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        if let Some(cache) = config_file.cache {
            if cache.similarity_threshold.is_some() {
                result.similarity_threshold = cache.similarity_threshold;
            }
            if let Some(timeout) = cache.generation_timeout_secs {
                result.generation_timeout_secs = timeout;
            }
            if cache.prompt_template.is_some() {
                result.prompt_template = cache.prompt_template;
            }
            if let Some(dir) = cache.data_dir {
                result.data_dir = Some(PathBuf::from(dir));
            }
        }

        if let Some(llm) = config_file.llm {
            result.provider = llm.active_provider.clone();
            result.embedding_provider = llm.active_embedding_provider.clone();

            if let Some(provider_config) = llm.providers.get(&llm.active_provider) {
                match provider_config {
                    ProviderConfig::OpenRouter { model, .. }
                    | ProviderConfig::Ollama { model, .. } => result.model = model.clone(),
                    ProviderConfig::Trigram { .. } => {}
                }
            }

            result.llm = Some(llm);
        }

        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// Command-line flags take precedence over environment variables and
    /// the config file.
    pub fn with_overrides(
        mut self,
        provider: Option<String>,
        model: Option<String>,
        threshold: Option<f32>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(provider) = provider {
            self.provider = provider;
        }

        if let Some(model) = model {
            self.model = model;
        }

        if threshold.is_some() {
            self.similarity_threshold = threshold;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Get the path to the .faqgate directory.
    pub fn faqgate_dir(&self) -> PathBuf {
        self.workspace.join(".faqgate")
    }

    /// Ensure the .faqgate directory exists.
    pub fn ensure_faqgate_dir(&self) -> AppResult<()> {
        let dir = self.faqgate_dir();
        if !dir.exists() {
            std::fs::create_dir_all(&dir).map_err(|e| {
                AppError::Config(format!("Failed to create .faqgate directory: {}", e))
            })?;
        }
        Ok(())
    }

    /// Directory holding the base, curated and pending sets.
    ///
    /// A relative `dataDir` from the config file is resolved against the workspace.
    pub fn data_dir(&self) -> PathBuf {
        match self.data_dir {
            Some(ref dir) if dir.is_absolute() => dir.clone(),
            Some(ref dir) => self.workspace.join(dir),
            None => self.faqgate_dir().join("data"),
        }
    }

    /// Hit threshold in effect: the explicit setting, else the default for
    /// the active embedding provider.
    pub fn effective_threshold(&self) -> f32 {
        self.similarity_threshold
            .unwrap_or_else(|| default_threshold_for(&self.embedding_provider))
    }

    /// Transport timeout for a generation provider's HTTP client.
    ///
    /// An Ollama entry's `timeout` wins; otherwise the generation timeout.
    pub fn request_timeout_secs(&self, provider: &str) -> u64 {
        match self.get_provider_config(provider) {
            Some(ProviderConfig::Ollama {
                timeout: Some(secs),
                ..
            }) if secs > 0 => secs,
            _ => self.generation_timeout_secs,
        }
    }

    /// Get a provider's configuration by name.
    pub fn get_provider_config(&self, provider: &str) -> Option<ProviderConfig> {
        self.llm
            .as_ref()
            .and_then(|llm| llm.providers.get(provider).cloned())
    }

    /// Endpoint configured for a provider, if any.
    pub fn endpoint_for(&self, provider: &str) -> Option<String> {
        match self.get_provider_config(provider)? {
            ProviderConfig::OpenRouter { endpoint, .. } => endpoint,
            ProviderConfig::Ollama { endpoint, .. } => Some(endpoint),
            ProviderConfig::Trigram { .. } => None,
        }
    }

    /// Resolve the API key for a provider.
    ///
    /// `FAQGATE_API_KEY` wins; otherwise the provider's `apiKeyEnv` is read,
    /// falling back to `OPENROUTER_KEY` for OpenRouter without a config entry.
    pub fn resolve_api_key(&self, provider: &str) -> Option<String> {
        if let Some(ref key) = self.api_key {
            return Some(key.clone());
        }

        let env_var = match self.get_provider_config(provider) {
            Some(ProviderConfig::OpenRouter { api_key_env, .. }) => Some(api_key_env),
            Some(_) => None,
            None if provider == "openrouter" => Some(DEFAULT_OPENROUTER_KEY_ENV.to_string()),
            None => None,
        }?;

        std::env::var(&env_var)
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
    }

    /// Validate configuration.
    pub fn validate(&self) -> AppResult<()> {
        if !KNOWN_PROVIDERS.contains(&self.provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown provider: {}. Supported: {}",
                self.provider,
                KNOWN_PROVIDERS.join(", ")
            )));
        }

        if !KNOWN_EMBEDDING_PROVIDERS.contains(&self.embedding_provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown embedding provider: {}. Supported: {}",
                self.embedding_provider,
                KNOWN_EMBEDDING_PROVIDERS.join(", ")
            )));
        }

        let threshold = self.effective_threshold();
        if !(-1.0..=1.0).contains(&threshold) {
            return Err(AppError::Config(format!(
                "Similarity threshold must be within [-1, 1], got {}",
                threshold
            )));
        }

        if self.generation_timeout_secs == 0 {
            return Err(AppError::Config(
                "Generation timeout must be at least one second".to_string(),
            ));
        }

        // A missing key only disables generation; questions still get deferred.
        if self.provider == "openrouter" && self.resolve_api_key(&self.provider).is_none() {
            tracing::warn!("No OpenRouter API key configured; unanswered questions will be deferred");
        }

        Ok(())
    }
}

/// Default hit threshold for an embedding provider.
pub fn default_threshold_for(embedding_provider: &str) -> f32 {
    match embedding_provider {
        "trigram" => TRIGRAM_SIMILARITY_THRESHOLD,
        _ => DEFAULT_SIMILARITY_THRESHOLD,
    }
}

fn env_path(name: &str) -> Option<PathBuf> {
    std::env::var(name).ok().map(PathBuf::from)
}
