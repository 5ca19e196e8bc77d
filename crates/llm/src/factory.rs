//! LLM provider factory.
//!
//! Creates completion clients from a provider name, endpoint and API key.

use crate::client::LlmClient;
use crate::providers::{OllamaClient, OpenRouterClient};
use crate::types::ProviderType;
use std::sync::Arc;
use std::time::Duration;

/// Create an LLM client based on the provider name.
///
/// # Arguments
/// * `provider` - Provider identifier ("openrouter", "ollama")
/// * `endpoint` - Optional custom endpoint URL
/// * `api_key` - Optional API key; OpenRouter without one still builds a
///   client whose calls fail, so questions degrade to deferral
/// * `timeout` - Transport-level timeout for each request
///
/// # Errors
/// Returns an error message if the provider is unknown.
pub fn create_client(
    provider: &str,
    endpoint: Option<&str>,
    api_key: Option<&str>,
    timeout: Duration,
) -> Result<Arc<dyn LlmClient>, String> {
    match ProviderType::parse(provider) {
        Some(ProviderType::Ollama) => {
            let base_url = endpoint.unwrap_or(crate::providers::ollama::DEFAULT_OLLAMA_URL);
            Ok(Arc::new(OllamaClient::with_base_url(base_url, timeout)))
        }
        Some(ProviderType::OpenRouter) => {
            if api_key.is_none() {
                tracing::warn!("OpenRouter client created without an API key");
            }
            let base_url =
                endpoint.unwrap_or(crate::providers::openrouter::DEFAULT_OPENROUTER_URL);
            Ok(Arc::new(OpenRouterClient::with_base_url(
                base_url,
                api_key.map(str::to_string),
                timeout,
            )))
        }
        None => Err(format!("Unknown provider: {}", provider)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMEOUT: Duration = Duration::from_secs(5);

    #[test]
    fn test_create_ollama_client() {
        let client = create_client("ollama", None, None, TIMEOUT).unwrap();
        assert_eq!(client.provider_name(), "ollama");
    }

    #[test]
    fn test_create_ollama_with_custom_endpoint() {
        let client = create_client("ollama", Some("http://localhost:8080"), None, TIMEOUT);
        assert!(client.is_ok());
    }

    #[test]
    fn test_create_openrouter_without_key() {
        let client = create_client("openrouter", None, None, TIMEOUT).unwrap();
        assert_eq!(client.provider_name(), "openrouter");
    }

    #[test]
    fn test_unknown_provider() {
        match create_client("unknown", None, None, TIMEOUT) {
            Err(err) => assert!(err.contains("Unknown provider")),
            Ok(_) => panic!("Expected error for unknown provider"),
        }
    }
}
