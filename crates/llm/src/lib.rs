//! LLM integration crate for faqgate.
//!
//! Provides a provider-agnostic abstraction over text-completion services.
//! The resolution engine uses it to generate answers for questions the
//! cache cannot serve.
//!
//! # Providers
//! - **OpenRouter**: hosted OpenAI-compatible chat completions (default)
//! - **Ollama**: local LLM runtime
//!
//! # Example
//! ```no_run
//! use faqgate_llm::{LlmClient, LlmRequest, OllamaClient};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OllamaClient::with_base_url("http://localhost:11434", Duration::from_secs(60));
//! let request = LlmRequest::new("How do I export data?", "llama3.2");
//! let response = client.complete(&request).await?;
//! println!("{}", response.content);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod providers;
pub mod types;

// Re-export main types
pub use client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
pub use factory::create_client;
pub use providers::{OllamaClient, OpenRouterClient};
pub use types::ProviderType;
