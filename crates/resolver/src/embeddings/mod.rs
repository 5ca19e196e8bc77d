//! Embedding producers for questions.
//!
//! The engine treats embedding as an injected collaborator: anything that
//! implements [`EmbeddingProvider`] can back the vector store.

pub mod config;
pub mod provider;
pub mod providers;

pub use config::EmbeddingConfig;
pub use provider::{create_provider, EmbeddingProvider};
pub use providers::{OllamaProvider, TrigramProvider};
