//! Ask command handler.
//!
//! Resolves one question through the cache, the generator or the pending
//! queue.

use super::print_json;
use clap::Args;
use faqgate_core::{config::AppConfig, AppError, AppResult};
use faqgate_resolver::AnswerSource;
use std::path::PathBuf;

/// Ask a question
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    pub question: Option<String>,

    /// Read the question from a file
    #[arg(short, long, conflicts_with = "question")]
    pub file: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");

        let question = self.read_question()?;
        let engine = faqgate_resolver::open_engine(config).await?;
        let resolution = engine.resolve(&question).await?;

        tracing::debug!(
            "Resolved via {} (score: {:?})",
            resolution.source,
            resolution.score
        );

        if self.json {
            print_json(&serde_json::to_value(&resolution)?)?;
        } else {
            println!("{}", resolution.answer);
            println!();
            match (resolution.source, resolution.score) {
                (AnswerSource::Cache, Some(score)) => println!("Source: cache (score {:.3})", score),
                (source, _) => println!("Source: {}", source),
            }
        }

        Ok(())
    }

    fn read_question(&self) -> AppResult<String> {
        if let Some(ref question) = self.question {
            return Ok(question.clone());
        }

        if let Some(ref path) = self.file {
            tracing::debug!("Reading question from {:?}", path);
            return Ok(std::fs::read_to_string(path)?);
        }

        Err(AppError::EmptyInput)
    }
}
