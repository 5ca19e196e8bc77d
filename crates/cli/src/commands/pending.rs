//! Pending queue command handlers.
//!
//! Lists deferred questions and resolves them by admin answer or by
//! another generation attempt. Only `generate` needs the providers.

use super::print_json;
use clap::{Args, Subcommand};
use faqgate_core::{config::AppConfig, AppResult};

/// Manage questions awaiting review
#[derive(Args, Debug)]
pub struct PendingCommand {
    #[command(subcommand)]
    pub action: PendingAction,
}

#[derive(Subcommand, Debug)]
pub enum PendingAction {
    /// List pending questions
    List(PendingListCommand),
    /// Answer a pending question
    Answer(PendingAnswerCommand),
    /// Retry generation for a pending question
    Generate(PendingGenerateCommand),
}

impl PendingCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        match &self.action {
            PendingAction::List(cmd) => cmd.execute(config).await,
            PendingAction::Answer(cmd) => cmd.execute(config).await,
            PendingAction::Generate(cmd) => cmd.execute(config).await,
        }
    }
}

/// List pending questions
#[derive(Args, Debug)]
pub struct PendingListCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl PendingListCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing pending list command");

        let repository = faqgate_resolver::open_repository(config)?;
        let pending = repository.load_pending();

        if self.json {
            print_json(&serde_json::to_value(&pending)?)?;
        } else if pending.is_empty() {
            println!("No pending questions");
        } else {
            for item in &pending {
                println!(
                    "[{}] {}",
                    item.created_at.format("%Y-%m-%d %H:%M:%S"),
                    item.question
                );
            }
        }

        Ok(())
    }
}

/// Store an admin answer for a pending question
#[derive(Args, Debug)]
pub struct PendingAnswerCommand {
    /// The pending question, as listed
    #[arg(short, long)]
    pub question: String,

    /// The answer to cache
    #[arg(short, long)]
    pub answer: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl PendingAnswerCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing pending answer command");

        // The next process to open an engine indexes the new entry
        let repository = faqgate_resolver::open_repository(config)?;
        let removed = repository.record_answer(&self.question, &self.answer)?;
        tracing::info!(removed, "Pending question answered by admin");

        if self.json {
            print_json(&serde_json::json!({ "status": "saved" }))?;
        } else {
            println!("Answer saved");
        }

        Ok(())
    }
}

/// Generate an answer for a pending question
#[derive(Args, Debug)]
pub struct PendingGenerateCommand {
    /// The pending question, as listed
    #[arg(short, long)]
    pub question: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl PendingGenerateCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing pending generate command");

        let engine = faqgate_resolver::open_engine(config).await?;
        let answer = engine.generate_for_pending(&self.question).await?;

        if self.json {
            print_json(&serde_json::json!({ "answer": answer }))?;
        } else {
            println!("{}", answer);
        }

        Ok(())
    }
}
