//! Stats command handler.

use super::print_json;
use clap::Args;
use faqgate_core::{config::AppConfig, AppResult};

/// Show cache and queue statistics
#[derive(Args, Debug)]
pub struct StatsCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl StatsCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing stats command");

        // Counts come from storage alone; no provider is contacted
        let repository = faqgate_resolver::open_repository(config)?;
        let stats = repository.stats(config.effective_threshold());

        if self.json {
            print_json(&serde_json::json!({
                "baseEntries": stats.base_entries,
                "curatedEntries": stats.curated_entries,
                "indexableEntries": stats.indexed_vectors,
                "pendingQuestions": stats.pending_questions,
                "similarityThreshold": stats.similarity_threshold,
                "dataDir": config.data_dir(),
            }))?;
        } else {
            println!("Data directory:    {}", config.data_dir().display());
            println!("Base entries:      {}", stats.base_entries);
            println!("Curated entries:   {}", stats.curated_entries);
            println!("Indexable entries: {}", stats.indexed_vectors);
            println!("Pending questions: {}", stats.pending_questions);
            println!("Threshold:         {:.2}", stats.similarity_threshold);
        }

        Ok(())
    }
}
