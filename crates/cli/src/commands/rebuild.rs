//! Rebuild command handler.
//!
//! Re-embeds the whole corpus, for instance after editing the base set or
//! switching embedding providers.

use super::print_json;
use clap::Args;
use faqgate_core::{config::AppConfig, AppResult};
use std::time::Instant;

/// Rebuild the similarity index from stored entries
#[derive(Args, Debug)]
pub struct RebuildCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl RebuildCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing rebuild command");
        let start = Instant::now();

        // Opening the engine embeds the stored corpus
        let engine = faqgate_resolver::open_engine(config).await?;
        let snapshot = engine.snapshot();
        let duration_secs = start.elapsed().as_secs_f64();

        if self.json {
            print_json(&serde_json::json!({
                "entries": snapshot.len(),
                "vectors": snapshot.store().len(),
                "durationSecs": duration_secs,
            }))?;
        } else {
            println!(
                "Indexed {} entries in {:.2}s",
                snapshot.len(),
                duration_secs
            );
        }

        Ok(())
    }
}
