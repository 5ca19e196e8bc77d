//! Command handlers for the faqgate CLI.
//!
//! Each command opens the resolution engine over the configured data
//! directory and prints a human-readable or JSON result.

pub mod ask;
pub mod pending;
pub mod rebuild;
pub mod stats;

pub use ask::AskCommand;
pub use pending::PendingCommand;
pub use rebuild::RebuildCommand;
pub use stats::StatsCommand;

use faqgate_core::AppResult;
use serde_json::Value;

/// Print a JSON document to stdout.
pub(crate) fn print_json(value: &Value) -> AppResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
