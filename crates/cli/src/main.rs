//! faqgate CLI
//!
//! Main entry point for the faqgate command-line tool.
//! Answers product questions from a curated FAQ cache, falling back to an
//! LLM and queueing what it cannot answer for admin review.

mod commands;

use clap::{Parser, Subcommand};
use commands::{AskCommand, PendingCommand, RebuildCommand, StatsCommand};
use faqgate_core::{config::AppConfig, logging, AppResult};
use std::path::PathBuf;

/// faqgate - FAQ answers with a cache, an LLM fallback and a review queue
#[derive(Parser, Debug)]
#[command(name = "faqgate")]
#[command(about = "FAQ answers with a cache, an LLM fallback and a review queue", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to workspace directory (default: current directory)
    #[arg(short, long, global = true, env = "FAQGATE_WORKSPACE")]
    workspace: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long, global = true, env = "FAQGATE_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    /// Generation provider (openrouter, ollama)
    #[arg(short, long, global = true, env = "FAQGATE_PROVIDER")]
    provider: Option<String>,

    /// Generation model identifier
    #[arg(short, long, global = true, env = "FAQGATE_MODEL")]
    model: Option<String>,

    /// Minimum similarity for a cache hit (0.0-1.0)
    #[arg(short, long, global = true, env = "FAQGATE_THRESHOLD")]
    threshold: Option<f32>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ask a question
    Ask(AskCommand),

    /// Manage questions awaiting review
    Pending(PendingCommand),

    /// Show cache and queue statistics
    Stats(StatsCommand),

    /// Rebuild the similarity index
    Rebuild(RebuildCommand),
}

#[tokio::main]
async fn main() -> AppResult<()> {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    // Load configuration from environment and config file
    let config = AppConfig::load_with(cli.workspace, cli.config)?;

    // Apply CLI overrides
    let config = config.with_overrides(
        cli.provider,
        cli.model,
        cli.threshold,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    // Initialize logging with final configuration
    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    tracing::info!("faqgate starting");
    tracing::debug!("Workspace: {:?}", config.workspace);
    tracing::debug!("Provider: {}", config.provider);
    tracing::debug!("Model: {}", config.model);
    tracing::debug!("Embedding provider: {}", config.embedding_provider);

    config.validate()?;
    config.ensure_faqgate_dir()?;

    let command_name = match &cli.command {
        Commands::Ask(_) => "ask",
        Commands::Pending(_) => "pending",
        Commands::Stats(_) => "stats",
        Commands::Rebuild(_) => "rebuild",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    // Route to command handlers
    let result = match cli.command {
        Commands::Ask(cmd) => cmd.execute(&config).await,
        Commands::Pending(cmd) => cmd.execute(&config).await,
        Commands::Stats(cmd) => cmd.execute(&config).await,
        Commands::Rebuild(cmd) => cmd.execute(&config).await,
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
