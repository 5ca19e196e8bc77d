//! Logging infrastructure for faqgate.
//!
//! Initializes the tracing subscriber for structured logging. All logs go to
//! stderr so stdout stays clean for answers and JSON output.

use std::io::IsTerminal;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::{AppError, AppResult};

/// Initialize the tracing subscriber with stderr output.
///
/// # Arguments
/// * `log_level` - Optional filter override (e.g., "debug", "faqgate_resolver=trace")
/// * `no_color` - Disable colored output
///
/// # Example
/// ```no_run
/// use faqgate_core::logging::init_logging;
///
/// init_logging(None, false).expect("Failed to initialize logging");
/// ```
pub fn init_logging(log_level: Option<&str>, no_color: bool) -> AppResult<()> {
    let env_filter = build_filter(log_level)?;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_ansi(!no_color && supports_color());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| AppError::Config(format!("Failed to init logging: {}", e)))?;

    Ok(())
}

/// Resolve the filter from the explicit level, then `RUST_LOG`, then "info".
fn build_filter(log_level: Option<&str>) -> AppResult<EnvFilter> {
    let default_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let filter_str = log_level.unwrap_or(&default_level);

    EnvFilter::try_new(filter_str)
        .map_err(|e| AppError::Config(format!("Invalid log filter: {}", e)))
}

fn supports_color() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    std::io::stderr().is_terminal()
}
