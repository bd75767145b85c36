//! Logging init: every diagnostic line goes to stderr, stdout stays clean.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global stderr subscriber. `RUST_LOG` overrides the default `info` filter.
/// Returns Err if a subscriber is already installed so the caller can carry on without one.
pub fn init_logging() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {}", e))?;
    Ok(())
}
