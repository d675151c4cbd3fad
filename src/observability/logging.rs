//! # Logging
//!
//! Tracing subscriber setup. Logs always go to stderr so stdout only carries
//! the result document.

use crate::config::ToolConfig;
use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is not set
#[must_use]
pub fn default_filter(config: &ToolConfig) -> String {
    format!("iam_cert={}", config.log_level.to_lowercase())
}

/// Initialize the global tracing subscriber
///
/// `RUST_LOG` takes precedence over `LOG_LEVEL`. Fails if a subscriber is
/// already installed.
pub fn init_tracing(config: &ToolConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(config)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let result = if config.json_logs() {
        builder.json().with_current_span(true).try_init()
    } else {
        builder.with_ansi(config.log_enable_color).try_init()
    };

    result.map_err(|e| anyhow!("Failed to initialize tracing subscriber: {e}"))
}
