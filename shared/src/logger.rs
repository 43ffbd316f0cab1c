//! Logging utilities

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

use crate::config::LoggingSettings;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level when set. Fails instead of
/// panicking if a subscriber is already installed.
pub fn init_logger(settings: &LoggingSettings) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&settings.level)
            .map_err(|e| anyhow!("invalid log level {:?}: {}", settings.level, e))?,
    };

    let installed = if settings.json {
        tracing_subscriber::fmt().with_env_filter(filter).json().try_init()
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).try_init()
    };

    installed.map_err(|e| anyhow!("failed to install tracing subscriber: {}", e))
}
