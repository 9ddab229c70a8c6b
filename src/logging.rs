//! Logging setup for hosts embedding the engine.

use crate::config::GeneralConfig;
use anyhow::{anyhow, Result};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Log level implied by the general settings.
pub fn log_level(config: &GeneralConfig) -> Level {
    if config.quiet {
        Level::ERROR
    } else if config.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    }
}

/// Install a compact global subscriber. Fails if one is already set.
pub fn init_logging(config: &GeneralConfig) -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level(config))
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow!("Failed to set tracing subscriber: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level() {
        let mut config = GeneralConfig::default();
        assert_eq!(log_level(&config), Level::INFO);

        config.verbose = true;
        assert_eq!(log_level(&config), Level::DEBUG);

        config.verbose = false;
        config.quiet = true;
        assert_eq!(log_level(&config), Level::ERROR);
    }
}
