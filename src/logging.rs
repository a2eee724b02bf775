//! Logging setup for the CLI.
//!
//! Events go to stderr so normal output (dry-run listings, sync summaries)
//! stays clean on stdout. The level is runtime-configurable via `RUST_LOG`.

use tracing::Level;
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
};

/// Configuration for the logging system.
pub struct LogConfig {
    /// Default log level when `RUST_LOG` is not set.
    pub log_level: Level,
    /// Whether to use JSON format for logs.
    pub json_format: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_level: Level::INFO,
            json_format: false,
        }
    }
}

/// Initialize the logging system with the given configuration.
///
/// Must be called once, before any work producing events.
pub fn init_logging(config: &LogConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("todosync={}", config.log_level)));

    if config.json_format {
        // JSON format for log aggregation
        let json_layer = fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_filter(env_filter);

        tracing_subscriber::registry()
            .with(json_layer)
            .with(ErrorLayer::default())
            .init();
    } else {
        // Human-readable format for interactive use
        let fmt_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_filter(env_filter);

        tracing_subscriber::registry()
            .with(fmt_layer)
            .with(ErrorLayer::default())
            .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_config_default() {
        let config = LogConfig::default();
        assert_eq!(config.log_level, Level::INFO);
        assert!(!config.json_format);
    }
}
