//! Structured logging built on the tracing ecosystem.
//!
//! `RUST_LOG` always wins when set; otherwise the configured level is
//! applied to the wd-* crates only, so dependency noise stays out of the
//! logs.

use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Crates covered by the default filter directives.
const CRATES: &[&str] = &["wd_core", "wd_notify", "wd_api", "wd_cli"];

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Level applied to the wd-* crates when `RUST_LOG` is unset.
    pub level: Level,
    /// Render records as JSON instead of human-readable text.
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// Verbose text output for local development.
    pub fn development() -> Self {
        Self {
            level: Level::DEBUG,
            json_format: false,
        }
    }

    /// JSON output for log shippers.
    pub fn production() -> Self {
        Self {
            level: Level::INFO,
            json_format: true,
        }
    }

    fn directives(&self) -> String {
        CRATES
            .iter()
            .map(|krate| format!("{}={}", krate, self.level))
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Initializes logging with the default configuration.
pub fn init_logging() {
    init_logging_with_config(LoggingConfig::default());
}

/// Initializes logging with the given configuration.
pub fn init_logging_with_config(config: LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.directives()));

    let registry = tracing_subscriber::registry().with(filter);

    if config.json_format {
        registry.with(fmt::layer().json().with_target(true)).init();
    } else {
        registry
            .with(fmt::layer().compact().with_target(true))
            .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directives_cover_all_crates() {
        let directives = LoggingConfig::default().directives();
        assert!(directives.contains("wd_core=INFO"));
        assert!(directives.contains("wd_api=INFO"));
        assert_eq!(directives.matches('=').count(), 4);
    }

    #[test]
    fn test_presets() {
        assert_eq!(LoggingConfig::development().level, Level::DEBUG);
        assert!(LoggingConfig::production().json_format);
        assert!(!LoggingConfig::default().json_format);
    }
}
