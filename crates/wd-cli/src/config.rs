//! Configuration loading for the Watchdesk server.
//!
//! Configuration comes from an optional YAML file with environment-variable
//! overrides on top. The Slack webhook URL is the one setting with no
//! default: startup fails fast when it is absent.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Database settings.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Slack webhook settings.
    #[serde(default)]
    pub slack: SlackSettings,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl AppConfig {
    /// Loads configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Applies environment-variable overrides.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("DATABASE_URL") {
            self.database.url = url;
        }
        if let Ok(url) = std::env::var("SLACK_WEBHOOK_URL") {
            self.slack.webhook_url = url;
        }
        if let Ok(channel) = std::env::var("SLACK_DEFAULT_CHANNEL") {
            self.slack.default_channel = channel;
        }
        if let Ok(addr) = std::env::var("BIND_ADDR") {
            if let Ok(addr) = addr.parse() {
                self.server.bind_address = addr;
            }
        }
    }

    /// Validates the configuration, failing fast on missing requirements.
    pub fn validate(&self) -> Result<()> {
        if self.slack.webhook_url.is_empty() {
            bail!(
                "Slack webhook URL is not configured. Set slack.webhook_url in the \
                 config file or the SLACK_WEBHOOK_URL environment variable."
            );
        }
        Ok(())
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind to.
    #[serde(default = "default_bind_address")]
    pub bind_address: SocketAddr,

    /// Request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_bind_address() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// Database settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database URL (SQLite).
    #[serde(default = "default_database_url")]
    pub url: String,
}

fn default_database_url() -> String {
    "sqlite://watchdesk.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
        }
    }
}

/// Slack webhook settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlackSettings {
    /// Incoming webhook URL. Required; no default.
    #[serde(default)]
    pub webhook_url: String,

    /// Channel used when a notification carries no override.
    #[serde(default = "default_channel")]
    pub default_channel: String,
}

fn default_channel() -> String {
    "security-alerts".to_string()
}

impl Default for SlackSettings {
    fn default() -> Self {
        Self {
            webhook_url: String::new(),
            default_channel: default_channel(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to use JSON format.
    #[serde(default)]
    pub json_format: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json_format: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.database.url, "sqlite://watchdesk.db");
        assert_eq!(config.slack.default_channel, "security-alerts");
        assert_eq!(config.server.bind_address.port(), 8080);
        assert!(config.slack.webhook_url.is_empty());
    }

    #[test]
    fn test_missing_webhook_url_fails_validation() {
        let config = AppConfig::default();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
server:
  bind_address: 127.0.0.1:9090

database:
  url: sqlite://ops.db

slack:
  webhook_url: https://hooks.slack.com/services/T000/B000/XXX
  default_channel: soc-alerts

logging:
  level: debug
  json_format: true
"#;

        let config: AppConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.server.bind_address.port(), 9090);
        assert_eq!(config.database.url, "sqlite://ops.db");
        assert_eq!(config.slack.default_channel, "soc-alerts");
        assert!(config.logging.json_format);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let yaml = r#"
slack:
  webhook_url: https://hooks.slack.com/services/T000/B000/XXX
"#;

        let config: AppConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.database.url, "sqlite://watchdesk.db");
        assert_eq!(config.slack.default_channel, "security-alerts");
        assert_eq!(config.server.request_timeout_secs, 30);
    }
}
