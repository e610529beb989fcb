//! Slack webhook notifier.
//!
//! Sends a severity-prefixed text message to a Slack incoming webhook as a
//! JSON payload of `{text, channel}`. One attempt, 5 second timeout, and
//! only an exact HTTP 200 counts as delivered.

use crate::{NotificationRequest, Notifier, NotifyError};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::time::Duration;
use tracing::warn;

/// Bound on how long a delivery attempt may block the request path.
const DELIVERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Slack notifier configuration.
#[derive(Debug, Clone)]
pub struct SlackConfig {
    /// Incoming webhook URL.
    pub webhook_url: String,
    /// Channel used when a request carries no override.
    pub default_channel: String,
}

/// Notifier that posts to a Slack incoming webhook.
pub struct SlackNotifier {
    config: SlackConfig,
    client: Client,
}

/// Webhook payload shape.
#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    text: String,
    channel: &'a str,
}

impl SlackNotifier {
    /// Creates a new Slack notifier.
    pub fn new(config: SlackConfig) -> Result<Self, NotifyError> {
        if config.webhook_url.is_empty() {
            return Err(NotifyError::Config("webhook URL must not be empty".into()));
        }

        let client = Client::builder()
            .timeout(DELIVERY_TIMEOUT)
            .build()
            .map_err(|e| NotifyError::Config(e.to_string()))?;

        Ok(Self { config, client })
    }

    /// Formats the outbound text: severity indicator, upper-cased kind,
    /// then the message on its own line.
    pub fn format_message(request: &NotificationRequest) -> String {
        format!(
            "{} *{}*\n{}",
            severity_indicator(&request.severity),
            request.kind.to_uppercase(),
            request.message
        )
    }

    /// Resolves the target channel for a request.
    fn channel<'a>(&'a self, request: &'a NotificationRequest) -> &'a str {
        request
            .channel
            .as_deref()
            .unwrap_or(&self.config.default_channel)
    }
}

#[async_trait]
impl Notifier for SlackNotifier {
    async fn send(&self, request: &NotificationRequest) -> bool {
        let payload = WebhookPayload {
            text: Self::format_message(request),
            channel: self.channel(request),
        };

        match self
            .client
            .post(&self.config.webhook_url)
            .json(&payload)
            .send()
            .await
        {
            Ok(response) => {
                let delivered = response.status() == StatusCode::OK;
                if !delivered {
                    warn!(
                        status = response.status().as_u16(),
                        channel = payload.channel,
                        "Slack webhook rejected notification"
                    );
                }
                delivered
            }
            Err(e) => {
                warn!(error = %e, channel = payload.channel, "Slack webhook delivery failed");
                false
            }
        }
    }
}

/// Maps a severity label to its message indicator. Unknown labels get the
/// info indicator.
fn severity_indicator(severity: &str) -> &'static str {
    match severity.to_lowercase().as_str() {
        "low" => "\u{2139}\u{fe0f}",
        "medium" => "\u{26a0}\u{fe0f}",
        "high" => "\u{1f6a8}",
        "critical" => "\u{1f525}",
        _ => "\u{2139}\u{fe0f}",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_critical_alert() {
        let request = NotificationRequest::new("Data exfiltration detected")
            .with_kind("alert")
            .with_severity("critical");

        let text = SlackNotifier::format_message(&request);
        assert_eq!(text, "\u{1f525} *ALERT*\nData exfiltration detected");
    }

    #[test]
    fn test_format_unknown_severity_uses_info_indicator() {
        let request = NotificationRequest::new("heartbeat").with_severity("chartreuse");
        let text = SlackNotifier::format_message(&request);
        assert!(text.starts_with("\u{2139}\u{fe0f} "));
    }

    #[test]
    fn test_severity_is_case_insensitive() {
        let upper = NotificationRequest::new("x").with_severity("HIGH");
        let lower = NotificationRequest::new("x").with_severity("high");
        assert_eq!(
            SlackNotifier::format_message(&upper),
            SlackNotifier::format_message(&lower)
        );
    }

    #[test]
    fn test_channel_defaults_and_overrides() {
        let notifier = SlackNotifier::new(SlackConfig {
            webhook_url: "https://hooks.slack.example/services/T000/B000/XXX".to_string(),
            default_channel: "security-alerts".to_string(),
        })
        .unwrap();

        let plain = NotificationRequest::new("x");
        assert_eq!(notifier.channel(&plain), "security-alerts");

        let overridden = NotificationRequest::new("x").with_channel("#soc");
        assert_eq!(notifier.channel(&overridden), "#soc");
    }

    #[test]
    fn test_empty_webhook_url_is_rejected() {
        let result = SlackNotifier::new(SlackConfig {
            webhook_url: String::new(),
            default_channel: "security-alerts".to_string(),
        });
        assert!(matches!(result, Err(NotifyError::Config(_))));
    }
}
