//! # wd-notify
//!
//! Outbound notification dispatch for Watchdesk.
//!
//! The dispatcher delivers a formatted message to an external chat channel
//! via incoming webhook. Delivery is deliberately at-most-once: a single
//! HTTP POST, a bounded timeout, and a boolean outcome. Callers that need
//! stronger guarantees must build them on top.

pub mod mock;
pub mod slack;

pub use mock::MockNotifier;
pub use slack::{SlackConfig, SlackNotifier};

use async_trait::async_trait;
use thiserror::Error;

/// Errors raised while constructing a notifier.
///
/// Delivery itself never raises; it reports failure through the boolean
/// returned by [`Notifier::send`].
#[derive(Error, Debug)]
pub enum NotifyError {
    /// Invalid notifier configuration.
    #[error("Invalid notifier configuration: {0}")]
    Config(String),
}

/// A single outbound notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRequest {
    /// Message text.
    pub message: String,
    /// Channel override; the configured default is used when absent.
    pub channel: Option<String>,
    /// Notification kind label (alert, info, warning, ...).
    pub kind: String,
    /// Severity label (low, medium, high, critical).
    pub severity: String,
}

impl NotificationRequest {
    /// Creates a request with the default "alert"/"medium" labels.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            channel: None,
            kind: "alert".to_string(),
            severity: "medium".to_string(),
        }
    }

    /// Sets the channel override.
    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = Some(channel.into());
        self
    }

    /// Sets the kind label.
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    /// Sets the severity label.
    pub fn with_severity(mut self, severity: impl Into<String>) -> Self {
        self.severity = severity.into();
        self
    }
}

/// Delivers notifications to an external channel.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Attempts to deliver the notification exactly once.
    ///
    /// Returns `true` iff the remote endpoint acknowledged the message.
    /// Transport failures and non-OK responses are logged and reported as
    /// `false`; they never raise.
    async fn send(&self, request: &NotificationRequest) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults() {
        let request = NotificationRequest::new("disk full");
        assert_eq!(request.kind, "alert");
        assert_eq!(request.severity, "medium");
        assert!(request.channel.is_none());
    }

    #[test]
    fn test_request_builders() {
        let request = NotificationRequest::new("paging")
            .with_channel("#oncall")
            .with_kind("page")
            .with_severity("critical");
        assert_eq!(request.channel.as_deref(), Some("#oncall"));
        assert_eq!(request.kind, "page");
        assert_eq!(request.severity, "critical");
    }
}
