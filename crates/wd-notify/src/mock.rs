//! Mock notifier for testing.
//!
//! Records every request for test verification instead of making real HTTP
//! calls, with a switchable failure mode.

use crate::{NotificationRequest, Notifier};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A recorded delivery attempt.
#[derive(Debug, Clone)]
pub struct RecordedNotification {
    /// The request as submitted.
    pub request: NotificationRequest,
    /// Timestamp when the attempt was recorded.
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Notifier that records requests for test verification.
#[derive(Clone, Default)]
pub struct MockNotifier {
    sent: Arc<RwLock<Vec<RecordedNotification>>>,
    should_fail: Arc<RwLock<bool>>,
}

impl MockNotifier {
    /// Creates a new mock notifier that reports every delivery as successful.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether subsequent deliveries should report failure.
    pub async fn set_should_fail(&self, should_fail: bool) {
        *self.should_fail.write().await = should_fail;
    }

    /// Returns all recorded delivery attempts.
    pub async fn sent(&self) -> Vec<RecordedNotification> {
        self.sent.read().await.clone()
    }

    /// Clears recorded attempts.
    pub async fn clear(&self) {
        self.sent.write().await.clear();
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn send(&self, request: &NotificationRequest) -> bool {
        if *self.should_fail.read().await {
            return false;
        }

        self.sent.write().await.push(RecordedNotification {
            request: request.clone(),
            timestamp: chrono::Utc::now(),
        });
        true
    }
}
