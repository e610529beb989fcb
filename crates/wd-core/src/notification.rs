//! Notification data model.
//!
//! A notification record persists the intent to deliver a message to the
//! chat channel. It is written by the API after a delivery attempt succeeds
//! and is never referenced by other entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A persisted outbound notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    /// Unique identifier for this notification.
    pub id: Uuid,
    /// Message text as submitted by the caller.
    pub message: String,
    /// Channel override, if the caller named one.
    pub channel: Option<String>,
    /// Free-text notification kind, defaults to "alert".
    pub kind: String,
    /// Free-text severity label, defaults to "medium".
    pub severity: String,
    /// Timestamp when the record was created.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last update.
    pub updated_at: DateTime<Utc>,
}

/// Fields required to persist a notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewNotification {
    pub message: String,
    pub channel: Option<String>,
    pub kind: Option<String>,
    pub severity: Option<String>,
}

impl Notification {
    /// Default kind label.
    pub const DEFAULT_KIND: &'static str = "alert";
    /// Default severity label.
    pub const DEFAULT_SEVERITY: &'static str = "medium";

    /// Creates a new notification record with a fresh identifier and timestamps.
    pub fn new(new: NewNotification) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            message: new.message,
            channel: new.channel,
            kind: new.kind.unwrap_or_else(|| Self::DEFAULT_KIND.to_string()),
            severity: new
                .severity
                .unwrap_or_else(|| Self::DEFAULT_SEVERITY.to_string()),
            created_at: now,
            updated_at: now,
        }
    }
}
