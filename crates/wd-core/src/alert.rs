//! Alert data model (legacy).
//!
//! Alerts predate the incident lifecycle and keep their original shape:
//! a typed message with a free-text status and an optional reference to the
//! chat message that delivered it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::incident::Severity;

/// A legacy security alert record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    /// Unique identifier for this alert.
    pub id: Uuid,
    /// Alert text.
    pub message: String,
    /// Category of the alert.
    pub alert_type: AlertType,
    /// Severity level.
    pub severity: Severity,
    /// External delivery reference (chat message id), if delivered.
    pub slack_message_id: Option<String>,
    /// Free-text processing status, defaults to "pending".
    pub status: String,
    /// Timestamp when the record was created.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last update.
    pub updated_at: DateTime<Utc>,
}

/// Fields required to record a new alert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAlert {
    pub message: String,
    pub alert_type: AlertType,
    pub severity: Severity,
    pub slack_message_id: Option<String>,
    pub status: Option<String>,
}

impl Alert {
    /// Default free-text status for a newly recorded alert.
    pub const DEFAULT_STATUS: &'static str = "pending";

    /// Creates a new alert record with a fresh identifier and timestamps.
    pub fn new(new: NewAlert) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            message: new.message,
            alert_type: new.alert_type,
            severity: new.severity,
            slack_message_id: new.slack_message_id,
            status: new.status.unwrap_or_else(|| Self::DEFAULT_STATUS.to_string()),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Category of a security alert.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    Intrusion,
    Malware,
    UnauthorizedAccess,
    DataBreach,
    SystemFailure,
}

impl AlertType {
    /// Returns the database string representation.
    pub fn as_db_str(&self) -> &'static str {
        match self {
            AlertType::Intrusion => "intrusion",
            AlertType::Malware => "malware",
            AlertType::UnauthorizedAccess => "unauthorized_access",
            AlertType::DataBreach => "data_breach",
            AlertType::SystemFailure => "system_failure",
        }
    }

    /// Parses an alert type from a database string.
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "intrusion" => Some(AlertType::Intrusion),
            "malware" => Some(AlertType::Malware),
            "unauthorized_access" => Some(AlertType::UnauthorizedAccess),
            "data_breach" => Some(AlertType::DataBreach),
            "system_failure" => Some(AlertType::SystemFailure),
            _ => None,
        }
    }
}

impl std::fmt::Display for AlertType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_db_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alert_defaults() {
        let alert = Alert::new(NewAlert {
            message: "Malware signature matched".to_string(),
            alert_type: AlertType::Malware,
            severity: Severity::Critical,
            slack_message_id: None,
            status: None,
        });

        assert_eq!(alert.status, "pending");
        assert!(alert.slack_message_id.is_none());
        assert_eq!(alert.created_at, alert.updated_at);
    }

    #[test]
    fn test_alert_explicit_status() {
        let alert = Alert::new(NewAlert {
            message: "Data exfiltration attempt".to_string(),
            alert_type: AlertType::DataBreach,
            severity: Severity::High,
            slack_message_id: Some("1718900000.000100".to_string()),
            status: Some("delivered".to_string()),
        });

        assert_eq!(alert.status, "delivered");
    }

    #[test]
    fn test_alert_type_labels() {
        assert_eq!(AlertType::UnauthorizedAccess.as_db_str(), "unauthorized_access");
        assert_eq!(AlertType::from_db_str("intrusion"), Some(AlertType::Intrusion));
        assert_eq!(AlertType::from_db_str("noise"), None);
    }
}
