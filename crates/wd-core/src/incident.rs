//! Incident data model.
//!
//! An incident is a recorded security event attributed to an agent, tracked
//! through a resolution lifecycle. The shared [`Severity`] scale defined here
//! is also used by alerts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A recorded security event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Incident {
    /// Unique identifier for this incident.
    pub id: Uuid,
    /// Short summary shown in listings.
    pub title: String,
    /// Full description of the event.
    pub description: String,
    /// Severity level.
    pub severity: Severity,
    /// Current lifecycle status.
    pub status: IncidentStatus,
    /// Where the incident was detected.
    pub source: String,
    /// Agent the incident is attributed to.
    pub agent_id: Uuid,
    /// Additional incident details (schema-less).
    pub details: serde_json::Value,
    /// Set exactly when the incident enters resolved or closed.
    pub resolved_at: Option<DateTime<Utc>>,
    /// Timestamp when the record was created.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last update.
    pub updated_at: DateTime<Utc>,
}

/// Fields required to open a new incident.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewIncident {
    pub title: String,
    pub description: String,
    pub severity: Severity,
    pub status: IncidentStatus,
    pub source: String,
    pub agent_id: Uuid,
    pub details: serde_json::Value,
}

impl Incident {
    /// Creates a new incident record with a fresh identifier and timestamps.
    ///
    /// `resolved_at` is populated immediately when the incident is created
    /// directly in a resolution state.
    pub fn new(new: NewIncident) -> Self {
        let now = Utc::now();
        let resolved_at = new.status.is_resolution().then_some(now);
        Self {
            id: Uuid::new_v4(),
            title: new.title,
            description: new.description,
            severity: new.severity,
            status: new.status,
            source: new.source,
            agent_id: new.agent_id,
            details: new.details,
            resolved_at,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Severity levels shared by incidents and alerts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Returns the database string representation.
    pub fn as_db_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }

    /// Parses a severity from a database string.
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "low" => Some(Severity::Low),
            "medium" => Some(Severity::Medium),
            "high" => Some(Severity::High),
            "critical" => Some(Severity::Critical),
            _ => None,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_db_str())
    }
}

/// Lifecycle status of an incident.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IncidentStatus {
    /// Newly recorded, not yet picked up.
    Open,
    /// Being worked by an analyst or playbook.
    InProgress,
    /// Root cause addressed.
    Resolved,
    /// Closed, with or without action.
    Closed,
}

impl IncidentStatus {
    /// Whether this status terminates the incident lifecycle.
    ///
    /// `resolved_at` is non-null exactly while the incident is in one of
    /// these states.
    pub fn is_resolution(&self) -> bool {
        matches!(self, IncidentStatus::Resolved | IncidentStatus::Closed)
    }

    /// Returns the database string representation.
    pub fn as_db_str(&self) -> &'static str {
        match self {
            IncidentStatus::Open => "open",
            IncidentStatus::InProgress => "in_progress",
            IncidentStatus::Resolved => "resolved",
            IncidentStatus::Closed => "closed",
        }
    }

    /// Parses an incident status from a database string.
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "open" => Some(IncidentStatus::Open),
            "in_progress" => Some(IncidentStatus::InProgress),
            "resolved" => Some(IncidentStatus::Resolved),
            "closed" => Some(IncidentStatus::Closed),
            _ => None,
        }
    }
}

impl std::fmt::Display for IncidentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_db_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_incident(status: IncidentStatus) -> NewIncident {
        NewIncident {
            title: "Suspicious outbound traffic".to_string(),
            description: "Beaconing to a known C2 range".to_string(),
            severity: Severity::High,
            status,
            source: "ids".to_string(),
            agent_id: Uuid::new_v4(),
            details: serde_json::json!({"dst": "203.0.113.7"}),
        }
    }

    #[test]
    fn test_open_incident_has_no_resolved_at() {
        let incident = Incident::new(new_incident(IncidentStatus::Open));
        assert!(incident.resolved_at.is_none());
        assert_eq!(incident.created_at, incident.updated_at);
    }

    #[test]
    fn test_incident_created_resolved_gets_resolved_at() {
        let incident = Incident::new(new_incident(IncidentStatus::Resolved));
        assert!(incident.resolved_at.is_some());
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Critical > Severity::High);
        assert!(Severity::High > Severity::Medium);
        assert!(Severity::Medium > Severity::Low);
    }

    #[test]
    fn test_resolution_states() {
        assert!(IncidentStatus::Resolved.is_resolution());
        assert!(IncidentStatus::Closed.is_resolution());
        assert!(!IncidentStatus::Open.is_resolution());
        assert!(!IncidentStatus::InProgress.is_resolution());
    }
}
