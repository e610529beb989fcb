//! Playbook data model.
//!
//! A playbook is a named, versioned sequence of response steps. Each step
//! carries an action identifier and a schema-less parameter map.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A response procedure made of ordered steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Playbook {
    /// Unique identifier for this playbook.
    pub id: Uuid,
    /// Human-readable name.
    pub name: String,
    /// What the playbook responds to.
    pub description: String,
    /// Playbook revision.
    pub version: String,
    /// Ordered steps executed by tasks running this playbook.
    pub steps: Vec<PlaybookStep>,
    /// Expected parameters and their types (schema-less).
    pub parameters: Option<serde_json::Value>,
    /// Timestamp when the record was created.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last update.
    pub updated_at: DateTime<Utc>,
}

/// A single step within a playbook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybookStep {
    /// Step name shown to operators.
    pub name: String,
    /// Action identifier executed by this step.
    pub action: String,
    /// Action parameters (schema-less).
    #[serde(default)]
    pub parameters: serde_json::Value,
}

/// Fields required to create a new playbook.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPlaybook {
    pub name: String,
    pub description: String,
    pub version: String,
    pub steps: Vec<PlaybookStep>,
    pub parameters: Option<serde_json::Value>,
}

impl Playbook {
    /// Creates a new playbook record with a fresh identifier and timestamps.
    ///
    /// An empty step sequence is accepted at creation; such a playbook is
    /// simply not executable until steps are added.
    pub fn new(new: NewPlaybook) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: new.name,
            description: new.description,
            version: new.version,
            steps: new.steps,
            parameters: new.parameters,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the playbook has at least one step to execute.
    pub fn is_executable(&self) -> bool {
        !self.steps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn isolate_step() -> PlaybookStep {
        PlaybookStep {
            name: "Isolate affected system".to_string(),
            action: "isolate".to_string(),
            parameters: serde_json::json!({"duration": 3600}),
        }
    }

    #[test]
    fn test_playbook_creation() {
        let playbook = Playbook::new(NewPlaybook {
            name: "Malware Detection Response".to_string(),
            description: "Standard response to malware detection".to_string(),
            version: "1.0.0".to_string(),
            steps: vec![isolate_step()],
            parameters: None,
        });

        assert_eq!(playbook.created_at, playbook.updated_at);
        assert!(playbook.is_executable());
    }

    #[test]
    fn test_empty_playbook_is_accepted_but_not_executable() {
        let playbook = Playbook::new(NewPlaybook {
            name: "Draft".to_string(),
            description: String::new(),
            version: "0.1.0".to_string(),
            steps: vec![],
            parameters: None,
        });

        assert!(!playbook.is_executable());
    }

    #[test]
    fn test_step_parameters_default_to_null() {
        let step: PlaybookStep =
            serde_json::from_str(r#"{"name": "Scan", "action": "scan"}"#).unwrap();
        assert_eq!(step.parameters, serde_json::Value::Null);
    }
}
