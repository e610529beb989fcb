//! Agent data model.
//!
//! An agent is a registered sensor/collector tracked by the platform: a
//! passive record with a type, a status, and an opaque configuration map.
//! It is not a live connection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered sensor/collector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    /// Unique identifier for this agent.
    pub id: Uuid,
    /// Human-readable name.
    pub name: String,
    /// Where the agent collects from.
    pub agent_type: AgentType,
    /// Operational status.
    pub status: AgentStatus,
    /// Deployed software version.
    pub version: String,
    /// Whether the agent is enabled.
    pub is_active: bool,
    /// Last time the agent reported in.
    pub last_seen: Option<DateTime<Utc>>,
    /// Agent-specific configuration (schema-less).
    pub configuration: serde_json::Value,
    /// Timestamp when the record was created.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last update.
    pub updated_at: DateTime<Utc>,
}

/// Fields required to register a new agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAgent {
    pub name: String,
    pub agent_type: AgentType,
    pub status: AgentStatus,
    pub version: String,
    pub is_active: bool,
    pub configuration: serde_json::Value,
}

impl Agent {
    /// Creates a new agent record with a fresh identifier and timestamps.
    pub fn new(new: NewAgent) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: new.name,
            agent_type: new.agent_type,
            status: new.status,
            version: new.version,
            is_active: new.is_active,
            last_seen: None,
            configuration: new.configuration,
            created_at: now,
            updated_at: now,
        }
    }
}

/// The collection surface an agent covers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AgentType {
    /// Network traffic sensor.
    Network,
    /// Host/endpoint sensor.
    Endpoint,
    /// Cloud environment sensor.
    Cloud,
}

impl AgentType {
    /// Returns the database string representation.
    pub fn as_db_str(&self) -> &'static str {
        match self {
            AgentType::Network => "network",
            AgentType::Endpoint => "endpoint",
            AgentType::Cloud => "cloud",
        }
    }

    /// Parses an agent type from a database string.
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "network" => Some(AgentType::Network),
            "endpoint" => Some(AgentType::Endpoint),
            "cloud" => Some(AgentType::Cloud),
            _ => None,
        }
    }
}

impl std::fmt::Display for AgentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_db_str())
    }
}

/// Operational status of an agent.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    /// Agent is running and reporting.
    Active,
    /// Agent is stopped or unreachable.
    Inactive,
    /// Agent is deliberately offline for maintenance.
    Maintenance,
}

impl AgentStatus {
    /// Returns the database string representation.
    pub fn as_db_str(&self) -> &'static str {
        match self {
            AgentStatus::Active => "active",
            AgentStatus::Inactive => "inactive",
            AgentStatus::Maintenance => "maintenance",
        }
    }

    /// Parses an agent status from a database string.
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "active" => Some(AgentStatus::Active),
            "inactive" => Some(AgentStatus::Inactive),
            "maintenance" => Some(AgentStatus::Maintenance),
            _ => None,
        }
    }
}

impl std::fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_db_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_agent() -> NewAgent {
        NewAgent {
            name: "Net Monitor".to_string(),
            agent_type: AgentType::Network,
            status: AgentStatus::Active,
            version: "1.0.0".to_string(),
            is_active: true,
            configuration: serde_json::json!({}),
        }
    }

    #[test]
    fn test_agent_creation_sets_timestamps() {
        let agent = Agent::new(new_agent());
        assert_eq!(agent.created_at, agent.updated_at);
        assert!(agent.last_seen.is_none());
        assert!(agent.is_active);
    }

    #[test]
    fn test_agent_ids_are_unique() {
        let a = Agent::new(new_agent());
        let b = Agent::new(new_agent());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_agent_type_labels() {
        assert_eq!(AgentType::Network.as_db_str(), "network");
        assert_eq!(AgentType::from_db_str("cloud"), Some(AgentType::Cloud));
        assert_eq!(AgentType::from_db_str("satellite"), None);
    }

    #[test]
    fn test_agent_type_serde_labels() {
        let json = serde_json::to_string(&AgentType::Endpoint).unwrap();
        assert_eq!(json, "\"endpoint\"");
        assert!(serde_json::from_str::<AgentStatus>("\"decommissioned\"").is_err());
    }
}
