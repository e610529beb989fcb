//! Detection rule data model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A detection/prevention/response condition-action pair.
///
/// Rules are standalone records; nothing in the platform executes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    /// Unique identifier for this rule.
    pub id: Uuid,
    /// Human-readable name.
    pub name: String,
    /// What the rule matches.
    pub description: String,
    /// How the rule is applied.
    pub rule_type: RuleType,
    /// Match conditions (schema-less).
    pub conditions: serde_json::Value,
    /// Ordered action descriptors fired on match (schema-less).
    pub actions: Vec<serde_json::Value>,
    /// Whether the rule is enabled.
    pub is_active: bool,
    /// Timestamp when the record was created.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last update.
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create a new rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRule {
    pub name: String,
    pub description: String,
    pub rule_type: RuleType,
    pub conditions: serde_json::Value,
    pub actions: Vec<serde_json::Value>,
    pub is_active: bool,
}

impl Rule {
    /// Creates a new rule record with a fresh identifier and timestamps.
    pub fn new(new: NewRule) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: new.name,
            description: new.description,
            rule_type: new.rule_type,
            conditions: new.conditions,
            actions: new.actions,
            is_active: new.is_active,
            created_at: now,
            updated_at: now,
        }
    }
}

/// How a rule is applied.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RuleType {
    /// Matches and records suspicious activity.
    Detection,
    /// Blocks activity before it happens.
    Prevention,
    /// Triggers a response to matched activity.
    Response,
}

impl RuleType {
    /// Returns the database string representation.
    pub fn as_db_str(&self) -> &'static str {
        match self {
            RuleType::Detection => "detection",
            RuleType::Prevention => "prevention",
            RuleType::Response => "response",
        }
    }

    /// Parses a rule type from a database string.
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "detection" => Some(RuleType::Detection),
            "prevention" => Some(RuleType::Prevention),
            "response" => Some(RuleType::Response),
            _ => None,
        }
    }
}

impl std::fmt::Display for RuleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_db_str())
    }
}
