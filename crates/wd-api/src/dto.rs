//! Data Transfer Objects (DTOs) for API requests and responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use wd_core::{
    Agent, AgentStatus, AgentType, Alert, AlertType, Incident, IncidentStatus, Notification,
    Playbook, PlaybookStep, Rule, RuleType, Severity, Task, TaskPriority, TaskStatus,
};

/// Confirmation body for delete operations.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    /// Human-readable confirmation.
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// ============================================================================
// Agent DTOs
// ============================================================================

/// Request to register a new agent.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAgentRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[schema(value_type = String)]
    pub agent_type: AgentType,
    #[schema(value_type = String)]
    pub status: AgentStatus,
    #[validate(length(min = 1, max = 64))]
    pub version: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Agent-specific configuration; defaults to an empty map.
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub configuration: Option<serde_json::Value>,
}

/// Request to update an agent.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateAgentRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[schema(value_type = Option<String>)]
    pub agent_type: Option<AgentType>,
    #[schema(value_type = Option<String>)]
    pub status: Option<AgentStatus>,
    #[validate(length(min = 1, max = 64))]
    pub version: Option<String>,
    pub is_active: Option<bool>,
    pub last_seen: Option<DateTime<Utc>>,
    #[schema(value_type = Option<Object>)]
    pub configuration: Option<serde_json::Value>,
}

/// Response for a single agent.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AgentResponse {
    pub id: Uuid,
    pub name: String,
    pub agent_type: String,
    pub status: String,
    pub version: String,
    pub is_active: bool,
    pub last_seen: Option<DateTime<Utc>>,
    #[schema(value_type = Object)]
    pub configuration: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Agent> for AgentResponse {
    fn from(agent: Agent) -> Self {
        Self {
            id: agent.id,
            name: agent.name,
            agent_type: agent.agent_type.as_db_str().to_string(),
            status: agent.status.as_db_str().to_string(),
            version: agent.version,
            is_active: agent.is_active,
            last_seen: agent.last_seen,
            configuration: agent.configuration,
            created_at: agent.created_at,
            updated_at: agent.updated_at,
        }
    }
}

// ============================================================================
// Playbook DTOs
// ============================================================================

/// Request to create a new playbook.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreatePlaybookRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[validate(length(min = 1, max = 64))]
    pub version: String,
    #[serde(default)]
    #[schema(value_type = Vec<Object>)]
    pub steps: Vec<PlaybookStep>,
    #[schema(value_type = Option<Object>)]
    pub parameters: Option<serde_json::Value>,
}

/// Request to update a playbook.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdatePlaybookRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(length(min = 1, max = 64))]
    pub version: Option<String>,
    #[schema(value_type = Option<Vec<Object>>)]
    pub steps: Option<Vec<PlaybookStep>>,
    #[schema(value_type = Option<Object>)]
    pub parameters: Option<serde_json::Value>,
}

/// Response for a single playbook.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PlaybookResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub version: String,
    #[schema(value_type = Vec<Object>)]
    pub steps: Vec<PlaybookStep>,
    #[schema(value_type = Option<Object>)]
    pub parameters: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Playbook> for PlaybookResponse {
    fn from(playbook: Playbook) -> Self {
        Self {
            id: playbook.id,
            name: playbook.name,
            description: playbook.description,
            version: playbook.version,
            steps: playbook.steps,
            parameters: playbook.parameters,
            created_at: playbook.created_at,
            updated_at: playbook.updated_at,
        }
    }
}

// ============================================================================
// Task DTOs
// ============================================================================

/// Request to create a new task.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTaskRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_task_status")]
    #[schema(value_type = String)]
    pub status: TaskStatus,
    #[serde(default = "default_task_priority")]
    #[schema(value_type = String)]
    pub priority: TaskPriority,
    pub agent_id: Uuid,
    pub playbook_id: Uuid,
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub parameters: Option<serde_json::Value>,
}

/// Request to update a task.
///
/// `agent_id` and `playbook_id` are fixed at creation and not updatable.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateTaskRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[schema(value_type = Option<String>)]
    pub status: Option<TaskStatus>,
    #[schema(value_type = Option<String>)]
    pub priority: Option<TaskPriority>,
    #[schema(value_type = Option<Object>)]
    pub parameters: Option<serde_json::Value>,
    #[schema(value_type = Option<Object>)]
    pub result: Option<serde_json::Value>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Response for a single task.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TaskResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub status: String,
    pub priority: String,
    pub agent_id: Uuid,
    pub playbook_id: Uuid,
    #[schema(value_type = Object)]
    pub parameters: serde_json::Value,
    #[schema(value_type = Option<Object>)]
    pub result: Option<serde_json::Value>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            name: task.name,
            description: task.description,
            status: task.status.as_db_str().to_string(),
            priority: task.priority.as_db_str().to_string(),
            agent_id: task.agent_id,
            playbook_id: task.playbook_id,
            parameters: task.parameters,
            result: task.result,
            started_at: task.started_at,
            completed_at: task.completed_at,
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}

// ============================================================================
// Incident DTOs
// ============================================================================

/// Request to open a new incident.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateIncidentRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[schema(value_type = String)]
    pub severity: Severity,
    #[serde(default = "default_incident_status")]
    #[schema(value_type = String)]
    pub status: IncidentStatus,
    #[serde(default)]
    pub source: String,
    pub agent_id: Uuid,
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub details: Option<serde_json::Value>,
}

/// Request to update an incident.
///
/// `agent_id` is fixed at creation and `resolved_at` is server-managed.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateIncidentRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    pub description: Option<String>,
    #[schema(value_type = Option<String>)]
    pub severity: Option<Severity>,
    #[schema(value_type = Option<String>)]
    pub status: Option<IncidentStatus>,
    pub source: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub details: Option<serde_json::Value>,
}

/// Response for a single incident.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct IncidentResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub severity: String,
    pub status: String,
    pub source: String,
    pub agent_id: Uuid,
    #[schema(value_type = Object)]
    pub details: serde_json::Value,
    pub resolved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Incident> for IncidentResponse {
    fn from(incident: Incident) -> Self {
        Self {
            id: incident.id,
            title: incident.title,
            description: incident.description,
            severity: incident.severity.as_db_str().to_string(),
            status: incident.status.as_db_str().to_string(),
            source: incident.source,
            agent_id: incident.agent_id,
            details: incident.details,
            resolved_at: incident.resolved_at,
            created_at: incident.created_at,
            updated_at: incident.updated_at,
        }
    }
}

// ============================================================================
// Rule DTOs
// ============================================================================

/// Request to create a new rule.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateRuleRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[schema(value_type = String)]
    pub rule_type: RuleType,
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub conditions: Option<serde_json::Value>,
    #[serde(default)]
    #[schema(value_type = Vec<Object>)]
    pub actions: Vec<serde_json::Value>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// Request to update a rule.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateRuleRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[schema(value_type = Option<String>)]
    pub rule_type: Option<RuleType>,
    #[schema(value_type = Option<Object>)]
    pub conditions: Option<serde_json::Value>,
    #[schema(value_type = Option<Vec<Object>>)]
    pub actions: Option<Vec<serde_json::Value>>,
    pub is_active: Option<bool>,
}

/// Response for a single rule.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RuleResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub rule_type: String,
    #[schema(value_type = Object)]
    pub conditions: serde_json::Value,
    #[schema(value_type = Vec<Object>)]
    pub actions: Vec<serde_json::Value>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Rule> for RuleResponse {
    fn from(rule: Rule) -> Self {
        Self {
            id: rule.id,
            name: rule.name,
            description: rule.description,
            rule_type: rule.rule_type.as_db_str().to_string(),
            conditions: rule.conditions,
            actions: rule.actions,
            is_active: rule.is_active,
            created_at: rule.created_at,
            updated_at: rule.updated_at,
        }
    }
}

// ============================================================================
// Alert DTOs
// ============================================================================

/// Request to record a new alert.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAlertRequest {
    #[validate(length(min = 1))]
    pub message: String,
    #[schema(value_type = String)]
    pub alert_type: AlertType,
    #[schema(value_type = String)]
    pub severity: Severity,
    pub slack_message_id: Option<String>,
    pub status: Option<String>,
}

/// Request to update an alert.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateAlertRequest {
    #[validate(length(min = 1))]
    pub message: Option<String>,
    #[schema(value_type = Option<String>)]
    pub alert_type: Option<AlertType>,
    #[schema(value_type = Option<String>)]
    pub severity: Option<Severity>,
    pub slack_message_id: Option<String>,
    pub status: Option<String>,
}

/// Response for a single alert.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AlertResponse {
    pub id: Uuid,
    pub message: String,
    pub alert_type: String,
    pub severity: String,
    pub slack_message_id: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Alert> for AlertResponse {
    fn from(alert: Alert) -> Self {
        Self {
            id: alert.id,
            message: alert.message,
            alert_type: alert.alert_type.as_db_str().to_string(),
            severity: alert.severity.as_db_str().to_string(),
            slack_message_id: alert.slack_message_id,
            status: alert.status,
            created_at: alert.created_at,
            updated_at: alert.updated_at,
        }
    }
}

// ============================================================================
// Notification DTOs
// ============================================================================

/// Request to send an outbound notification.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SendNotificationRequest {
    #[validate(length(min = 1))]
    pub message: String,
    pub channel: Option<String>,
    /// Notification kind label; defaults to "alert".
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Severity label; defaults to "medium".
    pub severity: Option<String>,
}

/// Response for a persisted notification.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NotificationResponse {
    pub id: Uuid,
    pub message: String,
    pub channel: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    pub severity: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Notification> for NotificationResponse {
    fn from(notification: Notification) -> Self {
        Self {
            id: notification.id,
            message: notification.message,
            channel: notification.channel,
            kind: notification.kind,
            severity: notification.severity,
            created_at: notification.created_at,
            updated_at: notification.updated_at,
        }
    }
}

// ============================================================================
// Health DTOs
// ============================================================================

/// Health check response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Overall status: "healthy" or "unhealthy".
    pub status: String,
    /// Service version.
    pub version: String,
    /// Database health details.
    pub database: DatabaseHealth,
    /// Seconds since the server started.
    pub uptime_seconds: u64,
}

/// Database health details.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DatabaseHealth {
    /// Whether a ping query succeeded.
    pub connected: bool,
    /// Current pool size.
    pub pool_size: u32,
    /// Idle connections in the pool.
    pub idle_connections: usize,
}

fn default_true() -> bool {
    true
}

fn default_task_status() -> TaskStatus {
    TaskStatus::Pending
}

fn default_task_priority() -> TaskPriority {
    TaskPriority::Medium
}

fn default_incident_status() -> IncidentStatus {
    IncidentStatus::Open
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_agent_request_defaults() {
        let request: CreateAgentRequest = serde_json::from_str(
            r#"{"name": "Net Monitor", "agent_type": "network", "status": "active", "version": "1.0.0"}"#,
        )
        .unwrap();

        assert!(request.is_active);
        assert!(request.configuration.is_none());
    }

    #[test]
    fn test_out_of_enum_value_is_rejected() {
        let result: Result<CreateAgentRequest, _> = serde_json::from_str(
            r#"{"name": "X", "agent_type": "satellite", "status": "active", "version": "1"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_send_notification_request_type_field() {
        let request: SendNotificationRequest =
            serde_json::from_str(r#"{"message": "hi", "type": "warning"}"#).unwrap();
        assert_eq!(request.kind.as_deref(), Some("warning"));
        assert!(request.severity.is_none());
    }

    #[test]
    fn test_empty_name_fails_validation() {
        let request: CreateAgentRequest = serde_json::from_str(
            r#"{"name": "", "agent_type": "network", "status": "active", "version": "1.0.0"}"#,
        )
        .unwrap();
        assert!(request.validate().is_err());
    }
}
