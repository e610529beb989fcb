//! # wd-core
//!
//! Core data models, services, and persistence for Watchdesk.
//!
//! This crate defines the domain entities tracked by the platform (agents,
//! playbooks, tasks, incidents, rules, alerts, notifications), the repository
//! layer that persists them, and the service layer that enforces referential
//! checks and state transitions on top of plain CRUD.

pub mod agent;
pub mod alert;
pub mod db;
pub mod incident;
pub mod notification;
pub mod playbook;
pub mod rule;
pub mod service;
pub mod task;

pub use agent::{Agent, AgentStatus, AgentType, NewAgent};
pub use alert::{Alert, AlertType, NewAlert};
pub use incident::{Incident, IncidentStatus, NewIncident, Severity};
pub use notification::{NewNotification, Notification};
pub use playbook::{NewPlaybook, Playbook, PlaybookStep};
pub use rule::{NewRule, Rule, RuleType};
pub use service::{
    AgentService, AlertService, IncidentService, NotificationService, PlaybookService,
    RuleService, ServiceError, TaskService,
};
pub use task::{NewTask, Task, TaskPriority, TaskStatus};
