//! Entity services.
//!
//! Services compose the repositories with the domain checks plain CRUD does
//! not enforce: referential validation for tasks and incidents, the guarded
//! task state machine, incident resolution bookkeeping, and the blocked
//! delete policy for still-referenced agents and playbooks.

mod agent;
mod alert;
mod incident;
mod notification;
mod playbook;
mod rule;
mod task;

pub use agent::AgentService;
pub use alert::AlertService;
pub use incident::IncidentService;
pub use notification::NotificationService;
pub use playbook::PlaybookService;
pub use rule::RuleService;
pub use task::TaskService;

use crate::db::DbError;
use thiserror::Error;
use uuid::Uuid;

/// Errors surfaced by the service layer.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Requested record does not exist.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: Uuid },

    /// A field or state transition failed validation.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A referenced record does not exist.
    #[error("Referenced {entity} {id} does not exist")]
    Reference { entity: &'static str, id: Uuid },

    /// The operation conflicts with current state.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Underlying database error.
    #[error(transparent)]
    Db(#[from] DbError),
}

impl ServiceError {
    /// Builds a `NotFound` for the given entity and identifier.
    pub fn not_found(entity: &'static str, id: Uuid) -> Self {
        ServiceError::NotFound { entity, id }
    }

    /// Builds a `Reference` for the given entity and identifier.
    pub fn reference(entity: &'static str, id: Uuid) -> Self {
        ServiceError::Reference { entity, id }
    }
}
