//! Incident service.
//!
//! Verifies the attributed agent exists and keeps `resolved_at` consistent
//! with the status lifecycle: non-null exactly while the incident is
//! resolved or closed.

use super::ServiceError;
use crate::db::{
    create_agent_repository, create_incident_repository, AgentRepository, DbPool,
    IncidentRepository, IncidentUpdate,
};
use crate::incident::{Incident, NewIncident};
use chrono::Utc;
use uuid::Uuid;

/// CRUD over incidents with referential checks and resolution bookkeeping.
pub struct IncidentService {
    incidents: Box<dyn IncidentRepository>,
    agents: Box<dyn AgentRepository>,
}

impl IncidentService {
    /// Creates a service backed by the given pool.
    pub fn new(pool: &DbPool) -> Self {
        Self {
            incidents: create_incident_repository(pool),
            agents: create_agent_repository(pool),
        }
    }

    /// Opens a new incident after verifying the agent reference resolves.
    pub async fn create(&self, new: NewIncident) -> Result<Incident, ServiceError> {
        if self.agents.get(new.agent_id).await?.is_none() {
            return Err(ServiceError::reference("Agent", new.agent_id));
        }

        let incident = Incident::new(new);
        Ok(self.incidents.create(&incident).await?)
    }

    /// Gets an incident by ID.
    pub async fn get(&self, id: Uuid) -> Result<Incident, ServiceError> {
        self.incidents
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Incident", id))
    }

    /// Lists all incidents.
    pub async fn list(&self) -> Result<Vec<Incident>, ServiceError> {
        Ok(self.incidents.list().await?)
    }

    /// Applies a partial update to an incident.
    ///
    /// When the status changes, `resolved_at` is maintained in the same
    /// write: stamped on entering resolved/closed, kept when already in a
    /// resolution state, and cleared when the incident is reopened.
    pub async fn update(&self, id: Uuid, mut update: IncidentUpdate) -> Result<Incident, ServiceError> {
        let current = self.get(id).await?;

        if let Some(next) = update.status {
            update.expected_status = Some(current.status);
            update.resolved_at = if next.is_resolution() {
                if current.status.is_resolution() {
                    None
                } else {
                    Some(Some(Utc::now()))
                }
            } else {
                Some(None)
            };
        }

        Ok(self.incidents.update(id, &update).await?)
    }

    /// Deletes an incident.
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        if !self.incidents.delete(id).await? {
            return Err(ServiceError::not_found("Incident", id));
        }
        Ok(())
    }
}
