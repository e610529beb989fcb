//! Agent service.

use super::ServiceError;
use crate::agent::{Agent, NewAgent};
use crate::db::{
    create_agent_repository, create_incident_repository, create_task_repository, AgentRepository,
    AgentUpdate, DbPool, IncidentRepository, TaskRepository,
};
use uuid::Uuid;

/// CRUD over agents, plus the blocked-delete policy for agents that are
/// still referenced by tasks or incidents.
pub struct AgentService {
    agents: Box<dyn AgentRepository>,
    tasks: Box<dyn TaskRepository>,
    incidents: Box<dyn IncidentRepository>,
}

impl AgentService {
    /// Creates a service backed by the given pool.
    pub fn new(pool: &DbPool) -> Self {
        Self {
            agents: create_agent_repository(pool),
            tasks: create_task_repository(pool),
            incidents: create_incident_repository(pool),
        }
    }

    /// Registers a new agent.
    pub async fn create(&self, new: NewAgent) -> Result<Agent, ServiceError> {
        let agent = Agent::new(new);
        Ok(self.agents.create(&agent).await?)
    }

    /// Gets an agent by ID.
    pub async fn get(&self, id: Uuid) -> Result<Agent, ServiceError> {
        self.agents
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Agent", id))
    }

    /// Lists all agents.
    pub async fn list(&self) -> Result<Vec<Agent>, ServiceError> {
        Ok(self.agents.list().await?)
    }

    /// Applies a partial update to an agent.
    pub async fn update(&self, id: Uuid, update: AgentUpdate) -> Result<Agent, ServiceError> {
        Ok(self.agents.update(id, &update).await?)
    }

    /// Deletes an agent.
    ///
    /// The delete is blocked while tasks or incidents still reference the
    /// agent, so no dangling references can be created.
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        let task_refs = self.tasks.count_by_agent(id).await?;
        let incident_refs = self.incidents.count_by_agent(id).await?;
        if task_refs > 0 || incident_refs > 0 {
            return Err(ServiceError::Conflict(format!(
                "agent {} is referenced by {} task(s) and {} incident(s)",
                id, task_refs, incident_refs
            )));
        }

        if !self.agents.delete(id).await? {
            return Err(ServiceError::not_found("Agent", id));
        }
        Ok(())
    }
}
