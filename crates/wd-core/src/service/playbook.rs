//! Playbook service.

use super::ServiceError;
use crate::db::{
    create_playbook_repository, create_task_repository, DbPool, PlaybookRepository,
    PlaybookUpdate, TaskRepository,
};
use crate::playbook::{NewPlaybook, Playbook};
use uuid::Uuid;

/// CRUD over playbooks, plus the blocked-delete policy for playbooks that
/// are still referenced by tasks.
pub struct PlaybookService {
    playbooks: Box<dyn PlaybookRepository>,
    tasks: Box<dyn TaskRepository>,
}

impl PlaybookService {
    /// Creates a service backed by the given pool.
    pub fn new(pool: &DbPool) -> Self {
        Self {
            playbooks: create_playbook_repository(pool),
            tasks: create_task_repository(pool),
        }
    }

    /// Creates a new playbook.
    ///
    /// An empty step sequence is accepted; such a playbook is not executable
    /// until steps are added.
    pub async fn create(&self, new: NewPlaybook) -> Result<Playbook, ServiceError> {
        let playbook = Playbook::new(new);
        Ok(self.playbooks.create(&playbook).await?)
    }

    /// Gets a playbook by ID.
    pub async fn get(&self, id: Uuid) -> Result<Playbook, ServiceError> {
        self.playbooks
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Playbook", id))
    }

    /// Lists all playbooks.
    pub async fn list(&self) -> Result<Vec<Playbook>, ServiceError> {
        Ok(self.playbooks.list().await?)
    }

    /// Applies a partial update to a playbook.
    pub async fn update(&self, id: Uuid, update: PlaybookUpdate) -> Result<Playbook, ServiceError> {
        Ok(self.playbooks.update(id, &update).await?)
    }

    /// Deletes a playbook, blocked while tasks still reference it.
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        let task_refs = self.tasks.count_by_playbook(id).await?;
        if task_refs > 0 {
            return Err(ServiceError::Conflict(format!(
                "playbook {} is referenced by {} task(s)",
                id, task_refs
            )));
        }

        if !self.playbooks.delete(id).await? {
            return Err(ServiceError::not_found("Playbook", id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{AgentStatus, AgentType, NewAgent};
    use crate::db::testing::test_pool;
    use crate::service::{AgentService, TaskService};
    use crate::task::{NewTask, TaskPriority, TaskStatus};

    fn new_playbook() -> NewPlaybook {
        NewPlaybook {
            name: "Containment".to_string(),
            description: "Contain a compromised host".to_string(),
            version: "1.0.0".to_string(),
            steps: vec![],
            parameters: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_list() {
        let pool = test_pool().await;
        let service = PlaybookService::new(&pool);

        service.create(new_playbook()).await.unwrap();
        service.create(new_playbook()).await.unwrap();

        assert_eq!(service.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_delete_blocked_while_referenced_by_task() {
        let pool = test_pool().await;
        let service = PlaybookService::new(&pool);
        let agents = AgentService::new(&pool);
        let tasks = TaskService::new(&pool);

        let playbook = service.create(new_playbook()).await.unwrap();
        let agent = agents
            .create(NewAgent {
                name: "Endpoint Agent".to_string(),
                agent_type: AgentType::Endpoint,
                status: AgentStatus::Active,
                version: "1.0.0".to_string(),
                is_active: true,
                configuration: serde_json::json!({}),
            })
            .await
            .unwrap();

        tasks
            .create(NewTask {
                name: "Contain ws-042".to_string(),
                description: String::new(),
                status: TaskStatus::Pending,
                priority: TaskPriority::Medium,
                agent_id: agent.id,
                playbook_id: playbook.id,
                parameters: serde_json::json!({}),
            })
            .await
            .unwrap();

        let result = service.delete(playbook.id).await;
        assert!(matches!(result, Err(ServiceError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let pool = test_pool().await;
        let service = PlaybookService::new(&pool);

        let result = service.delete(Uuid::new_v4()).await;
        assert!(matches!(result, Err(ServiceError::NotFound { .. })));
    }
}
