//! Task service.
//!
//! Enforces what the repository alone cannot: agent and playbook references
//! must resolve at creation, and status changes follow the guarded state
//! machine `pending -> running -> {completed, failed}`.

use super::ServiceError;
use crate::db::{
    create_agent_repository, create_playbook_repository, create_task_repository, AgentRepository,
    DbPool, PlaybookRepository, TaskRepository, TaskUpdate,
};
use crate::task::{NewTask, Task, TaskStatus};
use chrono::Utc;
use uuid::Uuid;

/// CRUD over tasks with referential checks and the guarded status lifecycle.
pub struct TaskService {
    tasks: Box<dyn TaskRepository>,
    agents: Box<dyn AgentRepository>,
    playbooks: Box<dyn PlaybookRepository>,
}

impl TaskService {
    /// Creates a service backed by the given pool.
    pub fn new(pool: &DbPool) -> Self {
        Self {
            tasks: create_task_repository(pool),
            agents: create_agent_repository(pool),
            playbooks: create_playbook_repository(pool),
        }
    }

    /// Creates a new task after verifying both references resolve.
    pub async fn create(&self, new: NewTask) -> Result<Task, ServiceError> {
        if self.agents.get(new.agent_id).await?.is_none() {
            return Err(ServiceError::reference("Agent", new.agent_id));
        }
        if self.playbooks.get(new.playbook_id).await?.is_none() {
            return Err(ServiceError::reference("Playbook", new.playbook_id));
        }

        let task = Task::new(new);
        Ok(self.tasks.create(&task).await?)
    }

    /// Gets a task by ID.
    pub async fn get(&self, id: Uuid) -> Result<Task, ServiceError> {
        self.tasks
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Task", id))
    }

    /// Lists all tasks.
    pub async fn list(&self) -> Result<Vec<Task>, ServiceError> {
        Ok(self.tasks.list().await?)
    }

    /// Applies a partial update to a task.
    ///
    /// A status change is validated against the current status and written
    /// with a compare-and-swap guard. Entering `running` stamps `started_at`
    /// and entering a terminal state stamps `completed_at` unless the caller
    /// supplied explicit values.
    pub async fn update(&self, id: Uuid, mut update: TaskUpdate) -> Result<Task, ServiceError> {
        let current = self.get(id).await?;

        if let Some(next) = update.status {
            if !current.status.can_transition_to(next) {
                return Err(ServiceError::Validation(format!(
                    "invalid task status transition: {} -> {}",
                    current.status, next
                )));
            }
            update.expected_status = Some(current.status);

            let now = Utc::now();
            if next == TaskStatus::Running
                && current.started_at.is_none()
                && update.started_at.is_none()
            {
                update.started_at = Some(Some(now));
            }
            if matches!(next, TaskStatus::Completed | TaskStatus::Failed)
                && current.completed_at.is_none()
                && update.completed_at.is_none()
            {
                update.completed_at = Some(Some(now));
            }
        }

        let started = update.started_at.unwrap_or(current.started_at);
        let completed = update.completed_at.unwrap_or(current.completed_at);
        if let (Some(s), Some(c)) = (started, completed) {
            if s > c {
                return Err(ServiceError::Validation(
                    "started_at must not be after completed_at".to_string(),
                ));
            }
        }

        Ok(self.tasks.update(id, &update).await?)
    }

    /// Deletes a task.
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        if !self.tasks.delete(id).await? {
            return Err(ServiceError::not_found("Task", id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{Agent, AgentStatus, AgentType, NewAgent};
    use crate::db::testing::test_pool;
    use crate::playbook::{NewPlaybook, Playbook};
    use crate::service::{AgentService, PlaybookService};
    use crate::task::TaskPriority;

    async fn seed_refs(pool: &DbPool) -> (Agent, Playbook) {
        let agent = AgentService::new(pool)
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

        let playbook = PlaybookService::new(pool)
            .create(NewPlaybook {
                name: "Isolation".to_string(),
                description: "Isolate a host".to_string(),
                version: "1.0.0".to_string(),
                steps: vec![],
                parameters: None,
            })
            .await
            .unwrap();

        (agent, playbook)
    }

    fn new_task(agent_id: Uuid, playbook_id: Uuid) -> NewTask {
        NewTask {
            name: "Isolate ws-042".to_string(),
            description: "Contain the workstation".to_string(),
            status: TaskStatus::Pending,
            priority: TaskPriority::High,
            agent_id,
            playbook_id,
            parameters: serde_json::json!({}),
        }
    }

    #[tokio::test]
    async fn test_create_with_valid_references() {
        let pool = test_pool().await;
        let (agent, playbook) = seed_refs(&pool).await;
        let service = TaskService::new(&pool);

        let task = service.create(new_task(agent.id, playbook.id)).await.unwrap();
        assert_eq!(task.status, TaskStatus::Pending);
    }

    #[tokio::test]
    async fn test_create_with_missing_playbook_is_rejected() {
        let pool = test_pool().await;
        let (agent, _) = seed_refs(&pool).await;
        let service = TaskService::new(&pool);

        let missing = Uuid::new_v4();
        let result = service.create(new_task(agent.id, missing)).await;
        assert!(matches!(
            result,
            Err(ServiceError::Reference { entity: "Playbook", id }) if id == missing
        ));
    }

    #[tokio::test]
    async fn test_create_with_missing_agent_is_rejected() {
        let pool = test_pool().await;
        let (_, playbook) = seed_refs(&pool).await;
        let service = TaskService::new(&pool);

        let result = service.create(new_task(Uuid::new_v4(), playbook.id)).await;
        assert!(matches!(result, Err(ServiceError::Reference { entity: "Agent", .. })));
    }

    #[tokio::test]
    async fn test_lifecycle_transitions_and_stamps() {
        let pool = test_pool().await;
        let (agent, playbook) = seed_refs(&pool).await;
        let service = TaskService::new(&pool);

        let task = service.create(new_task(agent.id, playbook.id)).await.unwrap();

        let running = service
            .update(
                task.id,
                TaskUpdate {
                    status: Some(TaskStatus::Running),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(running.status, TaskStatus::Running);
        assert!(running.started_at.is_some());
        assert!(running.completed_at.is_none());

        let completed = service
            .update(
                task.id,
                TaskUpdate {
                    status: Some(TaskStatus::Completed),
                    result: Some(Some(serde_json::json!({"isolated": true}))),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(completed.status, TaskStatus::Completed);
        assert!(completed.completed_at.is_some());
        assert!(completed.started_at.unwrap() <= completed.completed_at.unwrap());
    }

    #[tokio::test]
    async fn test_skipping_running_is_rejected() {
        let pool = test_pool().await;
        let (agent, playbook) = seed_refs(&pool).await;
        let service = TaskService::new(&pool);

        let task = service.create(new_task(agent.id, playbook.id)).await.unwrap();

        let result = service
            .update(
                task.id,
                TaskUpdate {
                    status: Some(TaskStatus::Completed),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn test_regression_to_pending_is_rejected() {
        let pool = test_pool().await;
        let (agent, playbook) = seed_refs(&pool).await;
        let service = TaskService::new(&pool);

        let task = service.create(new_task(agent.id, playbook.id)).await.unwrap();
        service
            .update(
                task.id,
                TaskUpdate {
                    status: Some(TaskStatus::Running),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let result = service
            .update(
                task.id,
                TaskUpdate {
                    status: Some(TaskStatus::Pending),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn test_inverted_timestamps_are_rejected() {
        let pool = test_pool().await;
        let (agent, playbook) = seed_refs(&pool).await;
        let service = TaskService::new(&pool);

        let task = service.create(new_task(agent.id, playbook.id)).await.unwrap();

        let now = Utc::now();
        let result = service
            .update(
                task.id,
                TaskUpdate {
                    started_at: Some(Some(now)),
                    completed_at: Some(Some(now - chrono::Duration::seconds(60))),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }
}
