//! Rule service.

use super::ServiceError;
use crate::db::{create_rule_repository, DbPool, RuleRepository, RuleUpdate};
use crate::rule::{NewRule, Rule};
use uuid::Uuid;

/// Plain CRUD over detection rules.
pub struct RuleService {
    rules: Box<dyn RuleRepository>,
}

impl RuleService {
    /// Creates a service backed by the given pool.
    pub fn new(pool: &DbPool) -> Self {
        Self {
            rules: create_rule_repository(pool),
        }
    }

    /// Creates a new rule.
    pub async fn create(&self, new: NewRule) -> Result<Rule, ServiceError> {
        let rule = Rule::new(new);
        Ok(self.rules.create(&rule).await?)
    }

    /// Gets a rule by ID.
    pub async fn get(&self, id: Uuid) -> Result<Rule, ServiceError> {
        self.rules
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Rule", id))
    }

    /// Lists all rules.
    pub async fn list(&self) -> Result<Vec<Rule>, ServiceError> {
        Ok(self.rules.list().await?)
    }

    /// Applies a partial update to a rule.
    pub async fn update(&self, id: Uuid, update: RuleUpdate) -> Result<Rule, ServiceError> {
        Ok(self.rules.update(id, &update).await?)
    }

    /// Deletes a rule.
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        if !self.rules.delete(id).await? {
            return Err(ServiceError::not_found("Rule", id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::test_pool;
    use crate::rule::RuleType;

    #[tokio::test]
    async fn test_crud_cycle() {
        let pool = test_pool().await;
        let service = RuleService::new(&pool);

        let rule = service
            .create(NewRule {
                name: "Malware Detection Rule".to_string(),
                description: "Detect known malware signatures".to_string(),
                rule_type: RuleType::Detection,
                conditions: serde_json::json!({"confidence": 0.8}),
                actions: vec![serde_json::json!({"type": "create_incident"})],
                is_active: true,
            })
            .await
            .unwrap();

        let updated = service
            .update(
                rule.id,
                RuleUpdate {
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(!updated.is_active);

        service.delete(rule.id).await.unwrap();
        assert!(matches!(
            service.get(rule.id).await,
            Err(ServiceError::NotFound { .. })
        ));
    }
}
