//! Demo data seeding.
//!
//! Inserts a small set of demonstration records (agents, playbooks, rules)
//! when the store is empty, mirroring what a fresh deployment of the
//! platform ships with.

use super::{
    create_agent_repository, create_playbook_repository, create_rule_repository, DbError, DbPool,
};
use crate::agent::{Agent, AgentStatus, AgentType, NewAgent};
use crate::playbook::{NewPlaybook, Playbook, PlaybookStep};
use crate::rule::{NewRule, Rule, RuleType};
use tracing::info;

/// Seeds demonstration data if no agents exist yet.
///
/// Returns whether any records were inserted.
pub async fn seed_demo_data(pool: &DbPool) -> Result<bool, DbError> {
    let agents = create_agent_repository(pool);
    if !agents.list().await?.is_empty() {
        info!("Store already has agents, skipping demo seed");
        return Ok(false);
    }

    info!("Seeding demo data");

    agents
        .create(&Agent::new(NewAgent {
            name: "Network Monitor Agent".to_string(),
            agent_type: AgentType::Network,
            status: AgentStatus::Active,
            version: "1.0.0".to_string(),
            is_active: true,
            configuration: serde_json::json!({}),
        }))
        .await?;
    agents
        .create(&Agent::new(NewAgent {
            name: "Endpoint Protection Agent".to_string(),
            agent_type: AgentType::Endpoint,
            status: AgentStatus::Active,
            version: "1.0.0".to_string(),
            is_active: true,
            configuration: serde_json::json!({}),
        }))
        .await?;

    let playbooks = create_playbook_repository(pool);
    playbooks
        .create(&Playbook::new(NewPlaybook {
            name: "Malware Detection Response".to_string(),
            description: "Standard response to malware detection".to_string(),
            version: "1.0.0".to_string(),
            steps: vec![
                PlaybookStep {
                    name: "Isolate affected system".to_string(),
                    action: "isolate".to_string(),
                    parameters: serde_json::json!({"duration": 3600}),
                },
                PlaybookStep {
                    name: "Scan for malware".to_string(),
                    action: "scan".to_string(),
                    parameters: serde_json::json!({"scan_type": "full"}),
                },
                PlaybookStep {
                    name: "Collect logs".to_string(),
                    action: "collect_logs".to_string(),
                    parameters: serde_json::json!({"log_types": ["system", "application"]}),
                },
            ],
            parameters: None,
        }))
        .await?;
    playbooks
        .create(&Playbook::new(NewPlaybook {
            name: "Network Intrusion Response".to_string(),
            description: "Response to network intrusion attempts".to_string(),
            version: "1.0.0".to_string(),
            steps: vec![
                PlaybookStep {
                    name: "Block suspicious IP".to_string(),
                    action: "block_ip".to_string(),
                    parameters: serde_json::json!({"duration": 86400}),
                },
                PlaybookStep {
                    name: "Analyze network traffic".to_string(),
                    action: "analyze_traffic".to_string(),
                    parameters: serde_json::json!({"timeframe": 3600}),
                },
                PlaybookStep {
                    name: "Update firewall rules".to_string(),
                    action: "update_firewall".to_string(),
                    parameters: serde_json::json!({"rule_type": "block"}),
                },
            ],
            parameters: None,
        }))
        .await?;

    let rules = create_rule_repository(pool);
    rules
        .create(&Rule::new(NewRule {
            name: "Malware Detection Rule".to_string(),
            description: "Detect known malware signatures".to_string(),
            rule_type: RuleType::Detection,
            conditions: serde_json::json!({"signature_match": true, "confidence": 0.8}),
            actions: vec![serde_json::json!({"type": "create_incident", "severity": "high"})],
            is_active: true,
        }))
        .await?;
    rules
        .create(&Rule::new(NewRule {
            name: "Brute Force Prevention".to_string(),
            description: "Prevent brute force login attempts".to_string(),
            rule_type: RuleType::Prevention,
            conditions: serde_json::json!({"failed_attempts": 5, "timeframe": 300}),
            actions: vec![serde_json::json!({"type": "block_ip", "duration": 3600})],
            is_active: true,
        }))
        .await?;

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::test_pool;

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let pool = test_pool().await;

        assert!(seed_demo_data(&pool).await.unwrap());
        assert!(!seed_demo_data(&pool).await.unwrap());

        let agents = create_agent_repository(&pool).list().await.unwrap();
        assert_eq!(agents.len(), 2);
        let playbooks = create_playbook_repository(&pool).list().await.unwrap();
        assert_eq!(playbooks.len(), 2);
        let rules = create_rule_repository(&pool).list().await.unwrap();
        assert_eq!(rules.len(), 2);
    }
}
