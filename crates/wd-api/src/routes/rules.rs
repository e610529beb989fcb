//! Detection rule endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::dto::{CreateRuleRequest, MessageResponse, RuleResponse, UpdateRuleRequest};
use crate::error::ApiError;
use crate::state::AppState;
use wd_core::db::RuleUpdate;
use wd_core::{NewRule, RuleService};

/// Creates rule routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_rules).post(create_rule))
        .route("/:id", get(get_rule).put(update_rule).delete(delete_rule))
}

/// List all rules.
#[utoipa::path(
    get,
    path = "/api/rules",
    responses(
        (status = 200, description = "List of rules", body = Vec<RuleResponse>)
    ),
    tag = "Rules"
)]
pub(crate) async fn list_rules(
    State(state): State<AppState>,
) -> Result<Json<Vec<RuleResponse>>, ApiError> {
    let rules = RuleService::new(&state.db).list().await?;
    Ok(Json(rules.into_iter().map(RuleResponse::from).collect()))
}

/// Create a new rule.
#[utoipa::path(
    post,
    path = "/api/rules",
    request_body = CreateRuleRequest,
    responses(
        (status = 201, description = "Rule created", body = RuleResponse),
        (status = 422, description = "Validation failed")
    ),
    tag = "Rules"
)]
pub(crate) async fn create_rule(
    State(state): State<AppState>,
    Json(request): Json<CreateRuleRequest>,
) -> Result<(StatusCode, Json<RuleResponse>), ApiError> {
    request.validate()?;

    let rule = RuleService::new(&state.db)
        .create(NewRule {
            name: request.name,
            description: request.description,
            rule_type: request.rule_type,
            conditions: request.conditions.unwrap_or_else(|| serde_json::json!({})),
            actions: request.actions,
            is_active: request.is_active,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(rule.into())))
}

/// Get a single rule by ID.
#[utoipa::path(
    get,
    path = "/api/rules/{id}",
    params(("id" = Uuid, Path, description = "Rule ID")),
    responses(
        (status = 200, description = "Rule details", body = RuleResponse),
        (status = 404, description = "Rule not found")
    ),
    tag = "Rules"
)]
pub(crate) async fn get_rule(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RuleResponse>, ApiError> {
    let rule = RuleService::new(&state.db).get(id).await?;
    Ok(Json(rule.into()))
}

/// Update a rule.
#[utoipa::path(
    put,
    path = "/api/rules/{id}",
    params(("id" = Uuid, Path, description = "Rule ID")),
    request_body = UpdateRuleRequest,
    responses(
        (status = 200, description = "Updated rule", body = RuleResponse),
        (status = 404, description = "Rule not found")
    ),
    tag = "Rules"
)]
pub(crate) async fn update_rule(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateRuleRequest>,
) -> Result<Json<RuleResponse>, ApiError> {
    request.validate()?;

    let rule = RuleService::new(&state.db)
        .update(
            id,
            RuleUpdate {
                name: request.name,
                description: request.description,
                rule_type: request.rule_type,
                conditions: request.conditions,
                actions: request.actions,
                is_active: request.is_active,
            },
        )
        .await?;

    Ok(Json(rule.into()))
}

/// Delete a rule.
#[utoipa::path(
    delete,
    path = "/api/rules/{id}",
    params(("id" = Uuid, Path, description = "Rule ID")),
    responses(
        (status = 200, description = "Rule deleted", body = MessageResponse),
        (status = 404, description = "Rule not found")
    ),
    tag = "Rules"
)]
pub(crate) async fn delete_rule(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    RuleService::new(&state.db).delete(id).await?;
    Ok(Json(MessageResponse::new("Rule deleted successfully")))
}
