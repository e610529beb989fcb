//! API error types and handling.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;
use utoipa::ToSchema;
use wd_core::db::DbError;
use wd_core::ServiceError;

/// API error type.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request (malformed input).
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Validation error (out-of-enum value, bad state transition, ...).
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A referenced record does not exist.
    #[error("Invalid reference: {0}")]
    Reference(String),

    /// Conflict with current state (still-referenced record, lost race).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Outbound notification delivery did not succeed.
    #[error("Failed to deliver notification")]
    DeliveryFailed,

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON error response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

impl ApiError {
    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Reference(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::DeliveryFailed => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::Validation(_) => "VALIDATION_ERROR",
            ApiError::Reference(_) => "REFERENCE_ERROR",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::DeliveryFailed => "DELIVERY_FAILED",
            ApiError::Database(_) => "DATABASE_ERROR",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Internal detail is logged, never sent to the caller.
        let message = match &self {
            ApiError::Database(detail) => {
                error!(detail = %detail, "Database error surfaced at API boundary");
                "Internal server error".to_string()
            }
            ApiError::Internal(detail) => {
                error!(detail = %detail, "Unhandled error surfaced at API boundary");
                "Internal server error".to_string()
            }
            _ => self.to_string(),
        };

        let body = ErrorResponse {
            code: self.error_code().to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{} {} not found", entity, id))
            }
            ServiceError::Validation(msg) => ApiError::Validation(msg),
            ServiceError::Reference { entity, id } => {
                ApiError::Reference(format!("referenced {} {} does not exist", entity, id))
            }
            ServiceError::Conflict(msg) => ApiError::Conflict(msg),
            ServiceError::Db(db) => db.into(),
        }
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{} {} not found", entity, id))
            }
            DbError::Constraint(msg) => ApiError::Conflict(msg),
            DbError::Conflict(msg) => ApiError::Conflict(msg),
            DbError::Serialization(msg) => ApiError::BadRequest(msg),
            err => ApiError::Database(err.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        ApiError::Validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Reference("x".into()).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::Conflict("x".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::DeliveryFailed.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_service_error_mapping() {
        let id = Uuid::new_v4();
        let err: ApiError = ServiceError::not_found("Agent", id).into();
        assert!(matches!(err, ApiError::NotFound(_)));

        let err: ApiError = ServiceError::reference("Playbook", id).into();
        assert!(matches!(err, ApiError::Reference(_)));

        let err: ApiError = ServiceError::Db(DbError::Conflict("race".into())).into();
        assert!(matches!(err, ApiError::Conflict(_)));
    }
}
