//! HTTP error mapping
//!
//! Response shapes:
//! - field validation: 400 `{"field": ["message", ...]}`
//! - single-message failures: 400 `{"error": "message"}`
//! - business rules: 400 `{"error": {"code": "...", "message": "..."}}`
//! - 401 / 403 / 404 / 500: `{"error": "message"}`

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use planok::{DomainError, ValidationErrors};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(ValidationErrors),

    #[error("{0}")]
    BadRequest(String),

    #[error("{code}: {message}")]
    BusinessRule { code: &'static str, message: String },

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    pub fn forbidden() -> Self {
        Self::Forbidden("You do not have permission to perform this action".to_string())
    }

    /// Field-scoped error for a single field
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        let mut errors = ValidationErrors::new();
        errors.add(field, message);
        Self::Validation(errors)
    }
}

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::InvalidInput(errors) => ApiError::Validation(errors),
            DomainError::NotFound { entity_type, .. } => {
                ApiError::NotFound(format!("{} not found", entity_type))
            }
            DomainError::Validation(message) | DomainError::Conflict(message) => {
                ApiError::BadRequest(message)
            }
            DomainError::Repository(message) => ApiError::Internal(message),
            rule => ApiError::BusinessRule {
                code: rule.code(),
                message: rule.to_string(),
            },
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::Validation(errors)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(errors) => (StatusCode::BAD_REQUEST, Json(errors)).into_response(),
            ApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
            }
            ApiError::BusinessRule { code, message } => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": { "code": code, "message": message } })),
            )
                .into_response(),
            ApiError::NotFound(message) => {
                (StatusCode::NOT_FOUND, Json(json!({ "error": message }))).into_response()
            }
            ApiError::Unauthorized(message) => {
                (StatusCode::UNAUTHORIZED, Json(json!({ "error": message }))).into_response()
            }
            ApiError::Forbidden(message) => {
                (StatusCode::FORBIDDEN, Json(json!({ "error": message }))).into_response()
            }
            ApiError::Internal(message) => {
                tracing::error!("Internal error: {}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Internal server error" })),
                )
                    .into_response()
            }
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
