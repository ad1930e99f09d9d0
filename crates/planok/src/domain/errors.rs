//! Domain Errors
//!
//! Error types for domain operations.

use thiserror::Error;
use uuid::Uuid;

use crate::domain::validation::ValidationErrors;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    /// Field-scoped input failures, reported as a field → messages map
    #[error("Invalid input: {0}")]
    InvalidInput(ValidationErrors),

    #[error("{0}")]
    Validation(String),

    /// Uniqueness violations (email, RUT, project code, unit number)
    #[error("{0}")]
    Conflict(String),

    #[error("The unit is not available for this operation")]
    UnitNotAvailable,

    #[error("The client is not valid for this operation")]
    InvalidClient,

    #[error("The project is not valid for this operation")]
    InvalidProject,

    #[error("Repository error: {0}")]
    Repository(String),
}

impl DomainError {
    pub fn not_found<T: AsRef<str>>(entity_type: T, id: Uuid) -> Self {
        Self::NotFound {
            entity_type: entity_type.as_ref().to_string(),
            id: id.to_string(),
        }
    }

    pub fn not_found_str<T: AsRef<str>>(entity_type: T, id: &str) -> Self {
        Self::NotFound {
            entity_type: entity_type.as_ref().to_string(),
            id: id.to_string(),
        }
    }

    /// Machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::NotFound { .. } => "not_found",
            DomainError::InvalidInput(_) | DomainError::Validation(_) => "invalid",
            DomainError::Conflict(_) => "conflict",
            DomainError::UnitNotAvailable => "unidad_no_disponible",
            DomainError::InvalidClient => "cliente_no_valido",
            DomainError::InvalidProject => "proyecto_no_valido",
            DomainError::Repository(_) => "server_error",
        }
    }

    /// Named business-rule violations (unit lifecycle, client and project references)
    pub fn is_business_rule(&self) -> bool {
        matches!(
            self,
            DomainError::UnitNotAvailable | DomainError::InvalidClient | DomainError::InvalidProject
        )
    }
}

impl From<ValidationErrors> for DomainError {
    fn from(errors: ValidationErrors) -> Self {
        Self::InvalidInput(errors)
    }
}
