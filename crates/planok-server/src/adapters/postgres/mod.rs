//! PostgreSQL Repository Implementations

mod project_repository;
mod unit_repository;
mod user_repository;

pub use project_repository::PgProjectRepository;
pub use unit_repository::PgUnitRepository;
pub use user_repository::PgUserRepository;

use planok::DomainError;

/// Map a sqlx error, turning unique violations into conflicts
pub(crate) fn map_sqlx_error(e: sqlx::Error, conflict_message: &str) -> DomainError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            DomainError::Conflict(conflict_message.to_string())
        }
        _ => DomainError::Repository(e.to_string()),
    }
}

/// Parse an enum column stored as its wire value
pub(crate) fn parse_column<T>(column: &str, value: &str) -> Result<T, DomainError>
where
    T: std::str::FromStr<Err = String>,
{
    value
        .parse()
        .map_err(|e: String| DomainError::Repository(format!("column {}: {}", column, e)))
}
