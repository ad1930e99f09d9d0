//! In-memory Repository Implementations
//!
//! Mirror the PostgreSQL constraints (unique keys, cascade on project
//! delete) closely enough for service and router tests.

mod project_repository;
mod unit_repository;
mod user_repository;

pub use project_repository::InMemoryProjectRepository;
pub use unit_repository::InMemoryUnitRepository;
pub use user_repository::InMemoryUserRepository;
