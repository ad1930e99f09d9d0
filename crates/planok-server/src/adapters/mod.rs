//! Infrastructure Adapters
//!
//! Implementations of domain ports for external systems.

#[cfg(test)]
pub mod memory;
pub mod password;
pub mod postgres;

// Re-exports
pub use password::Argon2PasswordHasher;
pub use postgres::{PgProjectRepository, PgUnitRepository, PgUserRepository};
