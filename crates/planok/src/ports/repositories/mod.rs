//! Repository Ports
//!
//! Abstract interfaces for data persistence operations.

mod project_repository;
mod unit_repository;
mod user_repository;

pub use project_repository::*;
pub use unit_repository::*;
pub use user_repository::*;

/// Case-insensitive substring match
pub(crate) fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
