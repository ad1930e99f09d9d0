//! User Repository Port
//!
//! Abstract interface for User persistence operations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::contains_ci;
use crate::domain::{errors::DomainError, Role, User};

/// Listing filter for users
#[derive(Debug, Default, Clone)]
pub struct UserFilter {
    pub role: Option<Role>,
    pub is_active: Option<bool>,
    /// Matches RUT, email, first or last name (case-insensitive)
    pub search: Option<String>,
    pub created_after: Option<DateTime<Utc>>,
    pub created_before: Option<DateTime<Utc>>,
}

impl UserFilter {
    pub fn by_role(role: Role) -> Self {
        Self {
            role: Some(role),
            ..Default::default()
        }
    }

    pub fn matches(&self, user: &User) -> bool {
        if self.role.is_some_and(|role| user.role != role) {
            return false;
        }
        if self.is_active.is_some_and(|active| user.is_active != active) {
            return false;
        }
        if let Some(term) = self.search.as_deref() {
            let hit = [&user.rut, &user.email, &user.first_name, &user.last_name]
                .iter()
                .any(|field| contains_ci(field, term));
            if !hit {
                return false;
            }
        }
        if self.created_after.is_some_and(|after| user.created_at < after) {
            return false;
        }
        if self.created_before.is_some_and(|before| user.created_at > before) {
            return false;
        }
        true
    }
}

/// Repository interface for User entities
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a User by ID
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError>;

    /// Find a User by email (exact match)
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Find a User by RUT
    async fn find_by_rut(&self, rut: &str) -> Result<Option<User>, DomainError>;

    /// List users matching the filter, newest first
    async fn list(&self, filter: &UserFilter) -> Result<Vec<User>, DomainError>;

    /// Save a User (insert or update)
    async fn save(&self, user: &User) -> Result<User, DomainError>;

    /// Delete a User by ID
    async fn delete(&self, id: Uuid) -> Result<bool, DomainError>;
}
