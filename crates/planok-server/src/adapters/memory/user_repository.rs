//! In-memory implementation of UserRepository

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use planok::{DomainError, User, UserFilter, UserRepository};

#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_rut(&self, rut: &str) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.rut == rut).cloned())
    }

    async fn list(&self, filter: &UserFilter) -> Result<Vec<User>, DomainError> {
        let users = self.users.read().await;
        let mut result: Vec<User> = users
            .values()
            .filter(|u| filter.matches(u))
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(result)
    }

    async fn save(&self, user: &User) -> Result<User, DomainError> {
        let mut users = self.users.write().await;
        let duplicate = users.values().any(|u| {
            u.id != user.id
                && (u.email == user.email || u.rut == user.rut || u.username == user.username)
        });
        if duplicate {
            return Err(DomainError::Conflict(
                "A user with this email, RUT or username already exists".to_string(),
            ));
        }
        users.insert(user.id, user.clone());
        Ok(user.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        Ok(self.users.write().await.remove(&id).is_some())
    }
}
