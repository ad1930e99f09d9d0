//! User Application Service (Use Case)
//!
//! Uniqueness of email and RUT, password hashing, activation and
//! credential checks.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use planok::domain::check_password_strength;
use planok::{
    DomainError, PasswordHasher, Role, User, UserFilter, UserRepository, UserStatistics,
};

/// Fields for a new user; already shape-validated by the caller
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub rut: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Option<String>,
    pub phone: Option<String>,
    pub password: Option<String>,
    pub username: Option<String>,
}

/// Partial user update
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub rut: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<String>,
    pub phone: Option<String>,
    pub password: Option<String>,
}

/// Application service for User operations
pub struct UserService<R: UserRepository + ?Sized> {
    repo: Arc<R>,
    hasher: Arc<dyn PasswordHasher>,
}

impl<R: UserRepository + ?Sized> UserService<R> {
    pub fn new(repo: Arc<R>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { repo, hasher }
    }

    /// Create a user, rejecting duplicate email or RUT
    pub async fn create(&self, input: NewUser) -> Result<User, DomainError> {
        if self.repo.find_by_email(&input.email).await?.is_some() {
            return Err(DomainError::Conflict(
                "A user with this email already exists".to_string(),
            ));
        }
        if self.repo.find_by_rut(&input.rut).await?.is_some() {
            return Err(DomainError::Conflict(
                "A user with this RUT already exists".to_string(),
            ));
        }
        let role = parse_role(input.role.as_deref())?.unwrap_or_default();

        let mut user = User::new(
            input.rut,
            input.email,
            input.first_name,
            input.last_name,
            role,
            input.phone,
        );
        if let Some(username) = input.username {
            user.username = username;
        }
        if let Some(password) = input.password.as_deref() {
            user.password_hash = Some(self.hasher.hash(password)?);
        }

        let saved = self.repo.save(&user).await?;
        tracing::info!(user_id = %saved.id, role = %saved.role, "Created user");
        Ok(saved)
    }

    /// Update a user; uniqueness checks ignore the user's own record
    pub async fn update(&self, id: Uuid, changes: UserChanges) -> Result<User, DomainError> {
        let mut user = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", id))?;

        if let Some(email) = changes.email {
            if let Some(other) = self.repo.find_by_email(&email).await? {
                if other.id != id {
                    return Err(DomainError::Conflict(
                        "A user with this email already exists".to_string(),
                    ));
                }
            }
            if user.username == user.email {
                user.username = email.clone();
            }
            user.email = email;
        }
        if let Some(rut) = changes.rut {
            if let Some(other) = self.repo.find_by_rut(&rut).await? {
                if other.id != id {
                    return Err(DomainError::Conflict(
                        "A user with this RUT already exists".to_string(),
                    ));
                }
            }
            user.rut = rut;
        }
        if let Some(role) = parse_role(changes.role.as_deref())? {
            user.role = role;
        }
        if let Some(first_name) = changes.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = changes.last_name {
            user.last_name = last_name;
        }
        if let Some(phone) = changes.phone {
            user.phone = Some(phone);
        }
        if let Some(password) = changes.password.as_deref() {
            user.password_hash = Some(self.hasher.hash(password)?);
        }

        let saved = self.repo.save(&user).await?;
        tracing::info!(user_id = %saved.id, "Updated user");
        Ok(saved)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        self.repo.find_by_id(id).await
    }

    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        self.repo.find_by_email(email).await
    }

    pub async fn get_by_rut(&self, rut: &str) -> Result<Option<User>, DomainError> {
        self.repo.find_by_rut(rut).await
    }

    pub async fn list(&self, filter: &UserFilter) -> Result<Vec<User>, DomainError> {
        self.repo.list(filter).await
    }

    pub async fn clients(&self) -> Result<Vec<User>, DomainError> {
        self.repo.list(&UserFilter::by_role(Role::Client)).await
    }

    pub async fn administrators(&self) -> Result<Vec<User>, DomainError> {
        self.repo.list(&UserFilter::by_role(Role::Administrator)).await
    }

    /// Hard delete
    pub async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let deleted = self.repo.delete(id).await?;
        if deleted {
            tracing::info!(user_id = %id, "Deleted user");
        }
        Ok(deleted)
    }

    pub async fn activate(&self, id: Uuid) -> Result<User, DomainError> {
        self.set_active(id, true).await
    }

    /// Soft delete
    pub async fn deactivate(&self, id: Uuid) -> Result<User, DomainError> {
        self.set_active(id, false).await
    }

    async fn set_active(&self, id: Uuid, active: bool) -> Result<User, DomainError> {
        let mut user = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", id))?;

        if user.is_active == active {
            let message = if active {
                "The user is already active"
            } else {
                "The user is already inactive"
            };
            return Err(DomainError::Validation(message.to_string()));
        }
        user.is_active = active;

        let saved = self.repo.save(&user).await?;
        tracing::info!(user_id = %id, active, "Changed user activation");
        Ok(saved)
    }

    /// Returns false for an unknown user or a wrong current password
    pub async fn change_password(
        &self,
        id: Uuid,
        current_password: &str,
        new_password: &str,
    ) -> Result<bool, DomainError> {
        let Some(mut user) = self.repo.find_by_id(id).await? else {
            return Ok(false);
        };
        if !self.password_matches(&user, current_password)? {
            return Ok(false);
        }
        check_password_strength(new_password)
            .map_err(|message| DomainError::Validation(message.to_string()))?;

        user.password_hash = Some(self.hasher.hash(new_password)?);
        self.repo.save(&user).await?;
        tracing::info!(user_id = %id, "Changed password");
        Ok(true)
    }

    /// Check credentials and record the login
    ///
    /// `None` for unknown email, wrong password or an inactive account.
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<User>, DomainError> {
        let Some(mut user) = self.repo.find_by_email(email).await? else {
            return Ok(None);
        };
        if !user.is_active || !self.password_matches(&user, password)? {
            return Ok(None);
        }

        user.last_login = Some(Utc::now());
        let saved = self.repo.save(&user).await?;
        Ok(Some(saved))
    }

    pub async fn statistics(&self) -> Result<UserStatistics, DomainError> {
        let users = self.repo.list(&UserFilter::default()).await?;
        Ok(UserStatistics::from_users(&users))
    }

    fn password_matches(&self, user: &User, password: &str) -> Result<bool, DomainError> {
        match user.password_hash.as_deref() {
            Some(hash) => self.hasher.verify(password, hash),
            None => Ok(false),
        }
    }
}

fn parse_role(role: Option<&str>) -> Result<Option<Role>, DomainError> {
    role.map(|r| r.parse::<Role>().map_err(DomainError::Validation))
        .transpose()
}
