//! User - Client or administrator account

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::Role;

/// User account
///
/// `password_hash` never leaves the process; it is skipped on serialization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: Uuid,
    /// Chilean national ID (`12345678-9`), unique
    pub rut: String,
    /// Unique, used as login
    pub email: String,
    /// Unique, defaults to the email
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub phone: Option<String>,
    #[serde(skip_serializing, default)]
    pub password_hash: Option<String>,
    pub is_active: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create an active user with generated ID and timestamp
    pub fn new(
        rut: String,
        email: String,
        first_name: String,
        last_name: String,
        role: Role,
        phone: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            rut,
            username: email.clone(),
            email,
            first_name,
            last_name,
            role,
            phone,
            password_hash: None,
            is_active: true,
            last_login: None,
            created_at: Utc::now(),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    pub fn is_client(&self) -> bool {
        self.role == Role::Client
    }
}

impl std::fmt::Display for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.first_name, self.last_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_defaults() {
        let user = User::new(
            "12345678-9".to_string(),
            "ana@example.com".to_string(),
            "Ana".to_string(),
            "Pérez".to_string(),
            Role::Client,
            None,
        );

        assert_eq!(user.username, "ana@example.com");
        assert!(user.is_active);
        assert!(user.is_client());
        assert_eq!(user.full_name(), "Ana Pérez");
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let mut user = User::new(
            "12345678-9".to_string(),
            "ana@example.com".to_string(),
            "Ana".to_string(),
            "Pérez".to_string(),
            Role::Administrator,
            None,
        );
        user.password_hash = Some("$argon2id$secret".to_string());

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("secret"));
        assert!(json.contains("\"Administrador\""));
    }
}
