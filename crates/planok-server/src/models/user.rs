//! User DTOs (v1 and v2 representations)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use planok::{Input, User, UserStatistics};

/// Create user request (v1)
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    pub rut: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: Option<String>,
    /// `Administrador` or `Cliente` (default)
    pub role: Option<String>,
    pub phone: Option<String>,
}

/// Create user request (v2); both passwords are required and must match
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateUserV2Request {
    pub rut: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub password_confirm: String,
    pub role: Option<String>,
    pub phone: Option<String>,
}

/// Update user request; absent fields are left unchanged
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    pub rut: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
    pub phone: Option<String>,
}

/// Password change; the caller must know the current password
#[derive(Debug, Deserialize, ToSchema)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// User (v1)
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub rut: String,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            rut: user.rut,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            role: user.role.to_string(),
            phone: user.phone,
            created_at: user.created_at,
        }
    }
}

/// User (v2)
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserV2Response {
    pub id: Uuid,
    pub rut: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub role: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
    /// `dd/mm/YYYY HH:MM`
    pub last_login_formatted: Option<String>,
    /// Units assigned to the user (clients only)
    pub projects_count: usize,
}

impl UserV2Response {
    pub fn new(user: User, projects_count: usize) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name(),
            last_login_formatted: user
                .last_login
                .map(|at| at.format("%d/%m/%Y %H:%M").to_string()),
            rut: user.rut,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            role: user.role.to_string(),
            is_active: user.is_active,
            created_at: user.created_at,
            last_login: user.last_login,
            projects_count,
        }
    }
}

/// User statistics (v2)
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserStatisticsResponse {
    pub total_usuarios: usize,
    pub total_activos: usize,
    pub total_clientes: usize,
    pub total_administradores: usize,
    pub porcentaje_activos: f64,
}

impl From<UserStatistics> for UserStatisticsResponse {
    fn from(stats: UserStatistics) -> Self {
        Self {
            total_usuarios: stats.total,
            total_activos: stats.active,
            total_clientes: stats.clients,
            total_administradores: stats.administrators,
            porcentaje_activos: stats.active_percentage,
        }
    }
}

/// Plain message body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DetailResponse {
    pub detail: String,
}

/// User listing filters
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct UserListQuery {
    pub role: Option<String>,
    pub is_active: Option<bool>,
    /// Matches RUT, email, first or last name
    pub search: Option<String>,
}

/// Advanced user search (v2)
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct UserSearchQuery {
    pub role: Option<String>,
    pub is_active: Option<bool>,
    pub created_after: Option<DateTime<Utc>>,
    pub created_before: Option<DateTime<Utc>>,
    /// Free-text term
    pub q: Option<String>,
}

/// Hard or soft delete (v2)
#[derive(Debug, Deserialize, IntoParams)]
pub struct DeleteUserQuery {
    /// Defaults to true: the user is deactivated instead of removed
    pub soft_delete: Option<bool>,
}

/// Stored user as validator input, for merging partial updates
pub fn user_input(user: &User) -> Input {
    let mut input = Input::new();
    input.insert("rut".into(), json!(user.rut));
    input.insert("email".into(), json!(user.email));
    input.insert("first_name".into(), json!(user.first_name));
    input.insert("last_name".into(), json!(user.last_name));
    input.insert("role".into(), json!(user.role.as_str()));
    input.insert(
        "phone".into(),
        user.phone.as_ref().map_or(Value::Null, |p| json!(p)),
    );
    input
}

