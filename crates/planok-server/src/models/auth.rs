//! Token endpoint DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Obtain token pair request
#[derive(Debug, Deserialize, ToSchema)]
pub struct TokenRequest {
    pub email: String,
    pub password: String,
}

/// Refresh request
#[derive(Debug, Deserialize, ToSchema)]
pub struct RefreshRequest {
    pub refresh: String,
}

/// Access/refresh token pair
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub access: String,
    pub refresh: String,
}

/// New access token
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AccessTokenResponse {
    pub access: String,
}

/// Echo of the authenticated caller
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct WhoAmIResponse {
    pub message: String,
    pub user_id: Uuid,
    pub email: String,
    pub role: String,
}
