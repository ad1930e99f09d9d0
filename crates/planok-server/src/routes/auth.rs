//! Token Routes - JWT issuance, refresh and a caller echo

use axum::{extract::State, routing::{get, post}, Extension, Json, Router};

use crate::auth::{AuthUser, TokenType};
use crate::error::{ApiError, ApiResult};
use crate::models::{
    AccessTokenResponse, RefreshRequest, TokenRequest, TokenResponse, WhoAmIResponse,
};
use crate::AppState;

/// Obtain an access/refresh token pair
#[utoipa::path(
    post,
    path = "/api/v1/token",
    request_body = TokenRequest,
    responses(
        (status = 200, description = "Token pair issued", body = TokenResponse),
        (status = 401, description = "Invalid credentials or inactive account")
    ),
    tag = "Auth"
)]
pub async fn obtain_token(
    State(state): State<AppState>,
    Json(payload): Json<TokenRequest>,
) -> ApiResult<Json<TokenResponse>> {
    let user = state
        .user_service
        .authenticate(&payload.email, &payload.password)
        .await?
        .ok_or_else(|| {
            tracing::info!(email = %payload.email, "Login refused");
            ApiError::unauthorized("No active account found with the given credentials")
        })?;

    let pair = state.tokens.issue_pair(&user)?;
    tracing::info!(user_id = %user.id, "Issued token pair");

    Ok(Json(TokenResponse {
        access: pair.access,
        refresh: pair.refresh,
    }))
}

/// Exchange a refresh token for a new access token
#[utoipa::path(
    post,
    path = "/api/v1/token/refresh",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "New access token", body = AccessTokenResponse),
        (status = 401, description = "Invalid or expired refresh token")
    ),
    tag = "Auth"
)]
pub async fn refresh_token(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> ApiResult<Json<AccessTokenResponse>> {
    let claims = state.tokens.verify(&payload.refresh, TokenType::Refresh)?;
    let caller = AuthUser::try_from(claims)?;

    // The account may have been deactivated since the refresh token was issued
    let user = state
        .user_service
        .get_by_id(caller.id)
        .await?
        .filter(|user| user.is_active)
        .ok_or_else(|| ApiError::unauthorized("User not found or inactive"))?;

    Ok(Json(AccessTokenResponse {
        access: state.tokens.issue(&user, TokenType::Access)?,
    }))
}

/// Echo the authenticated caller
#[utoipa::path(
    get,
    path = "/api/v1/test-token",
    responses(
        (status = 200, description = "Token is valid", body = WhoAmIResponse),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer" = [])),
    tag = "Auth"
)]
pub async fn test_token(Extension(caller): Extension<AuthUser>) -> Json<WhoAmIResponse> {
    Json(WhoAmIResponse {
        message: "Token is valid".to_string(),
        user_id: caller.id,
        email: caller.email,
        role: caller.role.to_string(),
    })
}

/// Routes that must be reachable without a token
pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/token", post(obtain_token))
        .route("/api/v1/token/refresh", post(refresh_token))
        .route("/api/v2/token", post(obtain_token))
        .route("/api/v2/token/refresh", post(refresh_token))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/v1/test-token", get(test_token))
}
