//! JWT authentication
//!
//! Access and refresh tokens are HS256 JWTs. The middleware accepts only
//! access tokens and puts the caller's [`AuthUser`] into request extensions.

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use planok::{Role, User};

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // User ID
    pub email: String,
    pub role: Role,
    pub token_type: TokenType,
    pub exp: i64,
    pub iat: i64,
}

/// Authenticated caller, available to handlers as `Extension<AuthUser>`
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    pub fn require_admin(&self) -> Result<(), ApiError> {
        if self.is_admin() {
            Ok(())
        } else {
            tracing::warn!(user_id = %self.id, "Admin action refused");
            Err(ApiError::forbidden())
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Issues and verifies tokens
pub struct TokenService {
    secret: String,
    access_ttl_secs: i64,
    refresh_ttl_secs: i64,
}

impl TokenService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            secret: config.jwt_secret.clone(),
            access_ttl_secs: config.access_token_ttl_secs,
            refresh_ttl_secs: config.refresh_token_ttl_secs,
        }
    }

    pub fn issue_pair(&self, user: &User) -> Result<TokenPair, ApiError> {
        Ok(TokenPair {
            access: self.issue(user, TokenType::Access)?,
            refresh: self.issue(user, TokenType::Refresh)?,
        })
    }

    pub fn issue(&self, user: &User, token_type: TokenType) -> Result<String, ApiError> {
        let ttl = match token_type {
            TokenType::Access => self.access_ttl_secs,
            TokenType::Refresh => self.refresh_ttl_secs,
        };
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            role: user.role,
            token_type,
            exp: (now + Duration::seconds(ttl)).timestamp(),
            iat: now.timestamp(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| ApiError::Internal(format!("token encoding failed: {}", e)))
    }

    /// Verify signature and expiry, and that the token is of the expected kind
    pub fn verify(&self, token: &str, expected: TokenType) -> Result<Claims, ApiError> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .map_err(|e| {
            tracing::debug!("JWT verification failed: {}", e);
            ApiError::unauthorized("Invalid or expired token")
        })?;

        if data.claims.token_type != expected {
            return Err(ApiError::unauthorized("Wrong token type"));
        }
        Ok(data.claims)
    }
}

impl TryFrom<Claims> for AuthUser {
    type Error = ApiError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&claims.sub)
            .map_err(|_| ApiError::unauthorized("Invalid token subject"))?;
        Ok(Self {
            id,
            email: claims.email,
            role: claims.role,
        })
    }
}

/// Extract the bearer token from the Authorization header
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "))
}

/// Require a valid access token
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = bearer_token(request.headers()) else {
        return ApiError::unauthorized("Authentication credentials were not provided")
            .into_response();
    };

    let user = match state
        .tokens
        .verify(token, TokenType::Access)
        .and_then(AuthUser::try_from)
    {
        Ok(user) => user,
        Err(e) => {
            tracing::warn!("Rejected request: {}", e);
            return e.into_response();
        }
    };

    request.extensions_mut().insert(user);
    next.run(request).await
}
