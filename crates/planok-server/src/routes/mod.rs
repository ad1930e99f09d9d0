//! PlanOk API Routes
//!
//! - /api/v1/token - Token issuance and refresh
//! - /api/v1/usuarios - Users (v1 representation)
//! - /api/v1/proyectos - Real-estate projects
//! - /api/v1/unidades - Property units and the sales flow
//! - /api/v2/usuarios - Users (v2 representation, soft delete, statistics)

pub mod auth;
pub mod projects;
pub mod swagger;
pub mod units;
pub mod users;
pub mod users_v2;

use serde::de::DeserializeOwned;
use serde_json::Value;

use planok::Input;

use crate::error::{ApiError, ApiResult};

/// Request body as a field map for the validators
pub(crate) fn into_input(body: Value) -> ApiResult<Input> {
    match body {
        Value::Object(map) => Ok(map),
        _ => Err(ApiError::bad_request("Request body must be a JSON object")),
    }
}

/// Typed view of an already validated field map
pub(crate) fn from_input<T: DeserializeOwned>(input: Input) -> ApiResult<T> {
    serde_json::from_value(Value::Object(input)).map_err(|e| ApiError::bad_request(e.to_string()))
}

/// Stored values overlaid with the submitted ones
pub(crate) fn merge_input(mut base: Input, changes: &Input) -> Input {
    for (key, value) in changes {
        base.insert(key.clone(), value.clone());
    }
    base
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
        Router,
    };
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt; // For oneshot()

    use planok::{Role, User};

    use crate::adapters::memory::{
        InMemoryProjectRepository, InMemoryUnitRepository, InMemoryUserRepository,
    };
    use crate::adapters::Argon2PasswordHasher;
    use crate::application::NewUser;
    use crate::auth::TokenType;
    use crate::config::AppConfig;
    use crate::{build_router, AppState};

    pub struct TestApp {
        pub state: AppState,
        pub router: Router,
    }

    impl TestApp {
        pub fn new() -> Self {
            let units = InMemoryUnitRepository::new();
            let projects = InMemoryProjectRepository::with_units(units.clone());
            let state = AppState::new(
                Arc::new(InMemoryUserRepository::new()),
                Arc::new(projects),
                Arc::new(units),
                Arc::new(Argon2PasswordHasher::new()),
                &AppConfig::with_secret("test-secret"),
            );
            Self {
                router: build_router(state.clone()),
                state,
            }
        }

        /// Create a user and an access token for it
        pub async fn user_with_token(&self, role: Role, rut: &str, email: &str) -> (User, String) {
            let user = self
                .state
                .user_service
                .create(NewUser {
                    rut: rut.to_string(),
                    email: email.to_string(),
                    first_name: "Test".to_string(),
                    last_name: "User".to_string(),
                    role: Some(role.as_str().to_string()),
                    password: Some("Password123".to_string()),
                    ..Default::default()
                })
                .await
                .unwrap();
            let token = self.state.tokens.issue(&user, TokenType::Access).unwrap();
            (user, token)
        }

        pub async fn admin(&self) -> (User, String) {
            self.user_with_token(Role::Administrator, "11111111-1", "admin@example.com")
                .await
        }

        pub async fn client(&self) -> (User, String) {
            self.user_with_token(Role::Client, "22222222-2", "client@example.com")
                .await
        }

        pub async fn send(
            &self,
            method: &str,
            uri: &str,
            token: Option<&str>,
            body: Option<Value>,
        ) -> (StatusCode, Value) {
            let mut builder = Request::builder().method(method).uri(uri);
            if let Some(token) = token {
                builder = builder.header("authorization", format!("Bearer {}", token));
            }
            let request = match body {
                Some(body) => builder
                    .header("content-type", "application/json")
                    .body(Body::from(serde_json::to_vec(&body).unwrap()))
                    .unwrap(),
                None => builder.body(Body::empty()).unwrap(),
            };

            let response = self.router.clone().oneshot(request).await.unwrap();
            let status = response.status();
            let bytes = response.into_body().collect().await.unwrap().to_bytes();
            let json = if bytes.is_empty() {
                Value::Null
            } else {
                serde_json::from_slice(&bytes).unwrap()
            };
            (status, json)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_merge_input_overrides() {
        let base = into_input(json!({"nombre": "Viejo", "ubicacion": "Santiago"})).unwrap();
        let changes = into_input(json!({"nombre": "Nuevo"})).unwrap();

        let merged = merge_input(base, &changes);
        assert_eq!(merged["nombre"], "Nuevo");
        assert_eq!(merged["ubicacion"], "Santiago");
    }

    #[test]
    fn test_non_object_body() {
        assert!(into_input(json!([1, 2])).is_err());
    }
}
