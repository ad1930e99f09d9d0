//! User Routes (v1)
//!
//! Registration is public; every other route requires a token and
//! mutations require an administrator.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use serde_json::Value;
use uuid::Uuid;

use planok::{Role, User, UserFilter, UserValidator, Validator};

use super::{from_input, into_input, merge_input};
use crate::application::{NewUser, UserChanges};
use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::models::{
    user_input, CreateUserRequest, UpdateUserRequest, UserListQuery, UserResponse,
};
use crate::AppState;

/// List users
#[utoipa::path(
    get,
    path = "/api/v1/usuarios",
    params(UserListQuery),
    responses(
        (status = 200, description = "List of users", body = Vec<UserResponse>),
        (status = 400, description = "Invalid role filter"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer" = [])),
    tag = "Users"
)]
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<UserListQuery>,
) -> ApiResult<Json<Vec<UserResponse>>> {
    let filter = UserFilter {
        role: query
            .role
            .as_deref()
            .map(str::parse::<Role>)
            .transpose()
            .map_err(ApiError::BadRequest)?,
        is_active: query.is_active,
        search: query.search,
        ..Default::default()
    };

    let users = state.user_service.list(&filter).await?;
    Ok(Json(users.into_iter().map(Into::into).collect()))
}

/// Register a user
#[utoipa::path(
    post,
    path = "/api/v1/usuarios",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Validation failed or duplicate email/RUT")
    ),
    tag = "Users"
)]
pub async fn create_user(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    let input = into_input(body)?;
    UserValidator::new().validate(&input).into_result()?;
    let request: CreateUserRequest = from_input(input)?;

    let user = state
        .user_service
        .create(NewUser {
            rut: request.rut,
            email: request.email,
            first_name: request.first_name,
            last_name: request.last_name,
            role: request.role,
            phone: request.phone,
            password: request.password,
            username: None,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Get a user by ID
#[utoipa::path(
    get,
    path = "/api/v1/usuarios/{id}",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 404, description = "User not found")
    ),
    security(("bearer" = [])),
    tag = "Users"
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<UserResponse>> {
    Ok(Json(find_user(&state, id).await?.into()))
}

/// Update a user (partial)
#[utoipa::path(
    put,
    path = "/api/v1/usuarios/{id}",
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Validation failed"),
        (status = 403, description = "Administrator required"),
        (status = 404, description = "User not found")
    ),
    security(("bearer" = [])),
    tag = "Users"
)]
pub async fn update_user(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(body): Json<Value>,
) -> ApiResult<Json<UserResponse>> {
    caller.require_admin()?;
    let user = apply_user_update(&state, id, body).await?;
    Ok(Json(user.into()))
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/api/v1/usuarios/{id}",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 403, description = "Administrator required"),
        (status = 404, description = "User not found")
    ),
    security(("bearer" = [])),
    tag = "Users"
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    caller.require_admin()?;
    if !state.user_service.delete(id).await? {
        return Err(ApiError::NotFound("User not found".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// List clients
#[utoipa::path(
    get,
    path = "/api/v1/usuarios/clientes",
    responses((status = 200, description = "Users with the Cliente role", body = Vec<UserResponse>)),
    security(("bearer" = [])),
    tag = "Users"
)]
pub async fn list_clients(State(state): State<AppState>) -> ApiResult<Json<Vec<UserResponse>>> {
    let users = state.user_service.clients().await?;
    Ok(Json(users.into_iter().map(Into::into).collect()))
}

/// List administrators
#[utoipa::path(
    get,
    path = "/api/v1/usuarios/administradores",
    responses((status = 200, description = "Users with the Administrador role", body = Vec<UserResponse>)),
    security(("bearer" = [])),
    tag = "Users"
)]
pub async fn list_administrators(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<UserResponse>>> {
    let users = state.user_service.administrators().await?;
    Ok(Json(users.into_iter().map(Into::into).collect()))
}

pub(crate) async fn find_user(state: &AppState, id: Uuid) -> ApiResult<User> {
    state
        .user_service
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))
}

/// Validate the merged record, then apply only the submitted fields
pub(crate) async fn apply_user_update(state: &AppState, id: Uuid, body: Value) -> ApiResult<User> {
    let user = find_user(state, id).await?;
    let changes = into_input(body)?;
    UserValidator::new()
        .validate(&merge_input(user_input(&user), &changes))
        .into_result()?;

    let request: UpdateUserRequest = from_input(changes)?;
    let updated = state
        .user_service
        .update(
            id,
            UserChanges {
                rut: request.rut,
                email: request.email,
                first_name: request.first_name,
                last_name: request.last_name,
                role: request.role,
                phone: request.phone,
                password: request.password,
            },
        )
        .await?;
    Ok(updated)
}

pub fn public_router() -> Router<AppState> {
    Router::new().route("/api/v1/usuarios", post(create_user))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/usuarios", get(list_users))
        .route("/api/v1/usuarios/clientes", get(list_clients))
        .route("/api/v1/usuarios/administradores", get(list_administrators))
        .route(
            "/api/v1/usuarios/:id",
            get(get_user)
                .put(update_user)
                .patch(update_user)
                .delete(delete_user),
        )
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use super::super::test_support::TestApp;
    use super::Role;

    fn registration() -> serde_json::Value {
        json!({
            "rut": "12345678-9",
            "email": "new@example.com",
            "first_name": "Ana",
            "last_name": "Rojas",
            "password": "Password123",
            "phone": "+56912345678"
        })
    }

    #[tokio::test]
    async fn test_register_is_public() {
        let app = TestApp::new();

        let (status, body) = app
            .send("POST", "/api/v1/usuarios", None, Some(registration()))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["role"], "Cliente");
        assert_eq!(body["username"], "new@example.com");
        assert!(body.get("password").is_none());
        assert!(body.get("password_hash").is_none());
    }

    #[tokio::test]
    async fn test_register_field_errors() {
        let app = TestApp::new();

        let (status, body) = app
            .send(
                "POST",
                "/api/v1/usuarios",
                None,
                Some(json!({"rut": "123", "email": "nope", "first_name": "A", "last_name": ""})),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["rut"].is_array());
        assert!(body["email"].is_array());
        assert!(body["first_name"].is_array());
        assert!(body["last_name"].is_array());
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let app = TestApp::new();
        app.send("POST", "/api/v1/usuarios", None, Some(registration()))
            .await;

        let mut again = registration();
        again["rut"] = json!("87654321-K");
        let (status, body) = app.send("POST", "/api/v1/usuarios", None, Some(again)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("email"));
    }

    #[tokio::test]
    async fn test_list_requires_token() {
        let app = TestApp::new();
        let (status, _) = app.send("GET", "/api/v1/usuarios", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_role_listings() {
        let app = TestApp::new();
        let (admin, token) = app.admin().await;
        app.client().await;

        let (status, body) = app
            .send("GET", "/api/v1/usuarios/administradores", Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["id"], admin.id.to_string());

        let (_, body) = app
            .send("GET", "/api/v1/usuarios/clientes", Some(&token), None)
            .await;
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["role"], "Cliente");

        let (_, body) = app
            .send("GET", "/api/v1/usuarios?role=Cliente", Some(&token), None)
            .await;
        assert_eq!(body.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_client_cannot_update() {
        let app = TestApp::new();
        let (client, token) = app.client().await;

        let (status, _) = app
            .send(
                "PATCH",
                &format!("/api/v1/usuarios/{}", client.id),
                Some(&token),
                Some(json!({"first_name": "Otro"})),
            )
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_admin_partial_update() {
        let app = TestApp::new();
        let (_, token) = app.admin().await;
        let (client, _) = app.client().await;

        let (status, body) = app
            .send(
                "PATCH",
                &format!("/api/v1/usuarios/{}", client.id),
                Some(&token),
                Some(json!({"first_name": "Carla", "role": Role::Administrator.as_str()})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["first_name"], "Carla");
        assert_eq!(body["last_name"], "User");
        assert_eq!(body["role"], "Administrador");

        let (status, body) = app
            .send(
                "PATCH",
                &format!("/api/v1/usuarios/{}", client.id),
                Some(&token),
                Some(json!({"email": "broken"})),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["email"].is_array());
    }

    #[tokio::test]
    async fn test_delete() {
        let app = TestApp::new();
        let (_, token) = app.admin().await;
        let (client, _) = app.client().await;
        let uri = format!("/api/v1/usuarios/{}", client.id);

        let (status, _) = app.send("DELETE", &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = app.send("DELETE", &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = app.send("GET", &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
