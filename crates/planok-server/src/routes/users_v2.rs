//! User Routes (v2)
//!
//! Richer representation (full name, formatted last login, unit count),
//! confirmed passwords on sign-up, soft delete and statistics.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Extension, Json, Router,
};
use serde_json::Value;
use uuid::Uuid;

use planok::{Role, User, UserFilter, UserValidator, Validator};

use super::users::{apply_user_update, find_user};
use super::{from_input, into_input};
use crate::application::NewUser;
use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::models::{
    ChangePasswordRequest, CreateUserV2Request, DeleteUserQuery, DetailResponse,
    UpdateUserRequest, UserListQuery, UserSearchQuery, UserStatisticsResponse, UserV2Response,
};
use crate::AppState;

/// List users
#[utoipa::path(
    get,
    path = "/api/v2/usuarios",
    params(UserListQuery),
    responses((status = 200, description = "List of users", body = Vec<UserV2Response>)),
    security(("bearer" = [])),
    tag = "Users v2"
)]
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<UserListQuery>,
) -> ApiResult<Json<Vec<UserV2Response>>> {
    let filter = UserFilter {
        role: parse_role(query.role.as_deref())?,
        is_active: query.is_active,
        search: query.search,
        ..Default::default()
    };
    let users = state.user_service.list(&filter).await?;
    Ok(Json(represent_all(&state, users).await?))
}

/// Register a user; `password_confirm` must match `password`
#[utoipa::path(
    post,
    path = "/api/v2/usuarios",
    request_body = CreateUserV2Request,
    responses(
        (status = 201, description = "User created", body = UserV2Response),
        (status = 400, description = "Validation failed or duplicate email/RUT")
    ),
    tag = "Users v2"
)]
pub async fn create_user(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> ApiResult<(StatusCode, Json<UserV2Response>)> {
    let input = into_input(body)?;
    let mut errors = UserValidator::with_required_password().validate(&input);
    match (input.get("password"), input.get("password_confirm")) {
        (_, None) | (_, Some(Value::Null)) => {
            errors.add("password_confirm", "Password confirmation is required")
        }
        (password, Some(confirm)) if password != Some(confirm) => {
            errors.add("password_confirm", "Passwords do not match")
        }
        _ => {}
    }
    errors.into_result()?;

    let request: CreateUserV2Request = from_input(input)?;
    let user = state
        .user_service
        .create(NewUser {
            rut: request.rut,
            email: request.email,
            first_name: request.first_name,
            last_name: request.last_name,
            role: request.role,
            phone: request.phone,
            password: Some(request.password),
            username: None,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(UserV2Response::new(user, 0))))
}

/// Get a user by ID
#[utoipa::path(
    get,
    path = "/api/v2/usuarios/{id}",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User found", body = UserV2Response),
        (status = 404, description = "User not found")
    ),
    security(("bearer" = [])),
    tag = "Users v2"
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<UserV2Response>> {
    let user = find_user(&state, id).await?;
    Ok(Json(represent(&state, user).await?))
}

/// Update a user (partial)
#[utoipa::path(
    put,
    path = "/api/v2/usuarios/{id}",
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserV2Response),
        (status = 400, description = "Validation failed"),
        (status = 403, description = "Administrator required"),
        (status = 404, description = "User not found")
    ),
    security(("bearer" = [])),
    tag = "Users v2"
)]
pub async fn update_user(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(body): Json<Value>,
) -> ApiResult<Json<UserV2Response>> {
    caller.require_admin()?;
    let user = apply_user_update(&state, id, body).await?;
    Ok(Json(represent(&state, user).await?))
}

/// Deactivate (default) or remove a user
#[utoipa::path(
    delete,
    path = "/api/v2/usuarios/{id}",
    params(
        ("id" = Uuid, Path, description = "User ID"),
        DeleteUserQuery
    ),
    responses(
        (status = 200, description = "User marked as inactive", body = DetailResponse),
        (status = 204, description = "User removed"),
        (status = 403, description = "Administrator required"),
        (status = 404, description = "User not found")
    ),
    security(("bearer" = [])),
    tag = "Users v2"
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Query(query): Query<DeleteUserQuery>,
) -> ApiResult<Response> {
    caller.require_admin()?;
    let user = find_user(&state, id).await?;

    if query.soft_delete.unwrap_or(true) {
        if user.is_active {
            state.user_service.deactivate(id).await?;
        }
        let detail = DetailResponse {
            detail: "User marked as inactive".to_string(),
        };
        return Ok(Json(detail).into_response());
    }

    state.user_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

/// List active clients
#[utoipa::path(
    get,
    path = "/api/v2/usuarios/clientes",
    responses((status = 200, description = "Active users with the Cliente role", body = Vec<UserV2Response>)),
    security(("bearer" = [])),
    tag = "Users v2"
)]
pub async fn list_clients(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<UserV2Response>>> {
    list_active_with_role(&state, Role::Client).await
}

/// List active administrators
#[utoipa::path(
    get,
    path = "/api/v2/usuarios/administradores",
    responses((status = 200, description = "Active users with the Administrador role", body = Vec<UserV2Response>)),
    security(("bearer" = [])),
    tag = "Users v2"
)]
pub async fn list_administrators(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<UserV2Response>>> {
    list_active_with_role(&state, Role::Administrator).await
}

/// User statistics
#[utoipa::path(
    get,
    path = "/api/v2/usuarios/estadisticas",
    responses((status = 200, description = "User statistics", body = UserStatisticsResponse)),
    security(("bearer" = [])),
    tag = "Users v2"
)]
pub async fn statistics(State(state): State<AppState>) -> ApiResult<Json<UserStatisticsResponse>> {
    Ok(Json(state.user_service.statistics().await?.into()))
}

/// Reactivate a user
#[utoipa::path(
    post,
    path = "/api/v2/usuarios/{id}/activar",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User activated", body = UserV2Response),
        (status = 400, description = "The user is already active"),
        (status = 403, description = "Administrator required"),
        (status = 404, description = "User not found")
    ),
    security(("bearer" = [])),
    tag = "Users v2"
)]
pub async fn activate(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<UserV2Response>> {
    caller.require_admin()?;
    let user = state.user_service.activate(id).await?;
    Ok(Json(represent(&state, user).await?))
}

/// Deactivate a user
#[utoipa::path(
    post,
    path = "/api/v2/usuarios/{id}/desactivar",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deactivated", body = UserV2Response),
        (status = 400, description = "The user is already inactive"),
        (status = 403, description = "Administrator required"),
        (status = 404, description = "User not found")
    ),
    security(("bearer" = [])),
    tag = "Users v2"
)]
pub async fn deactivate(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<UserV2Response>> {
    caller.require_admin()?;
    let user = state.user_service.deactivate(id).await?;
    Ok(Json(represent(&state, user).await?))
}

/// Change one's own password
#[utoipa::path(
    post,
    path = "/api/v2/usuarios/{id}/cambiar_password",
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = DetailResponse),
        (status = 400, description = "Wrong current password or weak new password"),
        (status = 403, description = "Not the caller's account")
    ),
    security(("bearer" = [])),
    tag = "Users v2"
)]
pub async fn change_password(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ChangePasswordRequest>,
) -> ApiResult<Json<DetailResponse>> {
    if caller.id != id {
        return Err(ApiError::forbidden());
    }

    let changed = state
        .user_service
        .change_password(id, &payload.current_password, &payload.new_password)
        .await?;
    if !changed {
        return Err(ApiError::field(
            "current_password",
            "Current password is incorrect",
        ));
    }

    Ok(Json(DetailResponse {
        detail: "Password changed".to_string(),
    }))
}

/// Search by role, activity, creation window and free text
#[utoipa::path(
    get,
    path = "/api/v2/usuarios/busqueda_avanzada",
    params(UserSearchQuery),
    responses(
        (status = 200, description = "Matching users", body = Vec<UserV2Response>),
        (status = 400, description = "Invalid role filter")
    ),
    security(("bearer" = [])),
    tag = "Users v2"
)]
pub async fn advanced_search(
    State(state): State<AppState>,
    Query(query): Query<UserSearchQuery>,
) -> ApiResult<Json<Vec<UserV2Response>>> {
    let filter = UserFilter {
        role: parse_role(query.role.as_deref())?,
        is_active: query.is_active,
        search: query.q,
        created_after: query.created_after,
        created_before: query.created_before,
    };
    let users = state.user_service.list(&filter).await?;
    Ok(Json(represent_all(&state, users).await?))
}

async fn list_active_with_role(
    state: &AppState,
    role: Role,
) -> ApiResult<Json<Vec<UserV2Response>>> {
    let filter = UserFilter {
        is_active: Some(true),
        ..UserFilter::by_role(role)
    };
    let users = state.user_service.list(&filter).await?;
    Ok(Json(represent_all(state, users).await?))
}

fn parse_role(role: Option<&str>) -> ApiResult<Option<Role>> {
    role.map(str::parse::<Role>)
        .transpose()
        .map_err(ApiError::BadRequest)
}

async fn represent(state: &AppState, user: User) -> ApiResult<UserV2Response> {
    let units = if user.is_client() {
        state.unit_service.by_client(user.id).await?.len()
    } else {
        0
    };
    Ok(UserV2Response::new(user, units))
}

async fn represent_all(state: &AppState, users: Vec<User>) -> ApiResult<Vec<UserV2Response>> {
    let mut responses = Vec::with_capacity(users.len());
    for user in users {
        responses.push(represent(state, user).await?);
    }
    Ok(responses)
}

pub fn public_router() -> Router<AppState> {
    Router::new().route("/api/v2/usuarios", post(create_user))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/v2/usuarios", get(list_users))
        .route("/api/v2/usuarios/clientes", get(list_clients))
        .route("/api/v2/usuarios/administradores", get(list_administrators))
        .route("/api/v2/usuarios/estadisticas", get(statistics))
        .route("/api/v2/usuarios/busqueda_avanzada", get(advanced_search))
        .route(
            "/api/v2/usuarios/:id",
            get(get_user)
                .put(update_user)
                .patch(update_user)
                .delete(delete_user),
        )
        .route("/api/v2/usuarios/:id/activar", post(activate))
        .route("/api/v2/usuarios/:id/desactivar", post(deactivate))
        .route(
            "/api/v2/usuarios/:id/cambiar_password",
            post(change_password),
        )
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use super::super::test_support::TestApp;

    fn registration() -> serde_json::Value {
        json!({
            "rut": "12345678-9",
            "email": "v2@example.com",
            "first_name": "Ana",
            "last_name": "Rojas",
            "password": "Password123",
            "password_confirm": "Password123"
        })
    }

    #[tokio::test]
    async fn test_register_requires_matching_passwords() {
        let app = TestApp::new();

        let mut body = registration();
        body["password_confirm"] = json!("Password124");
        let (status, errors) = app.send("POST", "/api/v2/usuarios", None, Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(errors["password_confirm"].is_array());

        let mut body = registration();
        body.as_object_mut().unwrap().remove("password");
        let (status, errors) = app.send("POST", "/api/v2/usuarios", None, Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(errors["password"].is_array());

        let (status, user) = app
            .send("POST", "/api/v2/usuarios", None, Some(registration()))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(user["full_name"], "Ana Rojas");
        assert_eq!(user["projects_count"], 0);
        assert_eq!(user["is_active"], true);
    }

    #[tokio::test]
    async fn test_soft_and_hard_delete() {
        let app = TestApp::new();
        let (_, token) = app.admin().await;
        let (client, _) = app.client().await;
        let uri = format!("/api/v2/usuarios/{}", client.id);

        let (status, body) = app.send("DELETE", &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["detail"], "User marked as inactive");

        let (status, body) = app.send("GET", &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["is_active"], false);

        let (status, _) = app
            .send("DELETE", &format!("{}?soft_delete=false", uri), Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = app.send("GET", &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_activation_toggle() {
        let app = TestApp::new();
        let (_, token) = app.admin().await;
        let (client, _) = app.client().await;

        let (status, body) = app
            .send("POST", &format!("/api/v2/usuarios/{}/activar", client.id), Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("already active"));

        let (status, body) = app
            .send("POST", &format!("/api/v2/usuarios/{}/desactivar", client.id), Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["is_active"], false);

        let (_, body) = app
            .send("GET", "/api/v2/usuarios/clientes", Some(&token), None)
            .await;
        assert!(body.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_statistics() {
        let app = TestApp::new();
        let (_, token) = app.admin().await;
        app.client().await;

        let (status, body) = app
            .send("GET", "/api/v2/usuarios/estadisticas", Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_usuarios"], 2);
        assert_eq!(body["total_clientes"], 1);
        assert_eq!(body["total_administradores"], 1);
        assert_eq!(body["porcentaje_activos"], 100.0);
    }

    #[tokio::test]
    async fn test_change_own_password() {
        let app = TestApp::new();
        let (client, token) = app.client().await;
        let (admin, _) = app.admin().await;
        let uri = format!("/api/v2/usuarios/{}/cambiar_password", client.id);

        let (status, body) = app
            .send(
                "POST",
                &uri,
                Some(&token),
                Some(json!({"current_password": "Wrong1234", "new_password": "Newpass123"})),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["current_password"].is_array());

        let (status, _) = app
            .send(
                "POST",
                &uri,
                Some(&token),
                Some(json!({"current_password": "Password123", "new_password": "weak"})),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = app
            .send(
                "POST",
                &uri,
                Some(&token),
                Some(json!({"current_password": "Password123", "new_password": "Newpass123"})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = app
            .send(
                "POST",
                "/api/v2/token",
                None,
                Some(json!({"email": "client@example.com", "password": "Newpass123"})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);

        // Someone else's account is off limits
        let (status, _) = app
            .send(
                "POST",
                &format!("/api/v2/usuarios/{}/cambiar_password", admin.id),
                Some(&token),
                Some(json!({"current_password": "Password123", "new_password": "Newpass123"})),
            )
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_advanced_search() {
        let app = TestApp::new();
        let (_, token) = app.admin().await;
        app.client().await;

        let (status, body) = app
            .send(
                "GET",
                "/api/v2/usuarios/busqueda_avanzada?role=Cliente&q=client",
                Some(&token),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);

        let (status, _) = app
            .send(
                "GET",
                "/api/v2/usuarios/busqueda_avanzada?role=Vendedor",
                Some(&token),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
