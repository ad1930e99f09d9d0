//! Project Routes
//!
//! Reads are open to any authenticated caller; writes require an administrator.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use serde_json::Value;
use uuid::Uuid;

use planok::{ProjectFilter, ProjectStatus, ProjectValidator, Validator};

use super::{from_input, into_input, merge_input};
use crate::application::{NewProject, ProjectChanges, ProjectSearch};
use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::models::{
    project_input, CreateProjectRequest, ProjectDetailResponse, ProjectListQuery,
    ProjectResponse, ProjectSearchQuery, ProjectStatisticsResponse, UpdateProjectRequest,
};
use crate::AppState;

/// List projects
#[utoipa::path(
    get,
    path = "/api/v1/proyectos",
    params(ProjectListQuery),
    responses(
        (status = 200, description = "List of projects", body = Vec<ProjectResponse>),
        (status = 400, description = "Invalid status filter")
    ),
    security(("bearer" = [])),
    tag = "Projects"
)]
pub async fn list_projects(
    State(state): State<AppState>,
    Query(query): Query<ProjectListQuery>,
) -> ApiResult<Json<Vec<ProjectResponse>>> {
    let filter = ProjectFilter {
        status: query
            .estado
            .as_deref()
            .map(str::parse::<ProjectStatus>)
            .transpose()
            .map_err(ApiError::BadRequest)?,
        name: query.nombre,
        location: query.ubicacion,
        code: query.codigo,
        ..Default::default()
    };

    let projects = state.project_service.list(&filter).await?;
    Ok(Json(projects.into_iter().map(Into::into).collect()))
}

/// Create a project
#[utoipa::path(
    post,
    path = "/api/v1/proyectos",
    request_body = CreateProjectRequest,
    responses(
        (status = 201, description = "Project created", body = ProjectResponse),
        (status = 400, description = "Validation failed or duplicate code"),
        (status = 403, description = "Administrator required")
    ),
    security(("bearer" = [])),
    tag = "Projects"
)]
pub async fn create_project(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Json(body): Json<Value>,
) -> ApiResult<(StatusCode, Json<ProjectResponse>)> {
    caller.require_admin()?;
    let input = into_input(body)?;
    ProjectValidator::new().validate(&input).into_result()?;
    let request: CreateProjectRequest = from_input(input)?;

    let project = state
        .project_service
        .create(NewProject {
            name: request.nombre,
            description: request.descripcion,
            location: request.ubicacion,
            start_date: request.fecha_inicio,
            completion_date: request.fecha_finalizacion,
            status: request.estado,
            code: request.codigo,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(project.into())))
}

/// Get a project with its units
#[utoipa::path(
    get,
    path = "/api/v1/proyectos/{id}",
    params(("id" = Uuid, Path, description = "Project ID")),
    responses(
        (status = 200, description = "Project found", body = ProjectDetailResponse),
        (status = 404, description = "Project not found")
    ),
    security(("bearer" = [])),
    tag = "Projects"
)]
pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ProjectDetailResponse>> {
    let detail = state
        .project_service
        .get_with_units(id)
        .await?
        .ok_or_else(project_not_found)?;
    Ok(Json(detail.into()))
}

/// Update a project (partial)
#[utoipa::path(
    put,
    path = "/api/v1/proyectos/{id}",
    params(("id" = Uuid, Path, description = "Project ID")),
    request_body = UpdateProjectRequest,
    responses(
        (status = 200, description = "Project updated", body = ProjectResponse),
        (status = 400, description = "Validation failed"),
        (status = 403, description = "Administrator required"),
        (status = 404, description = "Project not found")
    ),
    security(("bearer" = [])),
    tag = "Projects"
)]
pub async fn update_project(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(body): Json<Value>,
) -> ApiResult<Json<ProjectResponse>> {
    caller.require_admin()?;
    let project = state
        .project_service
        .get_by_id(id)
        .await?
        .ok_or_else(project_not_found)?;

    let changes = into_input(body)?;
    ProjectValidator::new()
        .validate(&merge_input(project_input(&project), &changes))
        .into_result()?;
    let request: UpdateProjectRequest = from_input(changes)?;

    let updated = state
        .project_service
        .update(
            id,
            ProjectChanges {
                name: request.nombre,
                description: request.descripcion,
                location: request.ubicacion,
                start_date: request.fecha_inicio,
                completion_date: request.fecha_finalizacion,
                status: request.estado,
                code: request.codigo,
            },
        )
        .await?;
    Ok(Json(updated.into()))
}

/// Delete a project and its units
#[utoipa::path(
    delete,
    path = "/api/v1/proyectos/{id}",
    params(("id" = Uuid, Path, description = "Project ID")),
    responses(
        (status = 204, description = "Project deleted"),
        (status = 403, description = "Administrator required"),
        (status = 404, description = "Project not found")
    ),
    security(("bearer" = [])),
    tag = "Projects"
)]
pub async fn delete_project(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    caller.require_admin()?;
    if !state.project_service.delete(id).await? {
        return Err(project_not_found());
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Search projects by text fields and unit price range
#[utoipa::path(
    get,
    path = "/api/v1/proyectos/search",
    params(ProjectSearchQuery),
    responses((status = 200, description = "Matching projects", body = Vec<ProjectResponse>)),
    security(("bearer" = [])),
    tag = "Projects"
)]
pub async fn search_projects(
    State(state): State<AppState>,
    Query(query): Query<ProjectSearchQuery>,
) -> ApiResult<Json<Vec<ProjectResponse>>> {
    let projects = state
        .project_service
        .search(ProjectSearch {
            id: query.id,
            name: query.nombre,
            location: query.ubicacion,
            code: query.codigo,
            min_price: query.precio_desde,
            max_price: query.precio_hasta,
        })
        .await?;
    Ok(Json(projects.into_iter().map(Into::into).collect()))
}

/// Portfolio statistics
#[utoipa::path(
    get,
    path = "/api/v1/proyectos/estadisticas",
    responses((status = 200, description = "Project statistics", body = ProjectStatisticsResponse)),
    security(("bearer" = [])),
    tag = "Projects"
)]
pub async fn statistics(
    State(state): State<AppState>,
) -> ApiResult<Json<ProjectStatisticsResponse>> {
    Ok(Json(state.project_service.statistics().await?.into()))
}

fn project_not_found() -> ApiError {
    ApiError::NotFound("Project not found".to_string())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/proyectos", get(list_projects).post(create_project))
        .route("/api/v1/proyectos/search", get(search_projects))
        .route("/api/v1/proyectos/estadisticas", get(statistics))
        .route(
            "/api/v1/proyectos/:id",
            get(get_project)
                .put(update_project)
                .patch(update_project)
                .delete(delete_project),
        )
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{json, Value};

    use super::super::test_support::TestApp;

    fn project_body(name: &str, code: &str) -> Value {
        json!({
            "nombre": name,
            "descripcion": "Edificio residencial",
            "ubicacion": "Av. Providencia 1234, Santiago",
            "fecha_inicio": "2024-01-01",
            "fecha_finalizacion": "2025-06-30",
            "estado": "En Construcción",
            "codigo": code
        })
    }

    async fn create(app: &TestApp, token: &str, name: &str, code: &str) -> Value {
        let (status, body) = app
            .send("POST", "/api/v1/proyectos", Some(token), Some(project_body(name, code)))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body
    }

    #[tokio::test]
    async fn test_create_and_detail() {
        let app = TestApp::new();
        let (_, token) = app.admin().await;

        let project = create(&app, &token, "Torre Norte", "TORRE-001").await;
        assert_eq!(project["estado"], "En Construcción");

        let (status, body) = app
            .send(
                "GET",
                &format!("/api/v1/proyectos/{}", project["id"].as_str().unwrap()),
                Some(&token),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["codigo"], "TORRE-001");
        assert!(body["unidades"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_rejects_inverted_dates() {
        let app = TestApp::new();
        let (_, token) = app.admin().await;

        let mut body = project_body("Torre Sur", "TORRE-002");
        body["fecha_inicio"] = json!("2024-01-01");
        body["fecha_finalizacion"] = json!("2023-12-31");
        let (status, errors) = app
            .send("POST", "/api/v1/proyectos", Some(&token), Some(body))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(errors["fecha_finalizacion"].is_array());
    }

    #[tokio::test]
    async fn test_client_cannot_create() {
        let app = TestApp::new();
        let (_, token) = app.client().await;

        let (status, _) = app
            .send(
                "POST",
                "/api/v1/proyectos",
                Some(&token),
                Some(project_body("Torre Este", "TORRE-003")),
            )
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_duplicate_code() {
        let app = TestApp::new();
        let (_, token) = app.admin().await;
        create(&app, &token, "Torre Norte", "TORRE-001").await;

        let (status, body) = app
            .send(
                "POST",
                "/api/v1/proyectos",
                Some(&token),
                Some(project_body("Torre Otra", "TORRE-001")),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_partial_update_keeps_other_fields() {
        let app = TestApp::new();
        let (_, token) = app.admin().await;
        let project = create(&app, &token, "Torre Norte", "TORRE-001").await;
        let uri = format!("/api/v1/proyectos/{}", project["id"].as_str().unwrap());

        let (status, body) = app
            .send("PATCH", &uri, Some(&token), Some(json!({"estado": "Terminado"})))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["estado"], "Terminado");
        assert_eq!(body["nombre"], "Torre Norte");

        // Moving the start after the stored completion date is rejected
        let (status, errors) = app
            .send("PATCH", &uri, Some(&token), Some(json!({"fecha_inicio": "2026-01-01"})))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(errors["fecha_finalizacion"].is_array());
    }

    #[tokio::test]
    async fn test_list_filters_and_statistics() {
        let app = TestApp::new();
        let (_, token) = app.admin().await;
        create(&app, &token, "Torre Norte", "TORRE-001").await;
        create(&app, &token, "Parque Sur", "PARQU-002").await;

        let (_, body) = app
            .send("GET", "/api/v1/proyectos?nombre=torre", Some(&token), None)
            .await;
        assert_eq!(body.as_array().unwrap().len(), 1);

        let (status, _) = app
            .send("GET", "/api/v1/proyectos?estado=Abandonado", Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = app
            .send("GET", "/api/v1/proyectos/estadisticas", Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_proyectos"], 2);
        assert_eq!(body["proyectos_activos"], 2);
        assert_eq!(body["proyectos_por_estado"]["En Construcción"], 2);
        assert_eq!(body["proyectos_por_estado"]["Cancelado"], 0);
    }

    #[tokio::test]
    async fn test_delete() {
        let app = TestApp::new();
        let (_, token) = app.admin().await;
        let project = create(&app, &token, "Torre Norte", "TORRE-001").await;
        let uri = format!("/api/v1/proyectos/{}", project["id"].as_str().unwrap());

        let (status, _) = app.send("DELETE", &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = app.send("GET", &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
