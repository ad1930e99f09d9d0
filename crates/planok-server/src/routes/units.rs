//! Unit Routes
//!
//! Inventory queries plus the sales flow (reserve for a client, then sell).
//! Writes and sales actions require an administrator.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use serde_json::Value;
use uuid::Uuid;

use planok::{Unit, UnitFilter, UnitStatus, UnitType, UnitValidator, Validator};

use super::{from_input, into_input, merge_input};
use crate::application::{NewUnit, UnitChanges};
use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::models::{
    unit_input, AssignClientRequest, CreateUnitRequest, PriceRangeQuery, ProjectIdQuery,
    UnitDetailResponse, UnitListQuery, UnitResponse, UnitStatisticsResponse, UnitTypeQuery,
    UpdateUnitRequest,
};
use crate::AppState;

/// List units
#[utoipa::path(
    get,
    path = "/api/v1/unidades",
    params(UnitListQuery),
    responses(
        (status = 200, description = "List of units", body = Vec<UnitResponse>),
        (status = 400, description = "Invalid type or status filter")
    ),
    security(("bearer" = [])),
    tag = "Units"
)]
pub async fn list_units(
    State(state): State<AppState>,
    Query(query): Query<UnitListQuery>,
) -> ApiResult<Json<Vec<UnitResponse>>> {
    let filter = UnitFilter {
        project_id: query.proyecto,
        unit_type: parse_unit_type(query.tipo_unidad.as_deref())?,
        status: query
            .estado
            .as_deref()
            .map(str::parse::<UnitStatus>)
            .transpose()
            .map_err(ApiError::BadRequest)?,
        client_id: query.cliente,
        number: query.numero_unidad,
        ..Default::default()
    };

    let units = state.unit_service.list(&filter).await?;
    Ok(Json(responses(units)))
}

/// Create a unit
#[utoipa::path(
    post,
    path = "/api/v1/unidades",
    request_body = CreateUnitRequest,
    responses(
        (status = 201, description = "Unit created", body = UnitResponse),
        (status = 400, description = "Validation failed, unknown project or duplicate number"),
        (status = 403, description = "Administrator required")
    ),
    security(("bearer" = [])),
    tag = "Units"
)]
pub async fn create_unit(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Json(body): Json<Value>,
) -> ApiResult<(StatusCode, Json<UnitResponse>)> {
    caller.require_admin()?;
    let input = into_input(body)?;
    UnitValidator::new().validate(&input).into_result()?;
    let request: CreateUnitRequest = from_input(input)?;

    let unit = state
        .unit_service
        .create(NewUnit {
            project_id: request.proyecto_id,
            number: request.numero_unidad,
            unit_type: request.tipo_unidad,
            area: request.metraje_cuadrado,
            price: request.precio_venta,
            status: Some(request.estado),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(unit.into())))
}

/// Get a unit with its client
#[utoipa::path(
    get,
    path = "/api/v1/unidades/{id}",
    params(("id" = Uuid, Path, description = "Unit ID")),
    responses(
        (status = 200, description = "Unit found", body = UnitDetailResponse),
        (status = 404, description = "Unit not found")
    ),
    security(("bearer" = [])),
    tag = "Units"
)]
pub async fn get_unit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<UnitDetailResponse>> {
    let unit = find_unit(&state, id).await?;
    let client = match unit.client_id() {
        Some(client_id) => state.user_service.get_by_id(client_id).await?,
        None => None,
    };
    Ok(Json(UnitDetailResponse::new(unit, client)))
}

/// Update a unit (partial)
#[utoipa::path(
    put,
    path = "/api/v1/unidades/{id}",
    params(("id" = Uuid, Path, description = "Unit ID")),
    request_body = UpdateUnitRequest,
    responses(
        (status = 200, description = "Unit updated", body = UnitResponse),
        (status = 400, description = "Validation failed or status change not allowed"),
        (status = 403, description = "Administrator required"),
        (status = 404, description = "Unit not found")
    ),
    security(("bearer" = [])),
    tag = "Units"
)]
pub async fn update_unit(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(body): Json<Value>,
) -> ApiResult<Json<UnitResponse>> {
    caller.require_admin()?;
    let unit = find_unit(&state, id).await?;

    let changes = into_input(body)?;
    UnitValidator::new()
        .validate(&merge_input(unit_input(&unit), &changes))
        .into_result()?;
    let request: UpdateUnitRequest = from_input(changes)?;

    let updated = state
        .unit_service
        .update(
            id,
            UnitChanges {
                number: request.numero_unidad,
                unit_type: request.tipo_unidad,
                area: request.metraje_cuadrado,
                price: request.precio_venta,
                status: request.estado,
            },
        )
        .await?;
    Ok(Json(updated.into()))
}

/// Delete a unit
#[utoipa::path(
    delete,
    path = "/api/v1/unidades/{id}",
    params(("id" = Uuid, Path, description = "Unit ID")),
    responses(
        (status = 204, description = "Unit deleted"),
        (status = 403, description = "Administrator required"),
        (status = 404, description = "Unit not found")
    ),
    security(("bearer" = [])),
    tag = "Units"
)]
pub async fn delete_unit(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    caller.require_admin()?;
    if !state.unit_service.delete(id).await? {
        return Err(unit_not_found());
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Units of one project
#[utoipa::path(
    get,
    path = "/api/v1/unidades/por_proyecto",
    params(ProjectIdQuery),
    responses(
        (status = 200, description = "Units of the project", body = Vec<UnitResponse>),
        (status = 400, description = "Missing proyecto_id")
    ),
    security(("bearer" = [])),
    tag = "Units"
)]
pub async fn by_project(
    State(state): State<AppState>,
    Query(query): Query<ProjectIdQuery>,
) -> ApiResult<Json<Vec<UnitResponse>>> {
    let project_id = require_project_id(query)?;
    let units = state.unit_service.by_project(project_id).await?;
    Ok(Json(responses(units)))
}

/// Units open for sale
#[utoipa::path(
    get,
    path = "/api/v1/unidades/disponibles",
    responses((status = 200, description = "Available units", body = Vec<UnitResponse>)),
    security(("bearer" = [])),
    tag = "Units"
)]
pub async fn available(State(state): State<AppState>) -> ApiResult<Json<Vec<UnitResponse>>> {
    let units = state.unit_service.available().await?;
    Ok(Json(responses(units)))
}

/// Units of one type
#[utoipa::path(
    get,
    path = "/api/v1/unidades/por_tipo",
    params(UnitTypeQuery),
    responses(
        (status = 200, description = "Units of the type", body = Vec<UnitResponse>),
        (status = 400, description = "Missing or invalid tipo")
    ),
    security(("bearer" = [])),
    tag = "Units"
)]
pub async fn by_type(
    State(state): State<AppState>,
    Query(query): Query<UnitTypeQuery>,
) -> ApiResult<Json<Vec<UnitResponse>>> {
    let unit_type = parse_unit_type(query.tipo.as_deref())?
        .ok_or_else(|| ApiError::bad_request("Unit type (tipo) is required"))?;
    let units = state.unit_service.by_type(unit_type).await?;
    Ok(Json(responses(units)))
}

/// Units within a price range
#[utoipa::path(
    get,
    path = "/api/v1/unidades/por_rango_precio",
    params(PriceRangeQuery),
    responses(
        (status = 200, description = "Units priced within the bounds", body = Vec<UnitResponse>),
        (status = 400, description = "No bound given")
    ),
    security(("bearer" = [])),
    tag = "Units"
)]
pub async fn by_price_range(
    State(state): State<AppState>,
    Query(query): Query<PriceRangeQuery>,
) -> ApiResult<Json<Vec<UnitResponse>>> {
    let units = state
        .unit_service
        .by_price_range(query.desde, query.hasta)
        .await?;
    Ok(Json(responses(units)))
}

/// Reserve a unit for a client
#[utoipa::path(
    post,
    path = "/api/v1/unidades/{id}/asignar_cliente",
    params(("id" = Uuid, Path, description = "Unit ID")),
    request_body = AssignClientRequest,
    responses(
        (status = 200, description = "Unit reserved", body = UnitResponse),
        (status = 400, description = "Missing client, invalid client or unit not available"),
        (status = 403, description = "Administrator required"),
        (status = 404, description = "Unit not found")
    ),
    security(("bearer" = [])),
    tag = "Units"
)]
pub async fn assign_client(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AssignClientRequest>,
) -> ApiResult<Json<UnitResponse>> {
    caller.require_admin()?;
    let client_id = payload
        .cliente_id
        .ok_or_else(|| ApiError::bad_request("Client id (cliente_id) is required"))?;

    let unit = state.unit_service.reserve(id, client_id).await?;
    Ok(Json(unit.into()))
}

/// Close the sale of a reserved unit
#[utoipa::path(
    post,
    path = "/api/v1/unidades/{id}/marcar_como_vendida",
    params(("id" = Uuid, Path, description = "Unit ID")),
    responses(
        (status = 200, description = "Unit sold", body = UnitResponse),
        (status = 400, description = "Unit is not reserved"),
        (status = 403, description = "Administrator required"),
        (status = 404, description = "Unit not found")
    ),
    security(("bearer" = [])),
    tag = "Units"
)]
pub async fn mark_sold(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<UnitResponse>> {
    caller.require_admin()?;
    let unit = state.unit_service.mark_sold(id).await?;
    Ok(Json(unit.into()))
}

/// Unit statistics for one project
#[utoipa::path(
    get,
    path = "/api/v1/unidades/estadisticas_por_proyecto",
    params(ProjectIdQuery),
    responses(
        (status = 200, description = "Unit statistics", body = UnitStatisticsResponse),
        (status = 400, description = "Missing proyecto_id")
    ),
    security(("bearer" = [])),
    tag = "Units"
)]
pub async fn statistics(
    State(state): State<AppState>,
    Query(query): Query<ProjectIdQuery>,
) -> ApiResult<Json<UnitStatisticsResponse>> {
    let project_id = require_project_id(query)?;
    Ok(Json(state.unit_service.statistics(project_id).await?.into()))
}

async fn find_unit(state: &AppState, id: Uuid) -> ApiResult<Unit> {
    state
        .unit_service
        .get_by_id(id)
        .await?
        .ok_or_else(unit_not_found)
}

fn unit_not_found() -> ApiError {
    ApiError::NotFound("Unit not found".to_string())
}

fn require_project_id(query: ProjectIdQuery) -> ApiResult<Uuid> {
    query
        .proyecto_id
        .ok_or_else(|| ApiError::bad_request("Project id (proyecto_id) is required"))
}

fn parse_unit_type(value: Option<&str>) -> ApiResult<Option<UnitType>> {
    value
        .map(str::parse::<UnitType>)
        .transpose()
        .map_err(ApiError::BadRequest)
}

fn responses(units: Vec<Unit>) -> Vec<UnitResponse> {
    units.into_iter().map(Into::into).collect()
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/unidades", get(list_units).post(create_unit))
        .route("/api/v1/unidades/por_proyecto", get(by_project))
        .route("/api/v1/unidades/disponibles", get(available))
        .route("/api/v1/unidades/por_tipo", get(by_type))
        .route("/api/v1/unidades/por_rango_precio", get(by_price_range))
        .route(
            "/api/v1/unidades/estadisticas_por_proyecto",
            get(statistics),
        )
        .route(
            "/api/v1/unidades/:id",
            get(get_unit)
                .put(update_unit)
                .patch(update_unit)
                .delete(delete_unit),
        )
        .route("/api/v1/unidades/:id/asignar_cliente", post(assign_client))
        .route("/api/v1/unidades/:id/marcar_como_vendida", post(mark_sold))
}
