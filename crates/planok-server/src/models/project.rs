//! Project DTOs

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use planok::{Input, Project, ProjectStatistics, ProjectStatus, ProjectWithUnits};

use super::UnitResponse;

/// Create project request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProjectRequest {
    pub nombre: String,
    #[serde(default)]
    pub descripcion: String,
    pub ubicacion: String,
    pub fecha_inicio: NaiveDate,
    pub fecha_finalizacion: Option<NaiveDate>,
    #[schema(value_type = Option<String>, example = "Planificación")]
    pub estado: Option<ProjectStatus>,
    /// Generated from the name when absent
    pub codigo: Option<String>,
}

/// Update project request; absent fields are left unchanged
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateProjectRequest {
    pub nombre: Option<String>,
    pub descripcion: Option<String>,
    pub ubicacion: Option<String>,
    pub fecha_inicio: Option<NaiveDate>,
    pub fecha_finalizacion: Option<NaiveDate>,
    #[schema(value_type = Option<String>)]
    pub estado: Option<ProjectStatus>,
    pub codigo: Option<String>,
}

/// Project
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProjectResponse {
    pub id: Uuid,
    pub nombre: String,
    pub descripcion: String,
    pub ubicacion: String,
    pub fecha_inicio: NaiveDate,
    pub fecha_finalizacion: Option<NaiveDate>,
    pub estado: String,
    pub codigo: String,
    pub created_at: DateTime<Utc>,
}

impl From<Project> for ProjectResponse {
    fn from(project: Project) -> Self {
        Self {
            id: project.id,
            nombre: project.name,
            descripcion: project.description,
            ubicacion: project.location,
            fecha_inicio: project.start_date,
            fecha_finalizacion: project.completion_date,
            estado: project.status.to_string(),
            codigo: project.code,
            created_at: project.created_at,
        }
    }
}

/// Project with its units
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProjectDetailResponse {
    #[serde(flatten)]
    pub project: ProjectResponse,
    pub unidades: Vec<UnitResponse>,
}

impl From<ProjectWithUnits> for ProjectDetailResponse {
    fn from(detail: ProjectWithUnits) -> Self {
        Self {
            project: detail.project.into(),
            unidades: detail.units.into_iter().map(Into::into).collect(),
        }
    }
}

/// Portfolio statistics
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProjectStatisticsResponse {
    pub total_proyectos: usize,
    pub proyectos_por_estado: BTreeMap<String, usize>,
    pub proyectos_activos: usize,
}

impl From<ProjectStatistics> for ProjectStatisticsResponse {
    fn from(stats: ProjectStatistics) -> Self {
        Self {
            total_proyectos: stats.total,
            proyectos_por_estado: stats.by_status,
            proyectos_activos: stats.active_projects,
        }
    }
}

/// Project listing filters
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ProjectListQuery {
    pub estado: Option<String>,
    pub nombre: Option<String>,
    pub ubicacion: Option<String>,
    pub codigo: Option<String>,
}

/// Project search
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ProjectSearchQuery {
    pub id: Option<Uuid>,
    pub nombre: Option<String>,
    pub ubicacion: Option<String>,
    pub codigo: Option<String>,
    pub precio_desde: Option<f64>,
    pub precio_hasta: Option<f64>,
}

/// Stored project as validator input, for merging partial updates
pub fn project_input(project: &Project) -> Input {
    let mut input = Input::new();
    input.insert("nombre".into(), json!(project.name));
    input.insert("descripcion".into(), json!(project.description));
    input.insert("ubicacion".into(), json!(project.location));
    input.insert(
        "fecha_inicio".into(),
        json!(project.start_date.format("%Y-%m-%d").to_string()),
    );
    input.insert(
        "fecha_finalizacion".into(),
        project
            .completion_date
            .map_or(Value::Null, |d| json!(d.format("%Y-%m-%d").to_string())),
    );
    input.insert("estado".into(), json!(project.status.as_str()));
    input.insert("codigo".into(), json!(project.code));
    input
}
