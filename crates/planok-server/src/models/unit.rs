//! Unit DTOs

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use planok::{Input, Unit, UnitStatistics, UnitStatus, UnitType, User};

use super::{flexible_f64, flexible_f64_opt, UserResponse};

/// Create unit request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateUnitRequest {
    pub proyecto_id: Uuid,
    pub numero_unidad: String,
    #[schema(value_type = String, example = "Departamento")]
    pub tipo_unidad: UnitType,
    #[serde(deserialize_with = "flexible_f64")]
    pub metraje_cuadrado: f64,
    #[serde(deserialize_with = "flexible_f64")]
    pub precio_venta: f64,
    /// Initial status: `Disponible` or `No Disponible`
    #[schema(value_type = String, example = "Disponible")]
    pub estado: UnitStatus,
}

/// Update unit request; absent fields are left unchanged
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateUnitRequest {
    pub numero_unidad: Option<String>,
    #[schema(value_type = Option<String>)]
    pub tipo_unidad: Option<UnitType>,
    #[serde(default, deserialize_with = "flexible_f64_opt")]
    pub metraje_cuadrado: Option<f64>,
    #[serde(default, deserialize_with = "flexible_f64_opt")]
    pub precio_venta: Option<f64>,
    /// Only `Disponible` ↔ `No Disponible`
    #[schema(value_type = Option<String>)]
    pub estado: Option<UnitStatus>,
}

/// Reserve request
#[derive(Debug, Deserialize, ToSchema)]
pub struct AssignClientRequest {
    pub cliente_id: Option<Uuid>,
}

/// Unit
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UnitResponse {
    pub id: Uuid,
    pub proyecto: Uuid,
    pub numero_unidad: String,
    pub tipo_unidad: String,
    pub metraje_cuadrado: f64,
    pub precio_venta: f64,
    pub estado: String,
    pub cliente: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<Unit> for UnitResponse {
    fn from(unit: Unit) -> Self {
        Self {
            id: unit.id,
            proyecto: unit.project_id,
            tipo_unidad: unit.unit_type.to_string(),
            metraje_cuadrado: unit.area,
            precio_venta: unit.price,
            estado: unit.status().to_string(),
            cliente: unit.client_id(),
            created_at: unit.created_at,
            numero_unidad: unit.number,
        }
    }
}

/// Unit with the assigned client embedded
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UnitDetailResponse {
    pub id: Uuid,
    pub proyecto: Uuid,
    pub numero_unidad: String,
    pub tipo_unidad: String,
    pub metraje_cuadrado: f64,
    pub precio_venta: f64,
    pub estado: String,
    pub cliente: Option<UserResponse>,
    pub created_at: DateTime<Utc>,
}

impl UnitDetailResponse {
    pub fn new(unit: Unit, client: Option<User>) -> Self {
        Self {
            id: unit.id,
            proyecto: unit.project_id,
            tipo_unidad: unit.unit_type.to_string(),
            metraje_cuadrado: unit.area,
            precio_venta: unit.price,
            estado: unit.status().to_string(),
            cliente: client.map(Into::into),
            created_at: unit.created_at,
            numero_unidad: unit.number,
        }
    }
}

/// Unit statistics for one project
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UnitStatisticsResponse {
    pub proyecto_id: Uuid,
    pub total_unidades: usize,
    pub precio_promedio: Option<f64>,
    pub precio_minimo: Option<f64>,
    pub precio_maximo: Option<f64>,
    pub unidades_por_estado: BTreeMap<String, usize>,
    pub unidades_por_tipo: BTreeMap<String, usize>,
}

impl From<UnitStatistics> for UnitStatisticsResponse {
    fn from(stats: UnitStatistics) -> Self {
        Self {
            proyecto_id: stats.project_id,
            total_unidades: stats.total,
            precio_promedio: stats.average_price,
            precio_minimo: stats.min_price,
            precio_maximo: stats.max_price,
            unidades_por_estado: stats.by_status,
            unidades_por_tipo: stats.by_type,
        }
    }
}

/// Unit listing filters
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct UnitListQuery {
    pub proyecto: Option<Uuid>,
    pub tipo_unidad: Option<String>,
    pub estado: Option<String>,
    pub cliente: Option<Uuid>,
    pub numero_unidad: Option<String>,
}

/// `?proyecto_id=`
#[derive(Debug, Deserialize, IntoParams)]
pub struct ProjectIdQuery {
    pub proyecto_id: Option<Uuid>,
}

/// `?tipo=`
#[derive(Debug, Deserialize, IntoParams)]
pub struct UnitTypeQuery {
    pub tipo: Option<String>,
}

/// `?desde=&hasta=`
#[derive(Debug, Deserialize, IntoParams)]
pub struct PriceRangeQuery {
    pub desde: Option<f64>,
    pub hasta: Option<f64>,
}

/// Stored unit as validator input, for merging partial updates
pub fn unit_input(unit: &Unit) -> Input {
    let mut input = Input::new();
    input.insert("proyecto_id".into(), json!(unit.project_id.to_string()));
    input.insert("numero_unidad".into(), json!(unit.number));
    input.insert("tipo_unidad".into(), json!(unit.unit_type.as_str()));
    input.insert("metraje_cuadrado".into(), json!(unit.area));
    input.insert("precio_venta".into(), json!(unit.price));
    input.insert("estado".into(), json!(unit.status().as_str()));
    input.insert(
        "cliente_id".into(),
        unit.client_id()
            .map_or(Value::Null, |id| json!(id.to_string())),
    );
    input
}
