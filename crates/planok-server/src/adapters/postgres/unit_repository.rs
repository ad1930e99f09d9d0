//! PostgreSQL implementation of UnitRepository

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use planok::{DomainError, Unit, UnitFilter, UnitRepository, UnitSnapshot};

use super::{map_sqlx_error, parse_column};

/// PostgreSQL implementation of UnitRepository
pub struct PgUnitRepository {
    pool: PgPool,
}

impl PgUnitRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Internal row type for sqlx mapping
#[derive(sqlx::FromRow)]
struct UnitRow {
    id: Uuid,
    project_id: Uuid,
    number: String,
    unit_type: String,
    area: f64,
    price: f64,
    status: String,
    client_id: Option<Uuid>,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl TryFrom<UnitRow> for Unit {
    type Error = DomainError;

    fn try_from(row: UnitRow) -> Result<Self, Self::Error> {
        Ok(Unit::restore(UnitSnapshot {
            id: row.id,
            project_id: row.project_id,
            number: row.number,
            unit_type: parse_column("unit_type", &row.unit_type)?,
            area: row.area,
            price: row.price,
            status: parse_column("status", &row.status)?,
            client_id: row.client_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }))
    }
}

#[async_trait]
impl UnitRepository for PgUnitRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Unit>, DomainError> {
        let row = sqlx::query_as::<_, UnitRow>("SELECT * FROM units WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Repository(e.to_string()))?;

        row.map(TryInto::try_into).transpose()
    }

    async fn list(&self, filter: &UnitFilter) -> Result<Vec<Unit>, DomainError> {
        let rows = sqlx::query_as::<_, UnitRow>(
            r#"
            SELECT * FROM units
            WHERE ($1::uuid IS NULL OR project_id = $1)
              AND ($2::text IS NULL OR unit_type = $2)
              AND ($3::text IS NULL OR status = $3)
              AND ($4::uuid IS NULL OR client_id = $4)
              AND ($5::float8 IS NULL OR price >= $5)
              AND ($6::float8 IS NULL OR price <= $6)
              AND ($7::text IS NULL OR number = $7)
            ORDER BY number
            "#,
        )
        .bind(filter.project_id)
        .bind(filter.unit_type.map(|t| t.as_str()))
        .bind(filter.status.map(|s| s.as_str()))
        .bind(filter.client_id)
        .bind(filter.min_price)
        .bind(filter.max_price)
        .bind(&filter.number)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn save(&self, unit: &Unit) -> Result<Unit, DomainError> {
        let row = sqlx::query_as::<_, UnitRow>(
            r#"
            INSERT INTO units (id, project_id, number, unit_type, area, price, status,
                               client_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (id) DO UPDATE
            SET project_id = EXCLUDED.project_id,
                number = EXCLUDED.number,
                unit_type = EXCLUDED.unit_type,
                area = EXCLUDED.area,
                price = EXCLUDED.price,
                status = EXCLUDED.status,
                client_id = EXCLUDED.client_id,
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(unit.id)
        .bind(unit.project_id)
        .bind(&unit.number)
        .bind(unit.unit_type.as_str())
        .bind(unit.area)
        .bind(unit.price)
        .bind(unit.status().as_str())
        .bind(unit.client_id())
        .bind(unit.created_at)
        .bind(unit.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, "A unit with this number already exists in the project"))?;

        row.try_into()
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM units WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Repository(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }
}
