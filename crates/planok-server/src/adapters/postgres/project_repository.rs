//! PostgreSQL implementation of ProjectRepository

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use planok::{DomainError, Project, ProjectFilter, ProjectRepository};

use super::{map_sqlx_error, parse_column};

/// PostgreSQL implementation of ProjectRepository
pub struct PgProjectRepository {
    pool: PgPool,
}

impl PgProjectRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Internal row type for sqlx mapping
#[derive(sqlx::FromRow)]
struct ProjectRow {
    id: Uuid,
    name: String,
    description: String,
    location: String,
    start_date: NaiveDate,
    completion_date: Option<NaiveDate>,
    status: String,
    code: String,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl TryFrom<ProjectRow> for Project {
    type Error = DomainError;

    fn try_from(row: ProjectRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            name: row.name,
            description: row.description,
            location: row.location,
            start_date: row.start_date,
            completion_date: row.completion_date,
            status: parse_column("status", &row.status)?,
            code: row.code,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl ProjectRepository for PgProjectRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Project>, DomainError> {
        let row = sqlx::query_as::<_, ProjectRow>("SELECT * FROM projects WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Repository(e.to_string()))?;

        row.map(TryInto::try_into).transpose()
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Project>, DomainError> {
        let row = sqlx::query_as::<_, ProjectRow>("SELECT * FROM projects WHERE code = $1")
            .bind(code)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Repository(e.to_string()))?;

        row.map(TryInto::try_into).transpose()
    }

    async fn list(&self, filter: &ProjectFilter) -> Result<Vec<Project>, DomainError> {
        let name = filter.name.as_ref().map(|s| format!("%{}%", s));
        let location = filter.location.as_ref().map(|s| format!("%{}%", s));
        let rows = sqlx::query_as::<_, ProjectRow>(
            r#"
            SELECT * FROM projects
            WHERE ($1::uuid IS NULL OR id = $1)
              AND ($2::text IS NULL OR name ILIKE $2)
              AND ($3::text IS NULL OR location ILIKE $3)
              AND ($4::text IS NULL OR LOWER(code) = LOWER($4))
              AND ($5::text IS NULL OR status = $5)
            ORDER BY created_at DESC
            "#,
        )
        .bind(filter.id)
        .bind(name)
        .bind(location)
        .bind(&filter.code)
        .bind(filter.status.map(|s| s.as_str()))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn save(&self, project: &Project) -> Result<Project, DomainError> {
        let row = sqlx::query_as::<_, ProjectRow>(
            r#"
            INSERT INTO projects (id, name, description, location, start_date, completion_date,
                                  status, code, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (id) DO UPDATE
            SET name = EXCLUDED.name,
                description = EXCLUDED.description,
                location = EXCLUDED.location,
                start_date = EXCLUDED.start_date,
                completion_date = EXCLUDED.completion_date,
                status = EXCLUDED.status,
                code = EXCLUDED.code,
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(project.id)
        .bind(&project.name)
        .bind(&project.description)
        .bind(&project.location)
        .bind(project.start_date)
        .bind(project.completion_date)
        .bind(project.status.as_str())
        .bind(&project.code)
        .bind(project.created_at)
        .bind(project.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, "A project with this code already exists"))?;

        row.try_into()
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        // Units go with the project (ON DELETE CASCADE)
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Repository(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }
}
