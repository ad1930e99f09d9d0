//! PostgreSQL implementation of UserRepository

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use planok::{DomainError, User, UserFilter, UserRepository};

use super::{map_sqlx_error, parse_column};

/// PostgreSQL implementation of UserRepository
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Internal row type for sqlx mapping
#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    rut: String,
    email: String,
    username: String,
    first_name: String,
    last_name: String,
    role: String,
    phone: Option<String>,
    password_hash: Option<String>,
    is_active: bool,
    last_login: Option<chrono::DateTime<chrono::Utc>>,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = DomainError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            rut: row.rut,
            email: row.email,
            username: row.username,
            first_name: row.first_name,
            last_name: row.last_name,
            role: parse_column("role", &row.role)?,
            phone: row.phone,
            password_hash: row.password_hash,
            is_active: row.is_active,
            last_login: row.last_login,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Repository(e.to_string()))?;

        row.map(TryInto::try_into).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Repository(e.to_string()))?;

        row.map(TryInto::try_into).transpose()
    }

    async fn find_by_rut(&self, rut: &str) -> Result<Option<User>, DomainError> {
        let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE rut = $1")
            .bind(rut)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Repository(e.to_string()))?;

        row.map(TryInto::try_into).transpose()
    }

    async fn list(&self, filter: &UserFilter) -> Result<Vec<User>, DomainError> {
        let search = filter.search.as_ref().map(|s| format!("%{}%", s));
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT * FROM users
            WHERE ($1::text IS NULL OR role = $1)
              AND ($2::boolean IS NULL OR is_active = $2)
              AND ($3::text IS NULL
                   OR rut ILIKE $3 OR email ILIKE $3
                   OR first_name ILIKE $3 OR last_name ILIKE $3)
              AND ($4::timestamptz IS NULL OR created_at >= $4)
              AND ($5::timestamptz IS NULL OR created_at <= $5)
            ORDER BY created_at DESC
            "#,
        )
        .bind(filter.role.map(|r| r.as_str()))
        .bind(filter.is_active)
        .bind(search)
        .bind(filter.created_after)
        .bind(filter.created_before)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn save(&self, user: &User) -> Result<User, DomainError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (id, rut, email, username, first_name, last_name, role, phone,
                               password_hash, is_active, last_login, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ON CONFLICT (id) DO UPDATE
            SET rut = EXCLUDED.rut,
                email = EXCLUDED.email,
                username = EXCLUDED.username,
                first_name = EXCLUDED.first_name,
                last_name = EXCLUDED.last_name,
                role = EXCLUDED.role,
                phone = EXCLUDED.phone,
                password_hash = EXCLUDED.password_hash,
                is_active = EXCLUDED.is_active,
                last_login = EXCLUDED.last_login
            RETURNING *
            "#,
        )
        .bind(user.id)
        .bind(&user.rut)
        .bind(&user.email)
        .bind(&user.username)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.role.as_str())
        .bind(&user.phone)
        .bind(&user.password_hash)
        .bind(user.is_active)
        .bind(user.last_login)
        .bind(user.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, "A user with this email, RUT or username already exists"))?;

        row.try_into()
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Repository(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }
}
