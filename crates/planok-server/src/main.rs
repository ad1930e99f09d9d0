use anyhow::Context;
use axum::{middleware, routing::get, Json, Router};
use serde::Serialize;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod adapters;
mod application;
mod auth;
mod config;
mod error;
mod models;
mod routes;
mod telemetry;

use adapters::{Argon2PasswordHasher, PgProjectRepository, PgUnitRepository, PgUserRepository};
use application::{NewUser, ProjectService, UnitService, UserService};
use auth::TokenService;
use config::{AppConfig, BootstrapAdmin};
use planok::{
    DomainError, PasswordHasher, ProjectRepository, Role, UnitRepository, UserRepository,
};

/// Type aliases for application services over the configured repositories
pub type AppUserService = UserService<dyn UserRepository>;
pub type AppProjectService = ProjectService<dyn ProjectRepository, dyn UnitRepository>;
pub type AppUnitService = UnitService<dyn UnitRepository, dyn ProjectRepository, dyn UserRepository>;

/// Application state shared across all routes
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<AppUserService>,
    pub project_service: Arc<AppProjectService>,
    pub unit_service: Arc<AppUnitService>,
    pub tokens: Arc<TokenService>,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserRepository>,
        projects: Arc<dyn ProjectRepository>,
        units: Arc<dyn UnitRepository>,
        hasher: Arc<dyn PasswordHasher>,
        config: &AppConfig,
    ) -> Self {
        Self {
            user_service: Arc::new(UserService::new(users.clone(), hasher)),
            project_service: Arc::new(ProjectService::new(projects.clone(), units.clone())),
            unit_service: Arc::new(UnitService::new(units, projects, users)),
            tokens: Arc::new(TokenService::new(config)),
        }
    }
}

#[derive(Serialize)]
struct HealthCheck {
    status: String,
    message: String,
    version: String,
}

async fn health_check() -> Json<HealthCheck> {
    Json(HealthCheck {
        status: "ok".to_string(),
        message: "PlanOk API is running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Full application router: docs, health, public and token-protected routes
pub fn build_router(state: AppState) -> Router {
    // Protected routes (require a valid access token)
    let protected_routes = Router::new()
        .merge(routes::auth::router())
        .merge(routes::users::router())
        .merge(routes::users_v2::router())
        .merge(routes::projects::router())
        .merge(routes::units::router())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::auth_middleware,
        ));

    let public_routes = Router::new()
        .merge(routes::auth::public_router())
        .merge(routes::users::public_router())
        .merge(routes::users_v2::public_router());

    // OpenAPI documentation
    let openapi = routes::swagger::ApiDoc::openapi();

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
        .route("/health", get(health_check))
        .merge(public_routes)
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Create the configured administrator unless the email is already taken
async fn ensure_admin(users: &AppUserService, admin: &BootstrapAdmin) -> Result<(), DomainError> {
    if users.get_by_email(&admin.email).await?.is_some() {
        return Ok(());
    }

    let created = users
        .create(NewUser {
            rut: admin.rut.clone(),
            email: admin.email.clone(),
            first_name: "Admin".to_string(),
            last_name: "PlanOk".to_string(),
            role: Some(Role::Administrator.as_str().to_string()),
            password: Some(admin.password.clone()),
            ..Default::default()
        })
        .await?;
    tracing::info!(user_id = %created.id, "👤 Bootstrap administrator created");
    Ok(())
}

#[shuttle_runtime::main]
async fn main(
    #[shuttle_shared_db::Postgres] pool: PgPool,
    #[shuttle_runtime::Secrets] secrets: shuttle_runtime::SecretStore,
) -> shuttle_axum::ShuttleAxum {
    telemetry::init();
    tracing::info!("🏗️  PlanOk API initializing...");

    let config = AppConfig::from_secrets(&secrets);

    // Run migrations
    sqlx::migrate!()
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    tracing::info!("✅ Database migrations completed");

    // Initialize application services
    let state = AppState::new(
        Arc::new(PgUserRepository::new(pool.clone())),
        Arc::new(PgProjectRepository::new(pool.clone())),
        Arc::new(PgUnitRepository::new(pool)),
        Arc::new(Argon2PasswordHasher::new()),
        &config,
    );

    match &config.bootstrap_admin {
        Some(admin) => {
            if let Err(e) = ensure_admin(&state.user_service, admin).await {
                tracing::warn!("⚠️  Failed to create bootstrap administrator: {}", e);
            }
        }
        None => tracing::info!("No ADMIN_EMAIL/ADMIN_PASSWORD/ADMIN_RUT set - skipping admin bootstrap"),
    }

    let router = build_router(state);

    tracing::info!("📚 Swagger UI: /swagger-ui");
    tracing::info!("✅ PlanOk API ready");

    Ok(router.into())
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::*;
    use crate::adapters::memory::{
        InMemoryProjectRepository, InMemoryUnitRepository, InMemoryUserRepository,
    };
    use crate::routes::test_support::TestApp;

    #[tokio::test]
    async fn test_health_is_public() {
        let app = TestApp::new();
        let (status, body) = app.send("GET", "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_openapi_document_is_served() {
        let app = TestApp::new();
        let (status, body) = app.send("GET", "/api-docs/openapi.json", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["info"]["title"], "PlanOk API");
    }

    #[tokio::test]
    async fn test_ensure_admin_is_idempotent() {
        let users: Arc<dyn UserRepository> = Arc::new(InMemoryUserRepository::new());
        let units = InMemoryUnitRepository::new();
        let state = AppState::new(
            users.clone(),
            Arc::new(InMemoryProjectRepository::with_units(units.clone())),
            Arc::new(units),
            Arc::new(Argon2PasswordHasher::new()),
            &AppConfig::with_secret("secret"),
        );
        let admin = BootstrapAdmin {
            email: "root@example.com".to_string(),
            password: "Password123".to_string(),
            rut: "11111111-1".to_string(),
        };

        ensure_admin(&state.user_service, &admin).await.unwrap();
        ensure_admin(&state.user_service, &admin).await.unwrap();

        let administrators = state.user_service.administrators().await.unwrap();
        assert_eq!(administrators.len(), 1);
        assert_eq!(administrators[0].email, "root@example.com");
    }
}
