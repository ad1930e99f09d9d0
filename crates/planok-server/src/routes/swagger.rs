//! OpenAPI Documentation
//!
//! Centralized API documentation using utoipa.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::models::{
    AccessTokenResponse,
    // Units
    AssignClientRequest,
    ChangePasswordRequest,
    // Projects
    CreateProjectRequest,
    CreateUnitRequest,
    // Users
    CreateUserRequest,
    CreateUserV2Request,
    DetailResponse,
    ProjectDetailResponse,
    ProjectResponse,
    ProjectStatisticsResponse,
    RefreshRequest,
    // Auth
    TokenRequest,
    TokenResponse,
    UnitDetailResponse,
    UnitResponse,
    UnitStatisticsResponse,
    UpdateProjectRequest,
    UpdateUnitRequest,
    UpdateUserRequest,
    UserResponse,
    UserStatisticsResponse,
    UserV2Response,
    WhoAmIResponse,
};

/// Registers the `bearer` JWT scheme referenced by protected paths
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    modifiers(&BearerAuth),
    paths(
        // Auth endpoints
        super::auth::obtain_token,
        super::auth::refresh_token,
        super::auth::test_token,
        // User endpoints (v1)
        super::users::list_users,
        super::users::create_user,
        super::users::get_user,
        super::users::update_user,
        super::users::delete_user,
        super::users::list_clients,
        super::users::list_administrators,
        // User endpoints (v2)
        super::users_v2::list_users,
        super::users_v2::create_user,
        super::users_v2::get_user,
        super::users_v2::update_user,
        super::users_v2::delete_user,
        super::users_v2::list_clients,
        super::users_v2::list_administrators,
        super::users_v2::statistics,
        super::users_v2::activate,
        super::users_v2::deactivate,
        super::users_v2::change_password,
        super::users_v2::advanced_search,
        // Project endpoints
        super::projects::list_projects,
        super::projects::create_project,
        super::projects::get_project,
        super::projects::update_project,
        super::projects::delete_project,
        super::projects::search_projects,
        super::projects::statistics,
        // Unit endpoints
        super::units::list_units,
        super::units::create_unit,
        super::units::get_unit,
        super::units::update_unit,
        super::units::delete_unit,
        super::units::by_project,
        super::units::available,
        super::units::by_type,
        super::units::by_price_range,
        super::units::assign_client,
        super::units::mark_sold,
        super::units::statistics,
    ),
    info(
        title = "PlanOk API",
        version = "0.1.0",
        description = "Real-estate projects, units and their sale to clients.",
        license(name = "MIT"),
    ),
    servers(
        (url = "/", description = "Current server"),
    ),
    tags(
        (name = "Auth", description = "JWT token issuance"),
        (name = "Users", description = "User accounts (v1)"),
        (name = "Users v2", description = "User accounts with soft delete and statistics"),
        (name = "Projects", description = "Real-estate projects"),
        (name = "Units", description = "Units and the sales flow"),
    ),
    components(
        schemas(
            // Auth
            TokenRequest,
            TokenResponse,
            RefreshRequest,
            AccessTokenResponse,
            WhoAmIResponse,
            // Users
            CreateUserRequest,
            CreateUserV2Request,
            UpdateUserRequest,
            UserResponse,
            UserV2Response,
            UserStatisticsResponse,
            ChangePasswordRequest,
            DetailResponse,
            // Projects
            CreateProjectRequest,
            UpdateProjectRequest,
            ProjectResponse,
            ProjectDetailResponse,
            ProjectStatisticsResponse,
            // Units
            CreateUnitRequest,
            UpdateUnitRequest,
            AssignClientRequest,
            UnitResponse,
            UnitDetailResponse,
            UnitStatisticsResponse,
        )
    ),
)]
pub struct ApiDoc;
