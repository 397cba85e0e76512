//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, Http, HttpAuthScheme, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, dashboard, departments, employees, health, visits};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Gatepass API",
        version = "1.0.0",
        description = "Visitor registration and gate entry REST API"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login,
        auth::logout,
        auth::session,
        // Directory
        departments::list_departments,
        employees::list_employees,
        // Visits
        visits::register_visit,
        visits::list_visits,
        visits::export_visits,
        visits::list_overstayed,
        visits::get_visit,
        visits::update_visit_status,
        // Dashboard
        dashboard::get_dashboard,
    ),
    components(
        schemas(
            // Auth
            auth::LoginResponse,
            crate::models::staff::LoginRequest,
            crate::models::staff::SessionClaims,
            crate::models::staff::Role,
            // Directory
            crate::models::department::Department,
            crate::models::employee::Employee,
            crate::models::employee::EmployeeSummary,
            // Visits
            crate::models::visit::Visit,
            crate::models::visit::VisitDetails,
            crate::models::visit::VisitStatus,
            crate::models::visit::RegisterVisit,
            crate::models::visit::UpdateVisitStatus,
            crate::models::visitor::Visitor,
            crate::models::visitor::VisitorType,
            // Dashboard
            dashboard::DashboardResponse,
            crate::lifecycle::DailySummary,
            crate::lifecycle::DepartmentActivity,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Staff authentication"),
        (name = "directory", description = "Departments and employees"),
        (name = "visits", description = "Visit registration and lifecycle"),
        (name = "dashboard", description = "Staff dashboards")
    )
)]
pub struct ApiDoc;

/// Registers the bearer header and session cookie schemes
pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let mut components = openapi.components.clone().unwrap_or_default();
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
        components.add_security_scheme(
            "session_cookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(super::TOKEN_COOKIE))),
        );
        openapi.components = Some(components);
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/health",
            "/ready",
            "/auth/login",
            "/auth/logout",
            "/auth/session",
            "/departments",
            "/employees",
            "/visits",
            "/visits/export",
            "/visits/overstayed",
            "/visits/{id}",
            "/dashboard",
        ] {
            assert!(doc.paths.paths.contains_key(path), "undocumented path {path}");
        }
        let components = doc.components.unwrap();
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
