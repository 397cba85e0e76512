//! API handlers for Gatepass REST endpoints

pub mod auth;
pub mod dashboard;
pub mod departments;
pub mod employees;
pub mod health;
pub mod openapi;
pub mod visits;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
    routing::{get, post},
    Router,
};
use axum_extra::extract::cookie::CookieJar;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{error::AppError, models::staff::SessionClaims, AppState};

/// Signed session token
pub const TOKEN_COOKIE: &str = "user_token";
/// Plaintext role hint read by the frontend
pub const ROLE_COOKIE: &str = "user_role";
/// Plaintext department hint read by the frontend
pub const DEPARTMENT_COOKIE: &str = "department_id";

/// Extractor for an authenticated staff session.
///
/// The token comes from the `user_token` cookie or a Bearer header.
/// Any failure, including plaintext cookies that disagree with the
/// signed claims, is answered with a redirect to the login page.
pub struct StaffSession(pub SessionClaims);

#[async_trait]
impl FromRequestParts<AppState> for StaffSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);

        let bearer = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::to_string);

        let token = jar
            .get(TOKEN_COOKIE)
            .map(|c| c.value().to_string())
            .or(bearer)
            .ok_or_else(|| AppError::LoginRequired("no session token".to_string()))?;

        let claims = state.services.auth.verify_token(&token)?;

        if let Some(role) = jar.get(ROLE_COOKIE) {
            if role.value() != claims.role.as_str() {
                return Err(AppError::LoginRequired(format!(
                    "role cookie {} does not match session",
                    role.value()
                )));
            }
        }
        if let Some(department) = jar.get(DEPARTMENT_COOKIE) {
            if claims.department_id.as_deref() != Some(department.value()) {
                return Err(AppError::LoginRequired(format!(
                    "department cookie {} does not match session",
                    department.value()
                )));
            }
        }

        Ok(StaffSession(claims))
    }
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Authentication
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/session", get(auth::session))
        // Registration form lookups
        .route("/departments", get(departments::list_departments))
        .route("/employees", get(employees::list_employees))
        // Visits
        .route("/visits", get(visits::list_visits).post(visits::register_visit))
        .route("/visits/export", get(visits::export_visits))
        .route("/visits/overstayed", get(visits::list_overstayed))
        .route("/visits/:id", get(visits::get_visit).patch(visits::update_visit_status))
        // Dashboard
        .route("/dashboard", get(dashboard::get_dashboard))
        .with_state(state);

    // OpenAPI documentation
    let openapi = openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{
            header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE},
            Request, StatusCode,
        },
        Router,
    };
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use super::*;
    use crate::{
        config::{AppConfig, StaffSource},
        models::staff::{Role, StaffAccount},
        repository::Repository,
        services::{auth::hash_password, Services},
    };

    fn account(id: &str, role: Role, department_id: Option<&str>, password: &str) -> StaffAccount {
        StaffAccount {
            id: id.into(),
            name: id.into(),
            username: None,
            role,
            department_id: department_id.map(str::to_string),
            password_hash: hash_password(password).unwrap(),
        }
    }

    fn account_without_password(role: Role, department_id: Option<&str>) -> StaffAccount {
        StaffAccount {
            id: "staff".into(),
            name: "Staff".into(),
            username: None,
            role,
            department_id: department_id.map(str::to_string),
            password_hash: String::new(),
        }
    }

    /// Router over a pool that never connects; tests only hit paths
    /// that resolve before touching the database.
    fn app(staff: Vec<StaffAccount>) -> (Router, AppConfig) {
        let mut config = AppConfig::default();
        config.auth.staff_source = StaffSource::Config;
        config.auth.staff = staff;

        let pool = PgPoolOptions::new()
            .connect_lazy(&config.database.url)
            .unwrap();
        let services = Services::new(Repository::new(pool), &config).unwrap();
        let state = AppState {
            config: Arc::new(config.clone()),
            services: Arc::new(services),
        };
        (create_router(state), config)
    }

    fn token(config: &AppConfig, role: Role, department_id: Option<&str>) -> String {
        let claims = SessionClaims::for_account(&account_without_password(role, department_id), 1);
        claims.create_token(&config.auth.jwt_secret).unwrap()
    }

    fn get(uri: &str, cookie: Option<String>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(COOKIE, cookie);
        }
        builder.body(Body::empty()).unwrap()
    }

    fn login(body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/v1/auth/login")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn health_is_public() {
        let (app, _) = app(Vec::new());
        let response = app.oneshot(get("/api/v1/health", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn missing_session_redirects_to_login() {
        let (app, _) = app(Vec::new());
        let response = app.oneshot(get("/api/v1/visits", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[LOCATION], "/login");
    }

    #[tokio::test]
    async fn department_cannot_list_other_department() {
        let (app, config) = app(Vec::new());
        let cookie = format!("user_token={}", token(&config, Role::Department, Some("rd")));
        let response = app
            .oneshot(get("/api/v1/visits?departmentId=hr", Some(cookie)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[LOCATION], "/login");
    }

    #[tokio::test]
    async fn mismatched_role_cookie_redirects_to_login() {
        let (app, config) = app(Vec::new());
        let cookie = format!(
            "user_token={}; user_role=security",
            token(&config, Role::Department, Some("rd"))
        );
        let response = app.oneshot(get("/api/v1/auth/session", Some(cookie))).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }

    #[tokio::test]
    async fn bearer_token_opens_session() {
        let (app, config) = app(Vec::new());
        let request = Request::builder()
            .uri("/api/v1/auth/session")
            .header(
                AUTHORIZATION,
                format!("Bearer {}", token(&config, Role::Department, Some("hr"))),
            )
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let claims: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(claims["role"], "department");
        assert_eq!(claims["departmentId"], "hr");
    }

    #[tokio::test]
    async fn security_is_sent_to_its_own_dashboard() {
        let (app, config) = app(Vec::new());
        let cookie = format!("user_token={}", token(&config, Role::Security, None));
        let response = app
            .oneshot(get("/api/v1/dashboard?type=employee&departmentId=hr", Some(cookie)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[LOCATION], dashboard::SECURITY_DASHBOARD_PATH);
    }

    #[tokio::test]
    async fn department_is_sent_to_its_own_dashboard() {
        let (app, config) = app(Vec::new());
        let cookie = format!("user_token={}", token(&config, Role::Department, Some("rd")));
        let response = app
            .oneshot(get("/api/v1/dashboard?type=employee&departmentId=hr", Some(cookie)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers()[LOCATION],
            "/api/v1/dashboard?type=employee&departmentId=rd"
        );
    }

    #[tokio::test]
    async fn export_requires_session() {
        let (app, _) = app(Vec::new());
        let response = app
            .oneshot(get("/api/v1/visits/export?from=2025-03-01&to=2025-03-31", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[LOCATION], "/login");
    }

    #[tokio::test]
    async fn reversed_export_range_is_rejected() {
        let (app, config) = app(Vec::new());
        let cookie = format!("user_token={}", token(&config, Role::Security, None));
        let response = app
            .oneshot(get("/api/v1/visits/export?from=2025-03-31&to=2025-03-01", Some(cookie)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn department_export_of_other_department_goes_to_login() {
        let (app, config) = app(Vec::new());
        let cookie = format!("user_token={}", token(&config, Role::Department, Some("rd")));
        let response = app
            .oneshot(get("/api/v1/visits/export?departmentId=hr", Some(cookie)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[LOCATION], "/login");
    }

    #[tokio::test]
    async fn department_asking_for_security_dashboard_goes_to_login() {
        let (app, config) = app(Vec::new());
        let cookie = format!("user_token={}", token(&config, Role::Department, Some("rd")));
        let response = app
            .oneshot(get("/api/v1/dashboard?type=security", Some(cookie)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[LOCATION], "/login");
    }

    #[tokio::test]
    async fn login_with_unknown_credentials_is_unauthorized() {
        let (app, _) = app(Vec::new());
        let response = app
            .oneshot(login(serde_json::json!({ "password": "nope", "role": "security" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn department_login_requires_department() {
        let (app, _) = app(Vec::new());
        let response = app
            .oneshot(login(serde_json::json!({ "password": "hr123", "role": "department" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn login_sets_session_cookies() {
        let (app, _) = app(vec![account("hr_1", Role::Department, Some("hr"), "hr123")]);
        let response = app
            .oneshot(login(serde_json::json!({
                "password": "hr123",
                "role": "department",
                "departmentId": "hr"
            })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let cookies: Vec<String> = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok().map(str::to_string))
            .collect();
        let token = cookies
            .iter()
            .find(|c| c.starts_with("user_token="))
            .expect("session cookie");
        assert!(token.contains("HttpOnly"));
        assert!(token.contains("SameSite=Lax"));
        assert!(cookies.iter().any(|c| c.starts_with("user_role=department")));
        assert!(cookies.iter().any(|c| c.starts_with("department_id=hr")));
    }
}
