//! Staff authentication endpoints

use axum::{extract::State, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::staff::{LoginRequest, Role, SessionClaims},
    AppState,
};

use super::{StaffSession, DEPARTMENT_COOKIE, ROLE_COOKIE, TOKEN_COOKIE};

/// Login response
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Signed session token, also set as the `user_token` cookie
    pub token: String,
    pub token_type: String,
    pub expires_at: i64,
    pub name: String,
    pub role: Role,
    pub department_id: Option<String>,
}

fn session_cookie(name: &'static str, value: String, http_only: bool, secure: bool) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(http_only)
        .secure(secure)
        .same_site(SameSite::Lax)
        .build()
}

fn removal(name: &'static str) -> Cookie<'static> {
    Cookie::build(name).path("/").build()
}

/// Staff login
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful, session cookies set", body = LoginResponse),
        (status = 400, description = "Department login without departmentId", body = crate::error::ErrorResponse),
        (status = 401, description = "Invalid credentials", body = crate::error::ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<LoginRequest>,
) -> AppResult<(CookieJar, Json<LoginResponse>)> {
    let session = state.services.auth.login(&request).await?;
    let secure = state.config.auth.cookie_secure;
    let claims = session.claims;

    let mut jar = jar
        .add(session_cookie(TOKEN_COOKIE, session.token.clone(), true, secure))
        .add(session_cookie(ROLE_COOKIE, claims.role.as_str().to_string(), false, secure));
    jar = match &claims.department_id {
        Some(department_id) => jar.add(session_cookie(
            DEPARTMENT_COOKIE,
            department_id.clone(),
            false,
            secure,
        )),
        None => jar.remove(removal(DEPARTMENT_COOKIE)),
    };

    Ok((
        jar,
        Json(LoginResponse {
            token: session.token,
            token_type: "Bearer".to_string(),
            expires_at: claims.exp,
            name: claims.name,
            role: claims.role,
            department_id: claims.department_id,
        }),
    ))
}

/// Clear session cookies
#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "auth",
    responses(
        (status = 200, description = "Session cookies cleared")
    )
)]
pub async fn logout(jar: CookieJar) -> CookieJar {
    jar.remove(removal(TOKEN_COOKIE))
        .remove(removal(ROLE_COOKIE))
        .remove(removal(DEPARTMENT_COOKIE))
}

/// Current session
#[utoipa::path(
    get,
    path = "/auth/session",
    tag = "auth",
    security(("bearer_auth" = []), ("session_cookie" = [])),
    responses(
        (status = 200, description = "Current session claims", body = SessionClaims),
        (status = 303, description = "No valid session, redirect to login")
    )
)]
pub async fn session(StaffSession(claims): StaffSession) -> Json<SessionClaims> {
    Json(claims)
}
