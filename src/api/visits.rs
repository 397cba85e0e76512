//! Visits API endpoints

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::{
    error::AppResult,
    services::export::export_filename,
    models::visit::{RegisterVisit, UpdateVisitStatus, VisitDetails, VisitQuery},
    AppState,
};

use super::StaffSession;

/// Overstayed visits query parameters
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct OverstayQuery {
    /// Restrict to one department
    pub department_id: Option<String>,
}

/// Register a visit
#[utoipa::path(
    post,
    path = "/visits",
    tag = "visits",
    request_body = RegisterVisit,
    responses(
        (status = 201, description = "Visit registered in PENDING", body = VisitDetails),
        (status = 400, description = "Invalid registration", body = crate::error::ErrorResponse),
        (status = 404, description = "Unknown department or employee", body = crate::error::ErrorResponse)
    )
)]
pub async fn register_visit(
    State(state): State<AppState>,
    Json(request): Json<RegisterVisit>,
) -> AppResult<(StatusCode, Json<VisitDetails>)> {
    let visit = state.services.visits.register(request).await?;
    Ok((StatusCode::CREATED, Json(visit)))
}

/// List visits in the session's scope
#[utoipa::path(
    get,
    path = "/visits",
    tag = "visits",
    security(("bearer_auth" = []), ("session_cookie" = [])),
    params(VisitQuery),
    responses(
        (status = 200, description = "Visits, newest first", body = Vec<VisitDetails>),
        (status = 303, description = "No session or department out of scope")
    )
)]
pub async fn list_visits(
    State(state): State<AppState>,
    StaffSession(claims): StaffSession,
    Query(query): Query<VisitQuery>,
) -> AppResult<Json<Vec<VisitDetails>>> {
    let visits = state.services.visits.list(&claims, query).await?;
    Ok(Json(visits))
}

/// Download visits in the session's scope as CSV
#[utoipa::path(
    get,
    path = "/visits/export",
    tag = "visits",
    security(("bearer_auth" = []), ("session_cookie" = [])),
    params(VisitQuery),
    responses(
        (status = 200, description = "CSV report", content_type = "text/csv", body = String),
        (status = 303, description = "No session or department out of scope")
    )
)]
pub async fn export_visits(
    State(state): State<AppState>,
    StaffSession(claims): StaffSession,
    Query(query): Query<VisitQuery>,
) -> AppResult<impl IntoResponse> {
    let report = state.services.visits.export(&claims, query).await?;
    let disposition = format!("attachment; filename=\"{}\"", export_filename(Utc::now()));

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        report,
    ))
}

/// List visitors on site past their allotted time
#[utoipa::path(
    get,
    path = "/visits/overstayed",
    tag = "visits",
    security(("bearer_auth" = []), ("session_cookie" = [])),
    params(OverstayQuery),
    responses(
        (status = 200, description = "Overstayed visits", body = Vec<VisitDetails>),
        (status = 303, description = "No session or department out of scope")
    )
)]
pub async fn list_overstayed(
    State(state): State<AppState>,
    StaffSession(claims): StaffSession,
    Query(query): Query<OverstayQuery>,
) -> AppResult<Json<Vec<VisitDetails>>> {
    let visits = state
        .services
        .visits
        .overstayed(&claims, query.department_id)
        .await?;
    Ok(Json(visits))
}

/// Get visit details
#[utoipa::path(
    get,
    path = "/visits/{id}",
    tag = "visits",
    security(("bearer_auth" = []), ("session_cookie" = [])),
    params(("id" = Uuid, Path, description = "Visit ID")),
    responses(
        (status = 200, description = "Visit details", body = VisitDetails),
        (status = 303, description = "No session or department out of scope"),
        (status = 404, description = "Visit not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_visit(
    State(state): State<AppState>,
    StaffSession(claims): StaffSession,
    Path(id): Path<Uuid>,
) -> AppResult<Json<VisitDetails>> {
    let visit = state.services.visits.get(&claims, id).await?;
    Ok(Json(visit))
}

/// Move a visit to a new status
#[utoipa::path(
    patch,
    path = "/visits/{id}",
    tag = "visits",
    security(("bearer_auth" = []), ("session_cookie" = [])),
    params(("id" = Uuid, Path, description = "Visit ID")),
    request_body = UpdateVisitStatus,
    responses(
        (status = 200, description = "Status updated", body = VisitDetails),
        (status = 303, description = "No session or department out of scope"),
        (status = 403, description = "Role may not perform this transition", body = crate::error::ErrorResponse),
        (status = 404, description = "Visit not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Illegal or concurrent transition", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_visit_status(
    State(state): State<AppState>,
    StaffSession(claims): StaffSession,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateVisitStatus>,
) -> AppResult<Json<VisitDetails>> {
    let visit = state
        .services
        .visits
        .update_status(&claims, id, request.status)
        .await?;
    Ok(Json(visit))
}
