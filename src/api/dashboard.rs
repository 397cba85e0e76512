//! Staff dashboard endpoint

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{
    error::{AppError, AppResult},
    lifecycle::DailySummary,
    models::{
        staff::DashboardAccess,
        visit::{VisitDetails, VisitQuery},
    },
    AppState,
};

use super::StaffSession;

/// Where security sessions asking for another view are sent
pub const SECURITY_DASHBOARD_PATH: &str = "/api/v1/dashboard?type=security";

/// Employee dashboard of one department
pub fn department_dashboard_path(department_id: &str) -> String {
    format!("/api/v1/dashboard?type=employee&departmentId={}", department_id)
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct DashboardQuery {
    /// `security` or `employee`
    #[serde(rename = "type")]
    pub view: Option<String>,
    /// Department of an employee dashboard
    pub department_id: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub view: String,
    pub department_id: Option<String>,
    /// Counts over visits registered today
    pub summary: DailySummary,
    pub visits: Vec<VisitDetails>,
}

/// Dashboard data for the session's view
#[utoipa::path(
    get,
    path = "/dashboard",
    tag = "dashboard",
    security(("bearer_auth" = []), ("session_cookie" = [])),
    params(DashboardQuery),
    responses(
        (status = 200, description = "Dashboard data", body = DashboardResponse),
        (status = 303, description = "Redirect to the session's own dashboard or to login")
    )
)]
pub async fn get_dashboard(
    State(state): State<AppState>,
    StaffSession(claims): StaffSession,
    Query(query): Query<DashboardQuery>,
) -> AppResult<Response> {
    let (view, department_id) =
        match claims.dashboard_access(query.view.as_deref(), query.department_id.as_deref()) {
            DashboardAccess::Security => ("security", None),
            DashboardAccess::Department(department_id) => ("employee", Some(department_id)),
            DashboardAccess::RedirectToSecurity => {
                return Ok(Redirect::to(SECURITY_DASHBOARD_PATH).into_response());
            }
            DashboardAccess::RedirectToDepartment(own) => {
                return Ok(Redirect::to(&department_dashboard_path(&own)).into_response());
            }
            DashboardAccess::Login => {
                return Err(AppError::LoginRequired(format!(
                    "{} session may not open dashboard {:?}",
                    claims.role, query.view
                )));
            }
        };

    let query = VisitQuery {
        department_id: department_id.clone(),
        ..VisitQuery::default()
    };
    let visits = state.services.visits.list(&claims, query).await?;
    let summary = DailySummary::from_visits(&visits, Utc::now());

    Ok(Json(DashboardResponse {
        view: view.to_string(),
        department_id,
        summary,
        visits,
    })
    .into_response())
}
