//! Employees API endpoints

use axum::{
    extract::{Query, State},
    Json,
};

use crate::{
    error::AppResult,
    models::employee::{EmployeeQuery, EmployeeSummary},
    AppState,
};

/// List employees, optionally for one department
#[utoipa::path(
    get,
    path = "/employees",
    tag = "directory",
    params(EmployeeQuery),
    responses(
        (status = 200, description = "Employees sorted by name", body = Vec<EmployeeSummary>)
    )
)]
pub async fn list_employees(
    State(state): State<AppState>,
    Query(query): Query<EmployeeQuery>,
) -> AppResult<Json<Vec<EmployeeSummary>>> {
    let employees = state
        .services
        .directory
        .employees(query.department_id.as_deref())
        .await?;
    Ok(Json(employees))
}
