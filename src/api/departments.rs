//! Departments API endpoints

use axum::{extract::State, Json};

use crate::{error::AppResult, models::department::Department, AppState};

/// List departments
#[utoipa::path(
    get,
    path = "/departments",
    tag = "directory",
    responses(
        (status = 200, description = "All departments", body = Vec<Department>)
    )
)]
pub async fn list_departments(State(state): State<AppState>) -> AppResult<Json<Vec<Department>>> {
    let departments = state.services.directory.departments().await?;
    Ok(Json(departments))
}
