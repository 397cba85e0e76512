//! Employees repository

use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::employee::{Employee, EmployeeSummary},
};

#[derive(Clone)]
pub struct EmployeesRepository {
    pool: Pool<Postgres>,
}

impl EmployeesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List employees sorted by name, optionally for one department
    pub async fn list(&self, department_id: Option<&str>) -> AppResult<Vec<EmployeeSummary>> {
        let rows = sqlx::query_as::<_, EmployeeSummary>(
            r#"
            SELECT id, name, email, department_id
            FROM employees
            WHERE ($1::text IS NULL OR department_id = $1)
            ORDER BY name ASC
            "#,
        )
        .bind(department_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Get employee by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Employee> {
        sqlx::query_as::<_, Employee>(
            "SELECT id, name, email, phone, department_id FROM employees WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Employee with id {} not found", id)))
    }
}
