//! Visits repository

use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::visit::{NewVisit, Visit, VisitDetails, VisitDetailsRow, VisitFilter, VisitStatus},
};

/// Visit columns joined with visitor, employee and department
const DETAILS_SELECT: &str = r#"
    SELECT v.id, v.visitor_id, v.employee_id, v.department_id, v.purpose,
           v.time_allotted, v.unique_code, v.status, v.created_at,
           v.approval_time, v.check_in_time, v.check_out_time,
           vi.name AS visitor_name, vi.email AS visitor_email,
           vi.phone AS visitor_phone, vi.company AS visitor_company,
           vi.visitor_type, vi.created_at AS visitor_created_at,
           e.name AS employee_name, e.email AS employee_email,
           e.phone AS employee_phone, e.department_id AS employee_department_id,
           d.name AS department_name
    FROM visits v
    JOIN visitors vi ON vi.id = v.visitor_id
    JOIN employees e ON e.id = v.employee_id
    JOIN departments d ON d.id = v.department_id
"#;

#[derive(Clone)]
pub struct VisitsRepository {
    pool: Pool<Postgres>,
}

impl VisitsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get visit by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Visit> {
        sqlx::query_as::<_, Visit>("SELECT * FROM visits WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Visit with id {} not found", id)))
    }

    /// Get visit with its associations
    pub async fn get_details(&self, id: Uuid) -> AppResult<VisitDetails> {
        let query = format!("{} WHERE v.id = $1", DETAILS_SELECT);
        sqlx::query_as::<_, VisitDetailsRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(VisitDetails::from)
            .ok_or_else(|| AppError::NotFound(format!("Visit with id {} not found", id)))
    }

    /// List visits newest first, narrowed by whichever filter fields are set
    pub async fn list(&self, filter: &VisitFilter) -> AppResult<Vec<VisitDetails>> {
        let mut conditions = Vec::new();
        let mut idx = 1;

        if filter.department_id.is_some() {
            conditions.push(format!("v.department_id = ${}", idx));
            idx += 1;
        }
        if filter.status.is_some() {
            conditions.push(format!("v.status = ${}", idx));
            idx += 1;
        }
        if filter.created_from.is_some() {
            conditions.push(format!("v.created_at >= ${}", idx));
            idx += 1;
        }
        if filter.created_before.is_some() {
            conditions.push(format!("v.created_at < ${}", idx));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query = format!(
            "{} {} ORDER BY v.created_at DESC",
            DETAILS_SELECT, where_clause
        );

        let mut builder = sqlx::query_as::<_, VisitDetailsRow>(&query);
        if let Some(department_id) = &filter.department_id {
            builder = builder.bind(department_id);
        }
        if let Some(status) = filter.status {
            builder = builder.bind(status);
        }
        if let Some(created_from) = filter.created_from {
            builder = builder.bind(created_from);
        }
        if let Some(created_before) = filter.created_before {
            builder = builder.bind(created_before);
        }

        let rows = builder.fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(VisitDetails::from).collect())
    }

    /// Create a new visit in PENDING
    pub async fn create(&self, data: &NewVisit) -> AppResult<Visit> {
        let row = sqlx::query_as::<_, Visit>(
            r#"
            INSERT INTO visits (visitor_id, employee_id, department_id, purpose, time_allotted, unique_code, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(data.visitor_id)
        .bind(data.employee_id)
        .bind(&data.department_id)
        .bind(&data.purpose)
        .bind(data.time_allotted)
        .bind(&data.unique_code)
        .bind(VisitStatus::Pending)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                AppError::Conflict("Visit code already in use".to_string())
            }
            other => AppError::Database(other),
        })?;

        Ok(row)
    }

    /// Persist a status transition computed on `next`.
    ///
    /// The write only applies while the stored status is still `expected`;
    /// returns false when another writer got there first. Timestamps
    /// already set in the row are never replaced.
    pub async fn update_status(&self, next: &Visit, expected: VisitStatus) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE visits SET
                status = $2,
                approval_time = COALESCE(approval_time, $3),
                check_in_time = COALESCE(check_in_time, $4),
                check_out_time = COALESCE(check_out_time, $5)
            WHERE id = $1 AND status = $6
            "#,
        )
        .bind(next.id)
        .bind(next.status)
        .bind(next.approval_time)
        .bind(next.check_in_time)
        .bind(next.check_out_time)
        .bind(expected)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}
