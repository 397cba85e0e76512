//! Staff accounts repository

use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::staff::{Role, StaffAccount},
};

#[derive(Clone)]
pub struct StaffRepository {
    pool: Pool<Postgres>,
}

impl StaffRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Accounts that could match a login attempt; the password is checked
    /// by the caller
    pub async fn find_candidates(
        &self,
        role: Role,
        department_id: Option<&str>,
        username: Option<&str>,
    ) -> AppResult<Vec<StaffAccount>> {
        let rows = sqlx::query_as::<_, StaffAccount>(
            r#"
            SELECT id, name, username, role, department_id, password_hash
            FROM staff_accounts
            WHERE role = $1
              AND ($2::text IS NULL OR department_id = $2)
              AND ($3::text IS NULL OR username = $3)
            ORDER BY id
            "#,
        )
        .bind(role)
        .bind(department_id)
        .bind(username)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
