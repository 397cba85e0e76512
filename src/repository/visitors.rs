//! Visitors repository

use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::visitor::{UpsertVisitor, Visitor},
};

#[derive(Clone)]
pub struct VisitorsRepository {
    pool: Pool<Postgres>,
}

impl VisitorsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Insert a visitor, or refresh the existing row with the same email
    pub async fn upsert(&self, data: &UpsertVisitor) -> AppResult<Visitor> {
        let row = sqlx::query_as::<_, Visitor>(
            r#"
            INSERT INTO visitors (name, email, phone, company, visitor_type)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (email) DO UPDATE SET
                name = EXCLUDED.name,
                phone = EXCLUDED.phone,
                company = EXCLUDED.company,
                visitor_type = EXCLUDED.visitor_type,
                updated_at = NOW()
            RETURNING id, name, email, phone, company, visitor_type, created_at
            "#,
        )
        .bind(&data.name)
        .bind(&data.email)
        .bind(&data.phone)
        .bind(&data.company)
        .bind(data.visitor_type)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }
}
