//! Repository layer for database operations

pub mod departments;
pub mod employees;
pub mod staff;
pub mod visitors;
pub mod visits;

use sqlx::{Pool, Postgres};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub departments: departments::DepartmentsRepository,
    pub employees: employees::EmployeesRepository,
    pub staff: staff::StaffRepository,
    pub visitors: visitors::VisitorsRepository,
    pub visits: visits::VisitsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            departments: departments::DepartmentsRepository::new(pool.clone()),
            employees: employees::EmployeesRepository::new(pool.clone()),
            staff: staff::StaffRepository::new(pool.clone()),
            visitors: visitors::VisitorsRepository::new(pool.clone()),
            visits: visits::VisitsRepository::new(pool.clone()),
            pool,
        }
    }

    /// Round-trip to the database, used by the readiness probe
    pub async fn ping(&self) -> crate::error::AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
