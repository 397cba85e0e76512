//! Department and employee lookups for the registration form

use crate::{
    error::AppResult,
    models::{department::Department, employee::EmployeeSummary},
    repository::Repository,
};

#[derive(Clone)]
pub struct DirectoryService {
    repository: Repository,
}

impl DirectoryService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn departments(&self) -> AppResult<Vec<Department>> {
        self.repository.departments.list().await
    }

    /// Employees sorted by name, optionally for one department
    pub async fn employees(&self, department_id: Option<&str>) -> AppResult<Vec<EmployeeSummary>> {
        let department_id = department_id.filter(|d| !d.is_empty());
        self.repository.employees.list(department_id).await
    }
}
