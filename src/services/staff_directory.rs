//! Staff credential lookup
//!
//! Login goes through [`StaffDirectory`] so accounts can live in the
//! configuration file or in the database without touching the auth flow.

use async_trait::async_trait;

use crate::{
    error::AppResult,
    models::staff::{LoginRequest, Role, StaffAccount},
    repository::staff::StaffRepository,
};

use super::auth::verify_password;

#[async_trait]
pub trait StaffDirectory: Send + Sync {
    /// Account matching the credentials, if any
    async fn find_by_credentials(&self, credentials: &LoginRequest) -> AppResult<Option<StaffAccount>>;
}

/// Whether an account is in the scope a login asked for (password aside)
fn in_scope(account: &StaffAccount, credentials: &LoginRequest) -> bool {
    if account.role != credentials.role {
        return false;
    }
    if credentials.role == Role::Department
        && account.department_id.as_deref() != credentials.department_id.as_deref()
    {
        return false;
    }
    match credentials.username.as_deref() {
        Some(username) => account.username.as_deref() == Some(username),
        None => true,
    }
}

/// Accounts declared under `[[auth.staff]]`
pub struct ConfigStaffDirectory {
    accounts: Vec<StaffAccount>,
}

impl ConfigStaffDirectory {
    pub fn new(accounts: Vec<StaffAccount>) -> Self {
        Self { accounts }
    }
}

#[async_trait]
impl StaffDirectory for ConfigStaffDirectory {
    async fn find_by_credentials(&self, credentials: &LoginRequest) -> AppResult<Option<StaffAccount>> {
        Ok(self
            .accounts
            .iter()
            .filter(|account| in_scope(account, credentials))
            .find(|account| verify_password(&account.password_hash, &credentials.password))
            .cloned())
    }
}

/// Accounts stored in the `staff_accounts` table
pub struct DatabaseStaffDirectory {
    repository: StaffRepository,
}

impl DatabaseStaffDirectory {
    pub fn new(repository: StaffRepository) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl StaffDirectory for DatabaseStaffDirectory {
    async fn find_by_credentials(&self, credentials: &LoginRequest) -> AppResult<Option<StaffAccount>> {
        let department_id = match credentials.role {
            Role::Department => credentials.department_id.as_deref(),
            Role::Security => None,
        };
        let candidates = self
            .repository
            .find_candidates(credentials.role, department_id, credentials.username.as_deref())
            .await?;

        Ok(candidates
            .into_iter()
            .find(|account| verify_password(&account.password_hash, &credentials.password)))
    }
}
