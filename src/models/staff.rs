//! Staff accounts, session claims and the access rules tied to them

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::visit::VisitStatus;
use crate::error::{AppError, AppResult};

/// Staff role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Gate security: sees every department
    Security,
    /// Department desk: scoped to one department
    Department,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Security => "security",
            Role::Department => "department",
        }
    }

    /// Lifecycle edges this role may perform
    pub fn may_transition(&self, from: VisitStatus, to: VisitStatus) -> bool {
        use VisitStatus::*;
        match self {
            Role::Security => matches!(
                (from, to),
                (Pending, Approved)
                    | (Pending, Cancelled)
                    | (Approved, CheckedIn)
                    | (Approved, Cancelled)
                    | (CheckedIn, Completed)
            ),
            Role::Department => matches!(
                (from, to),
                (Pending, Approved)
                    | (Pending, Cancelled)
                    | (Approved, Cancelled)
                    | (CheckedIn, Completed)
            ),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "security" => Ok(Role::Security),
            "department" => Ok(Role::Department),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

text_column!(Role);

/// Staff account as stored in configuration or the `staff_accounts` table
#[derive(Debug, Clone, Deserialize, FromRow)]
pub struct StaffAccount {
    pub id: String,
    pub name: String,
    pub username: Option<String>,
    pub role: Role,
    pub department_id: Option<String>,
    /// Argon2 PHC string
    pub password_hash: String,
}

/// Login request
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Optional, narrows the lookup when several accounts share a role
    pub username: Option<String>,
    pub password: String,
    pub role: Role,
    /// Required for the department role
    pub department_id: Option<String>,
}

/// What a session may see on the dashboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardAccess {
    Security,
    Department(String),
    /// Security asked for another view; send it to its own
    RedirectToSecurity,
    /// Department asked for another department; send it to its own
    RedirectToDepartment(String),
    Login,
}

/// Signed session token claims
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionClaims {
    pub sub: String,
    pub name: String,
    pub role: Role,
    pub department_id: Option<String>,
    pub exp: i64,
    pub iat: i64,
}

impl SessionClaims {
    /// Build claims for an authenticated account
    pub fn for_account(account: &StaffAccount, expiration_hours: u64) -> Self {
        let now = Utc::now();
        Self {
            sub: account.id.clone(),
            name: account.name.clone(),
            role: account.role,
            department_id: account.department_id.clone(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(expiration_hours as i64)).timestamp(),
        }
    }

    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    /// Department filter to apply when listing visits.
    ///
    /// Security keeps whatever it asked for (`None` = every department).
    /// A department session is pinned to its own department; asking for
    /// another one sends it back to login. An empty request means no filter.
    pub fn visible_department(&self, requested: Option<&str>) -> AppResult<Option<String>> {
        let requested = requested.filter(|d| !d.is_empty());
        match self.role {
            Role::Security => Ok(requested.map(str::to_string)),
            Role::Department => {
                let own = self.own_department()?;
                match requested {
                    Some(requested) if requested != own => Err(AppError::LoginRequired(format!(
                        "department {} may not view department {}",
                        own, requested
                    ))),
                    _ => Ok(Some(own.to_string())),
                }
            }
        }
    }

    /// Require that this session covers a visit of `department_id`
    pub fn require_department(&self, department_id: &str) -> AppResult<()> {
        self.visible_department(Some(department_id)).map(|_| ())
    }

    /// Require that this session's role may move a visit from `from` to `to`
    pub fn require_transition(&self, from: VisitStatus, to: VisitStatus) -> AppResult<()> {
        if self.role.may_transition(from, to) {
            Ok(())
        } else {
            Err(AppError::Authorization(format!(
                "Role {} may not move a visit from {} to {}",
                self.role, from, to
            )))
        }
    }

    /// Decide which dashboard a navigation request may see
    pub fn dashboard_access(&self, view: Option<&str>, department_id: Option<&str>) -> DashboardAccess {
        match self.role {
            Role::Security if view == Some("security") => DashboardAccess::Security,
            Role::Security => DashboardAccess::RedirectToSecurity,
            Role::Department => match (self.department_id.as_deref(), view) {
                (Some(own), Some("employee")) if department_id == Some(own) => {
                    DashboardAccess::Department(own.to_string())
                }
                (Some(own), Some("employee")) => DashboardAccess::RedirectToDepartment(own.to_string()),
                _ => DashboardAccess::Login,
            },
        }
    }

    fn own_department(&self) -> AppResult<&str> {
        self.department_id
            .as_deref()
            .ok_or_else(|| AppError::LoginRequired("department session without department".to_string()))
    }
}
