//! Visit model and related types

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};

use super::{department::Department, employee::Employee, visitor::Visitor, visitor::VisitorType};

/// Visit lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VisitStatus {
    Pending,
    Approved,
    CheckedIn,
    Completed,
    Cancelled,
}

impl VisitStatus {
    pub const ALL: [VisitStatus; 5] = [
        VisitStatus::Pending,
        VisitStatus::Approved,
        VisitStatus::CheckedIn,
        VisitStatus::Completed,
        VisitStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VisitStatus::Pending => "PENDING",
            VisitStatus::Approved => "APPROVED",
            VisitStatus::CheckedIn => "CHECKED_IN",
            VisitStatus::Completed => "COMPLETED",
            VisitStatus::Cancelled => "CANCELLED",
        }
    }
}

impl std::fmt::Display for VisitStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for VisitStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VisitStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Invalid visit status: {}", s))
    }
}

text_column!(VisitStatus);

/// Visit row from database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Visit {
    pub id: Uuid,
    pub visitor_id: Uuid,
    pub employee_id: Uuid,
    pub department_id: String,
    pub purpose: String,
    /// Requested duration in minutes
    pub time_allotted: i32,
    /// Code shown to the visitor for check-in verification
    pub unique_code: String,
    pub status: VisitStatus,
    pub created_at: DateTime<Utc>,
    pub approval_time: Option<DateTime<Utc>>,
    pub check_in_time: Option<DateTime<Utc>>,
    pub check_out_time: Option<DateTime<Utc>>,
}

/// Visit with its visitor, employee and department
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VisitDetails {
    #[serde(flatten)]
    pub visit: Visit,
    pub visitor: Visitor,
    pub employee: Employee,
    pub department: Department,
    /// Derived at response time, never stored
    pub is_overstayed: bool,
}

impl VisitDetails {
    /// Recompute the overstay flag against `now`
    pub fn with_overstay(mut self, now: DateTime<Utc>) -> Self {
        self.is_overstayed = self.visit.is_overstayed(now);
        self
    }
}

/// Internal row structure for joined visit queries
#[derive(Debug, Clone, FromRow)]
pub struct VisitDetailsRow {
    id: Uuid,
    visitor_id: Uuid,
    employee_id: Uuid,
    department_id: String,
    purpose: String,
    time_allotted: i32,
    unique_code: String,
    status: VisitStatus,
    created_at: DateTime<Utc>,
    approval_time: Option<DateTime<Utc>>,
    check_in_time: Option<DateTime<Utc>>,
    check_out_time: Option<DateTime<Utc>>,
    visitor_name: String,
    visitor_email: String,
    visitor_phone: String,
    visitor_company: Option<String>,
    visitor_type: VisitorType,
    visitor_created_at: DateTime<Utc>,
    employee_name: String,
    employee_email: String,
    employee_phone: Option<String>,
    employee_department_id: String,
    department_name: String,
}

impl From<VisitDetailsRow> for VisitDetails {
    fn from(row: VisitDetailsRow) -> Self {
        VisitDetails {
            visitor: Visitor {
                id: row.visitor_id,
                name: row.visitor_name,
                email: row.visitor_email,
                phone: row.visitor_phone,
                company: row.visitor_company,
                visitor_type: row.visitor_type,
                created_at: row.visitor_created_at,
            },
            employee: Employee {
                id: row.employee_id,
                name: row.employee_name,
                email: row.employee_email,
                phone: row.employee_phone,
                department_id: row.employee_department_id,
            },
            department: Department {
                id: row.department_id.clone(),
                name: row.department_name,
            },
            visit: Visit {
                id: row.id,
                visitor_id: row.visitor_id,
                employee_id: row.employee_id,
                department_id: row.department_id,
                purpose: row.purpose,
                time_allotted: row.time_allotted,
                unique_code: row.unique_code,
                status: row.status,
                created_at: row.created_at,
                approval_time: row.approval_time,
                check_in_time: row.check_in_time,
                check_out_time: row.check_out_time,
            },
            is_overstayed: false,
        }
    }
}

/// Visit registration request, submitted by the visitor
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterVisit {
    #[validate(length(min = 2, message = "Visitor name must be at least 2 characters"))]
    pub visitor_name: String,
    #[validate(email(message = "Invalid email format"))]
    pub visitor_email: String,
    #[validate(length(min = 10, message = "Phone number must be at least 10 characters"))]
    pub visitor_phone: String,
    pub visitor_company: Option<String>,
    pub visitor_type: VisitorType,
    pub employee_id: Uuid,
    #[validate(length(min = 1, message = "Department is required"))]
    pub department_id: String,
    #[validate(length(min = 5, message = "Purpose must be at least 5 characters"))]
    pub purpose: String,
    /// Duration in minutes
    #[validate(range(min = 1, max = 1440, message = "Time allotted must be between 1 and 1440 minutes"))]
    pub time_allotted: i32,
}

impl RegisterVisit {
    /// Strip surrounding whitespace so length rules apply to what is stored.
    /// A blank company becomes absent.
    pub fn trimmed(self) -> Self {
        Self {
            visitor_name: self.visitor_name.trim().to_string(),
            visitor_email: self.visitor_email.trim().to_string(),
            visitor_phone: self.visitor_phone.trim().to_string(),
            visitor_company: self
                .visitor_company
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty()),
            department_id: self.department_id.trim().to_string(),
            purpose: self.purpose.trim().to_string(),
            ..self
        }
    }
}

/// Fields of a new visit row
#[derive(Debug, Clone)]
pub struct NewVisit {
    pub visitor_id: Uuid,
    pub employee_id: Uuid,
    pub department_id: String,
    pub purpose: String,
    pub time_allotted: i32,
    pub unique_code: String,
}

/// Status update request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateVisitStatus {
    pub status: VisitStatus,
}

/// Visit list query parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct VisitQuery {
    /// Restrict to one department
    pub department_id: Option<String>,
    /// Restrict to one status
    pub status: Option<VisitStatus>,
    /// First registration day included (UTC, YYYY-MM-DD)
    pub from: Option<NaiveDate>,
    /// Last registration day included (UTC, YYYY-MM-DD)
    pub to: Option<NaiveDate>,
}

impl VisitQuery {
    /// Turn the query into a repository filter; days become a half-open
    /// `[from 00:00, to+1 00:00)` UTC range on `created_at`
    pub fn into_filter(self) -> AppResult<VisitFilter> {
        if let (Some(from), Some(to)) = (self.from, self.to) {
            if from > to {
                return Err(AppError::BadRequest(format!(
                    "from ({}) is after to ({})",
                    from, to
                )));
            }
        }

        let created_before = match self.to {
            Some(to) => Some(
                to.checked_add_days(Days::new(1))
                    .ok_or_else(|| AppError::BadRequest(format!("to ({}) is out of range", to)))?,
            ),
            None => None,
        };

        Ok(VisitFilter {
            department_id: self.department_id.filter(|d| !d.is_empty()),
            status: self.status,
            created_from: self.from.map(start_of_day),
            created_before: created_before.map(start_of_day),
        })
    }
}

fn start_of_day(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(chrono::NaiveTime::MIN).and_utc()
}

/// Visit list filter as applied by the repository
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisitFilter {
    pub department_id: Option<String>,
    pub status: Option<VisitStatus>,
    /// Inclusive lower bound on `created_at`
    pub created_from: Option<DateTime<Utc>>,
    /// Exclusive upper bound on `created_at`
    pub created_before: Option<DateTime<Utc>>,
}
