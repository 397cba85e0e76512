//! Visit registration and lifecycle service

use chrono::{DateTime, Utc};
use uuid::Uuid;
use validator::Validate;

use super::notifications::{Notification, NotificationDispatcher};
use crate::{
    error::{AppError, AppResult},
    lifecycle::generate_unique_code,
    models::{
        staff::SessionClaims,
        visit::{NewVisit, RegisterVisit, Visit, VisitDetails, VisitQuery, VisitStatus},
        visitor::UpsertVisitor,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct VisitsService {
    repository: Repository,
    notifications: NotificationDispatcher,
}

impl VisitsService {
    pub fn new(repository: Repository, notifications: NotificationDispatcher) -> Self {
        Self {
            repository,
            notifications,
        }
    }

    /// Register a visit in PENDING and notify the employee being visited
    pub async fn register(&self, request: RegisterVisit) -> AppResult<VisitDetails> {
        let request = request.trimmed();
        request.validate()?;

        let department = self
            .repository
            .departments
            .get_by_id(&request.department_id)
            .await?;
        let employee = self.repository.employees.get_by_id(request.employee_id).await?;
        if employee.department_id != department.id {
            return Err(AppError::Validation(format!(
                "Employee {} does not belong to department {}",
                employee.id, department.id
            )));
        }

        let visitor = self
            .repository
            .visitors
            .upsert(&UpsertVisitor {
                name: request.visitor_name,
                email: request.visitor_email,
                phone: request.visitor_phone,
                company: request.visitor_company,
                visitor_type: request.visitor_type,
            })
            .await?;

        let visit = self
            .repository
            .visits
            .create(&NewVisit {
                visitor_id: visitor.id,
                employee_id: employee.id,
                department_id: department.id,
                purpose: request.purpose,
                time_allotted: request.time_allotted,
                unique_code: generate_unique_code(),
            })
            .await?;

        tracing::info!(
            visit = %visit.id,
            department = %visit.department_id,
            employee = %employee.id,
            "Visit registered"
        );

        self.notifications
            .dispatch(Notification::visitor_registered(&visitor.name, &employee));

        self.repository.visits.get_details(visit.id).await
    }

    /// List visits the session may see, newest first
    pub async fn list(&self, claims: &SessionClaims, query: VisitQuery) -> AppResult<Vec<VisitDetails>> {
        let mut filter = query.into_filter()?;
        filter.department_id = claims.visible_department(filter.department_id.as_deref())?;

        let now = Utc::now();
        let visits = self.repository.visits.list(&filter).await?;
        Ok(visits.into_iter().map(|v| v.with_overstay(now)).collect())
    }

    /// Visits on site past their allotted time
    pub async fn overstayed(
        &self,
        claims: &SessionClaims,
        department_id: Option<String>,
    ) -> AppResult<Vec<VisitDetails>> {
        let query = VisitQuery {
            department_id,
            status: Some(VisitStatus::CheckedIn),
            ..VisitQuery::default()
        };
        let visits = self.list(claims, query).await?;
        Ok(visits.into_iter().filter(|v| v.is_overstayed).collect())
    }

    /// Visits in scope rendered as a CSV report
    pub async fn export(&self, claims: &SessionClaims, query: VisitQuery) -> AppResult<Vec<u8>> {
        let visits = self.list(claims, query).await?;
        tracing::info!(staff = %claims.sub, rows = visits.len(), "Visit report exported");
        super::export::visits_csv(&visits)
    }

    /// Get one visit, checking the session covers its department
    pub async fn get(&self, claims: &SessionClaims, id: Uuid) -> AppResult<VisitDetails> {
        let details = self.repository.visits.get_details(id).await?;
        claims.require_department(&details.visit.department_id)?;
        Ok(details.with_overstay(Utc::now()))
    }

    /// Move a visit along its lifecycle and notify the visitor
    pub async fn update_status(
        &self,
        claims: &SessionClaims,
        id: Uuid,
        target: VisitStatus,
    ) -> AppResult<VisitDetails> {
        let mut visit = self.repository.visits.get_by_id(id).await?;
        let now = Utc::now();
        let observed = authorize_transition(claims, &mut visit, target, now)?;

        let applied = self.repository.visits.update_status(&visit, observed).await?;
        if !applied {
            // Someone else moved it after we read it
            let current = self.repository.visits.get_by_id(id).await?;
            return Err(AppError::InvalidTransition {
                from: current.status,
                to: target,
            });
        }

        tracing::info!(
            visit = %id,
            from = %observed,
            to = %target,
            staff = %claims.sub,
            "Visit status updated"
        );

        let details = self.repository.visits.get_details(id).await?;
        self.notifications
            .dispatch(Notification::status_changed(&details));

        Ok(details.with_overstay(now))
    }
}

/// Check a status change against the session and apply it to `visit` in
/// memory. Returns the status the visit had, for the conditional write.
///
/// Scope is checked first (login redirect), then the lifecycle edge
/// (409), then the role (403).
fn authorize_transition(
    claims: &SessionClaims,
    visit: &mut Visit,
    target: VisitStatus,
    at: DateTime<Utc>,
) -> AppResult<VisitStatus> {
    claims.require_department(&visit.department_id)?;

    let observed = visit.status;
    visit.apply_transition(target, at)?;
    claims.require_transition(observed, target)?;
    Ok(observed)
}
