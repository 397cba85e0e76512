//! Daily activity summary shown on dashboards

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::visit::{VisitDetails, VisitStatus};

/// Counts over the visits registered today (UTC)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailySummary {
    pub total: usize,
    pub pending: usize,
    pub approved: usize,
    pub checked_in: usize,
    pub completed: usize,
    pub cancelled: usize,
    pub overstayed: usize,
    /// Per-department breakdown, by department name
    pub departments: Vec<DepartmentActivity>,
}

/// Today's visits for one department
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentActivity {
    pub department_id: String,
    pub name: String,
    /// Visits registered today
    pub visits: usize,
    /// Of those, visitors currently on site
    pub active: usize,
}

impl DailySummary {
    pub fn from_visits(visits: &[VisitDetails], now: DateTime<Utc>) -> Self {
        let today = now.date_naive();
        let todays: Vec<&VisitDetails> = visits
            .iter()
            .filter(|details| details.visit.created_at.date_naive() == today)
            .collect();

        let mut departments: BTreeMap<(&str, &str), DepartmentActivity> = BTreeMap::new();
        for details in &todays {
            let department = &details.department;
            let entry = departments
                .entry((department.name.as_str(), department.id.as_str()))
                .or_insert_with(|| DepartmentActivity {
                    department_id: department.id.clone(),
                    name: department.name.clone(),
                    visits: 0,
                    active: 0,
                });
            entry.visits += 1;
            if details.visit.status == VisitStatus::CheckedIn {
                entry.active += 1;
            }
        }

        let summary = Self {
            departments: departments.into_values().collect(),
            ..Self::default()
        };

        todays
            .iter()
            .map(|details| &details.visit)
            .fold(summary, |mut summary, visit| {
                summary.total += 1;
                match visit.status {
                    VisitStatus::Pending => summary.pending += 1,
                    VisitStatus::Approved => summary.approved += 1,
                    VisitStatus::CheckedIn => summary.checked_in += 1,
                    VisitStatus::Completed => summary.completed += 1,
                    VisitStatus::Cancelled => summary.cancelled += 1,
                }
                if visit.is_overstayed(now) {
                    summary.overstayed += 1;
                }
                summary
            })
    }
}
