//! Background overstay monitor
//!
//! Periodically loads the visitors currently on site and logs a warning
//! the first time each one runs past its allotted time. Read-only: no
//! visit is ever changed from here.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::{
    error::AppResult,
    lifecycle::OverstayTracker,
    models::visit::{VisitDetails, VisitFilter, VisitStatus},
    repository::Repository,
};

pub struct OverstayMonitor {
    repository: Repository,
    interval: Duration,
    tracker: OverstayTracker,
}

impl OverstayMonitor {
    pub fn new(repository: Repository, interval: Duration) -> Self {
        Self {
            repository,
            interval,
            tracker: OverstayTracker::new(),
        }
    }

    /// Run forever on a tokio task; the first scan happens immediately
    pub fn spawn(mut self) -> JoinHandle<()> {
        tokio::spawn(async move {
            tracing::info!(
                interval_secs = self.interval.as_secs(),
                "Overstay monitor started"
            );
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                if let Err(e) = self.scan().await {
                    tracing::error!("Overstay scan failed: {}", e);
                }
            }
        })
    }

    /// One pass; returns how many visits were newly reported
    pub async fn scan(&mut self) -> AppResult<usize> {
        let on_site = self
            .repository
            .visits
            .list(&VisitFilter {
                status: Some(VisitStatus::CheckedIn),
                ..VisitFilter::default()
            })
            .await?;
        Ok(self.report(&on_site, Utc::now()))
    }

    fn report(&mut self, on_site: &[VisitDetails], now: DateTime<Utc>) -> usize {
        let overstayed: Vec<&VisitDetails> = on_site
            .iter()
            .filter(|v| v.visit.is_overstayed(now))
            .collect();
        let ids: Vec<Uuid> = overstayed.iter().map(|v| v.visit.id).collect();
        let fresh = self.tracker.observe(&ids);

        for details in overstayed.iter().filter(|v| fresh.contains(&v.visit.id)) {
            let minutes = details
                .visit
                .check_in_time
                .map(|t| (now - t).num_minutes())
                .unwrap_or_default();
            tracing::warn!(
                visit = %details.visit.id,
                visitor = %details.visitor.name,
                department = %details.department.id,
                allotted = details.visit.time_allotted,
                elapsed = minutes,
                "Visitor has overstayed"
            );
        }

        fresh.len()
    }
}
