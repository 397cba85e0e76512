//! Overstay detection

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::visit::{Visit, VisitStatus};

/// Whether a visit checked in at `check_in_time` has run past its
/// allotted minutes at `now`.
///
/// Elapsed time counts whole minutes, truncated, so a visit is flagged
/// only once it is strictly over its allotment.
pub fn is_overstayed(
    now: DateTime<Utc>,
    check_in_time: Option<DateTime<Utc>>,
    time_allotted: i32,
) -> bool {
    match check_in_time {
        Some(check_in) => (now - check_in).num_minutes() > i64::from(time_allotted),
        None => false,
    }
}

impl Visit {
    /// Overstay only applies to visitors currently on site
    pub fn is_overstayed(&self, now: DateTime<Utc>) -> bool {
        self.status == VisitStatus::CheckedIn
            && is_overstayed(now, self.check_in_time, self.time_allotted)
    }
}

/// Remembers which visits were already reported as overstayed so each
/// one is reported once per overstay.
#[derive(Debug, Default)]
pub struct OverstayTracker {
    reported: HashSet<Uuid>,
}

impl OverstayTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the ids overstayed right now; returns those not seen before.
    /// Ids missing from `current` are forgotten.
    pub fn observe(&mut self, current: &[Uuid]) -> Vec<Uuid> {
        let current_set: HashSet<Uuid> = current.iter().copied().collect();
        self.reported.retain(|id| current_set.contains(id));

        current
            .iter()
            .copied()
            .filter(|id| self.reported.insert(*id))
            .collect()
    }
}
