//! Visit status state machine

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::{
    error::AppError,
    models::visit::{Visit, VisitStatus},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{from} cannot move to {to}")]
pub struct TransitionError {
    pub from: VisitStatus,
    pub to: VisitStatus,
}

impl From<TransitionError> for AppError {
    fn from(e: TransitionError) -> Self {
        AppError::InvalidTransition { from: e.from, to: e.to }
    }
}

impl VisitStatus {
    /// Statuses reachable in one step
    pub fn successors(&self) -> &'static [VisitStatus] {
        match self {
            VisitStatus::Pending => &[VisitStatus::Approved, VisitStatus::Cancelled],
            VisitStatus::Approved => &[VisitStatus::CheckedIn, VisitStatus::Cancelled],
            VisitStatus::CheckedIn => &[VisitStatus::Completed],
            VisitStatus::Completed | VisitStatus::Cancelled => &[],
        }
    }

    pub fn can_transition_to(&self, next: VisitStatus) -> bool {
        self.successors().contains(&next)
    }
}

impl Visit {
    /// Move to `target` and stamp the timestamp that transition produces.
    ///
    /// A timestamp that is already set is kept as is.
    pub fn apply_transition(
        &mut self,
        target: VisitStatus,
        at: DateTime<Utc>,
    ) -> Result<(), TransitionError> {
        if !self.status.can_transition_to(target) {
            return Err(TransitionError {
                from: self.status,
                to: target,
            });
        }

        match target {
            VisitStatus::Approved => {
                self.approval_time.get_or_insert(at);
            }
            VisitStatus::CheckedIn => {
                self.check_in_time.get_or_insert(at);
            }
            VisitStatus::Completed => {
                self.check_out_time.get_or_insert(at);
            }
            VisitStatus::Pending | VisitStatus::Cancelled => {}
        }
        self.status = target;
        Ok(())
    }
}
