//! Project model.
//!
//! A project is one instantiation of a route template, anchored to a
//! start date. `computed_end_date`, `aggregate_delay_days`, and
//! `progress_percent` are derived values, recomputed after every
//! activity mutation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{ProjectId, RouteId, UserId};

/// Lifecycle state of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectStatus {
    /// Open and being tracked.
    Active,
    /// No longer tracked.
    Closed,
}

/// A tracked manufacturing project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Project identifier.
    pub id: ProjectId,
    /// Route template the project was instantiated from.
    pub route_id: RouteId,
    /// Project name (model/reference).
    pub name: String,
    /// First day of development.
    pub start_date: NaiveDate,
    /// Date committed to the customer.
    pub commitment_date: NaiveDate,
    /// Derived: latest planned end across all activities.
    pub computed_end_date: NaiveDate,
    /// Date the last activity was actually signed off, if finished.
    pub actual_end_date: Option<NaiveDate>,
    /// Derived: sum of open activities' delay days.
    pub aggregate_delay_days: u32,
    /// Derived: completed activities / total activities x 100.
    pub progress_percent: f64,
    /// Lifecycle state.
    pub status: ProjectStatus,
    /// User who created the project.
    pub created_by: UserId,
}

impl Project {
    /// Whether the project is past its commitment date on `today`.
    pub fn is_past_commitment(&self, today: NaiveDate) -> bool {
        today > self.commitment_date
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_past_commitment() {
        let project = Project {
            id: 1,
            route_id: 1,
            name: "M-100".into(),
            start_date: d(2025, 3, 3),
            commitment_date: d(2025, 3, 31),
            computed_end_date: d(2025, 3, 28),
            actual_end_date: None,
            aggregate_delay_days: 0,
            progress_percent: 0.0,
            status: ProjectStatus::Active,
            created_by: 1,
        };
        assert!(!project.is_past_commitment(d(2025, 3, 31)));
        assert!(project.is_past_commitment(d(2025, 4, 1)));
    }
}
