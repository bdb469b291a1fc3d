//! Activity model: the project-owned instance of a template step.
//!
//! Carries the computed plan (planned start/end), real execution dates,
//! the status state machine value, and the delay counter maintained by
//! the external delay assessor.
//!
//! # Status model
//!
//! The main path is `Pending → InProgress → PendingAuthorization →
//! Completed`. `Blocked` is entered and left only through the blocking
//! overlay; `Delayed` is written only by the delay assessor; `Canceled`
//! is terminal and reachable from any non-terminal state. The numeric
//! codes are the legacy wire values and are kept stable for persistence
//! and interop.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{ActivityId, LogEntryId, ProjectId, StepId, UserId};

/// Lifecycle state of an activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActivityStatus {
    /// Not started yet (code 1).
    Pending,
    /// Being worked on (code 2).
    InProgress,
    /// Authorized and finished; terminal (code 3).
    Completed,
    /// Open and past its planned end, per the delay assessor (code 4).
    Delayed,
    /// Halted by an open blockage (code 5).
    Blocked,
    /// Submitted by the responsible, awaiting the authorizer (code 6).
    PendingAuthorization,
    /// Abandoned; terminal (code 7).
    Canceled,
}

impl ActivityStatus {
    /// Legacy wire code for this status.
    pub fn code(self) -> u8 {
        match self {
            Self::Pending => 1,
            Self::InProgress => 2,
            Self::Completed => 3,
            Self::Delayed => 4,
            Self::Blocked => 5,
            Self::PendingAuthorization => 6,
            Self::Canceled => 7,
        }
    }

    /// Parses a legacy wire code.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Pending),
            2 => Some(Self::InProgress),
            3 => Some(Self::Completed),
            4 => Some(Self::Delayed),
            5 => Some(Self::Blocked),
            6 => Some(Self::PendingAuthorization),
            7 => Some(Self::Canceled),
            _ => None,
        }
    }

    /// Whether the status closes the activity for good.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Canceled)
    }

    /// Whether the activity is still open (not terminal).
    pub fn is_open(self) -> bool {
        !self.is_terminal()
    }
}

/// A dated, stateful instance of a template step, owned by one project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    /// Activity identifier, unique within the project.
    pub id: ActivityId,
    /// Owning project.
    pub project_id: ProjectId,
    /// Template step this activity was instantiated from.
    pub template_step_id: StepId,
    /// Position in the route.
    pub order: u32,
    /// Step name carried from the template.
    pub name: String,
    /// Deliverable carried from the template.
    pub deliverable: Option<String>,
    /// Working duration in business days.
    pub duration_business_days: u32,
    /// At most one direct predecessor (chain, not DAG).
    pub depends_on: Option<ActivityId>,
    /// Computed start date.
    pub planned_start: NaiveDate,
    /// Computed end date.
    pub planned_end: NaiveDate,
    /// Date work actually began.
    pub actual_start: Option<NaiveDate>,
    /// Date work was actually signed off.
    pub actual_end: Option<NaiveDate>,
    /// Accumulated business days of delay, maintained by the external
    /// delay assessor and reset to 0 on completion.
    pub delay_days: u32,
    /// Current lifecycle state.
    pub status: ActivityStatus,
    /// User who executes the activity.
    pub responsible_id: UserId,
    /// User who signs the activity off.
    pub authorizer_id: UserId,
    /// Free-form observations.
    pub notes: Option<String>,
}

impl Activity {
    /// Whether the activity is closed (completed or canceled).
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

/// One immutable audit row per status transition or blockage event.
///
/// Entries where `status_before == status_after` are plain notes; only
/// those may be deleted, and only by their author.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityLogEntry {
    /// Entry identifier, unique within the project.
    pub id: LogEntryId,
    /// Activity the entry belongs to.
    pub activity_id: ActivityId,
    /// User who triggered the event.
    pub user_id: UserId,
    /// Status before the event.
    pub status_before: ActivityStatus,
    /// Status after the event.
    pub status_after: ActivityStatus,
    /// Supplied comment, if any.
    pub comment: Option<String>,
    /// Wall-clock time the entry was recorded.
    pub recorded_at: DateTime<Utc>,
}

impl ActivityLogEntry {
    /// Whether this entry records a plain note rather than a transition.
    pub fn is_note(&self) -> bool {
        self.status_before == self.status_after
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_round_trip() {
        for code in 1..=7u8 {
            let status = ActivityStatus::from_code(code).unwrap();
            assert_eq!(status.code(), code);
        }
        assert_eq!(ActivityStatus::from_code(0), None);
        assert_eq!(ActivityStatus::from_code(8), None);
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(ActivityStatus::Completed.is_terminal());
        assert!(ActivityStatus::Canceled.is_terminal());
        for open in [
            ActivityStatus::Pending,
            ActivityStatus::InProgress,
            ActivityStatus::Delayed,
            ActivityStatus::Blocked,
            ActivityStatus::PendingAuthorization,
        ] {
            assert!(open.is_open(), "{open:?} should be open");
        }
    }

    #[test]
    fn test_log_entry_note_detection() {
        let entry = ActivityLogEntry {
            id: 1,
            activity_id: 1,
            user_id: 9,
            status_before: ActivityStatus::InProgress,
            status_after: ActivityStatus::InProgress,
            comment: Some("supplier sample received".into()),
            recorded_at: Utc::now(),
        };
        assert!(entry.is_note());

        let transition = ActivityLogEntry {
            status_after: ActivityStatus::PendingAuthorization,
            ..entry
        };
        assert!(!transition.is_note());
    }
}
