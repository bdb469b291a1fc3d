//! Blockage model.
//!
//! A blockage is an open incident preventing progress on an activity.
//! It is an overlay: opening or resolving one changes the activity's
//! status and writes audit entries, but never moves planned or actual
//! dates.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{ActivityId, AreaId, BlockageId, UserId};

/// An incident blocking an activity, tracked independently of its schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Blockage {
    /// Blockage identifier, unique within the project.
    pub id: BlockageId,
    /// Blocked activity.
    pub activity_id: ActivityId,
    /// Area responsible for the obstacle.
    pub area_id: AreaId,
    /// User who must clear the obstacle.
    pub responsible_id: UserId,
    /// User who reported it.
    pub reported_by: UserId,
    /// What is blocking the activity.
    pub description: String,
    /// Agreed corrective action.
    pub corrective_action: String,
    /// When the blockage was opened.
    pub opened_at: DateTime<Utc>,
    /// Date by which resolution was committed.
    pub commitment_date: NaiveDate,
    /// When the blockage was resolved, if it was.
    pub closed_at: Option<DateTime<Utc>>,
    /// Resolution notes recorded at close time.
    pub resolution_notes: Option<String>,
    /// Whether the blockage is still open.
    pub is_open: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blockage_open_state() {
        let blockage = Blockage {
            id: 1,
            activity_id: 3,
            area_id: 2,
            responsible_id: 11,
            reported_by: 12,
            description: "Missing sole mold".into(),
            corrective_action: "Expedite mold from supplier".into(),
            opened_at: Utc::now(),
            commitment_date: NaiveDate::from_ymd_opt(2025, 4, 10).unwrap(),
            closed_at: None,
            resolution_notes: None,
            is_open: true,
        };
        assert!(blockage.is_open);
        assert!(blockage.closed_at.is_none());
    }
}
