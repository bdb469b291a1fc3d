//! Blockage overlay: open incidents against activities.
//!
//! A blockage freezes an activity's status at `Blocked` and records who
//! must fix what by when. It is a pure status/audit overlay: planned
//! dates and durations are never touched, so reporting an incident never
//! reshuffles the schedule.

use chrono::{NaiveDate, Utc};
use tracing::info;

use crate::error::{Result, TrackerError};
use crate::models::{
    ActivityId, ActivityStatus, AreaId, Blockage, BlockageId, UserId,
};

use super::{recompute_project_metrics, ProjectGraph};

/// Everything needed to open a blockage against an activity.
#[derive(Debug, Clone)]
pub struct BlockageRequest {
    /// Activity to block.
    pub activity_id: ActivityId,
    /// Area the incident is attributed to.
    pub area_id: AreaId,
    /// Who must resolve it.
    pub responsible_id: UserId,
    /// Who reported it.
    pub reported_by: UserId,
    /// What is wrong.
    pub description: String,
    /// Agreed corrective action.
    pub corrective_action: String,
    /// Date the corrective action is committed for.
    pub commitment_date: NaiveDate,
}

/// Opens a blockage and moves the activity to `Blocked`.
///
/// Fails with `InvalidActivityState` if the activity is terminal or
/// already has an open blockage. The audit entry records the activity's
/// actual prior status. Planned dates are untouched.
pub fn open_blockage(graph: &mut ProjectGraph, request: BlockageRequest) -> Result<BlockageId> {
    let activity_id = request.activity_id;
    let activity = graph.activity(activity_id).ok_or(TrackerError::NotFound {
        entity: "activity",
        id: activity_id,
    })?;

    if activity.status.is_terminal() {
        return Err(TrackerError::InvalidActivityState {
            activity_id,
            reason: format!("cannot block a {:?} activity", activity.status),
        });
    }
    if graph.open_blockage_for(activity_id).is_some() {
        return Err(TrackerError::InvalidActivityState {
            activity_id,
            reason: "activity already has an open blockage".to_string(),
        });
    }

    let status_before = activity.status;
    let blockage_id = graph.allocate_blockage_id();
    graph.blockages.push(Blockage {
        id: blockage_id,
        activity_id,
        area_id: request.area_id,
        responsible_id: request.responsible_id,
        reported_by: request.reported_by,
        description: request.description.clone(),
        corrective_action: request.corrective_action,
        opened_at: Utc::now(),
        commitment_date: request.commitment_date,
        closed_at: None,
        resolution_notes: None,
        is_open: true,
    });

    if let Some(activity) = graph.activity_mut(activity_id) {
        activity.status = ActivityStatus::Blocked;
    }
    graph.append_log(
        activity_id,
        request.reported_by,
        status_before,
        ActivityStatus::Blocked,
        Some(format!("Blockage opened: {}", request.description)),
    );
    recompute_project_metrics(graph);

    info!(
        project_id = graph.project.id,
        activity_id,
        blockage_id,
        area_id = request.area_id,
        "blockage opened"
    );
    Ok(blockage_id)
}

/// Closes an open blockage and returns the activity to `InProgress` if it
/// is still `Blocked`.
///
/// Fails with `NotFound` if the blockage does not exist or is already
/// closed. Planned dates are untouched.
pub fn resolve_blockage(
    graph: &mut ProjectGraph,
    blockage_id: BlockageId,
    resolving_user: UserId,
    resolution_notes: impl Into<String>,
) -> Result<ActivityId> {
    let open = graph
        .blockage(blockage_id)
        .filter(|b| b.is_open)
        .ok_or(TrackerError::NotFound {
            entity: "blockage",
            id: blockage_id,
        })?;
    let activity_id = open.activity_id;

    let blockage = graph
        .blockages
        .iter_mut()
        .find(|b| b.id == blockage_id)
        .ok_or(TrackerError::NotFound {
            entity: "blockage",
            id: blockage_id,
        })?;
    blockage.closed_at = Some(Utc::now());
    blockage.is_open = false;
    blockage.resolution_notes = Some(resolution_notes.into());

    let status_before = graph
        .activity(activity_id)
        .map(|a| a.status)
        .unwrap_or(ActivityStatus::Blocked);
    if status_before == ActivityStatus::Blocked {
        if let Some(activity) = graph.activity_mut(activity_id) {
            activity.status = ActivityStatus::InProgress;
        }
    }
    let status_after = graph
        .activity(activity_id)
        .map(|a| a.status)
        .unwrap_or(status_before);

    graph.append_log(
        activity_id,
        resolving_user,
        status_before,
        status_after,
        Some("Blockage resolved".to_string()),
    );
    recompute_project_metrics(graph);

    info!(
        project_id = graph.project.id,
        activity_id,
        blockage_id,
        resolving_user,
        "blockage resolved"
    );
    Ok(activity_id)
}
