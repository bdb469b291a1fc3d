//! Cascade recalculation: duration extension and forward propagation.
//!
//! When an open activity's duration grows, its planned end moves, and the
//! move propagates down the dependency chain: each open successor starts
//! on the next business day after its predecessor's new end. Terminal
//! successors keep their dates and stop the walk through their subtree.
//!
//! The walk is an explicit worklist over `(predecessor id, new end)`
//! pairs, so chain depth never translates into stack depth.

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::error::{Result, TrackerError};
use crate::models::{ActivityId, BusinessCalendar};

use super::ProjectGraph;

/// Result of a successful extension.
#[derive(Debug, Clone, PartialEq)]
pub struct CascadeOutcome {
    /// The edited activity's duration after the extension.
    pub new_duration: u32,
    /// The edited activity's planned end after the extension.
    pub new_planned_end: NaiveDate,
    /// The project's recomputed end date (max planned end over all
    /// activities).
    pub project_end: NaiveDate,
    /// Successors whose planned dates moved, in traversal order. Does not
    /// include the edited activity itself.
    pub rescheduled: Vec<ActivityId>,
}

/// Extends an open activity's duration by `extra_days` business days and
/// reschedules its open successor chain.
///
/// - Fails with `NotFound` for an unknown activity, `InvalidActivityState`
///   when the activity is terminal. Shrinking is unsupported.
/// - The edited activity keeps its planned start; its planned end becomes
///   `planned_start + (new_duration - 1)` business days.
/// - Each open successor is re-dated to start the business day after its
///   predecessor's new end; terminal successors are left untouched and
///   their subtrees are not visited.
/// - `extra_days = 0` is a fixpoint: dates are recomputed but nothing
///   changes for a schedule that already satisfies the chain invariant.
/// - Afterwards the project's `computed_end_date` is set to the maximum
///   planned end across all activities.
pub fn extend_duration(
    graph: &mut ProjectGraph,
    activity_id: ActivityId,
    extra_days: u32,
    calendar: &BusinessCalendar,
) -> Result<CascadeOutcome> {
    let activity = graph.activity(activity_id).ok_or(TrackerError::NotFound {
        entity: "activity",
        id: activity_id,
    })?;

    if activity.status.is_terminal() {
        return Err(TrackerError::InvalidActivityState {
            activity_id,
            reason: format!("cannot extend a {:?} activity", activity.status),
        });
    }

    let new_duration = activity.duration_business_days + extra_days;
    let new_planned_end =
        calendar.add_business_days(activity.planned_start, new_duration.saturating_sub(1));

    {
        let activity = graph
            .activity_mut(activity_id)
            .ok_or(TrackerError::NotFound {
                entity: "activity",
                id: activity_id,
            })?;
        activity.duration_business_days = new_duration;
        activity.planned_end = new_planned_end;
    }

    // Forward walk: (predecessor id, predecessor's new planned end).
    let mut rescheduled = Vec::new();
    let mut worklist: Vec<(ActivityId, NaiveDate)> = vec![(activity_id, new_planned_end)];

    while let Some((predecessor_id, anchor_end)) = worklist.pop() {
        let successor_ids: Vec<ActivityId> = graph
            .activities
            .iter()
            .filter(|a| a.depends_on == Some(predecessor_id) && !a.status.is_terminal())
            .map(|a| a.id)
            .collect();

        for successor_id in successor_ids {
            let new_start = calendar.add_business_days(anchor_end, 1);
            let successor = graph
                .activity_mut(successor_id)
                .ok_or(TrackerError::NotFound {
                    entity: "activity",
                    id: successor_id,
                })?;
            let new_end = calendar
                .add_business_days(new_start, successor.duration_business_days.saturating_sub(1));
            successor.planned_start = new_start;
            successor.planned_end = new_end;

            debug!(
                activity_id = successor_id,
                %new_start,
                %new_end,
                "rescheduled successor"
            );

            rescheduled.push(successor_id);
            worklist.push((successor_id, new_end));
        }
    }

    let project_end = graph
        .activities
        .iter()
        .map(|a| a.planned_end)
        .max()
        .unwrap_or(graph.project.start_date);
    graph.project.computed_end_date = project_end;

    info!(
        project_id = graph.project.id,
        activity_id,
        extra_days,
        new_duration,
        rescheduled = rescheduled.len(),
        %project_end,
        "duration extension cascaded"
    );

    Ok(CascadeOutcome {
        new_duration,
        new_planned_end,
        project_end,
        rescheduled,
    })
}
