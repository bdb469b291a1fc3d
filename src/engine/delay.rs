//! Delay assessment: raising delay counters on overdue activities.
//!
//! The core treats the delay assessor as a collaborator that owns the
//! `delay_days` counters while activities are open; this module is a
//! provided implementation for deployments that run the sweep in-process.
//! It only ever raises a counter (completion is the one thing that resets
//! it) and flips `Pending`/`InProgress` activities to `Delayed` when they
//! go overdue. `Blocked` activities accumulate delay without losing their
//! blocked status.

use chrono::NaiveDate;
use tracing::info;

use crate::models::{ActivityId, ActivityStatus, BusinessCalendar};

use super::{recompute_project_metrics, ProjectGraph};

/// One activity whose delay counter grew during a sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelayAssessment {
    /// The overdue activity.
    pub activity_id: ActivityId,
    /// Counter value before the sweep.
    pub previous_delay: u32,
    /// Counter value after the sweep.
    pub new_delay: u32,
}

/// Sweeps the graph for overdue activities as of `today`.
///
/// For every open activity whose `planned_end` is in the past, the delay
/// counter becomes the number of business days elapsed since the planned
/// end. Counters never decrease here. `Pending` and `InProgress`
/// activities are marked `Delayed`; `Blocked` and already-`Delayed` ones
/// keep their status. Terminal activities are never touched.
///
/// Returns the activities whose counters grew, largest delay first, and
/// recomputes the project rollup when anything changed.
pub fn assess_delays(
    graph: &mut ProjectGraph,
    today: NaiveDate,
    calendar: &BusinessCalendar,
) -> Vec<DelayAssessment> {
    let mut grown = Vec::new();

    for activity in &mut graph.activities {
        if activity.status.is_terminal() || activity.planned_end >= today {
            continue;
        }

        let lateness = calendar.count_business_days_between(activity.planned_end, today);
        if lateness <= activity.delay_days {
            continue;
        }

        grown.push(DelayAssessment {
            activity_id: activity.id,
            previous_delay: activity.delay_days,
            new_delay: lateness,
        });
        activity.delay_days = lateness;
        if matches!(
            activity.status,
            ActivityStatus::Pending | ActivityStatus::InProgress
        ) {
            activity.status = ActivityStatus::Delayed;
        }
    }

    if !grown.is_empty() {
        grown.sort_by(|a, b| b.new_delay.cmp(&a.new_delay));
        let (_, total) = recompute_project_metrics(graph);
        info!(
            project_id = graph.project.id,
            overdue = grown.len(),
            aggregate_delay = total,
            %today,
            "delay sweep raised counters"
        );
    }

    grown
}
