//! Activity status state machine.
//!
//! Validates and applies status transitions:
//!
//! ```text
//! Pending(1) → InProgress(2) → PendingAuthorization(6) → Completed(3)
//! ```
//!
//! `Blocked(5)` is reachable only through the blocking overlay and
//! `Delayed(4)` only through the delay assessor — neither is a valid
//! direct target here. `Canceled(7)` is terminal and reachable from any
//! non-terminal state.
//!
//! All gates run before the first mutation: a rejected transition leaves
//! the activity, the log, and the project metrics untouched.

use chrono::NaiveDate;
use tracing::info;

use crate::error::{Result, TrackerError};
use crate::models::{ActivityId, ActivityStatus, UserId};

use super::{recompute_project_metrics, ProjectGraph};

/// Result of a successful transition.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionOutcome {
    /// Status before the transition.
    pub status_before: ActivityStatus,
    /// Status after the transition.
    pub status_after: ActivityStatus,
    /// The activity's delay counter after the transition.
    pub activity_delay_days: u32,
    /// The project's aggregate delay after the rollup.
    pub project_delay_days: u32,
    /// The project's progress after the rollup.
    pub progress_percent: f64,
}

/// Applies a status transition to an activity.
///
/// Gates, in order:
/// 1. The activity must exist (`NotFound`).
/// 2. `Blocked` and `Delayed` are not direct targets
///    (`InvalidActivityState`).
/// 3. The current status must not be terminal (`InvalidActivityState`).
/// 4. Entering `InProgress` requires the dependency, if any, to be
///    `Completed` (`DependencyNotSatisfied`).
/// 5. Entering `PendingAuthorization` requires the acting user to be the
///    responsible (`NotResponsible`).
/// 6. Entering `Completed` requires the acting user to be the authorizer
///    (`NotAuthorizer`).
///
/// Effects on success:
/// - `Completed`: `actual_end = today`, `delay_days = 0`.
/// - `InProgress`: stamps `actual_start` if unset, clears `actual_end`;
///   the delay counter is left to the external assessor.
/// - `Pending`: clears `actual_end`.
/// - One audit entry is appended and the project rollup recomputed.
pub fn apply_transition(
    graph: &mut ProjectGraph,
    activity_id: ActivityId,
    new_status: ActivityStatus,
    acting_user: UserId,
    comment: Option<String>,
    today: NaiveDate,
) -> Result<TransitionOutcome> {
    let activity = graph.activity(activity_id).ok_or(TrackerError::NotFound {
        entity: "activity",
        id: activity_id,
    })?;
    let status_before = activity.status;

    if matches!(new_status, ActivityStatus::Blocked | ActivityStatus::Delayed) {
        return Err(TrackerError::InvalidActivityState {
            activity_id,
            reason: format!("{new_status:?} is not a direct transition target"),
        });
    }

    if status_before.is_terminal() {
        return Err(TrackerError::InvalidActivityState {
            activity_id,
            reason: format!("activity is already {status_before:?}"),
        });
    }

    if new_status == ActivityStatus::InProgress {
        if let Some(dependency_id) = activity.depends_on {
            let dep_completed = graph
                .activity(dependency_id)
                .map(|d| d.status == ActivityStatus::Completed)
                .unwrap_or(false);
            if !dep_completed {
                return Err(TrackerError::DependencyNotSatisfied {
                    activity_id,
                    dependency_id,
                });
            }
        }
    }

    if new_status == ActivityStatus::PendingAuthorization && acting_user != activity.responsible_id
    {
        return Err(TrackerError::NotResponsible {
            user_id: acting_user,
            activity_id,
        });
    }

    if new_status == ActivityStatus::Completed && acting_user != activity.authorizer_id {
        return Err(TrackerError::NotAuthorizer {
            user_id: acting_user,
            activity_id,
        });
    }

    // All gates passed; mutate.
    let activity = graph
        .activity_mut(activity_id)
        .ok_or(TrackerError::NotFound {
            entity: "activity",
            id: activity_id,
        })?;
    activity.status = new_status;
    match new_status {
        ActivityStatus::Completed => {
            activity.actual_end = Some(today);
            activity.delay_days = 0;
        }
        ActivityStatus::InProgress => {
            activity.actual_start.get_or_insert(today);
            activity.actual_end = None;
        }
        ActivityStatus::Pending => {
            activity.actual_end = None;
        }
        _ => {}
    }
    let activity_delay_days = activity.delay_days;

    graph.append_log(activity_id, acting_user, status_before, new_status, comment);
    let (progress_percent, project_delay_days) = recompute_project_metrics(graph);

    info!(
        project_id = graph.project.id,
        activity_id,
        from = ?status_before,
        to = ?new_status,
        acting_user,
        "activity transition applied"
    );

    Ok(TransitionOutcome {
        status_before,
        status_after: new_status,
        activity_delay_days,
        project_delay_days,
        progress_percent,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::instantiate_route;
    use crate::models::{BusinessCalendar, RouteTemplate, TemplateStep};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    /// Two chained activities; responsible 10, authorizer 20 on both.
    fn chained_graph() -> ProjectGraph {
        let template = RouteTemplate::new(1, "r", 5)
            .with_step(TemplateStep::new(1, 1, 3, 1).with_responsible(10).with_authorizer(20))
            .with_step(
                TemplateStep::new(2, 2, 2, 4)
                    .with_responsible(10)
                    .with_authorizer(20)
                    .with_dependency(1),
            );
        instantiate_route(1, "M", &template, d(2025, 1, 6), d(2025, 1, 31), 1, &BusinessCalendar::new())
    }

    fn complete_activity(graph: &mut ProjectGraph, id: ActivityId, today: NaiveDate) {
        apply_transition(graph, id, ActivityStatus::InProgress, 10, None, today).unwrap();
        apply_transition(graph, id, ActivityStatus::PendingAuthorization, 10, None, today).unwrap();
        apply_transition(graph, id, ActivityStatus::Completed, 20, None, today).unwrap();
    }

    #[test]
    fn test_happy_path_to_completion() {
        let mut graph = chained_graph();
        let today = d(2025, 1, 8);
        complete_activity(&mut graph, 1, today);

        let a = graph.activity(1).unwrap();
        assert_eq!(a.status, ActivityStatus::Completed);
        assert_eq!(a.actual_end, Some(today));
        assert_eq!(a.delay_days, 0);
        assert_eq!(graph.log_for(1).len(), 3);
        assert!((graph.project.progress_percent - 50.0).abs() < 1e-10);
    }

    #[test]
    fn test_dependency_gate_blocks_start() {
        let mut graph = chained_graph();
        // Step 1 still Pending: step 2 cannot start.
        let err =
            apply_transition(&mut graph, 2, ActivityStatus::InProgress, 10, None, d(2025, 1, 9))
                .unwrap_err();
        assert_eq!(
            err,
            TrackerError::DependencyNotSatisfied { activity_id: 2, dependency_id: 1 }
        );
        // Failure is side-effect-free: no log entry, status unchanged.
        assert!(graph.log.is_empty());
        assert_eq!(graph.activity(2).unwrap().status, ActivityStatus::Pending);
    }

    #[test]
    fn test_dependency_gate_blocks_while_in_progress() {
        let mut graph = chained_graph();
        apply_transition(&mut graph, 1, ActivityStatus::InProgress, 10, None, d(2025, 1, 6))
            .unwrap();
        let log_len = graph.log.len();
        let err =
            apply_transition(&mut graph, 2, ActivityStatus::InProgress, 10, None, d(2025, 1, 7))
                .unwrap_err();
        assert!(matches!(err, TrackerError::DependencyNotSatisfied { .. }));
        assert_eq!(graph.log.len(), log_len);
    }

    #[test]
    fn test_start_allowed_after_dependency_completes() {
        let mut graph = chained_graph();
        complete_activity(&mut graph, 1, d(2025, 1, 8));
        let outcome =
            apply_transition(&mut graph, 2, ActivityStatus::InProgress, 10, None, d(2025, 1, 9))
                .unwrap();
        assert_eq!(outcome.status_after, ActivityStatus::InProgress);
        assert_eq!(graph.activity(2).unwrap().actual_start, Some(d(2025, 1, 9)));
    }

    #[test]
    fn test_only_responsible_submits() {
        let mut graph = chained_graph();
        apply_transition(&mut graph, 1, ActivityStatus::InProgress, 10, None, d(2025, 1, 6))
            .unwrap();
        let err = apply_transition(
            &mut graph,
            1,
            ActivityStatus::PendingAuthorization,
            99,
            None,
            d(2025, 1, 7),
        )
        .unwrap_err();
        assert_eq!(err, TrackerError::NotResponsible { user_id: 99, activity_id: 1 });
    }

    #[test]
    fn test_only_authorizer_completes() {
        let mut graph = chained_graph();
        apply_transition(&mut graph, 1, ActivityStatus::InProgress, 10, None, d(2025, 1, 6))
            .unwrap();
        apply_transition(
            &mut graph,
            1,
            ActivityStatus::PendingAuthorization,
            10,
            None,
            d(2025, 1, 7),
        )
        .unwrap();
        let err =
            apply_transition(&mut graph, 1, ActivityStatus::Completed, 10, None, d(2025, 1, 8))
                .unwrap_err();
        assert_eq!(err, TrackerError::NotAuthorizer { user_id: 10, activity_id: 1 });
    }

    #[test]
    fn test_completion_resets_delay() {
        let mut graph = chained_graph();
        apply_transition(&mut graph, 1, ActivityStatus::InProgress, 10, None, d(2025, 1, 6))
            .unwrap();
        graph.activity_mut(1).unwrap().delay_days = 4; // assessed externally
        apply_transition(
            &mut graph,
            1,
            ActivityStatus::PendingAuthorization,
            10,
            None,
            d(2025, 1, 13),
        )
        .unwrap();
        let outcome =
            apply_transition(&mut graph, 1, ActivityStatus::Completed, 20, None, d(2025, 1, 14))
                .unwrap();
        assert_eq!(outcome.activity_delay_days, 0);
        let a = graph.activity(1).unwrap();
        assert_eq!(a.delay_days, 0);
        assert_eq!(a.actual_end, Some(d(2025, 1, 14)));
    }

    #[test]
    fn test_reopening_clears_actual_end_keeps_delay() {
        let mut graph = chained_graph();
        apply_transition(&mut graph, 1, ActivityStatus::InProgress, 10, None, d(2025, 1, 6))
            .unwrap();
        graph.activity_mut(1).unwrap().delay_days = 2;
        graph.activity_mut(1).unwrap().actual_end = Some(d(2025, 1, 7));
        apply_transition(&mut graph, 1, ActivityStatus::InProgress, 10, None, d(2025, 1, 8))
            .unwrap();
        let a = graph.activity(1).unwrap();
        assert_eq!(a.actual_end, None);
        assert_eq!(a.delay_days, 2); // untouched while open
        assert_eq!(a.actual_start, Some(d(2025, 1, 6))); // first start kept
    }

    #[test]
    fn test_terminal_activities_reject_transitions() {
        let mut graph = chained_graph();
        complete_activity(&mut graph, 1, d(2025, 1, 8));
        let err =
            apply_transition(&mut graph, 1, ActivityStatus::InProgress, 10, None, d(2025, 1, 9))
                .unwrap_err();
        assert!(matches!(err, TrackerError::InvalidActivityState { .. }));
    }

    #[test]
    fn test_blocked_and_delayed_are_not_direct_targets() {
        let mut graph = chained_graph();
        for target in [ActivityStatus::Blocked, ActivityStatus::Delayed] {
            let err = apply_transition(&mut graph, 1, target, 10, None, d(2025, 1, 6)).unwrap_err();
            assert!(matches!(err, TrackerError::InvalidActivityState { .. }));
        }
        assert!(graph.log.is_empty());
    }

    #[test]
    fn test_cancel_from_any_open_state() {
        let mut graph = chained_graph();
        apply_transition(&mut graph, 1, ActivityStatus::InProgress, 10, None, d(2025, 1, 6))
            .unwrap();
        let outcome =
            apply_transition(&mut graph, 1, ActivityStatus::Canceled, 10, None, d(2025, 1, 7))
                .unwrap();
        assert_eq!(outcome.status_after, ActivityStatus::Canceled);
        assert!(graph.activity(1).unwrap().is_terminal());
    }

    #[test]
    fn test_unknown_activity() {
        let mut graph = chained_graph();
        let err =
            apply_transition(&mut graph, 99, ActivityStatus::InProgress, 10, None, d(2025, 1, 6))
                .unwrap_err();
        assert_eq!(err, TrackerError::NotFound { entity: "activity", id: 99 });
    }

    #[test]
    fn test_transition_logs_before_and_after() {
        let mut graph = chained_graph();
        apply_transition(
            &mut graph,
            1,
            ActivityStatus::InProgress,
            10,
            Some("kickoff".into()),
            d(2025, 1, 6),
        )
        .unwrap();
        let entries = graph.log_for(1);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].status_before, ActivityStatus::Pending);
        assert_eq!(entries[0].status_after, ActivityStatus::InProgress);
        assert_eq!(entries[0].comment.as_deref(), Some("kickoff"));
        assert_eq!(entries[0].user_id, 10);
    }
}
