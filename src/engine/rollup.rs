//! Project-level delay and progress rollup.
//!
//! Idempotent aggregation, safe to run after any activity mutation:
//! progress is the share of completed activities, aggregate delay is the
//! sum of delay counters over activities that are still open.

use crate::models::ActivityStatus;

use super::ProjectGraph;

/// Recomputes and stores the project's derived metrics.
///
/// - `progress_percent` = completed / total x 100, or 0 with no activities.
/// - `aggregate_delay_days` = sum of `delay_days` over activities whose
///   status is neither `Completed` nor `Canceled`.
///
/// Returns `(progress_percent, aggregate_delay_days)`.
pub fn recompute_project_metrics(graph: &mut ProjectGraph) -> (f64, u32) {
    let total = graph.activities.len();
    let completed = graph
        .activities
        .iter()
        .filter(|a| a.status == ActivityStatus::Completed)
        .count();

    let progress = if total == 0 {
        0.0
    } else {
        completed as f64 * 100.0 / total as f64
    };

    let delay: u32 = graph
        .activities
        .iter()
        .filter(|a| !a.status.is_terminal())
        .map(|a| a.delay_days)
        .sum();

    graph.project.progress_percent = progress;
    graph.project.aggregate_delay_days = delay;
    (progress, delay)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::instantiate_route;
    use crate::models::{BusinessCalendar, RouteTemplate, TemplateStep};
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn four_activity_graph() -> ProjectGraph {
        let template = RouteTemplate::new(1, "r", 8)
            .with_step(TemplateStep::new(1, 1, 2, 1))
            .with_step(TemplateStep::new(2, 2, 2, 3))
            .with_step(TemplateStep::new(3, 3, 2, 5))
            .with_step(TemplateStep::new(4, 4, 2, 7));
        instantiate_route(1, "M", &template, d(2025, 1, 6), d(2025, 2, 28), 1, &BusinessCalendar::new())
    }

    #[test]
    fn test_progress_fraction() {
        let mut graph = four_activity_graph();
        graph.activities[0].status = ActivityStatus::Completed;
        let (progress, _) = recompute_project_metrics(&mut graph);
        assert!((progress - 25.0).abs() < 1e-10);
        assert!((graph.project.progress_percent - 25.0).abs() < 1e-10);
    }

    #[test]
    fn test_delay_excludes_terminal() {
        let mut graph = four_activity_graph();
        graph.activities[0].delay_days = 3; // open, counts
        graph.activities[1].delay_days = 2;
        graph.activities[1].status = ActivityStatus::Canceled; // excluded
        graph.activities[2].delay_days = 4;
        graph.activities[2].status = ActivityStatus::PendingAuthorization; // open, counts
        let (_, delay) = recompute_project_metrics(&mut graph);
        assert_eq!(delay, 7);
    }

    #[test]
    fn test_all_completed_rolls_up_clean() {
        let mut graph = four_activity_graph();
        for a in &mut graph.activities {
            a.status = ActivityStatus::Completed;
            a.delay_days = 0;
        }
        let (progress, delay) = recompute_project_metrics(&mut graph);
        assert!((progress - 100.0).abs() < 1e-10);
        assert_eq!(delay, 0);
    }

    #[test]
    fn test_empty_graph_is_zero() {
        let mut graph = four_activity_graph();
        graph.activities.clear();
        let (progress, delay) = recompute_project_metrics(&mut graph);
        assert_eq!(progress, 0.0);
        assert_eq!(delay, 0);
    }

    #[test]
    fn test_idempotent() {
        let mut graph = four_activity_graph();
        graph.activities[0].status = ActivityStatus::Completed;
        graph.activities[1].delay_days = 5;
        let first = recompute_project_metrics(&mut graph);
        let second = recompute_project_metrics(&mut graph);
        assert_eq!(first, second);
    }
}
