//! Route instantiation: template + start date → dated activity graph.
//!
//! Runs once at project creation. Dates are computed independently per
//! step from the template's offsets (the template author encodes the
//! chain in `start_day_offset`); the cascade engine is the authority for
//! dependency-consistent re-computation after any later edit.

use chrono::NaiveDate;
use std::collections::HashMap;
use tracing::debug;

use crate::models::{
    Activity, ActivityId, ActivityStatus, BusinessCalendar, Project, ProjectId, ProjectStatus,
    RouteTemplate, StepId, UserId,
};

use super::ProjectGraph;

/// Builds a project and its dated activities from a route template.
///
/// - Project end = `start_date + (total_business_days - 1)` business days
///   (the start day counts as day 1); just `start_date` for an empty span.
/// - Per step: `planned_start = start_date + (start_day_offset - 1)`
///   business days, `planned_end = planned_start +
///   (duration_business_days - 1)` business days. Zero-duration steps
///   collapse to `planned_start == planned_end`.
/// - Dependencies are remapped from step ids to activity ids in a second
///   pass, since a step may depend on one declared after it.
///
/// All activities start `Pending`. Instantiation is deterministic: the
/// same template, start date, and calendar always produce the same plan.
pub fn instantiate_route(
    project_id: ProjectId,
    name: impl Into<String>,
    template: &RouteTemplate,
    start_date: NaiveDate,
    commitment_date: NaiveDate,
    created_by: UserId,
    calendar: &BusinessCalendar,
) -> ProjectGraph {
    let span = template.total_business_days.saturating_sub(1);
    let computed_end_date = if template.total_business_days > 0 {
        calendar.add_business_days(start_date, span)
    } else {
        start_date
    };

    let project = Project {
        id: project_id,
        route_id: template.id,
        name: name.into(),
        start_date,
        commitment_date,
        computed_end_date,
        actual_end_date: None,
        aggregate_delay_days: 0,
        progress_percent: 0.0,
        status: ProjectStatus::Active,
        created_by,
    };
    let mut graph = ProjectGraph::new(project);

    // First pass: date every step from the project start.
    let mut step_to_activity: HashMap<StepId, ActivityId> = HashMap::new();
    for (index, step) in template.steps.iter().enumerate() {
        let offset = step.start_day_offset.saturating_sub(1);
        let planned_start = calendar.add_business_days(start_date, offset);
        let duration = step.duration_business_days.saturating_sub(1);
        let planned_end = calendar.add_business_days(planned_start, duration);

        let activity_id = index as ActivityId + 1;
        step_to_activity.insert(step.id, activity_id);

        debug!(
            activity_id,
            step_id = step.id,
            %planned_start,
            %planned_end,
            "dated activity from template step"
        );

        graph.activities.push(Activity {
            id: activity_id,
            project_id,
            template_step_id: step.id,
            order: step.order,
            name: step.name.clone(),
            deliverable: step.deliverable.clone(),
            duration_business_days: step.duration_business_days,
            depends_on: None,
            planned_start,
            planned_end,
            actual_start: None,
            actual_end: None,
            delay_days: 0,
            status: ActivityStatus::Pending,
            responsible_id: step.responsible_id,
            authorizer_id: step.authorizer_id,
            notes: None,
        });
    }

    // Second pass: remap step dependencies to activity ids.
    for step in &template.steps {
        if let Some(dep_step) = step.depends_on_step_id {
            if let (Some(&activity_id), Some(&dep_activity_id)) =
                (step_to_activity.get(&step.id), step_to_activity.get(&dep_step))
            {
                if let Some(activity) = graph.activity_mut(activity_id) {
                    activity.depends_on = Some(dep_activity_id);
                }
            }
        }
    }

    graph
}
