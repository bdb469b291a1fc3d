//! Project tracker facade.
//!
//! [`Tracker`] owns every project graph and fronts the engine with the
//! concurrency and collaborator wiring the operations need:
//!
//! - one `Mutex<ProjectGraph>` per project, acquired with `try_lock` so
//!   contention surfaces immediately as a retryable
//!   [`ConcurrencyConflict`](crate::TrackerError::ConcurrencyConflict);
//! - clone-compute-swap commits: an engine operation runs on a clone of
//!   the graph and replaces the original only on success, so a failure
//!   mid-cascade leaves the pre-operation state observable;
//! - a [`CalendarSource`] for the non-working-day set and a
//!   [`Notifier`](crate::events::Notifier) that receives one event after
//!   each successful mutation, called after the project lock is released.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::engine::{
    apply_transition, assess_delays, extend_duration, instantiate_route, open_blockage,
    recompute_project_metrics, resolve_blockage, BlockageRequest, CascadeOutcome,
    DelayAssessment, ProjectGraph, ProjectKpi, TransitionOutcome,
};
use crate::error::{Result, TrackerError};
use crate::events::{EventKind, Notifier, NullNotifier, TrackerEvent};
use crate::models::{
    Activity, ActivityId, ActivityLogEntry, ActivityStatus, Blockage, BlockageId,
    BusinessCalendar, LogEntryId, Project, ProjectId, RouteTemplate, UserId,
};
use crate::validation::validate_template;

/// Calendar collaborator: supplies the non-working-day set on demand.
///
/// Implementations typically snapshot an external holiday table; failures
/// surface to callers as `CalendarUnavailable`.
pub trait CalendarSource: Send + Sync {
    /// Returns the current calendar snapshot.
    fn load(&self) -> Result<BusinessCalendar>;
}

/// A calendar source backed by a fixed in-memory snapshot.
#[derive(Debug, Clone, Default)]
pub struct FixedCalendar {
    calendar: BusinessCalendar,
}

impl FixedCalendar {
    /// Wraps a calendar snapshot.
    pub fn new(calendar: BusinessCalendar) -> Self {
        Self { calendar }
    }
}

impl CalendarSource for FixedCalendar {
    fn load(&self) -> Result<BusinessCalendar> {
        Ok(self.calendar.clone())
    }
}

/// One schedule row: an activity with its open blockage, if any.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineRow {
    /// The activity, with planned and real dates.
    pub activity: Activity,
    /// The currently open blockage against it.
    pub open_blockage: Option<Blockage>,
}

/// The tracker: all projects, their locks, and the collaborators.
pub struct Tracker {
    calendar: Box<dyn CalendarSource>,
    notifier: Box<dyn Notifier>,
    projects: RwLock<HashMap<ProjectId, Arc<Mutex<ProjectGraph>>>>,
    next_project_id: AtomicU64,
}

impl Tracker {
    /// Creates a tracker with the given calendar source and a discarding
    /// notifier.
    pub fn new(calendar: impl CalendarSource + 'static) -> Self {
        Self::with_notifier(calendar, NullNotifier)
    }

    /// Creates a tracker with explicit collaborators.
    pub fn with_notifier(
        calendar: impl CalendarSource + 'static,
        notifier: impl Notifier + 'static,
    ) -> Self {
        Self {
            calendar: Box::new(calendar),
            notifier: Box::new(notifier),
            projects: RwLock::new(HashMap::new()),
            next_project_id: AtomicU64::new(1),
        }
    }

    fn graph_handle(&self, project_id: ProjectId) -> Result<Arc<Mutex<ProjectGraph>>> {
        let projects = self
            .projects
            .read()
            .map_err(|_| TrackerError::ConcurrencyConflict { project_id })?;
        projects
            .get(&project_id)
            .cloned()
            .ok_or(TrackerError::NotFound {
                entity: "project",
                id: project_id,
            })
    }

    /// Runs `op` on a clone of the project graph under its lock; commits
    /// the clone only when `op` succeeds.
    fn with_graph<T>(
        &self,
        project_id: ProjectId,
        op: impl FnOnce(&mut ProjectGraph) -> Result<T>,
    ) -> Result<T> {
        let handle = self.graph_handle(project_id)?;
        let mut guard = handle
            .try_lock()
            .map_err(|_| TrackerError::ConcurrencyConflict { project_id })?;
        let mut draft = guard.clone();
        let value = op(&mut draft)?;
        *guard = draft;
        Ok(value)
    }

    /// Runs a read-only closure under the project lock.
    fn read_graph<T>(
        &self,
        project_id: ProjectId,
        op: impl FnOnce(&ProjectGraph) -> T,
    ) -> Result<T> {
        let handle = self.graph_handle(project_id)?;
        let guard = handle
            .try_lock()
            .map_err(|_| TrackerError::ConcurrencyConflict { project_id })?;
        Ok(op(&guard))
    }

    fn notify(&self, event: TrackerEvent) {
        self.notifier.notify(&event);
    }

    /// Instantiates a project from a route template.
    ///
    /// The template is validated first; a structurally broken one is
    /// rejected as `InvalidTemplate` and nothing is created.
    pub fn create_project(
        &self,
        name: impl Into<String>,
        template: &RouteTemplate,
        start_date: NaiveDate,
        commitment_date: NaiveDate,
        created_by: UserId,
    ) -> Result<ProjectId> {
        validate_template(template).map_err(TrackerError::InvalidTemplate)?;
        let calendar = self.calendar.load()?;

        let project_id = self.next_project_id.fetch_add(1, Ordering::Relaxed);
        let graph = instantiate_route(
            project_id,
            name,
            template,
            start_date,
            commitment_date,
            created_by,
            &calendar,
        );
        let activity_count = graph.activities.len();

        {
            let mut projects = self
                .projects
                .write()
                .map_err(|_| TrackerError::ConcurrencyConflict { project_id })?;
            projects.insert(project_id, Arc::new(Mutex::new(graph)));
        }

        info!(project_id, activity_count, "project created");
        self.notify(TrackerEvent {
            project_id,
            activity_id: None,
            kind: EventKind::ProjectCreated,
            affected_count: Some(activity_count),
            delay_total: None,
        });
        Ok(project_id)
    }

    /// Applies a status transition, dated today.
    pub fn transition_activity(
        &self,
        project_id: ProjectId,
        activity_id: ActivityId,
        new_status: ActivityStatus,
        acting_user: UserId,
        comment: Option<String>,
    ) -> Result<TransitionOutcome> {
        let today = Utc::now().date_naive();
        let outcome = self.with_graph(project_id, |graph| {
            apply_transition(graph, activity_id, new_status, acting_user, comment, today)
        })?;

        self.notify(TrackerEvent {
            project_id,
            activity_id: Some(activity_id),
            kind: EventKind::StatusChanged,
            affected_count: None,
            delay_total: Some(outcome.project_delay_days),
        });
        Ok(outcome)
    }

    /// Extends an activity's duration and cascades the reschedule.
    pub fn extend_activity(
        &self,
        project_id: ProjectId,
        activity_id: ActivityId,
        extra_days: u32,
    ) -> Result<CascadeOutcome> {
        let calendar = self.calendar.load()?;
        let outcome = self.with_graph(project_id, |graph| {
            extend_duration(graph, activity_id, extra_days, &calendar)
        })?;

        self.notify(TrackerEvent {
            project_id,
            activity_id: Some(activity_id),
            kind: EventKind::ScheduleExtended,
            affected_count: Some(outcome.rescheduled.len() + 1),
            delay_total: None,
        });
        Ok(outcome)
    }

    /// Opens a blockage against an activity.
    pub fn open_blockage(
        &self,
        project_id: ProjectId,
        request: BlockageRequest,
    ) -> Result<BlockageId> {
        let activity_id = request.activity_id;
        let blockage_id = self.with_graph(project_id, |graph| open_blockage(graph, request))?;

        self.notify(TrackerEvent {
            project_id,
            activity_id: Some(activity_id),
            kind: EventKind::BlockageOpened,
            affected_count: None,
            delay_total: None,
        });
        Ok(blockage_id)
    }

    /// Resolves an open blockage.
    pub fn resolve_blockage(
        &self,
        project_id: ProjectId,
        blockage_id: BlockageId,
        resolving_user: UserId,
        resolution_notes: impl Into<String>,
    ) -> Result<ActivityId> {
        let notes = resolution_notes.into();
        let activity_id = self.with_graph(project_id, |graph| {
            resolve_blockage(graph, blockage_id, resolving_user, notes)
        })?;

        self.notify(TrackerEvent {
            project_id,
            activity_id: Some(activity_id),
            kind: EventKind::BlockageResolved,
            affected_count: None,
            delay_total: None,
        });
        Ok(activity_id)
    }

    /// Runs the delay sweep for one project as of `today`.
    ///
    /// Meant to be driven by an external scheduler; the date is explicit
    /// so the job controls its own cutoff.
    pub fn assess_delays(
        &self,
        project_id: ProjectId,
        today: NaiveDate,
    ) -> Result<Vec<DelayAssessment>> {
        let calendar = self.calendar.load()?;
        let (grown, delay_total) = self.with_graph(project_id, |graph| {
            let grown = assess_delays(graph, today, &calendar);
            Ok((grown, graph.project.aggregate_delay_days))
        })?;

        if !grown.is_empty() {
            self.notify(TrackerEvent {
                project_id,
                activity_id: None,
                kind: EventKind::DelaysAssessed,
                affected_count: Some(grown.len()),
                delay_total: Some(delay_total),
            });
        }
        Ok(grown)
    }

    /// Recomputes the project's progress and aggregate delay.
    pub fn recompute_metrics(&self, project_id: ProjectId) -> Result<(f64, u32)> {
        self.with_graph(project_id, |graph| Ok(recompute_project_metrics(graph)))
    }

    /// Appends a free-form note to an activity's audit log.
    ///
    /// Notes keep `status_before == status_after`, distinguishing them
    /// from transition entries.
    pub fn add_note(
        &self,
        project_id: ProjectId,
        activity_id: ActivityId,
        user_id: UserId,
        text: impl Into<String>,
    ) -> Result<LogEntryId> {
        let text = text.into();
        let entry_id = self.with_graph(project_id, |graph| {
            let status = graph
                .activity(activity_id)
                .ok_or(TrackerError::NotFound {
                    entity: "activity",
                    id: activity_id,
                })?
                .status;
            Ok(graph.append_log(activity_id, user_id, status, status, Some(text)))
        })?;

        self.notify(TrackerEvent {
            project_id,
            activity_id: Some(activity_id),
            kind: EventKind::NoteAdded,
            affected_count: None,
            delay_total: None,
        });
        Ok(entry_id)
    }

    /// Removes a note from an activity's audit log.
    ///
    /// Only note entries can be deleted, and only by their author;
    /// transition entries are immutable history.
    pub fn delete_note(
        &self,
        project_id: ProjectId,
        activity_id: ActivityId,
        entry_id: LogEntryId,
        user_id: UserId,
    ) -> Result<()> {
        self.with_graph(project_id, |graph| {
            let entry = graph
                .log
                .iter()
                .find(|e| e.id == entry_id && e.activity_id == activity_id)
                .ok_or(TrackerError::NotFound {
                    entity: "log entry",
                    id: entry_id,
                })?;
            if !entry.is_note() {
                return Err(TrackerError::InvalidActivityState {
                    activity_id,
                    reason: "transition entries cannot be deleted".to_string(),
                });
            }
            if entry.user_id != user_id {
                return Err(TrackerError::NotResponsible { user_id, activity_id });
            }
            graph.log.retain(|e| e.id != entry_id);
            Ok(())
        })?;

        self.notify(TrackerEvent {
            project_id,
            activity_id: Some(activity_id),
            kind: EventKind::NoteDeleted,
            affected_count: None,
            delay_total: None,
        });
        Ok(())
    }

    /// The project record with its derived metrics.
    pub fn project(&self, project_id: ProjectId) -> Result<Project> {
        self.read_graph(project_id, |graph| graph.project.clone())
    }

    /// All activities of a project, in route order.
    pub fn activities(&self, project_id: ProjectId) -> Result<Vec<Activity>> {
        self.read_graph(project_id, |graph| graph.activities.clone())
    }

    /// The audit log of one activity, oldest first.
    pub fn activity_log(
        &self,
        project_id: ProjectId,
        activity_id: ActivityId,
    ) -> Result<Vec<ActivityLogEntry>> {
        self.read_graph(project_id, |graph| {
            graph.log_for(activity_id).into_iter().cloned().collect()
        })
    }

    /// All blockages of a project, open and historical.
    pub fn blockages(&self, project_id: ProjectId) -> Result<Vec<Blockage>> {
        self.read_graph(project_id, |graph| graph.blockages.clone())
    }

    /// Plan-vs-real schedule rows, sorted by planned start then order.
    pub fn timeline(&self, project_id: ProjectId) -> Result<Vec<TimelineRow>> {
        self.read_graph(project_id, |graph| {
            let mut rows: Vec<TimelineRow> = graph
                .activities
                .iter()
                .map(|a| TimelineRow {
                    activity: a.clone(),
                    open_blockage: graph.open_blockage_for(a.id).cloned(),
                })
                .collect();
            rows.sort_by(|x, y| {
                (x.activity.planned_start, x.activity.order)
                    .cmp(&(y.activity.planned_start, y.activity.order))
            });
            rows
        })
    }

    /// Worklist: open activities assigned to a responsible, across all
    /// projects, most delayed first.
    pub fn open_activities_for(&self, user_id: UserId) -> Vec<(ProjectId, Activity)> {
        let handles: Vec<(ProjectId, Arc<Mutex<ProjectGraph>>)> = match self.projects.read() {
            Ok(projects) => projects.iter().map(|(id, h)| (*id, h.clone())).collect(),
            Err(_) => return Vec::new(),
        };

        let mut worklist = Vec::new();
        for (project_id, handle) in handles {
            let Ok(guard) = handle.try_lock() else {
                continue;
            };
            for activity in &guard.activities {
                if activity.responsible_id == user_id && activity.status.is_open() {
                    worklist.push((project_id, activity.clone()));
                }
            }
        }
        worklist.sort_by(|a, b| {
            b.1.delay_days
                .cmp(&a.1.delay_days)
                .then(a.1.planned_end.cmp(&b.1.planned_end))
        });
        worklist
    }

    /// Plan-vs-real KPI set for one project.
    pub fn kpis(&self, project_id: ProjectId) -> Result<ProjectKpi> {
        let calendar = self.calendar.load()?;
        self.read_graph(project_id, |graph| ProjectKpi::calculate(graph, &calendar))
    }
}
