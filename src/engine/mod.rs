//! Scheduling and state-machine engine.
//!
//! The algorithmic heart of the tracker, organized by operation:
//!
//! - **`instantiate`**: route template + start date → dated activity graph
//! - **`transition`**: the activity status state machine
//! - **`cascade`**: duration extension propagated through the chain
//! - **`blocking`**: the blockage overlay
//! - **`rollup`**: project-level delay and progress aggregation
//! - **`delay`**: a provided implementation of the delay assessor
//! - **`kpi`**: plan-vs-real effectiveness metrics
//!
//! Every operation works on a [`ProjectGraph`] — the in-memory aggregate
//! of one project with its activities, audit log, and blockages — and
//! validates all preconditions before the first mutation, so an `Err`
//! return means the graph is untouched.

mod blocking;
mod cascade;
mod delay;
mod instantiate;
mod kpi;
mod rollup;
mod transition;

pub use blocking::{open_blockage, resolve_blockage, BlockageRequest};
pub use cascade::{extend_duration, CascadeOutcome};
pub use delay::{assess_delays, DelayAssessment};
pub use instantiate::instantiate_route;
pub use kpi::{ActivityKpi, ProjectKpi};
pub use rollup::recompute_project_metrics;
pub use transition::{apply_transition, TransitionOutcome};

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::models::{
    Activity, ActivityId, ActivityLogEntry, ActivityStatus, Blockage, BlockageId, LogEntryId,
    Project, UserId,
};

/// One project's full mutable state: the project record, its activities,
/// the append-only audit log, and all blockages ever opened against it.
///
/// The graph is the unit of atomicity: facades clone it, run an engine
/// operation on the clone, and swap it back only on success.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectGraph {
    /// Project header with derived metrics.
    pub project: Project,
    /// Activities in route order.
    pub activities: Vec<Activity>,
    /// Append-only audit log across all activities.
    pub log: Vec<ActivityLogEntry>,
    /// All blockages, open and historical.
    pub blockages: Vec<Blockage>,
    next_log_id: LogEntryId,
    next_blockage_id: BlockageId,
}

impl ProjectGraph {
    /// Creates an empty graph around a project record.
    pub(crate) fn new(project: Project) -> Self {
        Self {
            project,
            activities: Vec::new(),
            log: Vec::new(),
            blockages: Vec::new(),
            next_log_id: 1,
            next_blockage_id: 1,
        }
    }

    /// Looks up an activity by id.
    pub fn activity(&self, id: ActivityId) -> Option<&Activity> {
        self.activities.iter().find(|a| a.id == id)
    }

    pub(crate) fn activity_mut(&mut self, id: ActivityId) -> Option<&mut Activity> {
        self.activities.iter_mut().find(|a| a.id == id)
    }

    /// Audit entries for one activity, oldest first.
    pub fn log_for(&self, activity_id: ActivityId) -> Vec<&ActivityLogEntry> {
        self.log
            .iter()
            .filter(|e| e.activity_id == activity_id)
            .collect()
    }

    /// Looks up a blockage by id.
    pub fn blockage(&self, id: BlockageId) -> Option<&Blockage> {
        self.blockages.iter().find(|b| b.id == id)
    }

    /// The currently open blockage for an activity, if any.
    pub fn open_blockage_for(&self, activity_id: ActivityId) -> Option<&Blockage> {
        self.blockages
            .iter()
            .find(|b| b.activity_id == activity_id && b.is_open)
    }

    /// Appends an audit entry and returns its id.
    pub(crate) fn append_log(
        &mut self,
        activity_id: ActivityId,
        user_id: UserId,
        status_before: ActivityStatus,
        status_after: ActivityStatus,
        comment: Option<String>,
    ) -> LogEntryId {
        let id = self.next_log_id;
        self.next_log_id += 1;
        self.log.push(ActivityLogEntry {
            id,
            activity_id,
            user_id,
            status_before,
            status_after,
            comment,
            recorded_at: Utc::now(),
        });
        id
    }

    pub(crate) fn allocate_blockage_id(&mut self) -> BlockageId {
        let id = self.next_blockage_id;
        self.next_blockage_id += 1;
        id
    }
}
