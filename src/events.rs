//! Notification collaborator boundary.
//!
//! After every successful mutating operation the tracker hands a
//! [`TrackerEvent`] to the configured [`Notifier`]. Delivery and fan-out
//! (push, websocket rooms, email) are entirely outside this crate; the
//! payload mirrors what the delivery layer needs to address project
//! rooms and per-user channels.

use serde::{Deserialize, Serialize};
use std::sync::Mutex;

use crate::models::{ActivityId, ProjectId};

/// What happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    /// A project was instantiated from a route.
    ProjectCreated,
    /// An activity changed status.
    StatusChanged,
    /// A duration extension rescheduled part of the chain.
    ScheduleExtended,
    /// A blockage was opened against an activity.
    BlockageOpened,
    /// A blockage was resolved.
    BlockageResolved,
    /// The delay assessor raised one or more delay counters.
    DelaysAssessed,
    /// A note was appended to an activity's log.
    NoteAdded,
    /// A note was removed from an activity's log by its author.
    NoteDeleted,
}

/// Structured payload handed to the notification collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerEvent {
    /// Owning project.
    pub project_id: ProjectId,
    /// Affected activity, when the event concerns a single one.
    pub activity_id: Option<ActivityId>,
    /// What happened.
    pub kind: EventKind,
    /// How many activities were touched (cascades, assessments).
    pub affected_count: Option<usize>,
    /// Project-level aggregate delay after the operation.
    pub delay_total: Option<u32>,
}

/// Sink for tracker events.
///
/// Implementations must be cheap and non-blocking; the tracker calls
/// them synchronously after the project lock is released.
pub trait Notifier: Send + Sync {
    /// Receives one event.
    fn notify(&self, event: &TrackerEvent);
}

/// Discards every event.
#[derive(Debug, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _event: &TrackerEvent) {}
}

/// Collects events in memory; useful for tests and simple consumers.
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    events: Mutex<Vec<TrackerEvent>>,
}

impl MemoryNotifier {
    /// Creates an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything received so far.
    pub fn events(&self) -> Vec<TrackerEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Number of events received.
    pub fn len(&self) -> usize {
        self.events.lock().map(|e| e.len()).unwrap_or(0)
    }

    /// Whether nothing has been received.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, event: &TrackerEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_notifier_collects() {
        let notifier = MemoryNotifier::new();
        assert!(notifier.is_empty());

        let event = TrackerEvent {
            project_id: 1,
            activity_id: Some(2),
            kind: EventKind::StatusChanged,
            affected_count: None,
            delay_total: Some(0),
        };
        notifier.notify(&event);
        notifier.notify(&event);

        assert_eq!(notifier.len(), 2);
        assert_eq!(notifier.events()[0], event);
    }
}
