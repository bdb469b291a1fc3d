//! Tracker domain models.
//!
//! Value types for the manufacturing-project tracker: the business
//! calendar, route templates, projects, activities with their audit log,
//! and blockages. All types are serde-serializable value objects; the
//! algorithms that mutate them live in [`crate::engine`].
//!
//! Identifiers are opaque integers, matching the external identity
//! collaborator: wide ids for per-project entities, narrow ids for
//! catalog entities (users, route steps, areas).

mod activity;
mod blockage;
mod calendar;
mod project;
mod route;

pub use activity::{Activity, ActivityLogEntry, ActivityStatus};
pub use blockage::Blockage;
pub use calendar::BusinessCalendar;
pub use project::{Project, ProjectStatus};
pub use route::{RouteTemplate, TemplateStep};

/// Project identifier.
pub type ProjectId = u64;
/// Activity identifier (unique within a project).
pub type ActivityId = u64;
/// Audit log entry identifier (unique within a project).
pub type LogEntryId = u64;
/// Blockage identifier (unique within a project).
pub type BlockageId = u64;
/// Route template identifier.
pub type RouteId = u32;
/// Template step identifier (unique within a template).
pub type StepId = u32;
/// Opaque user identifier supplied by the identity collaborator.
pub type UserId = u32;
/// Process-area identifier.
pub type AreaId = u32;
