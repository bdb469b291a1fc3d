//! Business-day scheduling and cascading recalculation for
//! manufacturing-project tracking.
//!
//! Projects are instantiated from a reusable *route* — an ordered
//! template of process steps with durations and dependency links — and
//! each step becomes an activity with computed planned dates, real
//! dates, status, and an accumulated delay counter. This crate is the
//! scheduling core of such a tracker: the date engine, the cascade, the
//! status state machine, and the project rollup. Persistence, transport,
//! and notification delivery live outside it, behind the collaborator
//! traits in [`tracker`] and [`events`].
//!
//! # Modules
//!
//! - **`models`**: Domain types — `BusinessCalendar`, `RouteTemplate`,
//!   `Project`, `Activity`, `ActivityLogEntry`, `Blockage`
//! - **`validation`**: Route template integrity checks (duplicate step
//!   ids, unknown or cyclic dependencies)
//! - **`engine`**: Instantiation, transitions, cascade recalculation,
//!   blocking, delay assessment, rollup, KPIs
//! - **`tracker`**: The [`Tracker`] facade — per-project serialization,
//!   atomic commits, calendar and notifier collaborators
//! - **`events`**: Structured events handed to the notification
//!   collaborator
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use route_tracker::models::{ActivityStatus, BusinessCalendar, RouteTemplate, TemplateStep};
//! use route_tracker::tracker::{FixedCalendar, Tracker};
//!
//! # fn main() -> route_tracker::Result<()> {
//! let template = RouteTemplate::new(1, "sampling", 5)
//!     .with_step(TemplateStep::new(1, 1, 3, 1).with_responsible(10).with_authorizer(20))
//!     .with_step(
//!         TemplateStep::new(2, 2, 2, 4)
//!             .with_responsible(11)
//!             .with_authorizer(20)
//!             .with_dependency(1),
//!     );
//!
//! let tracker = Tracker::new(FixedCalendar::new(BusinessCalendar::new()));
//! let monday = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
//! let friday = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
//! let project_id = tracker.create_project("M-100", &template, monday, friday, 1)?;
//!
//! tracker.transition_activity(project_id, 1, ActivityStatus::InProgress, 10, None)?;
//! assert_eq!(
//!     tracker.project(project_id)?.computed_end_date,
//!     NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
//! );
//! # Ok(())
//! # }
//! ```

pub mod engine;
pub mod error;
pub mod events;
pub mod models;
pub mod tracker;
pub mod validation;

pub use error::{Result, TrackerError};
pub use tracker::{CalendarSource, FixedCalendar, Tracker};
