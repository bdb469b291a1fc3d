//! Error taxonomy for tracker operations.
//!
//! All mutating operations are all-or-nothing: a returned error means no
//! partial state change is observable. Role-gate and state violations are
//! reported with a specific reason and are never retried internally;
//! [`TrackerError::ConcurrencyConflict`] is the only variant a caller
//! should retry.

use thiserror::Error;

use crate::models::{ActivityId, ProjectId, UserId};
use crate::validation::ValidationError;

/// Result alias for tracker operations.
pub type Result<T> = std::result::Result<T, TrackerError>;

/// Failure modes of tracker operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrackerError {
    /// An entity id could not be resolved.
    #[error("{entity} {id} not found")]
    NotFound {
        /// Entity kind ("project", "activity", "blockage", "log entry").
        entity: &'static str,
        /// The unresolvable id.
        id: u64,
    },

    /// An activity cannot start while its predecessor is not completed.
    #[error("activity {activity_id} cannot start: dependency {dependency_id} is not completed")]
    DependencyNotSatisfied {
        /// Activity the caller tried to start.
        activity_id: ActivityId,
        /// Its unfinished predecessor.
        dependency_id: ActivityId,
    },

    /// Only the responsible user may submit an activity for authorization.
    #[error("user {user_id} is not the responsible for activity {activity_id}")]
    NotResponsible {
        /// Acting user.
        user_id: UserId,
        /// Target activity.
        activity_id: ActivityId,
    },

    /// Only the assigned authorizer may complete an activity.
    #[error("user {user_id} is not the authorizer for activity {activity_id}")]
    NotAuthorizer {
        /// Acting user.
        user_id: UserId,
        /// Target activity.
        activity_id: ActivityId,
    },

    /// The operation is not valid for the activity's current state.
    #[error("invalid state for activity {activity_id}: {reason}")]
    InvalidActivityState {
        /// Target activity.
        activity_id: ActivityId,
        /// Why the operation was rejected.
        reason: String,
    },

    /// The non-working-day set could not be loaded.
    #[error("business calendar unavailable: {0}")]
    CalendarUnavailable(String),

    /// Another operation holds the project lock; retry.
    #[error("project {project_id} is busy with another operation")]
    ConcurrencyConflict {
        /// Contended project.
        project_id: ProjectId,
    },

    /// The route template failed structural validation.
    #[error("route template failed validation with {} issue(s)", .0.len())]
    InvalidTemplate(Vec<ValidationError>),
}

impl TrackerError {
    /// Whether the caller may retry the operation as-is.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ConcurrencyConflict { .. })
    }
}
