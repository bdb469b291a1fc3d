//! Route template models.
//!
//! A route is a reusable ordered sequence of process steps with durations
//! and dependency links. Projects are instantiated from a route: each
//! template step becomes one dated activity.
//!
//! Templates are immutable once a project references them; edits replace
//! the whole step list.

use serde::{Deserialize, Serialize};

use super::{RouteId, StepId, UserId};

/// One process step inside a route template.
///
/// `start_day_offset` is 1-based: offset 1 means the step starts on the
/// project's first business day. Each step has at most one dependency,
/// so the dependency structure is a chain, never a merging DAG.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateStep {
    /// Step identifier, unique within the template.
    pub id: StepId,
    /// Position in the route (display/processing order).
    pub order: u32,
    /// Process step name.
    pub name: String,
    /// Expected deliverable, if any.
    pub deliverable: Option<String>,
    /// Working duration in business days.
    pub duration_business_days: u32,
    /// 1-based business-day offset from the project start.
    pub start_day_offset: u32,
    /// Step that must complete before this one starts.
    pub depends_on_step_id: Option<StepId>,
    /// User who executes the step.
    pub responsible_id: UserId,
    /// User who signs the step off.
    pub authorizer_id: UserId,
}

impl TemplateStep {
    /// Creates a step with the given id, order, duration, and offset.
    pub fn new(id: StepId, order: u32, duration_business_days: u32, start_day_offset: u32) -> Self {
        Self {
            id,
            order,
            name: String::new(),
            deliverable: None,
            duration_business_days,
            start_day_offset,
            depends_on_step_id: None,
            responsible_id: 0,
            authorizer_id: 0,
        }
    }

    /// Sets the step name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the deliverable description.
    pub fn with_deliverable(mut self, deliverable: impl Into<String>) -> Self {
        self.deliverable = Some(deliverable.into());
        self
    }

    /// Declares a dependency on another step of the same template.
    pub fn with_dependency(mut self, step_id: StepId) -> Self {
        self.depends_on_step_id = Some(step_id);
        self
    }

    /// Assigns the responsible user.
    pub fn with_responsible(mut self, user_id: UserId) -> Self {
        self.responsible_id = user_id;
        self
    }

    /// Assigns the authorizing user.
    pub fn with_authorizer(mut self, user_id: UserId) -> Self {
        self.authorizer_id = user_id;
        self
    }
}

/// A reusable route: the ordered template a project is built from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteTemplate {
    /// Route identifier.
    pub id: RouteId,
    /// Route name.
    pub name: String,
    /// Total working span of the route in business days, used to compute
    /// the project's initial end date.
    pub total_business_days: u32,
    /// Steps in template order.
    pub steps: Vec<TemplateStep>,
}

impl RouteTemplate {
    /// Creates an empty route template.
    pub fn new(id: RouteId, name: impl Into<String>, total_business_days: u32) -> Self {
        Self {
            id,
            name: name.into(),
            total_business_days,
            steps: Vec::new(),
        }
    }

    /// Adds a step (builder form).
    pub fn with_step(mut self, step: TemplateStep) -> Self {
        self.steps.push(step);
        self
    }

    /// Looks up a step by id.
    pub fn step(&self, id: StepId) -> Option<&TemplateStep> {
        self.steps.iter().find(|s| s.id == id)
    }

    /// Number of steps.
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_builder() {
        let step = TemplateStep::new(10, 1, 3, 1)
            .with_name("Pattern design")
            .with_deliverable("Approved pattern")
            .with_dependency(5)
            .with_responsible(7)
            .with_authorizer(8);

        assert_eq!(step.id, 10);
        assert_eq!(step.order, 1);
        assert_eq!(step.duration_business_days, 3);
        assert_eq!(step.start_day_offset, 1);
        assert_eq!(step.depends_on_step_id, Some(5));
        assert_eq!(step.responsible_id, 7);
        assert_eq!(step.authorizer_id, 8);
        assert_eq!(step.deliverable.as_deref(), Some("Approved pattern"));
    }

    #[test]
    fn test_template_builder() {
        let route = RouteTemplate::new(1, "Standard development", 5)
            .with_step(TemplateStep::new(1, 1, 3, 1))
            .with_step(TemplateStep::new(2, 2, 2, 4).with_dependency(1));

        assert_eq!(route.step_count(), 2);
        assert_eq!(route.total_business_days, 5);
        assert!(route.step(1).is_some());
        assert!(route.step(99).is_none());
        assert_eq!(route.step(2).unwrap().depends_on_step_id, Some(1));
    }
}
