//! Structural validation of route templates.
//!
//! Checks a template's integrity before instantiation. Detects:
//! - Empty templates
//! - Duplicate step ids
//! - Dependencies on steps that don't exist
//! - Self-dependencies
//! - Cycles along the dependency chain
//!
//! Dependencies are single-parent, so cycle detection reduces to walking
//! each step's predecessor chain with a visited set.

use std::collections::HashSet;

use crate::models::{RouteTemplate, StepId};

/// Validation result: `Ok(())` or all detected issues.
pub type ValidationResult = std::result::Result<(), Vec<ValidationError>>;

/// A single validation issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Issue category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of template validation issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// The template has no steps.
    EmptyTemplate,
    /// Two steps share the same id.
    DuplicateStepId,
    /// A step depends on a step id that doesn't exist in the template.
    UnknownDependency,
    /// A step depends on itself.
    SelfDependency,
    /// The dependency chain loops back on itself.
    CyclicDependency,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a route template before instantiation.
///
/// Returns `Ok(())` if all checks pass, or every detected issue at once
/// so template authors can fix them in one round.
pub fn validate_template(template: &RouteTemplate) -> ValidationResult {
    let mut errors = Vec::new();

    if template.steps.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyTemplate,
            format!("route template '{}' has no steps", template.name),
        ));
    }

    let mut step_ids: HashSet<StepId> = HashSet::new();
    for step in &template.steps {
        if !step_ids.insert(step.id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateStepId,
                format!("duplicate step id {}", step.id),
            ));
        }
    }

    for step in &template.steps {
        if let Some(dep) = step.depends_on_step_id {
            if dep == step.id {
                errors.push(ValidationError::new(
                    ValidationErrorKind::SelfDependency,
                    format!("step {} depends on itself", step.id),
                ));
            } else if !step_ids.contains(&dep) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownDependency,
                    format!("step {} depends on unknown step {}", step.id, dep),
                ));
            }
        }
    }

    if let Some(cycle) = detect_chain_cycle(template) {
        errors.push(cycle);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Walks each step's single-parent chain looking for a loop.
fn detect_chain_cycle(template: &RouteTemplate) -> Option<ValidationError> {
    for start in &template.steps {
        let mut visited: HashSet<StepId> = HashSet::new();
        visited.insert(start.id);

        let mut current = start.depends_on_step_id;
        while let Some(id) = current {
            if !visited.insert(id) {
                return Some(ValidationError::new(
                    ValidationErrorKind::CyclicDependency,
                    format!("dependency chain starting at step {} loops back", start.id),
                ));
            }
            current = template.step(id).and_then(|s| s.depends_on_step_id);
        }
    }
    None
}
