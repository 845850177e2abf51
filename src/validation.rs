//! Input validation for roster problems.
//!
//! Checks structural integrity of a [`ShiftProblem`] before model
//! construction. Detects:
//! - Empty horizon
//! - Duplicate staff ids
//! - Coverage overrides outside the horizon
//! - Role requirements with empty role names
//! - Requests referencing unknown staff or out-of-range days
//!
//! Errors are collected in full, never fail-fast — the caller needs
//! every problem at once before retrying. Dangling requests are
//! warnings: the request is ignored, but the diagnostic is carried
//! through to the solve outcome rather than silently dropped.

use std::collections::HashSet;

use crate::models::ShiftProblem;

/// Validation result: warnings on success, all errors on failure.
pub type ValidationResult = Result<Vec<ValidationWarning>, Vec<ValidationError>>;

/// A structural validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// The horizon has no days.
    EmptyHorizon,
    /// Two staff members share the same id.
    DuplicateStaffId,
    /// A coverage override targets a day outside the horizon.
    InvalidCoverageDay,
    /// A role requirement names an empty role.
    EmptyRoleName,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// A non-fatal diagnostic: the offending input is ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// Warning category.
    pub kind: ValidationWarningKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation warnings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationWarningKind {
    /// A request references a staff id not on the roster.
    UnknownRequestStaff,
    /// A request targets a day outside the horizon.
    RequestDayOutOfRange,
}

impl ValidationWarning {
    fn new(kind: ValidationWarningKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a roster problem.
///
/// # Returns
/// `Ok(warnings)` when the problem is structurally sound (warnings for
/// ignored requests), `Err(errors)` with every detected issue.
pub fn validate_problem(problem: &ShiftProblem) -> ValidationResult {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if problem.day_count == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyHorizon,
            "horizon must contain at least one day",
        ));
    }

    let mut staff_ids = HashSet::new();
    for staff in &problem.staff {
        if !staff_ids.insert(staff.id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateStaffId,
                format!("Duplicate staff id: {}", staff.id),
            ));
        }
    }

    for &day in problem.coverage.overrides.keys() {
        if day >= problem.day_count {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidCoverageDay,
                format!(
                    "Coverage override for day {day} is outside the {}-day horizon",
                    problem.day_count
                ),
            ));
        }
    }

    for requirement in &problem.role_requirements {
        if requirement.role.is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyRoleName,
                "Role requirement with empty role name",
            ));
        }
    }

    for request in &problem.requests {
        if !staff_ids.contains(&request.staff_id) {
            warnings.push(ValidationWarning::new(
                ValidationWarningKind::UnknownRequestStaff,
                format!(
                    "Request for unknown staff id {} ignored",
                    request.staff_id
                ),
            ));
        } else if request.day >= problem.day_count {
            warnings.push(ValidationWarning::new(
                ValidationWarningKind::RequestDayOutOfRange,
                format!(
                    "Request for staff {} on day {} is outside the horizon and was ignored",
                    request.staff_id, request.day
                ),
            ));
        }
    }

    if errors.is_empty() {
        Ok(warnings)
    } else {
        Err(errors)
    }
}
