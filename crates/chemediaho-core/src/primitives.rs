//! # Scale Primitives
//!
//! Fixed constants of the school-grade scale and the boundary validators
//! built on them.
//!
//! The calculator never checks ranges itself. Callers (HTTP handlers, CLI
//! commands) run these validators first and only hand well-formed numbers
//! to [`crate::calculator`].

use crate::MediaError;

/// Lowest value on the grade scale.
pub const MIN_GRADE: f64 = 1.0;

/// Highest value on the grade scale.
///
/// A required grade above this is infeasible.
pub const MAX_GRADE: f64 = 10.0;

/// Grades the portal actually assigns, in quarter steps.
///
/// Required grades are presented rounded to the nearest of these.
pub const ALLOWED_GRADES: [f64; 25] = [
    4.0, 4.25, 4.5, 4.75, 5.0, 5.25, 5.5, 5.75, 6.0, 6.25, 6.5, 6.75, 7.0, 7.25, 7.5, 7.75, 8.0,
    8.25, 8.5, 8.75, 9.0, 9.25, 9.5, 9.75, 10.0,
];

/// Maximum number of future grades accepted for an explicit goal.
pub const MAX_FUTURE_GRADES: usize = 10;

/// Upper bound of the automatic grade-count search.
///
/// The search tries 1, 2, ... up to this value and reports the goal as
/// infeasible if none of them works.
pub const MAX_AUTO_GRADE_COUNT: usize = 20;

/// Default number of subject suggestions returned to a client.
pub const MAX_SUGGESTIONS: usize = 4;

/// Maximum number of grades accepted in a single request list.
pub const MAX_GRADES_PER_REQUEST: usize = 1000;

// =============================================================================
// VALIDATION
// =============================================================================

/// Check that a value lies on the 1–10 scale.
#[must_use]
pub fn on_scale(value: f64) -> bool {
    value.is_finite() && (MIN_GRADE..=MAX_GRADE).contains(&value)
}

/// Validate a single grade value.
pub fn validate_grade(value: f64) -> Result<f64, MediaError> {
    if on_scale(value) {
        Ok(value)
    } else {
        Err(MediaError::GradeOutOfRange(value))
    }
}

/// Validate a list of grade values, optionally requiring it to be non-empty.
pub fn validate_grades(values: &[f64], require_non_empty: bool) -> Result<(), MediaError> {
    if require_non_empty && values.is_empty() {
        return Err(MediaError::EmptyGrades);
    }
    if values.len() > MAX_GRADES_PER_REQUEST {
        return Err(MediaError::InvalidGradeCount(values.len()));
    }
    values.iter().try_for_each(|&v| validate_grade(v).map(|_| ()))
}

/// Validate a target average.
pub fn validate_target(target: f64) -> Result<f64, MediaError> {
    if on_scale(target) {
        Ok(target)
    } else {
        Err(MediaError::TargetOutOfRange(target))
    }
}

/// Validate an explicit future-grade count (1..=`MAX_FUTURE_GRADES`).
pub fn validate_count(count: usize) -> Result<std::num::NonZeroUsize, MediaError> {
    if count > MAX_FUTURE_GRADES {
        return Err(MediaError::InvalidGradeCount(count));
    }
    std::num::NonZeroUsize::new(count).ok_or(MediaError::InvalidGradeCount(count))
}
