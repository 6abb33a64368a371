//! # Average / Goal / Prediction Calculator
//!
//! Closed-form arithmetic over grade lists. Every function here is pure and
//! total over finite numbers: no I/O, no shared state, no range checks.
//!
//! With `n` current grades summing to `S`, a target `T` and `k` future
//! grades of equal value `r`:
//!
//! ```text
//! (S + r * k) / (n + k) = T   =>   r = (T * (n + k) - S) / k
//! ```

use crate::primitives::{ALLOWED_GRADES, MAX_AUTO_GRADE_COUNT, MAX_GRADE, MIN_GRADE};
use crate::{GradeCount, MediaError};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;

// =============================================================================
// TALLY
// =============================================================================

/// Count and sum of a grade list: all the calculator needs to know about it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Tally {
    /// Number of grades.
    pub count: usize,
    /// Sum of grade values.
    pub sum: f64,
}

impl Tally {
    /// Tally a slice of grade values.
    #[must_use]
    pub fn of(values: &[f64]) -> Self {
        Self {
            count: values.len(),
            sum: values.iter().sum(),
        }
    }

    /// Mean of the tallied grades, `None` when there are none.
    #[must_use]
    pub fn average(self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.sum / self.count as f64)
        }
    }

    /// Per-grade value `k` future grades need to pull the average to `target`.
    #[must_use]
    pub fn required_per_grade(self, target: f64, future: NonZeroUsize) -> f64 {
        let k = future.get() as f64;
        (target * (self.count as f64 + k) - self.sum) / k
    }
}

// =============================================================================
// FEASIBILITY
// =============================================================================

/// How a raw required grade sits against the scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feasibility {
    /// Required grade below the scale minimum: the target is already reached.
    Achieved,
    /// Required grade on the scale: obtainable.
    Reachable,
    /// Required grade above the scale maximum: not obtainable.
    Infeasible,
}

impl Feasibility {
    /// Classify a raw required grade.
    #[must_use]
    pub fn of(required: f64) -> Self {
        if required < MIN_GRADE {
            Self::Achieved
        } else if required > MAX_GRADE {
            Self::Infeasible
        } else {
            Self::Reachable
        }
    }

    /// Anything but `Infeasible`.
    #[must_use]
    pub fn is_feasible(self) -> bool {
        !matches!(self, Self::Infeasible)
    }
}

// =============================================================================
// BASIC OPERATIONS
// =============================================================================

/// Arithmetic mean of the grades; `None` for an empty list.
#[must_use]
pub fn current_average(grades: &[f64]) -> Option<f64> {
    Tally::of(grades).average()
}

/// Single grade needed to move the average of `current` to `target`.
///
/// `required = T * (n + 1) - S`. The value is raw: interpret it with
/// [`Feasibility::of`].
#[must_use]
pub fn required_grade(current: &[f64], target: f64) -> f64 {
    Tally::of(current).required_per_grade(target, NonZeroUsize::MIN)
}

/// `count` identical grades needed to move the average of `current` to `target`.
#[must_use]
pub fn required_grades(current: &[f64], target: f64, count: NonZeroUsize) -> Vec<f64> {
    let per_grade = Tally::of(current).required_per_grade(target, count);
    vec![per_grade; count.get()]
}

/// Round a grade to the nearest allowed value, clamping to the allowed range.
///
/// Ties go to the lower value.
#[must_use]
pub fn round_to_allowed_grade(grade: f64) -> f64 {
    let lowest = ALLOWED_GRADES[0];
    let highest = ALLOWED_GRADES[ALLOWED_GRADES.len() - 1];
    if grade <= lowest {
        return lowest;
    }
    if grade >= highest {
        return highest;
    }
    ALLOWED_GRADES
        .iter()
        .copied()
        .fold(lowest, |best, candidate| {
            if (candidate - grade).abs() < (best - grade).abs() {
                candidate
            } else {
                best
            }
        })
}

/// Smallest number of equal future grades that brings the average to
/// `target` without exceeding the scale maximum.
///
/// Searches `1..=MAX_AUTO_GRADE_COUNT`; `None` when no count works.
#[must_use]
pub fn auto_grade_count(tally: Tally, target: f64) -> Option<NonZeroUsize> {
    (1..=MAX_AUTO_GRADE_COUNT)
        .filter_map(NonZeroUsize::new)
        .find(|&k| tally.required_per_grade(target, k) <= MAX_GRADE)
}

// =============================================================================
// GOAL
// =============================================================================

/// Full answer to "what do I need to reach this average?".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    /// Average before any future grade; `None` with no grades.
    pub current_average: Option<f64>,
    /// Number of current grades.
    pub current_count: usize,
    /// Target average.
    pub target_average: f64,
    /// Number of future grades the requirement is spread over.
    pub grade_count: usize,
    /// Whether `grade_count` came from the automatic search.
    pub auto_calculated: bool,
    /// Raw per-grade requirement.
    pub required_grade: f64,
    /// Requirement rounded to the nearest allowed grade.
    pub display_grade: f64,
    /// Band of the raw requirement.
    pub feasibility: Feasibility,
    /// The current average already meets the target.
    pub already_met: bool,
}

impl Goal {
    /// The display grade repeated once per future grade.
    #[must_use]
    pub fn display_grades(&self) -> Vec<f64> {
        vec![self.display_grade; self.grade_count]
    }
}

/// Plan a goal over a grade list.
///
/// With [`GradeCount::Auto`] the smallest workable count is used; if none
/// exists up to [`MAX_AUTO_GRADE_COUNT`], the plan uses that bound and comes
/// back `Infeasible`.
#[must_use]
pub fn plan_goal(current: &[f64], target: f64, count: GradeCount) -> Goal {
    let tally = Tally::of(current);
    let current_average = tally.average();
    let already_met = current_average.is_some_and(|avg| avg >= target);

    let (future, auto_calculated) = match count {
        GradeCount::Fixed(k) => (k, false),
        GradeCount::Auto => (
            auto_grade_count(tally, target).unwrap_or(auto_bound()),
            true,
        ),
    };

    let required = tally.required_per_grade(target, future);

    Goal {
        current_average,
        current_count: tally.count,
        target_average: target,
        grade_count: future.get(),
        auto_calculated,
        required_grade: required,
        display_grade: round_to_allowed_grade(required),
        feasibility: Feasibility::of(required),
        already_met,
    }
}

/// `MAX_AUTO_GRADE_COUNT` as a `NonZeroUsize`.
pub(crate) fn auto_bound() -> NonZeroUsize {
    NonZeroUsize::new(MAX_AUTO_GRADE_COUNT).unwrap_or(NonZeroUsize::MIN)
}

// =============================================================================
// PREDICTION
// =============================================================================

/// Simulated average after adding hypothetical grades.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Average of the current grades.
    pub current_average: f64,
    /// Average including the hypothetical grades.
    pub predicted_average: f64,
    /// `predicted_average - current_average`.
    pub change: f64,
    /// Number of hypothetical grades added.
    pub added: usize,
}

/// Predict the average after adding `hypothetical` to `current`.
///
/// `predicted = (S + Σg) / (n + m)`. Fails only when `current` is empty,
/// since there is no current average to compare against.
pub fn predict_average(current: &[f64], hypothetical: &[f64]) -> Result<Prediction, MediaError> {
    let before = Tally::of(current);
    let current_average = before.average().ok_or(MediaError::EmptyGrades)?;

    let added = Tally::of(hypothetical);
    let predicted_average = if added.count == 0 {
        current_average
    } else {
        (before.sum + added.sum) / (before.count + added.count) as f64
    };

    Ok(Prediction {
        current_average,
        predicted_average,
        change: predicted_average - current_average,
        added: added.count,
    })
}

// =============================================================================
// TESTS
// =============================================================================
