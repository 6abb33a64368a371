//! # Subject Suggestions
//!
//! "Where should I focus to reach this average?"
//!
//! For every subject, the per-grade requirement is computed as if *only that
//! subject* received the future grades, using that subject's own count and
//! sum. Feasible subjects (requirement <= 10) are ranked easiest first; if no
//! subject is feasible, all of them come back unranked, in alphabetical
//! order.
//!
//! Ties on the requirement go to the subject with fewer grades, where a new
//! grade moves the average further, then to the subject name.

use crate::GradeCount;
use crate::calculator::{Feasibility, Tally, auto_bound, round_to_allowed_grade};
use crate::primitives::{MAX_AUTO_GRADE_COUNT, MAX_GRADE};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::num::NonZeroUsize;

/// One ranked subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub subject: String,
    pub current_average: f64,
    /// Raw per-grade requirement.
    pub required_grade: f64,
    /// Requirement rounded to the nearest allowed grade.
    pub display_grade: f64,
    pub num_current_grades: usize,
    pub feasibility: Feasibility,
}

/// Result of a suggestion run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionSet {
    pub target_average: f64,
    /// Future grades each requirement is spread over.
    pub grade_count: usize,
    pub auto_calculated: bool,
    /// Whether at least one subject can reach the target.
    pub any_feasible: bool,
    /// Ranked when `any_feasible`, alphabetical otherwise.
    pub suggestions: Vec<Suggestion>,
}

impl SuggestionSet {
    /// Keep only the first `limit` suggestions.
    #[must_use]
    pub fn top(mut self, limit: usize) -> Self {
        self.suggestions.truncate(limit);
        self
    }

    /// The easiest subject, if any.
    #[must_use]
    pub fn best(&self) -> Option<&Suggestion> {
        if self.any_feasible {
            self.suggestions.first()
        } else {
            None
        }
    }
}

/// Rank subjects by how easily each alone can lift its average to `target`.
///
/// Subjects without grades are skipped. With [`GradeCount::Auto`] the
/// smallest count in `1..=MAX_AUTO_GRADE_COUNT` making at least one subject
/// feasible is used; if none does, the bound is used and the set comes back
/// with `any_feasible == false`.
#[must_use]
pub fn suggest_subjects(
    per_subject: &BTreeMap<String, Vec<f64>>,
    target: f64,
    count: GradeCount,
) -> SuggestionSet {
    let candidates: Vec<(&str, Tally)> = per_subject
        .iter()
        .filter(|(_, grades)| !grades.is_empty())
        .map(|(name, grades)| (name.as_str(), Tally::of(grades)))
        .collect();

    let (future, auto_calculated) = match count {
        GradeCount::Fixed(k) => (k, false),
        GradeCount::Auto => (auto_count(&candidates, target).unwrap_or(auto_bound()), true),
    };

    let mut suggestions: Vec<Suggestion> = candidates
        .iter()
        .map(|(name, tally)| {
            let required = tally.required_per_grade(target, future);
            Suggestion {
                subject: (*name).to_string(),
                current_average: tally.average().unwrap_or_default(),
                required_grade: required,
                display_grade: round_to_allowed_grade(required),
                num_current_grades: tally.count,
                feasibility: Feasibility::of(required),
            }
        })
        .collect();

    let any_feasible = suggestions.iter().any(|s| s.feasibility.is_feasible());
    if any_feasible {
        suggestions.retain(|s| s.feasibility.is_feasible());
        suggestions.sort_by(rank);
    }

    SuggestionSet {
        target_average: target,
        grade_count: future.get(),
        auto_calculated,
        any_feasible,
        suggestions,
    }
}

/// Smallest count making at least one candidate feasible.
fn auto_count(candidates: &[(&str, Tally)], target: f64) -> Option<NonZeroUsize> {
    (1..=MAX_AUTO_GRADE_COUNT)
        .filter_map(NonZeroUsize::new)
        .find(|&k| {
            candidates
                .iter()
                .any(|(_, tally)| tally.required_per_grade(target, k) <= MAX_GRADE)
        })
}

/// Easiest first: requirement, then fewer grades, then name.
fn rank(a: &Suggestion, b: &Suggestion) -> Ordering {
    a.required_grade
        .total_cmp(&b.required_grade)
        .then(a.num_current_grades.cmp(&b.num_current_grades))
        .then_with(|| a.subject.cmp(&b.subject))
}

// =============================================================================
// TESTS
// =============================================================================
