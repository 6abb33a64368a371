//! # Property-Based Tests
//!
//! Invariants of the calculator checked with proptest over random grade
//! lists on the 1–10 scale.

use chemediaho_core::primitives::{ALLOWED_GRADES, MAX_AUTO_GRADE_COUNT, MAX_GRADE};
use chemediaho_core::{
    Feasibility, GradeCount, Tally, auto_grade_count, current_average, plan_goal,
    predict_average, required_grade, required_grades, round_to_allowed_grade, suggest_subjects,
};
use proptest::collection::{btree_map, vec};
use proptest::prelude::*;
use std::num::NonZeroUsize;

const TOLERANCE: f64 = 1e-9;

/// Grades in quarter steps between 1 and 10.
fn grade() -> impl Strategy<Value = f64> {
    (4u32..=40).prop_map(|q| f64::from(q) / 4.0)
}

/// Any real target on the scale.
fn target() -> impl Strategy<Value = f64> {
    1.0f64..=10.0
}

fn count() -> impl Strategy<Value = NonZeroUsize> {
    (1usize..=10).prop_map(|k| NonZeroUsize::new(k).expect("k >= 1"))
}

// =============================================================================
// PROPERTY TESTS
// =============================================================================

proptest! {
    /// The average is sum over count and sits between min and max.
    #[test]
    fn average_is_sum_over_count(grades in vec(grade(), 1..60)) {
        let avg = current_average(&grades).expect("non-empty");
        let expected = grades.iter().sum::<f64>() / grades.len() as f64;
        prop_assert!((avg - expected).abs() < TOLERANCE);

        let min = grades.iter().copied().fold(f64::INFINITY, f64::min);
        let max = grades.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        prop_assert!(avg >= min - TOLERANCE && avg <= max + TOLERANCE);
    }

    /// Adding the required grade lands exactly on the target.
    #[test]
    fn required_grade_hits_target(grades in vec(grade(), 0..60), t in target()) {
        let r = required_grade(&grades, t);
        let n = grades.len() as f64;
        let s: f64 = grades.iter().sum();
        prop_assert!(((s + r) / (n + 1.0) - t).abs() < TOLERANCE);
    }

    /// Adding k copies of the uniform requirement lands exactly on the target.
    #[test]
    fn required_grades_hit_target(
        grades in vec(grade(), 0..60),
        t in target(),
        k in count(),
    ) {
        let required = required_grades(&grades, t, k);
        prop_assert_eq!(required.len(), k.get());
        prop_assert!(required.windows(2).all(|w| (w[0] - w[1]).abs() < TOLERANCE));

        let n = grades.len() as f64;
        let s: f64 = grades.iter().sum();
        let added: f64 = required.iter().sum();
        prop_assert!(((s + added) / (n + k.get() as f64) - t).abs() < TOLERANCE);
    }

    /// Predicting with nothing added changes nothing.
    #[test]
    fn empty_prediction_is_identity(grades in vec(grade(), 1..60)) {
        let p = predict_average(&grades, &[]).expect("non-empty");
        let avg = current_average(&grades).expect("non-empty");
        prop_assert!((p.predicted_average - avg).abs() < TOLERANCE);
        prop_assert!(p.change.abs() < TOLERANCE);
    }

    /// Prediction equals the plain average of both lists together.
    #[test]
    fn prediction_matches_merged_average(
        grades in vec(grade(), 1..40),
        extra in vec(grade(), 0..10),
    ) {
        let p = predict_average(&grades, &extra).expect("non-empty");
        let merged: Vec<f64> = grades.iter().chain(extra.iter()).copied().collect();
        let expected = current_average(&merged).expect("non-empty");
        prop_assert!((p.predicted_average - expected).abs() < TOLERANCE);
        prop_assert!((p.change - (p.predicted_average - p.current_average)).abs() < TOLERANCE);
    }

    /// Raising the target never lowers the requirement.
    #[test]
    fn requirement_is_monotonic_in_target(
        grades in vec(grade(), 0..60),
        a in target(),
        b in target(),
        k in count(),
    ) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        let r_low = Tally::of(&grades).required_per_grade(low, k);
        let r_high = Tally::of(&grades).required_per_grade(high, k);
        prop_assert!(r_low <= r_high + TOLERANCE);
    }

    /// Rounding always yields an allowed grade.
    #[test]
    fn rounding_lands_on_allowed_grade(g in -5.0f64..20.0) {
        let rounded = round_to_allowed_grade(g);
        prop_assert!(ALLOWED_GRADES.iter().any(|a| (a - rounded).abs() < TOLERANCE));
    }

    /// The automatic count is the smallest that works.
    #[test]
    fn auto_count_is_minimal(grades in vec(grade(), 1..60), t in target()) {
        let tally = Tally::of(&grades);
        match auto_grade_count(tally, t) {
            Some(k) => {
                prop_assert!(tally.required_per_grade(t, k) <= MAX_GRADE);
                if let Some(prev) = NonZeroUsize::new(k.get() - 1) {
                    prop_assert!(tally.required_per_grade(t, prev) > MAX_GRADE);
                }
            }
            None => {
                let goal = plan_goal(&grades, t, GradeCount::Auto);
                prop_assert_eq!(goal.grade_count, MAX_AUTO_GRADE_COUNT);
                prop_assert_eq!(goal.feasibility, Feasibility::Infeasible);
            }
        }
    }

    /// Suggestions are ranked easiest first and never mix in infeasible
    /// subjects while a feasible one exists.
    #[test]
    fn suggestions_sorted_and_filtered(
        subjects in btree_map("[A-Z]{3,8}", vec(grade(), 0..15), 1..8),
        t in target(),
        k in count(),
    ) {
        let set = suggest_subjects(&subjects, t, GradeCount::Fixed(k));
        let with_grades = subjects.values().filter(|g| !g.is_empty()).count();

        if set.any_feasible {
            prop_assert!(set.suggestions.iter().all(|s| s.required_grade <= MAX_GRADE));
            prop_assert!(set
                .suggestions
                .windows(2)
                .all(|w| w[0].required_grade <= w[1].required_grade));
        } else {
            prop_assert_eq!(set.suggestions.len(), with_grades);
            prop_assert!(set.suggestions.iter().all(|s| s.required_grade > MAX_GRADE));
        }
    }
}
