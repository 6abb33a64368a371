//! # Worked Scenarios
//!
//! Concrete end-to-end examples of the calculator, plus the same questions
//! asked through a grade book parsed from a portal payload.

use chemediaho_core::{
    BluePolicy, Effort, Feasibility, GradeCount, GradeScope, PeriodId, current_average,
    parse_gradebook, plan_goal, predict_average, required_grade, required_grades,
    suggest_subjects,
};
use std::collections::BTreeMap;
use std::num::NonZeroUsize;

const EPS: f64 = 1e-9;

fn k(n: usize) -> NonZeroUsize {
    NonZeroUsize::new(n).expect("k >= 1")
}

// =============================================================================
// CALCULATOR SCENARIOS
// =============================================================================

mod calculator {
    use super::*;

    /// [6, 7, 8] towards 7.5: average 7, one 9 needed.
    #[test]
    fn single_grade_to_target() {
        let grades = [6.0, 7.0, 8.0];
        let avg = current_average(&grades).expect("non-empty");
        assert!((avg - 7.0).abs() < EPS);

        let required = required_grade(&grades, 7.5);
        assert!((required - 9.0).abs() < EPS);
        assert_eq!(Feasibility::of(required), Feasibility::Reachable);
    }

    /// [8, 8] towards 9 over two grades: exactly 10 each, still feasible.
    #[test]
    fn two_grades_exactly_at_max() {
        let required = required_grades(&[8.0, 8.0], 9.0, k(2));
        assert_eq!(required.len(), 2);
        assert!(required.iter().all(|r| (r - 10.0).abs() < EPS));
        assert_eq!(Feasibility::of(required[0]), Feasibility::Reachable);
        assert_eq!(Effort::of(required[0]), Effort::Maximum);
    }

    /// [5, 5] towards 9: a 17 would be needed.
    #[test]
    fn unreachable_target() {
        let required = required_grade(&[5.0, 5.0], 9.0);
        assert!((required - 17.0).abs() < EPS);
        assert_eq!(Feasibility::of(required), Feasibility::Infeasible);

        let goal = plan_goal(&[5.0, 5.0], 9.0, GradeCount::default());
        assert!((goal.display_grade - 10.0).abs() < EPS);
        assert!(!goal.already_met);
    }

    /// [6] plus hypothetical [8, 9]: 23 / 3.
    #[test]
    fn prediction_with_two_grades() {
        let p = predict_average(&[6.0], &[8.0, 9.0]).expect("non-empty");
        assert!((p.predicted_average - 23.0 / 3.0).abs() < EPS);
        assert!((p.change - (23.0 / 3.0 - 6.0)).abs() < EPS);
        assert!((p.predicted_average - 7.667).abs() < 1e-3);
        assert!((p.change - 1.667).abs() < 1e-3);
        assert_eq!(p.added, 2);
    }

    /// A=[9,9], B=[5,5] towards 7 with one grade: only A is listed.
    #[test]
    fn suggestion_keeps_only_feasible_subject() {
        let mut subjects = BTreeMap::new();
        subjects.insert("A".to_string(), vec![9.0, 9.0]);
        subjects.insert("B".to_string(), vec![5.0, 5.0]);

        let set = suggest_subjects(&subjects, 7.0, GradeCount::Fixed(k(1)));
        assert!(set.any_feasible);
        assert_eq!(set.suggestions.len(), 1);

        let a = &set.suggestions[0];
        assert_eq!(a.subject, "A");
        assert!((a.current_average - 9.0).abs() < EPS);
        assert!((a.required_grade - 3.0).abs() < EPS);
        assert_eq!(a.num_current_grades, 2);
    }
}

// =============================================================================
// GRADE BOOK SCENARIOS
// =============================================================================

mod gradebook {
    use super::*;

    const PAYLOAD: &str = r#"{"grades": [
        {"subjectDesc": "MATEMATICA", "periodPos": 2, "decimalValue": 5.0},
        {"subjectDesc": "MATEMATICA", "periodPos": 2, "decimalValue": 6.0},
        {"subjectDesc": "INGLESE",    "periodPos": 2, "decimalValue": 8.0},
        {"subjectDesc": "INGLESE",    "periodPos": 2, "decimalValue": 4.0, "color": "blue"},
        {"subjectDesc": "MATEMATICA", "periodPos": 3, "decimalValue": 7.0}
    ]}"#;

    #[test]
    fn subject_goal_in_period() {
        let book = parse_gradebook(PAYLOAD).expect("payload");
        let scope = GradeScope::Subject {
            period: PeriodId::new(1),
            subject: "MATEMATICA".to_string(),
        };
        let values = book.scope_values(&scope, BluePolicy::Include).expect("scope");
        let goal = plan_goal(&values, 6.0, GradeCount::default());
        // (11 + r) / 3 = 6
        assert!((goal.required_grade - 7.0).abs() < EPS);
    }

    #[test]
    fn overall_goal_with_blue_excluded() {
        let book = parse_gradebook(PAYLOAD).expect("payload");
        let values = book
            .scope_values(&GradeScope::Overall, BluePolicy::Exclude)
            .expect("scope");
        assert_eq!(values.len(), 4);
        let goal = plan_goal(&values, 7.0, GradeCount::Auto);
        // (26 + 10k') ... smallest k with (7(4+k) - 26)/k <= 10 is k = 1 (needs 9)
        assert_eq!(goal.grade_count, 1);
        assert!((goal.required_grade - 9.0).abs() < EPS);
    }

    #[test]
    fn overall_suggestions_merge_periods() {
        let book = parse_gradebook(PAYLOAD).expect("payload");
        let per_subject = book
            .per_subject_values(None, BluePolicy::Include)
            .expect("subjects");
        let set = suggest_subjects(&per_subject, 6.5, GradeCount::Fixed(k(1)));
        // INGLESE [8, 4] needs 7.5, MATEMATICA [5, 6, 7] needs 8
        let names: Vec<&str> = set.suggestions.iter().map(|s| s.subject.as_str()).collect();
        assert_eq!(names, vec!["INGLESE", "MATEMATICA"]);
    }
}
