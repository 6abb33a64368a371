//! # Trend Series
//!
//! Labelled number series for charting: a subject's running average across
//! its history, and the period averages of the whole book.
//! Rendering belongs to the client; this module only produces the numbers.

use crate::{BluePolicy, GradeBook, GradeScope, MediaError};
use serde::{Deserialize, Serialize};

/// One labelled point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub label: String,
    /// The grade itself, for subject series; `None` for period series.
    pub grade: Option<f64>,
    pub average: f64,
}

/// Running mean of a list: element `i` is the mean of the first `i + 1` values.
#[must_use]
pub fn running_average(values: &[f64]) -> Vec<f64> {
    values
        .iter()
        .scan(0.0, |sum, v| {
            *sum += v;
            Some(*sum)
        })
        .enumerate()
        .map(|(i, sum)| sum / (i + 1) as f64)
        .collect()
}

/// Running average of one subject across every period.
///
/// Labels read `P<period> V<n>`, `n` counting from 1 within each period.
/// Grades excluded by the policy are left out of the series.
pub fn subject_trend(
    book: &GradeBook,
    subject: &str,
    policy: BluePolicy,
) -> Result<Vec<TrendPoint>, MediaError> {
    let mut labelled: Vec<(String, f64)> = Vec::new();
    let mut current_period = None;
    let mut index = 0usize;

    for (period, grade) in book.subject_history(subject)? {
        if current_period != Some(period) {
            current_period = Some(period);
            index = 0;
        }
        index += 1;
        if policy.counts(grade) {
            labelled.push((format!("P{} V{}", period, index), grade.value));
        }
    }

    let values: Vec<f64> = labelled.iter().map(|(_, v)| *v).collect();
    Ok(labelled
        .into_iter()
        .zip(running_average(&values))
        .map(|((label, grade), average)| TrendPoint {
            label,
            grade: Some(grade),
            average,
        })
        .collect())
}

/// Average of every period that has counted grades, labelled `Periodo <n>`.
#[must_use]
pub fn period_trend(book: &GradeBook, policy: BluePolicy) -> Vec<TrendPoint> {
    book.periods()
        .filter_map(|(period, _)| {
            book.average(&GradeScope::Period { period }, policy)
                .ok()
                .flatten()
                .map(|average| TrendPoint {
                    label: format!("Periodo {}", period),
                    grade: None,
                    average,
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Grade, PeriodId};

    const EPS: f64 = 1e-9;

    #[test]
    fn running_average_accumulates() {
        let series = running_average(&[6.0, 8.0, 10.0]);
        assert_eq!(series.len(), 3);
        assert!((series[0] - 6.0).abs() < EPS);
        assert!((series[1] - 7.0).abs() < EPS);
        assert!((series[2] - 8.0).abs() < EPS);
        assert!(running_average(&[]).is_empty());
    }

    #[test]
    fn subject_trend_labels_restart_per_period() {
        let mut book = GradeBook::new();
        book.push(PeriodId::new(1), "INGLESE", Grade::new(6.0));
        book.push(PeriodId::new(1), "INGLESE", Grade::new(7.0));
        book.push(PeriodId::new(2), "INGLESE", Grade::new(8.0));

        let trend = subject_trend(&book, "INGLESE", BluePolicy::Include).expect("subject");
        let labels: Vec<&str> = trend.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["P1 V1", "P1 V2", "P2 V1"]);
        assert!((trend[2].average - 7.0).abs() < EPS);
    }

    #[test]
    fn subject_trend_skips_excluded_grades() {
        let mut book = GradeBook::new();
        book.push(PeriodId::new(1), "INGLESE", Grade::new(2.0).blue());
        book.push(PeriodId::new(1), "INGLESE", Grade::new(8.0));

        let trend = subject_trend(&book, "INGLESE", BluePolicy::Exclude).expect("subject");
        assert_eq!(trend.len(), 1);
        assert_eq!(trend[0].label, "P1 V2");
    }

    #[test]
    fn period_trend_skips_empty_periods() {
        let mut book = GradeBook::new();
        book.push(PeriodId::new(1), "ARTE", Grade::new(6.0));
        book.push(PeriodId::new(2), "ARTE", Grade::new(5.0).blue());

        let trend = period_trend(&book, BluePolicy::Exclude);
        assert_eq!(trend.len(), 1);
        assert_eq!(trend[0].label, "Periodo 1");
    }
}
