//! # Grade Book
//!
//! Typed period → subject → grades structure, replacing the loosely shaped
//! dictionaries the portal hands back.
//!
//! Aggregation rules:
//! - Subject average: mean of the subject's grades in one period.
//! - Period average: mean of *every* grade in the period, not the mean of
//!   subject averages.
//! - Overall average: mean of every grade in every period.
//!
//! All averages honour a [`BluePolicy`]; listings always show every grade.

use crate::calculator::current_average;
use crate::{BluePolicy, Grade, GradeScope, MediaError, PeriodId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

// =============================================================================
// PERIOD
// =============================================================================

/// Subjects of one grading period, each with its grades in arrival order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Period {
    subjects: BTreeMap<String, Vec<Grade>>,
}

impl Period {
    /// Iterate subjects alphabetically with their grades.
    pub fn subjects(&self) -> impl Iterator<Item = (&str, &[Grade])> {
        self.subjects
            .iter()
            .map(|(name, grades)| (name.as_str(), grades.as_slice()))
    }

    /// Grades of one subject, if present.
    #[must_use]
    pub fn subject(&self, name: &str) -> Option<&[Grade]> {
        self.subjects.get(name).map(Vec::as_slice)
    }
}

/// Values of the grades that count under `policy`.
fn counted(grades: &[Grade], policy: BluePolicy) -> impl Iterator<Item = f64> + '_ {
    grades
        .iter()
        .filter(move |g| policy.counts(g))
        .map(|g| g.value)
}

// =============================================================================
// GRADE BOOK
// =============================================================================

/// Every grade of a student, grouped by period and subject.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GradeBook {
    periods: BTreeMap<PeriodId, Period>,
}

impl GradeBook {
    /// Create an empty grade book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a grade to a subject of a period, creating both as needed.
    pub fn push(&mut self, period: PeriodId, subject: impl Into<String>, grade: Grade) {
        self.periods
            .entry(period)
            .or_default()
            .subjects
            .entry(subject.into())
            .or_default()
            .push(grade);
    }

    /// Whether the book holds no grades at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    /// Total number of grades, blue included.
    #[must_use]
    pub fn grade_count(&self) -> usize {
        self.periods
            .values()
            .flat_map(|p| p.subjects.values())
            .map(Vec::len)
            .sum()
    }

    /// Iterate periods in ascending order.
    pub fn periods(&self) -> impl Iterator<Item = (PeriodId, &Period)> {
        self.periods.iter().map(|(id, p)| (*id, p))
    }

    /// Look up a period.
    pub fn period(&self, id: PeriodId) -> Result<&Period, MediaError> {
        self.periods.get(&id).ok_or(MediaError::PeriodNotFound(id))
    }

    /// All subject names across all periods, alphabetical.
    #[must_use]
    pub fn subject_names(&self) -> BTreeSet<&str> {
        self.periods
            .values()
            .flat_map(|p| p.subjects.keys().map(String::as_str))
            .collect()
    }

    /// Grades of one subject in one period.
    pub fn subject_grades(&self, period: PeriodId, subject: &str) -> Result<&[Grade], MediaError> {
        self.period(period)?
            .subject(subject)
            .ok_or_else(|| MediaError::SubjectNotFound(subject.to_string()))
    }

    /// Grade values counted for a scope.
    pub fn scope_values(&self, scope: &GradeScope, policy: BluePolicy) -> Result<Vec<f64>, MediaError> {
        match scope {
            GradeScope::Subject { period, subject } => {
                Ok(counted(self.subject_grades(*period, subject)?, policy).collect())
            }
            GradeScope::Period { period } => Ok(self
                .period(*period)?
                .subjects
                .values()
                .flat_map(|grades| counted(grades, policy))
                .collect()),
            GradeScope::Overall => Ok(self
                .periods
                .values()
                .flat_map(|p| p.subjects.values())
                .flat_map(|grades| counted(grades, policy))
                .collect()),
        }
    }

    /// Counted grade values per subject.
    ///
    /// With a period, only that period's subjects; without, each subject's
    /// grades merged across every period (ascending period order).
    pub fn per_subject_values(
        &self,
        period: Option<PeriodId>,
        policy: BluePolicy,
    ) -> Result<BTreeMap<String, Vec<f64>>, MediaError> {
        let mut out: BTreeMap<String, Vec<f64>> = BTreeMap::new();
        let periods: Vec<&Period> = match period {
            Some(id) => vec![self.period(id)?],
            None => self.periods.values().collect(),
        };
        for p in periods {
            for (subject, grades) in &p.subjects {
                out.entry(subject.clone())
                    .or_default()
                    .extend(counted(grades, policy));
            }
        }
        Ok(out)
    }

    /// Grades of one subject across all periods, tagged with their period.
    pub fn subject_history(&self, subject: &str) -> Result<Vec<(PeriodId, &Grade)>, MediaError> {
        let history: Vec<(PeriodId, &Grade)> = self
            .periods
            .iter()
            .filter_map(|(id, p)| p.subjects.get(subject).map(|grades| (*id, grades)))
            .flat_map(|(id, grades)| grades.iter().map(move |g| (id, g)))
            .collect();
        if history.is_empty() {
            return Err(MediaError::SubjectNotFound(subject.to_string()));
        }
        Ok(history)
    }

    /// Average of a scope; `None` when it has no counted grades.
    pub fn average(&self, scope: &GradeScope, policy: BluePolicy) -> Result<Option<f64>, MediaError> {
        Ok(current_average(&self.scope_values(scope, policy)?))
    }

    /// Build the display summary.
    #[must_use]
    pub fn summary(&self, policy: BluePolicy) -> GradeBookSummary {
        let periods = self
            .periods
            .iter()
            .map(|(id, period)| {
                let subjects = period
                    .subjects
                    .iter()
                    .map(|(name, grades)| {
                        let values: Vec<f64> = counted(grades, policy).collect();
                        SubjectSummary {
                            subject: name.clone(),
                            count: values.len(),
                            average: current_average(&values),
                            grades: grades.clone(),
                        }
                    })
                    .collect();
                let values: Vec<f64> = period
                    .subjects
                    .values()
                    .flat_map(|grades| counted(grades, policy))
                    .collect();
                PeriodSummary {
                    period: *id,
                    average: current_average(&values),
                    subjects,
                }
            })
            .collect();

        let all: Vec<f64> = self
            .periods
            .values()
            .flat_map(|p| p.subjects.values())
            .flat_map(|grades| counted(grades, policy))
            .collect();

        GradeBookSummary {
            policy,
            grade_count: self.grade_count(),
            overall_average: current_average(&all),
            periods,
        }
    }
}

// =============================================================================
// SUMMARY
// =============================================================================

/// Display view of one subject in one period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectSummary {
    pub subject: String,
    /// Grades counted under the policy.
    pub count: usize,
    pub average: Option<f64>,
    /// Every grade, counted or not.
    pub grades: Vec<Grade>,
}

/// Display view of one period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodSummary {
    pub period: PeriodId,
    pub average: Option<f64>,
    pub subjects: Vec<SubjectSummary>,
}

/// Display view of a whole grade book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeBookSummary {
    pub policy: BluePolicy,
    /// Total grades, blue included.
    pub grade_count: usize,
    pub overall_average: Option<f64>,
    pub periods: Vec<PeriodSummary>,
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn sample() -> GradeBook {
        let mut book = GradeBook::new();
        book.push(PeriodId::new(1), "MATEMATICA", Grade::new(6.0));
        book.push(PeriodId::new(1), "MATEMATICA", Grade::new(8.0));
        book.push(PeriodId::new(1), "ITALIANO", Grade::new(7.0));
        book.push(PeriodId::new(2), "MATEMATICA", Grade::new(9.0));
        book.push(PeriodId::new(2), "STORIA", Grade::new(3.0).blue());
        book
    }

    #[test]
    fn period_average_uses_every_grade() {
        let book = sample();
        let avg = book
            .average(&GradeScope::Period { period: PeriodId::new(1) }, BluePolicy::Include)
            .expect("period exists")
            .expect("has grades");
        // (6 + 8 + 7) / 3, not ((6+8)/2 + 7) / 2
        assert!((avg - 7.0).abs() < EPS);
    }

    #[test]
    fn overall_average_respects_blue_policy() {
        let book = sample();
        let with_blue = book
            .average(&GradeScope::Overall, BluePolicy::Include)
            .expect("overall")
            .expect("has grades");
        let without_blue = book
            .average(&GradeScope::Overall, BluePolicy::Exclude)
            .expect("overall")
            .expect("has grades");
        assert!((with_blue - 33.0 / 5.0).abs() < EPS);
        assert!((without_blue - 30.0 / 4.0).abs() < EPS);
    }

    #[test]
    fn unknown_period_and_subject_are_errors() {
        let book = sample();
        assert!(matches!(
            book.period(PeriodId::new(9)),
            Err(MediaError::PeriodNotFound(p)) if p == PeriodId::new(9)
        ));
        assert!(matches!(
            book.subject_grades(PeriodId::new(1), "STORIA"),
            Err(MediaError::SubjectNotFound(_))
        ));
        assert!(book.subject_history("LATINO").is_err());
    }

    #[test]
    fn per_subject_values_merge_across_periods() {
        let book = sample();
        let merged = book
            .per_subject_values(None, BluePolicy::Exclude)
            .expect("all periods");
        assert_eq!(merged.get("MATEMATICA"), Some(&vec![6.0, 8.0, 9.0]));
        assert_eq!(merged.get("STORIA"), Some(&vec![]));

        let first = book
            .per_subject_values(Some(PeriodId::new(1)), BluePolicy::Include)
            .expect("period 1");
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn summary_keeps_blue_grades_for_display() {
        let summary = sample().summary(BluePolicy::Exclude);
        assert_eq!(summary.grade_count, 5);
        let storia = &summary.periods[1].subjects[1];
        assert_eq!(storia.subject, "STORIA");
        assert_eq!(storia.count, 0);
        assert!(storia.average.is_none());
        assert_eq!(storia.grades.len(), 1);
    }

    #[test]
    fn subject_names_are_unique_and_sorted() {
        let book = sample();
        let names: Vec<&str> = book.subject_names().into_iter().collect();
        assert_eq!(names, vec!["ITALIANO", "MATEMATICA", "STORIA"]);
    }
}
