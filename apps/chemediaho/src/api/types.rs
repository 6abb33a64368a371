//! # API Request/Response Types
//!
//! This module defines the JSON structures for the HTTP API.
//! Every request carries the grades it works on; nothing is kept between
//! requests.

use chemediaho_core::{
    Band, Direction, Effort, Goal, GradeBook, GradeBookSummary, GradeCount, GradeScope,
    MediaError, PeriodId, Prediction, SuggestionSet, TrendPoint,
    formats::{ClasseVivaGrade, ClasseVivaPayload},
    primitives::validate_count,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// =============================================================================
// ERROR RESPONSE
// =============================================================================

/// Body of every failed request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    /// Create an error body.
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

// =============================================================================
// NUMBER OF GRADES
// =============================================================================

/// `num_grades` as sent by clients: a number or the string `"auto"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumGrades {
    Count(usize),
    Keyword(String),
}

impl NumGrades {
    /// Resolve to a [`GradeCount`], enforcing the 1..=10 range on explicit counts.
    pub fn resolve(&self) -> Result<GradeCount, MediaError> {
        match self {
            Self::Count(n) => validate_count(*n).map(GradeCount::Fixed),
            Self::Keyword(s) => match s.parse::<GradeCount>()? {
                GradeCount::Fixed(k) => validate_count(k.get()).map(GradeCount::Fixed),
                GradeCount::Auto => Ok(GradeCount::Auto),
            },
        }
    }
}

/// Resolve an optional `num_grades`; absent means one grade.
pub fn resolve_count(num_grades: Option<&NumGrades>) -> Result<GradeCount, MediaError> {
    num_grades.map_or(Ok(GradeCount::default()), NumGrades::resolve)
}

// =============================================================================
// AVERAGE
// =============================================================================

/// Average request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AverageRequest {
    pub grades: Vec<f64>,
}

/// Average response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AverageResponse {
    pub success: bool,
    pub average: f64,
    pub count: usize,
    pub band: Band,
}

// =============================================================================
// GOAL
// =============================================================================

/// Goal request over a plain grade list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalRequest {
    #[serde(default)]
    pub grades: Vec<f64>,
    pub target_average: f64,
    #[serde(default)]
    pub num_grades: Option<NumGrades>,
}

/// Goal response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalResponse {
    pub success: bool,
    #[serde(flatten)]
    pub goal: Goal,
    /// Raw requirement, once per future grade.
    pub required_grades: Vec<f64>,
    /// Rounded requirement, once per future grade.
    pub display_grades: Vec<f64>,
    pub band: Band,
    pub effort: Effort,
    pub message: String,
}

impl GoalResponse {
    /// Wrap a planned goal with its presentation fields.
    #[must_use]
    pub fn new(goal: Goal, message: String) -> Self {
        Self {
            success: true,
            required_grades: vec![goal.required_grade; goal.grade_count],
            display_grades: goal.display_grades(),
            band: Band::of(goal.display_grade),
            effort: Effort::of(goal.required_grade),
            goal,
            message,
        }
    }
}

// =============================================================================
// PREDICT
// =============================================================================

/// Prediction request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictRequest {
    pub grades: Vec<f64>,
    #[serde(default)]
    pub predicted_grades: Vec<f64>,
}

/// Prediction response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictResponse {
    pub success: bool,
    pub current_average: f64,
    pub predicted_average: f64,
    pub change: f64,
    pub num_predicted_grades: usize,
    pub trend: Direction,
    pub message: String,
}

impl PredictResponse {
    /// Wrap a prediction with its trend and message.
    #[must_use]
    pub fn new(prediction: Prediction, message: String) -> Self {
        Self {
            success: true,
            current_average: prediction.current_average,
            predicted_average: prediction.predicted_average,
            change: prediction.change,
            num_predicted_grades: prediction.added,
            trend: Direction::of(prediction.change),
            message,
        }
    }
}

// =============================================================================
// SUGGEST
// =============================================================================

/// Suggestion request over plain per-subject lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestRequest {
    pub subjects: BTreeMap<String, Vec<f64>>,
    pub target_average: f64,
    #[serde(default)]
    pub num_grades: Option<NumGrades>,
    /// Maximum suggestions returned; defaults to the configured value.
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Suggestion response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestResponse {
    pub success: bool,
    #[serde(flatten)]
    pub set: SuggestionSet,
    pub message: String,
}

// =============================================================================
// GRADE BOOK
// =============================================================================

/// Portal payload plus the blue-grade preference.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GradebookRequest {
    #[serde(default)]
    pub grades: Vec<ClasseVivaGrade>,
    #[serde(default)]
    pub include_blue_grades: Option<bool>,
}

/// Group portal records into a grade book.
pub fn to_gradebook(grades: Vec<ClasseVivaGrade>) -> Result<GradeBook, MediaError> {
    ClasseVivaPayload { grades }.to_gradebook()
}

/// Grade book summary response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradebookResponse {
    pub success: bool,
    #[serde(flatten)]
    pub summary: GradeBookSummary,
    /// Every subject name, alphabetical.
    pub subjects: Vec<String>,
}

/// Goal over a slice of a portal payload.
///
/// `period` and `subject` select the scope: both for one subject in one
/// period, `period` alone for a whole period, neither for the overall average.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradebookGoalRequest {
    #[serde(default)]
    pub grades: Vec<ClasseVivaGrade>,
    #[serde(default)]
    pub include_blue_grades: Option<bool>,
    #[serde(default)]
    pub period: Option<u32>,
    #[serde(default)]
    pub subject: Option<String>,
    pub target_average: f64,
    #[serde(default)]
    pub num_grades: Option<NumGrades>,
}

impl GradebookGoalRequest {
    /// Scope named by `period` and `subject`.
    pub fn scope(&self) -> Result<GradeScope, MediaError> {
        grade_scope(self.period, self.subject.as_deref())
    }
}

/// Build a scope from an optional period and subject.
///
/// Both select one subject in one period, `period` alone a whole period,
/// neither the overall average. Period 0 is read as the first period.
pub fn grade_scope(period: Option<u32>, subject: Option<&str>) -> Result<GradeScope, MediaError> {
    match (period, subject) {
        (Some(period), Some(subject)) => Ok(GradeScope::Subject {
            period: PeriodId::new(period),
            subject: subject.to_string(),
        }),
        (Some(period), None) => Ok(GradeScope::Period {
            period: PeriodId::new(period),
        }),
        (None, None) => Ok(GradeScope::Overall),
        (None, Some(subject)) => Err(MediaError::ParseError(format!(
            "Subject '{}' requires a period",
            subject
        ))),
    }
}

/// Goal over a grade-book scope, with suggestions when the scope spans
/// several subjects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradebookGoalResponse {
    #[serde(flatten)]
    pub result: GoalResponse,
    pub scope: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<SuggestionSet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion_message: Option<String>,
}

/// Prediction over a slice of a portal payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradebookPredictRequest {
    #[serde(default)]
    pub grades: Vec<ClasseVivaGrade>,
    #[serde(default)]
    pub include_blue_grades: Option<bool>,
    #[serde(default)]
    pub period: Option<u32>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub predicted_grades: Vec<f64>,
}

impl GradebookPredictRequest {
    /// Scope named by `period` and `subject`.
    pub fn scope(&self) -> Result<GradeScope, MediaError> {
        grade_scope(self.period, self.subject.as_deref())
    }
}

/// Prediction over a grade-book scope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradebookPredictResponse {
    #[serde(flatten)]
    pub result: PredictResponse,
    pub scope: String,
}

/// Trend request: a subject's running average, or the period series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendRequest {
    #[serde(default)]
    pub grades: Vec<ClasseVivaGrade>,
    #[serde(default)]
    pub include_blue_grades: Option<bool>,
    #[serde(default)]
    pub subject: Option<String>,
}

/// Trend response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendResponse {
    pub success: bool,
    pub subject: Option<String>,
    pub points: Vec<TrendPoint>,
}
