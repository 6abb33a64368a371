//! # Core Type Definitions
//!
//! This module contains the shared types of the grade engine:
//! - Grade records (`Grade`) with their display metadata
//! - Identifiers for periods and scopes (`PeriodId`, `GradeScope`)
//! - Policies and counts (`BluePolicy`, `GradeCount`)
//! - Error types (`MediaError`)
//!
//! Grade values are plain `f64` on the conventional 1–10 school scale.
//! Range checks live at the boundary (see [`crate::primitives`]).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;
use thiserror::Error;

// =============================================================================
// PERIOD IDENTIFIER
// =============================================================================

/// User-facing grading period number (trimester, semester...).
/// Always >= 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PeriodId(u32);

impl PeriodId {
    /// Create a period id, clamping to the first period.
    #[must_use]
    pub const fn new(number: u32) -> Self {
        if number < 1 { Self(1) } else { Self(number) }
    }

    /// Get the raw period number.
    #[must_use]
    pub const fn number(self) -> u32 {
        self.0
    }
}

impl fmt::Display for PeriodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// GRADE
// =============================================================================

/// A single assessment score with its display metadata.
///
/// Only `value` and `is_blue` matter to the arithmetic; the rest is carried
/// through for listings and CSV export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grade {
    /// Numeric value on the 1–10 scale.
    pub value: f64,
    /// Event date as reported by the portal (e.g. `2024-10-15`).
    #[serde(default)]
    pub date: String,
    /// Component description (written, oral, practical...).
    #[serde(default)]
    pub component: String,
    /// Teacher who assigned the grade.
    #[serde(default)]
    pub teacher: String,
    /// Free-text notes for the family.
    #[serde(default)]
    pub notes: String,
    /// Blue grades are informational; the blue policy may exclude them.
    #[serde(default)]
    pub is_blue: bool,
}

impl Grade {
    /// Create a grade with no metadata.
    #[must_use]
    pub fn new(value: f64) -> Self {
        Self {
            value,
            date: String::new(),
            component: String::new(),
            teacher: String::new(),
            notes: String::new(),
            is_blue: false,
        }
    }

    /// Mark the grade as blue.
    #[must_use]
    pub fn blue(mut self) -> Self {
        self.is_blue = true;
        self
    }
}

// =============================================================================
// BLUE GRADE POLICY
// =============================================================================

/// Whether blue grades count towards averages and goals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BluePolicy {
    /// Every grade counts.
    #[default]
    Include,
    /// Blue grades are ignored by every average.
    Exclude,
}

impl BluePolicy {
    /// Build the policy from an "include blue grades" flag.
    #[must_use]
    pub const fn from_include(include_blue: bool) -> Self {
        if include_blue {
            Self::Include
        } else {
            Self::Exclude
        }
    }

    /// Check whether a grade counts under this policy.
    #[must_use]
    pub fn counts(self, grade: &Grade) -> bool {
        match self {
            Self::Include => true,
            Self::Exclude => !grade.is_blue,
        }
    }
}

// =============================================================================
// GRADE COUNT
// =============================================================================

/// How many future grades a goal is spread over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradeCount {
    /// Exactly this many future grades.
    Fixed(NonZeroUsize),
    /// Search for the smallest count that makes the goal reachable.
    Auto,
}

impl Default for GradeCount {
    fn default() -> Self {
        Self::Fixed(NonZeroUsize::MIN)
    }
}

impl FromStr for GradeCount {
    type Err = MediaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("auto") {
            return Ok(Self::Auto);
        }
        let count: usize = trimmed
            .parse()
            .map_err(|_| MediaError::InvalidGradeCount(0))?;
        NonZeroUsize::new(count)
            .map(Self::Fixed)
            .ok_or(MediaError::InvalidGradeCount(count))
    }
}

impl fmt::Display for GradeCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(k) => write!(f, "{}", k),
            Self::Auto => write!(f, "auto"),
        }
    }
}

// =============================================================================
// GRADE SCOPE
// =============================================================================

/// Which slice of a grade book a goal or prediction applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum GradeScope {
    /// One subject inside one period.
    Subject { period: PeriodId, subject: String },
    /// Every grade of one period.
    Period { period: PeriodId },
    /// Every grade of every period.
    Overall,
}

impl fmt::Display for GradeScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Subject { period, subject } => write!(f, "{} (periodo {})", subject, period),
            Self::Period { period } => write!(f, "periodo {}", period),
            Self::Overall => write!(f, "media generale"),
        }
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors raised by validation, parsing and export.
///
/// The calculator itself is total over well-formed numbers; these errors
/// come from the helpers that guard it.
#[derive(Debug, Error)]
pub enum MediaError {
    /// An average was required but there are no grades.
    #[error("No grades available")]
    EmptyGrades,

    /// A grade value is outside the 1–10 scale or not finite.
    #[error("Grade out of range: {0} (expected 1-10)")]
    GradeOutOfRange(f64),

    /// A target average is outside the 1–10 scale or not finite.
    #[error("Target average out of range: {0} (expected 1-10)")]
    TargetOutOfRange(f64),

    /// The number of future grades is outside the accepted range.
    #[error("Invalid number of grades: {0}")]
    InvalidGradeCount(usize),

    /// The requested period does not exist in the grade book.
    #[error("Period not found: {0}")]
    PeriodNotFound(PeriodId),

    /// The requested subject does not exist in the requested scope.
    #[error("Subject not found: {0}")]
    SubjectNotFound(String),

    /// The grade payload could not be parsed.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// CSV export failed.
    #[error("Export error: {0}")]
    ExportError(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),
}

impl MediaError {
    /// Whether the error is the caller's fault (bad input) rather than ours.
    #[must_use]
    pub fn is_input_error(&self) -> bool {
        !matches!(self, Self::ExportError(_) | Self::IoError(_))
    }
}

// =============================================================================
// TESTS
// =============================================================================
