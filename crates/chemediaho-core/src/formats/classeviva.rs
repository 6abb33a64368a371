//! # ClasseViva Grades Payload
//!
//! Typed view of the `GET /students/{id}/grades` response of the school
//! portal. Only the fields the grade book needs are modelled; unknown fields
//! are ignored.
//!
//! ```json
//! { "grades": [ { "subjectDesc": "MATEMATICA", "periodPos": 2,
//!                 "decimalValue": 7.5, "evtDate": "2024-10-15",
//!                 "componentDesc": "Scritto", "teacherName": "ROSSI",
//!                 "notesForFamily": "", "color": "green" } ] }
//! ```
//!
//! Conversion rules:
//! - `periodPos` is one ahead of the user-facing period: period = `periodPos - 1`,
//!   never below 1.
//! - Records with a null `decimalValue` are skipped.
//! - `color == "blue"` marks a blue grade.

use crate::primitives::validate_grade;
use crate::{Grade, GradeBook, MediaError, PeriodId};
use serde::{Deserialize, Serialize};

/// Portal color tag for blue grades.
const BLUE: &str = "blue";

/// One grade record as sent by the portal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClasseVivaGrade {
    pub subject_desc: String,
    pub period_pos: i64,
    #[serde(default)]
    pub decimal_value: Option<f64>,
    #[serde(default)]
    pub evt_date: Option<String>,
    #[serde(default)]
    pub component_desc: Option<String>,
    #[serde(default)]
    pub teacher_name: Option<String>,
    #[serde(default)]
    pub notes_for_family: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

impl ClasseVivaGrade {
    /// User-facing period of this record.
    #[must_use]
    pub fn period(&self) -> PeriodId {
        let shifted = self.period_pos.saturating_sub(1).clamp(1, i64::from(u32::MAX));
        PeriodId::new(shifted as u32)
    }

    /// Convert to a [`Grade`]; `Ok(None)` when the record carries no value.
    pub fn to_grade(&self) -> Result<Option<Grade>, MediaError> {
        let Some(value) = self.decimal_value else {
            return Ok(None);
        };
        let value = validate_grade(value)?;
        Ok(Some(Grade {
            value,
            date: self.evt_date.clone().unwrap_or_default(),
            component: self.component_desc.clone().unwrap_or_default(),
            teacher: self.teacher_name.clone().unwrap_or_default(),
            notes: self.notes_for_family.clone().unwrap_or_default(),
            is_blue: self.color.as_deref() == Some(BLUE),
        }))
    }
}

/// Whole grades payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClasseVivaPayload {
    #[serde(default)]
    pub grades: Vec<ClasseVivaGrade>,
}

impl ClasseVivaPayload {
    /// Parse a payload from JSON text.
    pub fn from_json(json: &str) -> Result<Self, MediaError> {
        serde_json::from_str(json).map_err(|e| MediaError::ParseError(e.to_string()))
    }

    /// Group the records into a grade book.
    ///
    /// Fails on the first grade value outside the 1–10 scale.
    pub fn to_gradebook(&self) -> Result<GradeBook, MediaError> {
        let mut book = GradeBook::new();
        for record in &self.grades {
            if let Some(grade) = record.to_grade()? {
                book.push(record.period(), record.subject_desc.clone(), grade);
            }
        }
        Ok(book)
    }
}

/// Parse JSON text straight into a grade book.
pub fn parse_gradebook(json: &str) -> Result<GradeBook, MediaError> {
    ClasseVivaPayload::from_json(json)?.to_gradebook()
}

// =============================================================================
// TESTS
// =============================================================================
