//! # CSV Export
//!
//! One row per grade, in a layout spreadsheet users of the portal recognise:
//!
//! ```text
//! Periodo,Materia,Voto,Data,Tipo,Docente,Note
//! Periodo 1,MATEMATICA,7.5,2024-10-15,Scritto,ROSSI MARIO,
//! ```
//!
//! Periods ascend, subjects are alphabetical, grades keep arrival order.
//! Every grade is exported, blue ones included.

use crate::{GradeBook, MediaError};

/// Column headers of the export.
pub const CSV_HEADER: [&str; 7] = ["Periodo", "Materia", "Voto", "Data", "Tipo", "Docente", "Note"];

/// Default download name for the export.
pub const CSV_FILENAME: &str = "voti.csv";

/// Render a grade value; whole numbers keep one decimal (`8.0`).
#[must_use]
pub fn format_grade(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

/// Export every grade of the book as CSV bytes.
pub fn export_csv(book: &GradeBook) -> Result<Vec<u8>, MediaError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(CSV_HEADER)
        .map_err(|e| MediaError::ExportError(e.to_string()))?;

    for (period, subjects) in book.periods() {
        let period_label = format!("Periodo {}", period);
        for (subject, grades) in subjects.subjects() {
            for grade in grades {
                writer
                    .write_record([
                        period_label.as_str(),
                        subject,
                        format_grade(grade.value).as_str(),
                        grade.date.as_str(),
                        grade.component.as_str(),
                        grade.teacher.as_str(),
                        grade.notes.as_str(),
                    ])
                    .map_err(|e| MediaError::ExportError(e.to_string()))?;
            }
        }
    }

    writer
        .into_inner()
        .map_err(|e| MediaError::ExportError(e.to_string()))
}

// =============================================================================
// TESTS
// =============================================================================
