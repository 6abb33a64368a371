//! # Input Formats
//!
//! Parsers turning external payloads into a [`crate::GradeBook`].

pub mod classeviva;

pub use classeviva::{ClasseVivaGrade, ClasseVivaPayload, parse_gradebook};
