//! # chemediaho-core
//!
//! The Grade Average & Goal Engine for che media ho? - THE LOGIC.
//!
//! Given the grades a student already has, this crate answers:
//! - what is my average? ([`current_average`])
//! - what do I need to reach a target? ([`required_grade`], [`required_grades`], [`plan_goal`])
//! - what happens if I get these grades? ([`predict_average`])
//! - which subject is the easiest lever? ([`suggest_subjects`])
//!
//! Around the calculator sit the typed grade book parsed from the school
//! portal payload, CSV export, trend series and assessment tiers.
//!
//! ## Constraints
//!
//! - No async, no network, no global state
//! - Every operation receives all of its inputs as arguments
//! - Range validation happens at the boundary ([`primitives`]); the
//!   calculator is total over finite numbers

// =============================================================================
// MODULES
// =============================================================================

pub mod assessment;
pub mod calculator;
pub mod export;
pub mod formats;
pub mod gradebook;
pub mod primitives;
pub mod suggest;
pub mod trend;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{BluePolicy, Grade, GradeCount, GradeScope, MediaError, PeriodId};

// =============================================================================
// RE-EXPORTS: Calculator
// =============================================================================

pub use calculator::{
    Feasibility, Goal, Prediction, Tally, auto_grade_count, current_average, plan_goal,
    predict_average, required_grade, required_grades, round_to_allowed_grade,
};
pub use suggest::{Suggestion, SuggestionSet, suggest_subjects};

// =============================================================================
// RE-EXPORTS: Grade Book, Formats, Export
// =============================================================================

pub use export::{CSV_FILENAME, export_csv};
pub use formats::{ClasseVivaPayload, parse_gradebook};
pub use gradebook::{GradeBook, GradeBookSummary, PeriodSummary, SubjectSummary};

// =============================================================================
// RE-EXPORTS: Presentation helpers
// =============================================================================

pub use assessment::{Band, Direction, Effort};
pub use trend::{TrendPoint, period_trend, running_average, subject_trend};
