//! # Assessment Tiers
//!
//! Discrete tiers over raw numbers, so the presentation layer can pick a
//! message or a colour without repeating the thresholds.
//!
//! | Tier | Input | Bands |
//! |------|-------|-------|
//! | [`Effort`] | raw required grade | `<1` achieved, `<6` modest, `<7` almost there, `<9` feasible, `<9.5` demanding, `<=10` maximum, `>10` infeasible |
//! | [`Direction`] | prediction change | `>0.5` sharp rise, `>0` rise, `0` stable, `>-0.5` dip, else sharp drop |
//! | [`Band`] | single grade | `>=6.5` excellent, `>=5.5` pass, else fail |

use crate::primitives::{MAX_GRADE, MIN_GRADE};
use serde::{Deserialize, Serialize};

// =============================================================================
// THRESHOLDS
// =============================================================================

/// Below this a required grade is a modest effort.
pub const PASS_THRESHOLD: f64 = 6.0;

/// From here a required grade is comfortably feasible.
pub const FEASIBLE_THRESHOLD: f64 = 7.0;

/// From here a required grade calls for real effort.
pub const DEMANDING_THRESHOLD: f64 = 9.0;

/// From here the required grade effectively means a 10.
pub const MAXIMUM_THRESHOLD: f64 = 9.5;

/// A prediction change beyond this (either sign) is "sharp".
pub const SHARP_CHANGE: f64 = 0.5;

/// Grades at or above this show as excellent.
pub const EXCELLENT_GRADE: f64 = 6.5;

/// Grades at or above this show as passing.
pub const PASSING_GRADE: f64 = 5.5;

// =============================================================================
// EFFORT
// =============================================================================

/// How hard a required grade is to obtain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Effort {
    Achieved,
    Modest,
    AlmostThere,
    Feasible,
    Demanding,
    Maximum,
    Infeasible,
}

impl Effort {
    /// Classify a raw required grade.
    #[must_use]
    pub fn of(required: f64) -> Self {
        if required < MIN_GRADE {
            Self::Achieved
        } else if required > MAX_GRADE {
            Self::Infeasible
        } else if required >= MAXIMUM_THRESHOLD {
            Self::Maximum
        } else if required >= DEMANDING_THRESHOLD {
            Self::Demanding
        } else if required >= FEASIBLE_THRESHOLD {
            Self::Feasible
        } else if required >= PASS_THRESHOLD {
            Self::AlmostThere
        } else {
            Self::Modest
        }
    }
}

// =============================================================================
// DIRECTION
// =============================================================================

/// Which way a prediction moves the average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    SharpRise,
    Rise,
    Stable,
    Dip,
    SharpDrop,
}

impl Direction {
    /// Classify an average change.
    #[must_use]
    pub fn of(change: f64) -> Self {
        if change > SHARP_CHANGE {
            Self::SharpRise
        } else if change > 0.0 {
            Self::Rise
        } else if change == 0.0 {
            Self::Stable
        } else if change > -SHARP_CHANGE {
            Self::Dip
        } else {
            Self::SharpDrop
        }
    }
}

// =============================================================================
// BAND
// =============================================================================

/// Display band of a single grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Band {
    Excellent,
    Pass,
    Fail,
}

impl Band {
    /// Classify a grade value.
    #[must_use]
    pub fn of(grade: f64) -> Self {
        if grade >= EXCELLENT_GRADE {
            Self::Excellent
        } else if grade >= PASSING_GRADE {
            Self::Pass
        } else {
            Self::Fail
        }
    }
}
