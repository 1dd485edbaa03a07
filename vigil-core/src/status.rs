//! Per-evaluation result records.
//!
//! A `Status` is created once per (constraint, instance, event) evaluation.
//! It is immutable after construction, except for the controlled
//! re-classification performed when an adaptive constraint revalidates its
//! recorded evaluations at the end of a replay pass.

use serde::{Deserialize, Serialize};

/// Outcome of evaluating a constraint against one instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Classification {
    /// The constraint held.
    Valid,
    /// The constraint was violated.
    Invalid,
    /// The constraint could not be decided in this context.
    Uncertain,
    /// Recorded during collection; resolved to Valid/Invalid/Uncertain by
    /// revalidation.
    Adaptive,
}

impl Classification {
    /// The worse of two classifications: Invalid dominates Uncertain, which
    /// dominates everything else. Used by reporting to fold a set of
    /// per-constraint results into one instance-level verdict.
    pub fn worst(a: Classification, b: Classification) -> Classification {
        if a == Classification::Invalid || b == Classification::Invalid {
            Classification::Invalid
        } else if a == Classification::Uncertain || b == Classification::Uncertain {
            Classification::Uncertain
        } else {
            Classification::Valid
        }
    }
}

/// The recorded result of one constraint evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Status {
    /// How the evaluation was classified.
    pub classification: Classification,
    /// Formatted left-hand (variable) value at evaluation time.
    pub actual_left: Option<String>,
    /// Formatted right-hand (bound) value, when reconstructible.
    pub actual_right: Option<String>,
    /// Pre-resolution baseline of a variable-typed bound value.
    pub initial_value: Option<String>,
    /// Raw numeric observation, present only for `Adaptive` records.
    pub adaptive_value: Option<f64>,
}

impl Status {
    /// A satisfied evaluation.
    pub fn valid(
        actual_left: Option<String>,
        actual_right: Option<String>,
        initial_value: Option<String>,
    ) -> Self {
        Self {
            classification: Classification::Valid,
            actual_left,
            actual_right,
            initial_value,
            adaptive_value: None,
        }
    }

    /// A violated evaluation.
    pub fn invalid(
        actual_left: Option<String>,
        actual_right: Option<String>,
        initial_value: Option<String>,
    ) -> Self {
        Self {
            classification: Classification::Invalid,
            actual_left,
            actual_right,
            initial_value,
            adaptive_value: None,
        }
    }

    /// An undecidable evaluation.
    pub fn uncertain() -> Self {
        Self {
            classification: Classification::Uncertain,
            actual_left: None,
            actual_right: None,
            initial_value: None,
            adaptive_value: None,
        }
    }

    /// An observation recorded while an adaptive constraint is still
    /// collecting. Carries the raw numeric value for later revalidation.
    pub fn adaptive(value: f64, actual_left: String) -> Self {
        Self {
            classification: Classification::Adaptive,
            actual_left: Some(actual_left),
            actual_right: None,
            initial_value: None,
            adaptive_value: Some(value),
        }
    }

    /// Re-classify as valid, keeping the recorded left value.
    /// Revalidation only.
    pub fn reclassify_valid(&mut self, actual_right: Option<String>) {
        self.classification = Classification::Valid;
        self.actual_right = actual_right;
    }

    /// Re-classify as invalid, keeping the recorded left value.
    /// Revalidation only.
    pub fn reclassify_invalid(&mut self, actual_right: Option<String>) {
        self.classification = Classification::Invalid;
        self.actual_right = actual_right;
    }

    /// Re-classify as uncertain. Revalidation only.
    pub fn reclassify_uncertain(&mut self) {
        self.classification = Classification::Uncertain;
    }
}
