//! Inference engine tuning constants.

use serde::{Deserialize, Serialize};

/// Tuning constants for adaptive operator/value inference.
///
/// The defaults reproduce the engine's documented semantics; they are
/// exposed as config so analysis sessions can be tuned without rebuilding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// Fraction of observations the most frequent value must reach for the
    /// equality shortcut. Default: 0.8.
    pub equal_dominance: f64,
    /// Fraction of observations the biggest cluster must hold to decide the
    /// direction from raw side counts. Default: 0.75.
    pub cluster_dominance: f64,
    /// Minimum ratio between side populations to decide a direction below
    /// the dominance bar. Default: 1.4.
    pub imbalance_ratio: f64,
    /// Relative gap threshold used when clustering the adjacent differences
    /// of a population to derive its split point. Default: 0.4.
    pub gap_threshold: f64,
    /// Gap-similarity ratio under which both neighboring clusters count as
    /// equally close and the merge leans toward the heavier side.
    /// Default: 0.9.
    pub near_equal_gap_ratio: f64,
    /// An extremity cluster whose neighbor sits further away than this many
    /// times its own span (plus one) commits to its boundary instead of
    /// merging. Default: 3.0.
    pub extremity_gap_factor: f64,
    /// Fixed split threshold for discrete (counter) populations.
    /// Default: 1.0.
    pub counter_split: f64,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            equal_dominance: 0.8,
            cluster_dominance: 0.75,
            imbalance_ratio: 1.4,
            gap_threshold: 0.4,
            near_equal_gap_ratio: 0.9,
            extremity_gap_factor: 3.0,
            counter_split: 1.0,
        }
    }
}

impl InferenceConfig {
    /// Load from a TOML document; missing fields keep their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }
}
