//! Ground-truth scoring of extracted records.

mod comparator;
mod ground_truth;

pub use comparator::{compare, Comparison, Mismatch};
pub use ground_truth::{exercise_id, load_file, GroundTruth, GroundTruthStore};

use serde::Serialize;

/// Evaluation attached to an extraction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Evaluation {
    /// The record was scored against ground truth.
    Scored(Comparison),
    /// No ground truth was available; the reason is meant for display.
    Unavailable { reason: String },
}

impl Evaluation {
    /// Get the comparison, if one ran.
    pub fn comparison(&self) -> Option<&Comparison> {
        match self {
            Self::Scored(comparison) => Some(comparison),
            Self::Unavailable { .. } => None,
        }
    }
}
