//! Candidate and ranking result types.

use serde::{Deserialize, Serialize};

use crate::quality::{QualityDelta, QualityMetrics};
use crate::transformation::Transformation;
use crate::validation::ValidationResult;

/// A transformation bound to its evaluated validation and quality outcome.
///
/// Immutable once assembled by the orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformationCandidate {
    pub transformation: Transformation,
    pub validation_result: ValidationResult,
    pub quality_before: QualityMetrics,
    pub quality_after: QualityMetrics,
    pub quality_delta: QualityDelta,
}

/// A candidate with its 1-based rank, composite score, and reasoning.
///
/// Ranked lists are sorted by `composite_score` descending with contiguous
/// ranks `1..=N`; ties keep the original candidate order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedTransformation {
    pub rank: usize,
    pub candidate: TransformationCandidate,
    pub composite_score: f64,
    pub reasoning: String,
}
