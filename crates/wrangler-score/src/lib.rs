//! Dataset quality scoring.
//!
//! Four independent metrics, each clamped to `[0, 1]`:
//!
//! - **Completeness** — non-missing cells over total cells
//! - **Consistency** — per-column fraction of values that agree with the
//!   column's apparent type
//! - **Validity** — per-column fraction of values inside profile-derived
//!   bounds, with heuristics when no bounds exist
//! - **Uniqueness** — per-column distinct values over non-null values
//!
//! The composite is a weighted sum through [`MetricWeights`];
//! [`QualityScorer::compare`] is a pure subtraction of two snapshots.

mod metrics;

use polars::prelude::DataFrame;
use tracing::debug;

use wrangler_model::{DataProfile, MetricWeights, QualityDelta, QualityMetrics};

/// Computes quality metrics for a frame.
#[derive(Debug, Clone, Default)]
pub struct QualityScorer {
    weights: MetricWeights,
}

impl QualityScorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_weights(weights: MetricWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &MetricWeights {
        &self.weights
    }

    /// Score a frame. The profile, when given, supplies value bounds for the
    /// validity metric and precomputed unique counts for uniqueness.
    pub fn score(&self, data: &DataFrame, profile: Option<&DataProfile>) -> QualityMetrics {
        let completeness = metrics::completeness(data);
        let consistency = metrics::consistency(data);
        let validity = metrics::validity(data, profile);
        let uniqueness = metrics::uniqueness(data, profile);

        let mut result = QualityMetrics {
            completeness,
            consistency,
            validity,
            uniqueness,
            overall: 0.0,
        };
        result.overall = self.weights.composite(&result);
        debug!(
            completeness,
            consistency, validity, uniqueness, overall = result.overall, "scored dataset"
        );
        result
    }

    /// Compare two snapshots.
    pub fn compare(&self, before: QualityMetrics, after: QualityMetrics) -> QualityDelta {
        QualityDelta::between(before, after)
    }
}
