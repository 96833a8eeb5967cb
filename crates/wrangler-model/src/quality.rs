//! Quality metrics, metric weights, and before/after deltas.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tolerance applied when checking that metric weights sum to 1.0.
pub const WEIGHT_TOLERANCE: f64 = 1e-6;

/// Quality scoring error.
#[derive(Debug, Error)]
pub enum QualityError {
    #[error("metric weights must sum to 1.0, got {sum}")]
    InvalidWeights { sum: f64 },
}

/// Quality metrics for a dataset, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityMetrics {
    pub completeness: f64,
    pub consistency: f64,
    pub validity: f64,
    pub uniqueness: f64,
    /// Weighted composite of the four component scores.
    pub overall: f64,
}

impl QualityMetrics {
    /// Look up a component by its metric name; `"overall"` included.
    pub fn component(&self, name: &str) -> Option<f64> {
        match name {
            "completeness" => Some(self.completeness),
            "consistency" => Some(self.consistency),
            "validity" => Some(self.validity),
            "uniqueness" => Some(self.uniqueness),
            "overall" => Some(self.overall),
            _ => None,
        }
    }
}

/// Weights for combining the four quality metrics into a composite score.
///
/// Construction fails unless the weights sum to 1.0 within [`WEIGHT_TOLERANCE`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricWeights {
    pub completeness: f64,
    pub consistency: f64,
    pub validity: f64,
    pub uniqueness: f64,
}

impl MetricWeights {
    pub fn new(
        completeness: f64,
        consistency: f64,
        validity: f64,
        uniqueness: f64,
    ) -> Result<Self, QualityError> {
        let sum = completeness + consistency + validity + uniqueness;
        if (sum - 1.0).abs() >= WEIGHT_TOLERANCE {
            return Err(QualityError::InvalidWeights { sum });
        }
        Ok(Self {
            completeness,
            consistency,
            validity,
            uniqueness,
        })
    }

    /// Weighted sum of the four component scores, clamped to `[0, 1]`.
    pub fn composite(&self, metrics: &QualityMetrics) -> f64 {
        let composite = self.completeness * metrics.completeness
            + self.consistency * metrics.consistency
            + self.validity * metrics.validity
            + self.uniqueness * metrics.uniqueness;
        composite.clamp(0.0, 1.0)
    }
}

impl Default for MetricWeights {
    fn default() -> Self {
        Self {
            completeness: 0.25,
            consistency: 0.25,
            validity: 0.25,
            uniqueness: 0.25,
        }
    }
}

/// Change in quality metrics produced by a transformation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityDelta {
    pub before: QualityMetrics,
    pub after: QualityMetrics,
    /// Component-wise `after - before`.
    pub improvement: QualityMetrics,
    /// `after.overall - before.overall`.
    pub composite_delta: f64,
}

impl QualityDelta {
    /// Pure subtraction, no smoothing.
    pub fn between(before: QualityMetrics, after: QualityMetrics) -> Self {
        let improvement = QualityMetrics {
            completeness: after.completeness - before.completeness,
            consistency: after.consistency - before.consistency,
            validity: after.validity - before.validity,
            uniqueness: after.uniqueness - before.uniqueness,
            overall: after.overall - before.overall,
        };
        let composite_delta = after.overall - before.overall;
        Self {
            before,
            after,
            improvement,
            composite_delta,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(c: f64, s: f64, v: f64, u: f64, o: f64) -> QualityMetrics {
        QualityMetrics {
            completeness: c,
            consistency: s,
            validity: v,
            uniqueness: u,
            overall: o,
        }
    }

    #[test]
    fn weights_must_sum_to_one() {
        assert!(MetricWeights::new(0.25, 0.25, 0.25, 0.25).is_ok());
        assert!(MetricWeights::new(0.3, 0.2, 0.3, 0.2).is_ok());
        assert!(MetricWeights::new(0.5, 0.5, 0.5, 0.5).is_err());
        assert!(MetricWeights::new(0.1, 0.1, 0.1, 0.1).is_err());
        // Within tolerance is still fine.
        assert!(MetricWeights::new(0.25, 0.25, 0.25, 0.25 + 5e-7).is_ok());
    }

    #[test]
    fn composite_is_weighted_and_clamped() {
        let weights = MetricWeights::default();
        let m = metrics(1.0, 0.5, 0.0, 0.5, 0.0);
        assert!((weights.composite(&m) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn delta_is_pure_subtraction() {
        let before = metrics(0.5, 0.5, 0.5, 0.5, 0.5);
        let after = metrics(0.8, 0.5, 0.6, 0.4, 0.6);
        let delta = QualityDelta::between(before, after);
        assert!((delta.improvement.completeness - 0.3).abs() < 1e-12);
        assert!((delta.improvement.uniqueness + 0.1).abs() < 1e-12);
        assert!((delta.composite_delta - 0.1).abs() < 1e-12);
        assert!(
            (delta.composite_delta - (delta.after.overall - delta.before.overall)).abs() < 1e-12
        );
    }
}
