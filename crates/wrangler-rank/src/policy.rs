//! Ranking policies.

use wrangler_model::{MetricWeights, QualityDelta, TransformationCandidate};

/// A scoring policy: one scalar per candidate, plus human-readable reasoning.
pub trait RankingPolicy: Send + Sync {
    fn name(&self) -> &str;

    fn score(&self, candidate: &TransformationCandidate) -> f64;

    fn reasoning(&self, candidate: &TransformationCandidate, score: f64) -> String;
}

fn percent(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

/// Weighted metric improvement blended with the final quality level.
///
/// `score = 0.7 * weighted improvement + 0.3 * after.overall`. A candidate
/// that improves nothing can still rank above one that degrades quality, and
/// high final quality breaks ties between similar improvements.
#[derive(Debug, Clone, Default)]
pub struct CompositeScorePolicy {
    weights: MetricWeights,
}

impl CompositeScorePolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_weights(weights: MetricWeights) -> Self {
        Self { weights }
    }
}

impl RankingPolicy for CompositeScorePolicy {
    fn name(&self) -> &str {
        "composite_score"
    }

    fn score(&self, candidate: &TransformationCandidate) -> f64 {
        let delta = &candidate.quality_delta;
        let improvement = self.weights.completeness * delta.improvement.completeness
            + self.weights.consistency * delta.improvement.consistency
            + self.weights.validity * delta.improvement.validity
            + self.weights.uniqueness * delta.improvement.uniqueness;
        0.7 * improvement + 0.3 * delta.after.overall
    }

    fn reasoning(&self, candidate: &TransformationCandidate, score: f64) -> String {
        let delta = &candidate.quality_delta;
        let transformation = &candidate.transformation;

        let mut improvements = Vec::new();
        for (name, before, after, change) in improved_components(delta) {
            if change > 0.0 {
                improvements.push(format!("{name} {} -> {}", percent(before), percent(after)));
            }
        }
        let improvements = if improvements.is_empty() {
            "no measurable improvement".to_string()
        } else {
            improvements.join(", ")
        };

        format!(
            "Transformation '{}' on columns {:?} achieved composite score {score:.3}. \
             Quality improvements: {improvements}. Overall quality: {} -> {}.",
            transformation.transform_type,
            transformation.target_columns,
            percent(delta.before.overall),
            percent(delta.after.overall),
        )
    }
}

/// The before/after delta of one selected metric.
///
/// `primary_metric` may be any of the four component metrics or `"overall"`;
/// unknown names fall back to the composite delta.
#[derive(Debug, Clone)]
pub struct ImprovementPolicy {
    primary_metric: String,
}

impl ImprovementPolicy {
    pub fn new(primary_metric: impl Into<String>) -> Self {
        Self {
            primary_metric: primary_metric.into(),
        }
    }

    pub fn primary_metric(&self) -> &str {
        &self.primary_metric
    }
}

impl Default for ImprovementPolicy {
    fn default() -> Self {
        Self::new("overall")
    }
}

impl RankingPolicy for ImprovementPolicy {
    fn name(&self) -> &str {
        "improvement"
    }

    fn score(&self, candidate: &TransformationCandidate) -> f64 {
        let delta = &candidate.quality_delta;
        delta
            .improvement
            .component(&self.primary_metric)
            .unwrap_or(delta.composite_delta)
    }

    fn reasoning(&self, candidate: &TransformationCandidate, score: f64) -> String {
        let delta = &candidate.quality_delta;
        let transformation = &candidate.transformation;

        let mut changes = Vec::new();
        for (name, _, _, change) in improved_components(delta) {
            if change != 0.0 {
                changes.push(format!("{name}: {:+.2}%", change * 100.0));
            }
        }
        let changes = if changes.is_empty() {
            "no change".to_string()
        } else {
            changes.join(", ")
        };

        format!(
            "Transformation '{}' on columns {:?} provides {} improvement of {score:+.3}. \
             Metric changes: {changes}. Composite delta: {:+.3}.",
            transformation.transform_type,
            transformation.target_columns,
            self.primary_metric,
            delta.composite_delta,
        )
    }
}

type Component = (&'static str, f64, f64, f64);

fn improved_components(delta: &QualityDelta) -> [Component; 4] {
    [
        (
            "completeness",
            delta.before.completeness,
            delta.after.completeness,
            delta.improvement.completeness,
        ),
        (
            "consistency",
            delta.before.consistency,
            delta.after.consistency,
            delta.improvement.consistency,
        ),
        (
            "validity",
            delta.before.validity,
            delta.after.validity,
            delta.improvement.validity,
        ),
        (
            "uniqueness",
            delta.before.uniqueness,
            delta.after.uniqueness,
            delta.improvement.uniqueness,
        ),
    ]
}
