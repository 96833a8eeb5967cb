//! Ranking of evaluated transformation candidates.
//!
//! Scoring is pluggable through [`RankingPolicy`]; two reference policies are
//! provided. [`Ranker::rank`] sorts candidates by score descending (stable on
//! ties), assigns contiguous 1-based ranks, and attaches a policy-generated
//! reasoning string per candidate.

mod policy;

use thiserror::Error;
use tracing::debug;

use wrangler_model::{RankedTransformation, TransformationCandidate};

pub use policy::{CompositeScorePolicy, ImprovementPolicy, RankingPolicy};

#[derive(Debug, Error)]
pub enum RankError {
    #[error("no ranking policy set")]
    NoPolicy,
}

/// Ranks candidates with the attached policy.
#[derive(Default)]
pub struct Ranker {
    policy: Option<Box<dyn RankingPolicy>>,
}

impl Ranker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: Box<dyn RankingPolicy>) -> Self {
        Self {
            policy: Some(policy),
        }
    }

    pub fn set_policy(&mut self, policy: Box<dyn RankingPolicy>) {
        self.policy = Some(policy);
    }

    pub fn policy_name(&self) -> Option<&str> {
        self.policy.as_deref().map(|policy| policy.name())
    }

    /// Rank candidates. Empty input yields empty output; calling without a
    /// policy is an error.
    pub fn rank(
        &self,
        candidates: &[TransformationCandidate],
    ) -> Result<Vec<RankedTransformation>, RankError> {
        let policy = self.policy.as_deref().ok_or(RankError::NoPolicy)?;
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let mut scored: Vec<(&TransformationCandidate, f64)> = candidates
            .iter()
            .map(|candidate| (candidate, policy.score(candidate)))
            .collect();
        // Stable sort keeps the original candidate order on ties.
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        let ranked = scored
            .into_iter()
            .enumerate()
            .map(|(index, (candidate, score))| RankedTransformation {
                rank: index + 1,
                candidate: candidate.clone(),
                composite_score: score,
                reasoning: policy.reasoning(candidate, score),
            })
            .collect();

        debug!(
            policy = policy.name(),
            count = candidates.len(),
            "ranked candidates"
        );
        Ok(ranked)
    }
}
