//! Pipeline state shared between the orchestrator and the checkpoint store.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::profile::DataProfile;
use crate::ranking::{RankedTransformation, TransformationCandidate};

/// Steps of the wrangling pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStep {
    Profiling,
    Generation,
    Validation,
    Execution,
    Scoring,
    Ranking,
}

impl PipelineStep {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Profiling => "profiling",
            Self::Generation => "generation",
            Self::Validation => "validation",
            Self::Execution => "execution",
            Self::Scoring => "scoring",
            Self::Ranking => "ranking",
        }
    }

    /// The step that follows this one, if any.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Profiling => Some(Self::Generation),
            Self::Generation => Some(Self::Validation),
            Self::Validation => Some(Self::Execution),
            Self::Execution => Some(Self::Scoring),
            Self::Scoring => Some(Self::Ranking),
            Self::Ranking => None,
        }
    }
}

impl fmt::Display for PipelineStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Evolving state of a pipeline run.
///
/// Created at pipeline start, mutated by the orchestrator after each step,
/// and persisted as a checkpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineState {
    pub current_step: PipelineStep,
    pub completed_steps: Vec<PipelineStep>,
    pub data_profile: Option<DataProfile>,
    #[serde(default)]
    pub candidates: Vec<TransformationCandidate>,
    #[serde(default)]
    pub ranked_transformations: Vec<RankedTransformation>,
    pub error: Option<String>,
}

impl PipelineState {
    pub fn new() -> Self {
        Self {
            current_step: PipelineStep::Profiling,
            completed_steps: Vec::new(),
            data_profile: None,
            candidates: Vec::new(),
            ranked_transformations: Vec::new(),
            error: None,
        }
    }

    /// Record a step as completed and advance to `next`.
    pub fn complete_step(&mut self, step: PipelineStep, next: PipelineStep) {
        self.completed_steps.push(step);
        self.current_step = next;
    }
}

impl Default for PipelineState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_advance_in_order() {
        assert_eq!(PipelineStep::Profiling.next(), Some(PipelineStep::Generation));
        assert_eq!(PipelineStep::Ranking.next(), None);
    }

    #[test]
    fn complete_step_records_and_advances() {
        let mut state = PipelineState::new();
        state.complete_step(PipelineStep::Profiling, PipelineStep::Generation);
        assert_eq!(state.completed_steps, vec![PipelineStep::Profiling]);
        assert_eq!(state.current_step, PipelineStep::Generation);
    }
}
