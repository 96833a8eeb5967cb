//! Orchestration error types.

use thiserror::Error;

use wrangler_model::PipelineStep;
use wrangler_rank::RankError;

use crate::checkpoint::CheckpointError;

/// Errors surfaced by the pipeline runner.
///
/// These never escape [`PipelineRunner::run`](crate::PipelineRunner::run);
/// the outermost API reports failures through the outcome object instead.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("pipeline step {step} failed: {message}")]
    StepFailed {
        step: PipelineStep,
        message: String,
    },

    #[error(transparent)]
    Checkpoint(#[from] CheckpointError),

    #[error(transparent)]
    Ranking(#[from] RankError),
}
