//! Pipeline orchestration.
//!
//! [`PipelineRunner`] drives profiling, candidate generation, per-candidate
//! evaluation (execute, validate, score) on a bounded worker pool, and
//! ranking. [`PipelineState`](wrangler_model::PipelineState) is checkpointed
//! through a [`StateStore`] after every step, step failures follow the
//! configured [`FailureStrategy`], and a [`CircuitBreaker`] guards the
//! checkpoint writes.

mod checkpoint;
mod error;
mod recovery;
mod runner;
mod worker;

pub use checkpoint::{CheckpointError, JsonStateStore, StateStore};
pub use error::PipelineError;
pub use recovery::{
    CircuitBreaker, CircuitBreakerError, FailureRecovery, FailureStrategy, RecoveryAction,
    RetryConfig, retry_with_backoff,
};
pub use runner::{PipelineOptions, PipelineOutcome, PipelineRunner};
pub use worker::CancelToken;
