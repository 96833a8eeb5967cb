//! Bounded worker pool for per-candidate evaluation.
//!
//! Candidates are independent: each worker reads the same immutable original
//! frame and profile. Work is handed out through an atomic index and results
//! return over a channel tagged with the candidate's position, so the output
//! preserves candidate order regardless of completion order. Checkpoint
//! writes never happen here; the orchestrating thread owns all state.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, mpsc};
use std::thread;

use polars::prelude::DataFrame;
use tracing::debug;

use wrangler_model::{DataProfile, QualityMetrics, Transformation, TransformationCandidate};
use wrangler_score::QualityScorer;
use wrangler_transform::Executor;
use wrangler_validate::Validator;

/// Cooperative cancellation flag, observed between candidates.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Shared read-only inputs for candidate evaluation.
pub(crate) struct EvalContext<'a> {
    pub original: &'a DataFrame,
    pub profile: &'a DataProfile,
    pub quality_before: &'a QualityMetrics,
    pub validator: &'a Validator,
    pub scorer: &'a QualityScorer,
}

/// Evaluate transformations on up to `workers` threads.
///
/// Per-candidate failures (execution errors, failed validation) drop the
/// candidate; they never abort the batch. Results keep candidate order so
/// downstream ranking ties break deterministically.
pub(crate) fn evaluate_candidates(
    ctx: &EvalContext<'_>,
    transformations: &[Transformation],
    workers: usize,
    cancel: &CancelToken,
) -> Vec<TransformationCandidate> {
    let total = transformations.len();
    if total == 0 {
        return Vec::new();
    }
    let workers = workers.clamp(1, total);

    let next = AtomicUsize::new(0);
    let (sender, receiver) = mpsc::channel::<(usize, Option<TransformationCandidate>)>();

    thread::scope(|scope| {
        for _ in 0..workers {
            let sender = sender.clone();
            let next = &next;
            scope.spawn(move || {
                loop {
                    if cancel.is_cancelled() {
                        break;
                    }
                    let index = next.fetch_add(1, Ordering::SeqCst);
                    if index >= total {
                        break;
                    }
                    let outcome = evaluate_one(ctx, &transformations[index]);
                    if sender.send((index, outcome)).is_err() {
                        break;
                    }
                }
            });
        }
        drop(sender);
    });

    let mut slots: Vec<Option<TransformationCandidate>> = (0..total).map(|_| None).collect();
    for (index, outcome) in receiver {
        slots[index] = outcome;
    }
    slots.into_iter().flatten().collect()
}

fn evaluate_one(
    ctx: &EvalContext<'_>,
    transformation: &Transformation,
) -> Option<TransformationCandidate> {
    let mut executor = Executor::new();
    let result = executor.execute(ctx.original, transformation);
    if !result.success {
        debug!(
            id = transformation.id.as_str(),
            error = result.error_message.as_deref().unwrap_or(""),
            "candidate execution failed, skipping"
        );
        return None;
    }

    let validation = ctx
        .validator
        .validate(ctx.original, &result.output, ctx.profile);
    if !validation.passed {
        debug!(
            id = transformation.id.as_str(),
            errors = validation.error_count(),
            "candidate failed validation, skipping"
        );
        return None;
    }

    let quality_after = ctx.scorer.score(&result.output, Some(ctx.profile));
    let quality_before = *ctx.quality_before;
    let quality_delta = ctx.scorer.compare(quality_before, quality_after);

    Some(TransformationCandidate {
        transformation: transformation.clone(),
        validation_result: validation,
        quality_before,
        quality_after,
        quality_delta,
    })
}
