//! The pipeline runner: a checkpointed state machine over the wrangling steps.

use std::time::{Duration, Instant};

use polars::prelude::DataFrame;
use tracing::{debug, info, warn};

use wrangler_model::{DataProfile, PipelineState, PipelineStep, RankedTransformation};
use wrangler_profile::Profiler;
use wrangler_rank::{CompositeScorePolicy, Ranker, RankingPolicy};
use wrangler_score::QualityScorer;
use wrangler_transform::{CandidateGenerator, Executor};
use wrangler_validate::Validator;

use crate::checkpoint::StateStore;
use crate::error::PipelineError;
use crate::recovery::{
    CircuitBreaker, CircuitBreakerError, FailureRecovery, FailureStrategy, retry_with_backoff,
};
use crate::worker::{CancelToken, EvalContext, evaluate_candidates};

/// Runner configuration.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Rank candidates and re-apply the winner after evaluation.
    pub enable_ranking: bool,
    /// Worker threads for candidate evaluation.
    pub workers: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            enable_ranking: true,
            workers: std::thread::available_parallelism()
                .map(std::num::NonZeroUsize::get)
                .unwrap_or(4),
        }
    }
}

/// Outcome of one pipeline run. Failures are reported here, never panicked.
#[derive(Debug)]
pub struct PipelineOutcome {
    pub success: bool,
    /// The final dataset: the top-ranked passing transformation applied, or
    /// the unmodified input when nothing qualified.
    pub data: Option<DataFrame>,
    pub profile: Option<DataProfile>,
    pub ranked_transformations: Vec<RankedTransformation>,
    pub error: Option<String>,
    pub execution_time: Duration,
}

/// Drives profiling, generation, candidate evaluation, and ranking, saving a
/// checkpoint after each step.
pub struct PipelineRunner {
    profiler: Box<dyn Profiler>,
    store: Box<dyn StateStore>,
    generator: CandidateGenerator,
    validator: Validator,
    scorer: QualityScorer,
    ranker: Ranker,
    recovery: FailureRecovery,
    breaker: CircuitBreaker,
    options: PipelineOptions,
    current_state: Option<PipelineState>,
}

impl PipelineRunner {
    pub fn new(profiler: Box<dyn Profiler>, store: Box<dyn StateStore>) -> Self {
        Self {
            profiler,
            store,
            generator: CandidateGenerator::new(),
            validator: Validator::new(),
            scorer: QualityScorer::new(),
            ranker: Ranker::with_policy(Box::new(CompositeScorePolicy::new())),
            recovery: FailureRecovery::default(),
            breaker: CircuitBreaker::default(),
            options: PipelineOptions::default(),
            current_state: None,
        }
    }

    pub fn with_options(mut self, options: PipelineOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_policy(mut self, policy: Box<dyn RankingPolicy>) -> Self {
        self.ranker.set_policy(policy);
        self
    }

    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = validator;
        self
    }

    pub fn with_scorer(mut self, scorer: QualityScorer) -> Self {
        self.scorer = scorer;
        self
    }

    pub fn with_recovery(mut self, recovery: FailureRecovery) -> Self {
        self.recovery = recovery;
        self
    }

    pub fn with_circuit_breaker(mut self, breaker: CircuitBreaker) -> Self {
        self.breaker = breaker;
        self
    }

    /// The state of the most recent run or recovery.
    pub fn state(&self) -> Option<&PipelineState> {
        self.current_state.as_ref()
    }

    /// Recovery decisions taken so far.
    pub fn recovery_history(&self) -> &[crate::recovery::RecoveryAction] {
        self.recovery.history()
    }

    /// Run the full pipeline against `data`, checkpointing under `name`.
    ///
    /// Any step-level failure is routed through the configured
    /// [`FailureStrategy`]; whatever still fails is recorded into the state,
    /// checkpointed, and reported via the outcome.
    pub fn run(&mut self, data: &DataFrame, name: &str, cancel: &CancelToken) -> PipelineOutcome {
        let start = Instant::now();
        let mut state = PipelineState::new();

        let outcome = match self.run_steps(data, name, cancel, &mut state) {
            Ok(final_data) => PipelineOutcome {
                success: true,
                data: Some(final_data),
                profile: state.data_profile.clone(),
                ranked_transformations: state.ranked_transformations.clone(),
                error: state.error.clone(),
                execution_time: start.elapsed(),
            },
            Err(error) => {
                warn!(%error, "pipeline run failed");
                state.error = Some(error.to_string());
                self.checkpoint(name, &state);
                PipelineOutcome {
                    success: false,
                    data: None,
                    profile: state.data_profile.clone(),
                    ranked_transformations: state.ranked_transformations.clone(),
                    error: Some(error.to_string()),
                    execution_time: start.elapsed(),
                }
            }
        };

        self.current_state = Some(state);
        outcome
    }

    /// Reload a previously checkpointed state for inspection or resumption.
    pub fn recover(&mut self, name: &str) -> Result<Option<PipelineState>, PipelineError> {
        let state = self.store.load(name)?;
        self.current_state = state.clone();
        Ok(state)
    }

    fn run_steps(
        &mut self,
        data: &DataFrame,
        name: &str,
        cancel: &CancelToken,
        state: &mut PipelineState,
    ) -> Result<DataFrame, PipelineError> {
        // Step 1: profile the input dataset.
        info!("step 1: profiling dataset");
        let profile = self.profile_with_recovery(data, state)?;
        if let Some(profile) = &profile {
            state.data_profile = Some(profile.clone());
        }
        state.complete_step(PipelineStep::Profiling, PipelineStep::Generation);
        self.checkpoint(name, state);

        // Step 2: generate candidates from the profile.
        info!("step 2: generating transformation candidates");
        let transformations = profile
            .as_ref()
            .map(|p| self.generator.generate(p))
            .unwrap_or_default();
        state.complete_step(PipelineStep::Generation, PipelineStep::Validation);
        self.checkpoint(name, state);

        // Step 3: execute, validate, and score every candidate. Failures are
        // absorbed per candidate; the batch never aborts.
        info!(
            candidates = transformations.len(),
            workers = self.options.workers,
            "step 3: evaluating candidates"
        );
        let working_profile = profile.unwrap_or_default();
        let quality_before = self.scorer.score(data, Some(&working_profile));
        let ctx = EvalContext {
            original: data,
            profile: &working_profile,
            quality_before: &quality_before,
            validator: &self.validator,
            scorer: &self.scorer,
        };
        state.candidates = evaluate_candidates(&ctx, &transformations, self.options.workers, cancel);
        state.complete_step(PipelineStep::Validation, PipelineStep::Ranking);
        self.checkpoint(name, state);

        // Step 4: rank, then re-apply the winner.
        let mut final_data = data.clone();
        if self.options.enable_ranking {
            info!(candidates = state.candidates.len(), "step 4: ranking candidates");
            self.rank_with_recovery(state)?;
            state.completed_steps.push(PipelineStep::Ranking);
            self.checkpoint(name, state);

            if let Some(best) = state.ranked_transformations.first()
                && best.candidate.validation_result.passed
            {
                let mut executor = Executor::new();
                let result = executor.execute(data, &best.candidate.transformation);
                if result.success {
                    info!(
                        id = best.candidate.transformation.id.as_str(),
                        score = best.composite_score,
                        "applied top-ranked transformation"
                    );
                    final_data = result.output;
                }
            }
        }

        Ok(final_data)
    }

    fn profile_with_recovery(
        &mut self,
        data: &DataFrame,
        state: &mut PipelineState,
    ) -> Result<Option<DataProfile>, PipelineError> {
        let error = match self.profiler.profile(data) {
            Ok(profile) => return Ok(Some(profile)),
            Err(error) => error,
        };

        let strategy = self
            .recovery
            .handle_failure(PipelineStep::Profiling, &error.to_string());
        match strategy {
            FailureStrategy::Abort => Err(PipelineError::StepFailed {
                step: PipelineStep::Profiling,
                message: error.to_string(),
            }),
            FailureStrategy::Skip => {
                state.error = Some(format!("profiling skipped: {error}"));
                Ok(None)
            }
            FailureStrategy::Fallback => {
                warn!("profiling failed, falling back to an empty profile");
                state.error = Some(format!("profiling fell back: {error}"));
                Ok(Some(DataProfile::default()))
            }
            FailureStrategy::Retry => {
                let config = *self.recovery.retry_config();
                retry_with_backoff(&config, || self.profiler.profile(data))
                    .map(Some)
                    .map_err(|error| PipelineError::StepFailed {
                        step: PipelineStep::Profiling,
                        message: error.to_string(),
                    })
            }
        }
    }

    fn rank_with_recovery(&mut self, state: &mut PipelineState) -> Result<(), PipelineError> {
        let error = match self.ranker.rank(&state.candidates) {
            Ok(ranked) => {
                state.ranked_transformations = ranked;
                return Ok(());
            }
            Err(error) => error,
        };

        let strategy = self
            .recovery
            .handle_failure(PipelineStep::Ranking, &error.to_string());
        match strategy {
            FailureStrategy::Abort => Err(PipelineError::StepFailed {
                step: PipelineStep::Ranking,
                message: error.to_string(),
            }),
            FailureStrategy::Retry => {
                let config = *self.recovery.retry_config();
                match retry_with_backoff(&config, || self.ranker.rank(&state.candidates)) {
                    Ok(ranked) => {
                        state.ranked_transformations = ranked;
                        Ok(())
                    }
                    Err(error) => Err(PipelineError::StepFailed {
                        step: PipelineStep::Ranking,
                        message: error.to_string(),
                    }),
                }
            }
            FailureStrategy::Skip | FailureStrategy::Fallback => {
                state.error = Some(format!("ranking skipped: {error}"));
                state.ranked_transformations = Vec::new();
                Ok(())
            }
        }
    }

    /// Save a checkpoint through the circuit breaker. A failed save degrades
    /// the run but never aborts it; repeated failures open the breaker and
    /// later saves fast-fail until the cooldown elapses.
    fn checkpoint(&mut self, name: &str, state: &PipelineState) {
        let store = &self.store;
        match self.breaker.call(|| store.save(name, state)) {
            Ok(path) => debug!(step = %state.current_step, path = %path.display(), "checkpoint saved"),
            Err(CircuitBreakerError::Open) => {
                warn!(step = %state.current_step, "checkpoint skipped: circuit breaker is open");
            }
            Err(CircuitBreakerError::Inner(error)) => {
                warn!(step = %state.current_step, %error, "failed to save checkpoint");
            }
        }
    }
}
