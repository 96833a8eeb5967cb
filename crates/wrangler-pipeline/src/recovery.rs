//! Failure handling: strategies, retry with backoff, and a circuit breaker.

use std::fmt;
use std::thread;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info, warn};

use wrangler_model::PipelineStep;

/// What to do when a pipeline step fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStrategy {
    /// Advance to the next step, leaving an error note in the state.
    Skip,
    /// Re-attempt the same step under backoff, then give up.
    Retry,
    /// Halt the run immediately.
    Abort,
    /// Substitute a degraded but valid result and continue.
    Fallback,
}

impl FailureStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Skip => "skip",
            Self::Retry => "retry",
            Self::Abort => "abort",
            Self::Fallback => "fallback",
        }
    }
}

impl fmt::Display for FailureStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exponential backoff settings for [`FailureStrategy::Retry`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub backoff_factor: f64,
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_secs(1),
            backoff_factor: 2.0,
            max_delay: Duration::from_secs(60),
        }
    }
}

/// Retry a single operation under exponential backoff.
///
/// Runs the operation up to `max_retries + 1` times; the delay doubles (or
/// whatever `backoff_factor` says) after each failure, capped at `max_delay`.
/// Returns the last error when every attempt fails.
pub fn retry_with_backoff<T, E: fmt::Display>(
    config: &RetryConfig,
    mut operation: impl FnMut() -> Result<T, E>,
) -> Result<T, E> {
    let mut delay = config.initial_delay;
    let mut attempt = 0u32;

    loop {
        match operation() {
            Ok(value) => return Ok(value),
            Err(err) => {
                if attempt >= config.max_retries {
                    error!(attempts = attempt + 1, error = %err, "all attempts failed");
                    return Err(err);
                }
                attempt += 1;
                warn!(
                    attempt,
                    max = config.max_retries,
                    error = %err,
                    "attempt failed, retrying in {delay:?}"
                );
                thread::sleep(delay);
                delay = Duration::from_secs_f64(
                    (delay.as_secs_f64() * config.backoff_factor)
                        .min(config.max_delay.as_secs_f64()),
                );
            }
        }
    }
}

/// A recovery decision taken for a failed step.
#[derive(Debug, Clone)]
pub struct RecoveryAction {
    pub strategy: FailureStrategy,
    pub step: PipelineStep,
    pub error: String,
}

/// Applies the configured strategy to step failures and keeps a history of
/// the decisions taken.
#[derive(Debug, Clone)]
pub struct FailureRecovery {
    strategy: FailureStrategy,
    retry: RetryConfig,
    history: Vec<RecoveryAction>,
}

impl FailureRecovery {
    pub fn new(strategy: FailureStrategy) -> Self {
        Self {
            strategy,
            retry: RetryConfig::default(),
            history: Vec::new(),
        }
    }

    pub fn with_retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn strategy(&self) -> FailureStrategy {
        self.strategy
    }

    pub fn retry_config(&self) -> &RetryConfig {
        &self.retry
    }

    /// Record a failure and return the strategy to apply.
    pub fn handle_failure(&mut self, step: PipelineStep, error: &str) -> FailureStrategy {
        error!(step = %step, error, "pipeline step failed");
        self.history.push(RecoveryAction {
            strategy: self.strategy,
            step,
            error: error.to_string(),
        });
        self.strategy
    }

    pub fn history(&self) -> &[RecoveryAction] {
        &self.history
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}

impl Default for FailureRecovery {
    fn default() -> Self {
        Self::new(FailureStrategy::Skip)
    }
}

/// Error returned by [`CircuitBreaker::call`].
#[derive(Debug, Error)]
pub enum CircuitBreakerError<E: fmt::Debug + fmt::Display> {
    #[error("circuit breaker is open")]
    Open,

    #[error("{0}")]
    Inner(E),
}

/// Stops invoking a repeatedly failing operation until a cooldown elapses.
///
/// After `failure_threshold` consecutive failures the breaker opens and
/// fast-fails every call. Once `cooldown` has passed, a single trial call is
/// admitted; success closes the breaker again.
#[derive(Debug, Clone)]
pub struct CircuitBreaker {
    failure_threshold: u32,
    cooldown: Duration,
    failures: u32,
    opened_at: Option<Instant>,
}

impl CircuitBreaker {
    pub fn new(failure_threshold: u32, cooldown: Duration) -> Self {
        Self {
            failure_threshold,
            cooldown,
            failures: 0,
            opened_at: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.opened_at.is_some()
    }

    pub fn call<T, E: fmt::Debug + fmt::Display>(
        &mut self,
        operation: impl FnOnce() -> Result<T, E>,
    ) -> Result<T, CircuitBreakerError<E>> {
        if let Some(opened_at) = self.opened_at {
            if opened_at.elapsed() < self.cooldown {
                return Err(CircuitBreakerError::Open);
            }
            // Cooldown elapsed: admit one trial call.
            info!("circuit breaker cooldown elapsed, admitting trial call");
            self.opened_at = None;
            self.failures = 0;
        }

        match operation() {
            Ok(value) => {
                self.failures = 0;
                Ok(value)
            }
            Err(err) => {
                self.failures += 1;
                if self.failures >= self.failure_threshold {
                    error!(failures = self.failures, "circuit breaker opened");
                    self.opened_at = Some(Instant::now());
                }
                Err(CircuitBreakerError::Inner(err))
            }
        }
    }
}

impl Default for CircuitBreaker {
    fn default() -> Self {
        Self::new(5, Duration::from_secs(60))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Error)]
    #[error("boom")]
    struct Boom;

    #[test]
    fn retry_succeeds_after_transient_failures() {
        let config = RetryConfig {
            max_retries: 3,
            initial_delay: Duration::from_millis(1),
            backoff_factor: 2.0,
            max_delay: Duration::from_millis(10),
        };
        let mut attempts = 0;
        let result = retry_with_backoff(&config, || {
            attempts += 1;
            if attempts < 3 { Err(Boom) } else { Ok(attempts) }
        });
        assert_eq!(result.unwrap(), 3);
    }

    #[test]
    fn retry_gives_up_after_max_attempts() {
        let config = RetryConfig {
            max_retries: 2,
            initial_delay: Duration::from_millis(1),
            backoff_factor: 2.0,
            max_delay: Duration::from_millis(5),
        };
        let mut attempts = 0;
        let result: Result<(), Boom> = retry_with_backoff(&config, || {
            attempts += 1;
            Err(Boom)
        });
        assert!(result.is_err());
        assert_eq!(attempts, 3);
    }

    #[test]
    fn breaker_opens_after_threshold_and_admits_trial_after_cooldown() {
        let mut breaker = CircuitBreaker::new(2, Duration::from_millis(20));

        for _ in 0..2 {
            let result: Result<(), _> = breaker.call(|| Err(Boom));
            assert!(matches!(result, Err(CircuitBreakerError::Inner(_))));
        }
        assert!(breaker.is_open());

        // Open: calls fast-fail without running the operation.
        let mut ran = false;
        let result: Result<(), CircuitBreakerError<Boom>> = breaker.call(|| {
            ran = true;
            Ok(())
        });
        assert!(matches!(result, Err(CircuitBreakerError::Open)));
        assert!(!ran);

        // After the cooldown a trial call goes through and closes it.
        thread::sleep(Duration::from_millis(25));
        let result: Result<i32, CircuitBreakerError<Boom>> = breaker.call(|| Ok(7));
        assert_eq!(result.unwrap(), 7);
        assert!(!breaker.is_open());
    }

    #[test]
    fn recovery_records_history() {
        let mut recovery = FailureRecovery::new(FailureStrategy::Retry);
        let strategy = recovery.handle_failure(PipelineStep::Profiling, "io error");
        assert_eq!(strategy, FailureStrategy::Retry);
        assert_eq!(recovery.history().len(), 1);
        assert_eq!(recovery.history()[0].step, PipelineStep::Profiling);
        recovery.clear_history();
        assert!(recovery.history().is_empty());
    }
}
