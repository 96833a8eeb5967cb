//! Transformation executor.
//!
//! Dispatches transformations to the appliers, times each call, and records
//! the typed reversal context keyed by transformation id so a later
//! `reverse` reuses the exact statistics fitted during `apply`.

use std::collections::BTreeMap;
use std::time::Instant;

use polars::prelude::DataFrame;
use tracing::{debug, warn};

use wrangler_model::{Transformation, TransformationResult};

use crate::apply;
use crate::context::ReversalContext;
use crate::error::TransformError;

#[derive(Debug, Default)]
pub struct Executor {
    contexts: BTreeMap<String, ReversalContext>,
}

impl Executor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a transformation. Never propagates an applier error: a failure
    /// yields `success = false` with the original data unchanged.
    pub fn execute(
        &mut self,
        data: &DataFrame,
        transformation: &Transformation,
    ) -> TransformationResult {
        let start = Instant::now();
        match apply::apply(data, transformation) {
            Ok((output, context)) => {
                self.contexts.insert(transformation.id.clone(), context);
                debug!(
                    id = transformation.id.as_str(),
                    elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "transformation applied"
                );
                TransformationResult {
                    transformation: transformation.clone(),
                    success: true,
                    output,
                    error_message: None,
                    execution_time_ms: start.elapsed().as_secs_f64() * 1000.0,
                }
            }
            Err(error) => {
                warn!(
                    id = transformation.id.as_str(),
                    %error,
                    "transformation failed"
                );
                TransformationResult {
                    transformation: transformation.clone(),
                    success: false,
                    output: data.clone(),
                    error_message: Some(error.to_string()),
                    execution_time_ms: start.elapsed().as_secs_f64() * 1000.0,
                }
            }
        }
    }

    /// Undo a previously executed transformation.
    ///
    /// Fails with [`TransformError::NotReversible`] when the transformation's
    /// reversibility flag is false, and with
    /// [`TransformError::NoReversalContext`] when it was never executed
    /// through this executor.
    pub fn reverse(
        &self,
        data: &DataFrame,
        transformation: &Transformation,
    ) -> Result<DataFrame, TransformError> {
        if !transformation.reversible {
            return Err(TransformError::NotReversible {
                id: transformation.id.clone(),
                transform_type: transformation.transform_type,
            });
        }
        let context = self
            .contexts
            .get(&transformation.id)
            .ok_or_else(|| TransformError::NoReversalContext(transformation.id.clone()))?;
        apply::reverse(data, transformation, context)
    }

    /// Run transformations in order, feeding each output into the next.
    /// Stops at the first failure and returns the results produced so far,
    /// including the failing one.
    pub fn execute_sequence(
        &mut self,
        data: &DataFrame,
        transformations: &[Transformation],
    ) -> Vec<TransformationResult> {
        let mut results = Vec::with_capacity(transformations.len());
        let mut current = data.clone();

        for transformation in transformations {
            let result = self.execute(&current, transformation);
            let success = result.success;
            if success {
                current = result.output.clone();
            }
            results.push(result);
            if !success {
                break;
            }
        }

        results
    }

    pub fn can_reverse(&self, transformation: &Transformation) -> bool {
        transformation.reversible && self.contexts.contains_key(&transformation.id)
    }

    /// The recorded context for a transformation, if any.
    pub fn context(&self, id: &str) -> Option<&ReversalContext> {
        self.contexts.get(id)
    }
}
