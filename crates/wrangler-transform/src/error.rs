//! Transformation error types.

use polars::prelude::PolarsError;
use thiserror::Error;

use wrangler_model::TransformationType;

/// Errors raised while applying or reversing transformations.
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("column '{0}' not found in dataset")]
    MissingColumn(String),

    #[error("transformation '{0}' names no target column")]
    NoTargetColumn(String),

    #[error("transformation '{id}' of type {transform_type} is not reversible")]
    NotReversible {
        id: String,
        transform_type: TransformationType,
    },

    #[error("no reversal context recorded for transformation '{0}'")]
    NoReversalContext(String),

    #[error("invalid parameter '{key}' for {transform_type}: {message}")]
    InvalidParam {
        key: &'static str,
        transform_type: TransformationType,
        message: String,
    },

    #[error(transparent)]
    Polars(#[from] PolarsError),
}
