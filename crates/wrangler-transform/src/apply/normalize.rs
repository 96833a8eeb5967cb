//! Numeric normalization: standard (z-score), min-max, and robust.

use polars::prelude::DataFrame;

use wrangler_model::Transformation;
use wrangler_model::frame::column_f64s;

use crate::apply::{set_float_column, target_column};
use crate::context::ReversalContext;
use crate::error::TransformError;
use crate::stats;

pub fn apply(
    data: &DataFrame,
    transformation: &Transformation,
) -> Result<(DataFrame, ReversalContext), TransformError> {
    let column = target_column(data, transformation)?;
    let method = transformation.param_str("method").unwrap_or("standard");

    let values =
        column_f64s(data, column).ok_or_else(|| TransformError::MissingColumn(column.to_string()))?;
    let valid: Vec<f64> = values.iter().flatten().copied().collect();
    if valid.is_empty() {
        // No usable numeric data; identity context so reverse is a no-op.
        return Ok((
            data.clone(),
            ReversalContext::Standardize {
                column: column.to_string(),
                mean: 0.0,
                std: 1.0,
            },
        ));
    }

    match method {
        "standard" => {
            let mean = stats::mean(&valid);
            let std = stats::sample_std(&valid);
            let normalized: Vec<Option<f64>> = if std > 0.0 {
                values.iter().map(|v| v.map(|x| (x - mean) / std)).collect()
            } else {
                // Constant column: everything collapses to zero.
                values.iter().map(|v| v.map(|_| 0.0)).collect()
            };
            let out = set_float_column(data, column, normalized)?;
            Ok((
                out,
                ReversalContext::Standardize {
                    column: column.to_string(),
                    mean,
                    std,
                },
            ))
        }
        "minmax" => {
            let min = valid.iter().copied().fold(f64::INFINITY, f64::min);
            let max = valid.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let normalized: Vec<Option<f64>> = if max > min {
                values
                    .iter()
                    .map(|v| v.map(|x| (x - min) / (max - min)))
                    .collect()
            } else {
                values.iter().map(|v| v.map(|_| 0.5)).collect()
            };
            let out = set_float_column(data, column, normalized)?;
            Ok((
                out,
                ReversalContext::MinMax {
                    column: column.to_string(),
                    min,
                    max,
                },
            ))
        }
        "robust" => {
            let median = stats::median(&valid);
            let mut sorted = valid.clone();
            sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
            let iqr = stats::quantile_sorted(&sorted, 0.75) - stats::quantile_sorted(&sorted, 0.25);
            let normalized: Vec<Option<f64>> = if iqr > 0.0 {
                values
                    .iter()
                    .map(|v| v.map(|x| (x - median) / iqr))
                    .collect()
            } else {
                values.iter().map(|v| v.map(|_| 0.0)).collect()
            };
            let out = set_float_column(data, column, normalized)?;
            Ok((
                out,
                ReversalContext::Robust {
                    column: column.to_string(),
                    median,
                    iqr,
                },
            ))
        }
        other => Err(TransformError::InvalidParam {
            key: "method",
            transform_type: transformation.transform_type,
            message: format!("unknown normalization method '{other}'"),
        }),
    }
}

/// Undo the normalization by rescaling with the recorded statistics.
///
/// Degenerate fits (zero spread) cannot be rescaled and are returned as-is.
pub fn reverse(data: &DataFrame, context: &ReversalContext) -> Result<DataFrame, TransformError> {
    match context {
        ReversalContext::Standardize { column, mean, std } => {
            if *std <= 0.0 {
                return Ok(data.clone());
            }
            rescale(data, column, |x| x * std + mean)
        }
        ReversalContext::MinMax { column, min, max } => {
            if max <= min {
                return Ok(data.clone());
            }
            rescale(data, column, |x| x * (max - min) + min)
        }
        ReversalContext::Robust {
            column,
            median,
            iqr,
        } => {
            if *iqr <= 0.0 {
                return Ok(data.clone());
            }
            rescale(data, column, |x| x * iqr + median)
        }
        _ => Err(TransformError::NoReversalContext(String::new())),
    }
}

fn rescale(
    data: &DataFrame,
    column: &str,
    f: impl Fn(f64) -> f64,
) -> Result<DataFrame, TransformError> {
    let values =
        column_f64s(data, column).ok_or_else(|| TransformError::MissingColumn(column.to_string()))?;
    let restored: Vec<Option<f64>> = values.into_iter().map(|v| v.map(&f)).collect();
    set_float_column(data, column, restored)
}
