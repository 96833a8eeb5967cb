//! Missing-value filling.
//!
//! Strategies: `mean`, `median` (numeric), `mode` (categorical), `constant`.
//! Only constant fills record a usable reversal context; the statistical
//! fills lose the original missing positions for good.

use std::collections::BTreeMap;

use polars::prelude::DataFrame;

use wrangler_model::Transformation;
use wrangler_model::frame::{column_f64s, column_strings, dtype_is_numeric};

use crate::apply::{set_float_column, set_string_column, target_column};
use crate::context::ReversalContext;
use crate::error::TransformError;
use crate::stats;

pub fn apply(
    data: &DataFrame,
    transformation: &Transformation,
) -> Result<(DataFrame, ReversalContext), TransformError> {
    let column = target_column(data, transformation)?;
    let strategy = transformation.param_str("strategy").unwrap_or("mean");

    match strategy {
        "mean" | "median" => fill_statistic(data, column, strategy),
        "mode" => fill_mode(data, column),
        "constant" => fill_constant(data, column, transformation),
        other => Err(TransformError::InvalidParam {
            key: "strategy",
            transform_type: transformation.transform_type,
            message: format!("unknown fill strategy '{other}'"),
        }),
    }
}

fn fill_statistic(
    data: &DataFrame,
    column: &str,
    strategy: &str,
) -> Result<(DataFrame, ReversalContext), TransformError> {
    let values =
        column_f64s(data, column).ok_or_else(|| TransformError::MissingColumn(column.to_string()))?;
    let valid: Vec<f64> = values.iter().flatten().copied().collect();
    if valid.is_empty() {
        // Nothing to derive a fill value from; leave the data untouched.
        return Ok((data.clone(), ReversalContext::Irreversible));
    }

    let fill = if strategy == "mean" {
        stats::mean(&valid)
    } else {
        stats::median(&valid)
    };
    let filled: Vec<Option<f64>> = values
        .into_iter()
        .map(|v| v.or(Some(fill)))
        .collect();
    let out = set_float_column(data, column, filled)?;
    Ok((out, ReversalContext::Irreversible))
}

fn fill_mode(
    data: &DataFrame,
    column: &str,
) -> Result<(DataFrame, ReversalContext), TransformError> {
    let cells = column_strings(data, column)
        .ok_or_else(|| TransformError::MissingColumn(column.to_string()))?;
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for value in cells.iter().flatten() {
        *counts.entry(value.as_str()).or_insert(0) += 1;
    }
    // Most frequent value; BTreeMap iteration makes ties deterministic
    // (lexicographically smallest wins).
    let Some(mode) = counts
        .iter()
        .max_by_key(|(_, count)| *count)
        .map(|(value, _)| (*value).to_string())
    else {
        return Ok((data.clone(), ReversalContext::Irreversible));
    };

    let filled: Vec<Option<String>> = cells
        .into_iter()
        .map(|v| v.or_else(|| Some(mode.clone())))
        .collect();
    let out = set_string_column(data, column, &filled)?;
    Ok((out, ReversalContext::Irreversible))
}

fn fill_constant(
    data: &DataFrame,
    column: &str,
    transformation: &Transformation,
) -> Result<(DataFrame, ReversalContext), TransformError> {
    let dtype = data.column(column)?.dtype().clone();

    if dtype_is_numeric(&dtype) {
        let fill = transformation
            .param_f64("fill_value")
            .or_else(|| {
                transformation
                    .param_str("fill_value")
                    .and_then(|s| s.parse::<f64>().ok())
            })
            .unwrap_or(0.0);
        let values = column_f64s(data, column)
            .ok_or_else(|| TransformError::MissingColumn(column.to_string()))?;
        let filled_rows: Vec<usize> = values
            .iter()
            .enumerate()
            .filter_map(|(idx, v)| v.is_none().then_some(idx))
            .collect();
        let filled: Vec<Option<f64>> = values.into_iter().map(|v| v.or(Some(fill))).collect();
        let out = set_float_column(data, column, filled)?;
        return Ok((
            out,
            ReversalContext::FillConstant {
                column: column.to_string(),
                filled_rows,
            },
        ));
    }

    let fill = transformation
        .param("fill_value")
        .map(|value| match value {
            wrangler_model::ParamValue::Str(s) => s.clone(),
            wrangler_model::ParamValue::Int(v) => v.to_string(),
            wrangler_model::ParamValue::Float(v) => v.to_string(),
            wrangler_model::ParamValue::Bool(v) => v.to_string(),
        })
        .unwrap_or_else(|| "0".to_string());
    let cells = column_strings(data, column)
        .ok_or_else(|| TransformError::MissingColumn(column.to_string()))?;
    let filled_rows: Vec<usize> = cells
        .iter()
        .enumerate()
        .filter_map(|(idx, v)| v.is_none().then_some(idx))
        .collect();
    let filled: Vec<Option<String>> = cells
        .into_iter()
        .map(|v| v.or_else(|| Some(fill.clone())))
        .collect();
    let out = set_string_column(data, column, &filled)?;
    Ok((
        out,
        ReversalContext::FillConstant {
            column: column.to_string(),
            filled_rows,
        },
    ))
}

/// Restore nulls at the recorded row positions.
pub fn reverse(
    data: &DataFrame,
    context: &ReversalContext,
) -> Result<DataFrame, TransformError> {
    let ReversalContext::FillConstant {
        column,
        filled_rows,
    } = context
    else {
        return Err(TransformError::NoReversalContext(String::new()));
    };

    let dtype = data
        .column(column)
        .map_err(|_| TransformError::MissingColumn(column.clone()))?
        .dtype()
        .clone();

    if dtype_is_numeric(&dtype) {
        let mut values = column_f64s(data, column)
            .ok_or_else(|| TransformError::MissingColumn(column.clone()))?;
        for idx in filled_rows {
            if let Some(slot) = values.get_mut(*idx) {
                *slot = None;
            }
        }
        return set_float_column(data, column, values);
    }

    let mut cells = column_strings(data, column)
        .ok_or_else(|| TransformError::MissingColumn(column.clone()))?;
    for idx in filled_rows {
        if let Some(slot) = cells.get_mut(*idx) {
            *slot = None;
        }
    }
    set_string_column(data, column, &cells)
}
