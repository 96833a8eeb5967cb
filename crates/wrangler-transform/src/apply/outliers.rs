//! Outlier handling via IQR fences or z-scores.
//!
//! `action = "remove"` drops offending rows; `action = "mask"` nulls the
//! offending cells instead. Either way the original information is gone and
//! the operation is irreversible.

use polars::prelude::{BooleanChunked, DataFrame, NewChunkedArray};

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
    let method = transformation.param_str("method").unwrap_or("iqr");
    let action = transformation.param_str("action").unwrap_or("remove");

    let values =
        column_f64s(data, column).ok_or_else(|| TransformError::MissingColumn(column.to_string()))?;
    let valid: Vec<f64> = values.iter().flatten().copied().collect();
    if valid.is_empty() {
        return Ok((data.clone(), ReversalContext::Irreversible));
    }

    let outlier_mask: Vec<bool> = match method {
        "iqr" => {
            let threshold = transformation.param_f64("threshold").unwrap_or(1.5);
            let mut sorted = valid.clone();
            sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
            let q1 = stats::quantile_sorted(&sorted, 0.25);
            let q3 = stats::quantile_sorted(&sorted, 0.75);
            let iqr = q3 - q1;
            let lower = q1 - threshold * iqr;
            let upper = q3 + threshold * iqr;
            values
                .iter()
                .map(|v| v.is_some_and(|x| x < lower || x > upper))
                .collect()
        }
        "zscore" => {
            let threshold = transformation.param_f64("threshold").unwrap_or(3.0);
            let mean = stats::mean(&valid);
            let std = stats::sample_std(&valid);
            if std <= 0.0 {
                vec![false; values.len()]
            } else {
                values
                    .iter()
                    .map(|v| v.is_some_and(|x| ((x - mean) / std).abs() > threshold))
                    .collect()
            }
        }
        other => {
            return Err(TransformError::InvalidParam {
                key: "method",
                transform_type: transformation.transform_type,
                message: format!("unknown outlier method '{other}'"),
            });
        }
    };

    let outlier_count = outlier_mask.iter().filter(|m| **m).count();
    if outlier_count == 0 {
        return Ok((data.clone(), ReversalContext::Irreversible));
    }

    match action {
        "remove" => {
            let keep: Vec<bool> = outlier_mask.iter().map(|m| !m).collect();
            let mask = BooleanChunked::from_slice("outliers".into(), &keep);
            let out = data.filter(&mask)?;
            Ok((out, ReversalContext::Irreversible))
        }
        "mask" => {
            let masked: Vec<Option<f64>> = values
                .iter()
                .zip(&outlier_mask)
                .map(|(v, is_outlier)| if *is_outlier { None } else { *v })
                .collect();
            let out = set_float_column(data, column, masked)?;
            Ok((out, ReversalContext::Irreversible))
        }
        other => Err(TransformError::InvalidParam {
            key: "action",
            transform_type: transformation.transform_type,
            message: format!("unknown outlier action '{other}'"),
        }),
    }
}
