//! Categorical encoding: label codes and one-hot indicator columns.

use std::collections::{BTreeMap, BTreeSet};

use polars::prelude::{Column, DataFrame};

use wrangler_model::Transformation;
use wrangler_model::frame::{cell, any_to_f64, column_strings};

use crate::apply::{set_string_column, string_series, target_column};
use crate::context::ReversalContext;
use crate::error::TransformError;

pub fn apply(
    data: &DataFrame,
    transformation: &Transformation,
) -> Result<(DataFrame, ReversalContext), TransformError> {
    let column = target_column(data, transformation)?;
    let method = transformation.param_str("method").unwrap_or("label");

    let cells = column_strings(data, column)
        .ok_or_else(|| TransformError::MissingColumn(column.to_string()))?;
    let categories: Vec<String> = cells
        .iter()
        .flatten()
        .cloned()
        .collect::<BTreeSet<String>>()
        .into_iter()
        .collect();

    match method {
        "label" => {
            let index: BTreeMap<&str, i64> = categories
                .iter()
                .enumerate()
                .map(|(idx, value)| (value.as_str(), idx as i64))
                .collect();
            let codes: Vec<Option<i64>> = cells
                .iter()
                .map(|value| {
                    value
                        .as_deref()
                        .and_then(|v| index.get(v).copied())
                })
                .collect();
            let mut out = data.clone();
            out.with_column(Column::new(column.into(), codes))?;
            Ok((
                out,
                ReversalContext::LabelEncode {
                    column: column.to_string(),
                    mapping: categories,
                },
            ))
        }
        "onehot" => {
            let mut out = data.clone();
            for category in &categories {
                let name = format!("{column}_{category}");
                let indicators: Vec<i64> = cells
                    .iter()
                    .map(|value| i64::from(value.as_deref() == Some(category.as_str())))
                    .collect();
                out.with_column(Column::new(name.as_str().into(), indicators))?;
            }
            let out = out.drop(column)?;
            Ok((
                out,
                ReversalContext::OneHot {
                    column: column.to_string(),
                    categories,
                },
            ))
        }
        other => Err(TransformError::InvalidParam {
            key: "method",
            transform_type: transformation.transform_type,
            message: format!("unknown encoding method '{other}'"),
        }),
    }
}

pub fn reverse(data: &DataFrame, context: &ReversalContext) -> Result<DataFrame, TransformError> {
    match context {
        ReversalContext::LabelEncode { column, mapping } => {
            let col = data
                .column(column)
                .map_err(|_| TransformError::MissingColumn(column.clone()))?;
            let decoded: Vec<Option<String>> = (0..data.height())
                .map(|idx| {
                    any_to_f64(&cell(col, idx))
                        .filter(|code| *code >= 0.0)
                        .and_then(|code| mapping.get(code as usize).cloned())
                })
                .collect();
            set_string_column(data, column, &decoded)
        }
        ReversalContext::OneHot { column, categories } => {
            let mut decoded: Vec<Option<String>> = vec![None; data.height()];
            for category in categories {
                let name = format!("{column}_{category}");
                let col = data
                    .column(&name)
                    .map_err(|_| TransformError::MissingColumn(name.clone()))?;
                for (idx, slot) in decoded.iter_mut().enumerate() {
                    if any_to_f64(&cell(col, idx)) == Some(1.0) {
                        *slot = Some(category.clone());
                    }
                }
            }
            let mut out = data.clone();
            for category in categories {
                out = out.drop(&format!("{column}_{category}"))?;
            }
            out.with_column(string_series(column, &decoded))?;
            Ok(out)
        }
        _ => Err(TransformError::NoReversalContext(String::new())),
    }
}
