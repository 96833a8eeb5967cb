//! Duplicate-row removal over a column subset (empty subset = all columns).

use std::collections::BTreeSet;

use polars::prelude::{BooleanChunked, DataFrame, NewChunkedArray};

use wrangler_model::Transformation;
use wrangler_model::frame::{column_names, row_key};

use crate::context::ReversalContext;
use crate::error::TransformError;

pub fn apply(
    data: &DataFrame,
    transformation: &Transformation,
) -> Result<(DataFrame, ReversalContext), TransformError> {
    let subset: Vec<String> = if transformation.target_columns.is_empty() {
        column_names(data)
    } else {
        for column in &transformation.target_columns {
            if data.column(column).is_err() {
                return Err(TransformError::MissingColumn(column.clone()));
            }
        }
        transformation.target_columns.clone()
    };

    let mut seen = BTreeSet::new();
    let row_count = data.height();
    let mut keep = Vec::with_capacity(row_count);
    for idx in 0..row_count {
        keep.push(seen.insert(row_key(data, &subset, idx)));
    }

    if keep.iter().all(|k| *k) {
        return Ok((data.clone(), ReversalContext::Irreversible));
    }

    let mask = BooleanChunked::from_slice("dedupe".into(), &keep);
    let out = data.filter(&mask)?;
    Ok((out, ReversalContext::Irreversible))
}
