//! Transformation appliers.
//!
//! Each submodule implements the `apply`/`reverse` pair for one
//! [`TransformationType`]. Dispatch is an exhaustive match on the closed type
//! enum; there is no runtime registry to fall through.

mod cast;
mod dedup;
mod encode;
mod fill_missing;
mod normalize;
mod outliers;

use polars::prelude::{Column, DataFrame, IntoSeries, Series, StringChunkedBuilder};

use wrangler_model::{Transformation, TransformationType};

use crate::context::ReversalContext;
use crate::error::TransformError;

/// Apply a transformation, returning the new frame and the context needed to
/// reverse it.
pub fn apply(
    data: &DataFrame,
    transformation: &Transformation,
) -> Result<(DataFrame, ReversalContext), TransformError> {
    match transformation.transform_type {
        TransformationType::FillMissing => fill_missing::apply(data, transformation),
        TransformationType::Normalize => normalize::apply(data, transformation),
        TransformationType::EncodeCategorical => encode::apply(data, transformation),
        TransformationType::RemoveOutliers => outliers::apply(data, transformation),
        TransformationType::DropDuplicates => dedup::apply(data, transformation),
        TransformationType::CastType => cast::apply(data, transformation),
    }
}

/// Reverse a previously applied transformation using its recorded context.
pub fn reverse(
    data: &DataFrame,
    transformation: &Transformation,
    context: &ReversalContext,
) -> Result<DataFrame, TransformError> {
    if !context.is_reversible() {
        return Err(TransformError::NotReversible {
            id: transformation.id.clone(),
            transform_type: transformation.transform_type,
        });
    }
    match transformation.transform_type {
        TransformationType::FillMissing => fill_missing::reverse(data, context),
        TransformationType::Normalize => normalize::reverse(data, context),
        TransformationType::EncodeCategorical => encode::reverse(data, context),
        TransformationType::CastType => cast::reverse(data, context),
        TransformationType::RemoveOutliers | TransformationType::DropDuplicates => {
            Err(TransformError::NotReversible {
                id: transformation.id.clone(),
                transform_type: transformation.transform_type,
            })
        }
    }
}

/// The single target column of a transformation, checked against the frame.
pub(crate) fn target_column<'a>(
    data: &DataFrame,
    transformation: &'a Transformation,
) -> Result<&'a str, TransformError> {
    let column = transformation
        .primary_column()
        .ok_or_else(|| TransformError::NoTargetColumn(transformation.id.clone()))?;
    if data.column(column).is_err() {
        return Err(TransformError::MissingColumn(column.to_string()));
    }
    Ok(column)
}

/// Replace a column with float values, one per row.
pub(crate) fn set_float_column(
    data: &DataFrame,
    name: &str,
    values: Vec<Option<f64>>,
) -> Result<DataFrame, TransformError> {
    let mut out = data.clone();
    out.with_column(Column::new(name.into(), values))?;
    Ok(out)
}

/// Replace a column with string values, one per row.
pub(crate) fn set_string_column(
    data: &DataFrame,
    name: &str,
    values: &[Option<String>],
) -> Result<DataFrame, TransformError> {
    let mut builder = StringChunkedBuilder::new(name.into(), values.len());
    for value in values {
        match value {
            Some(v) => builder.append_value(v),
            None => builder.append_null(),
        }
    }
    let mut out = data.clone();
    out.with_column(builder.finish().into_series())?;
    Ok(out)
}

/// Build a standalone string series (used when appending new columns).
pub(crate) fn string_series(name: &str, values: &[Option<String>]) -> Series {
    let mut builder = StringChunkedBuilder::new(name.into(), values.len());
    for value in values {
        match value {
            Some(v) => builder.append_value(v),
            None => builder.append_null(),
        }
    }
    builder.finish().into_series()
}
