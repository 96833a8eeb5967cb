//! Column type casting: numeric, datetime, string, boolean.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use polars::prelude::{AnyValue, Column, DataFrame, DataType, Series, TimeUnit};

use wrangler_model::Transformation;
use wrangler_model::frame::{any_to_string, cell, column_f64s, column_strings};

use crate::apply::{set_string_column, target_column};
use crate::context::ReversalContext;
use crate::error::TransformError;

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%d-%m-%Y", "%d/%m/%Y"];
const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"];
const BOOLEAN_TRUE: [&str; 5] = ["true", "1", "yes", "t", "y"];
const BOOLEAN_FALSE: [&str; 5] = ["false", "0", "no", "f", "n"];

fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(dt);
        }
    }
    for format in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(d.and_time(NaiveTime::MIN));
        }
    }
    None
}

pub fn apply(
    data: &DataFrame,
    transformation: &Transformation,
) -> Result<(DataFrame, ReversalContext), TransformError> {
    let column = target_column(data, transformation)?;
    let target = transformation.param_str("target_type").unwrap_or("numeric");
    let original = data.column(column)?.dtype().clone();

    let out = match target {
        "numeric" => {
            // Unparseable values become null, like a coercing conversion.
            let values = column_f64s(data, column)
                .ok_or_else(|| TransformError::MissingColumn(column.to_string()))?;
            let mut out = data.clone();
            out.with_column(Column::new(column.into(), values))?;
            out
        }
        "datetime" => {
            let cells = column_strings(data, column)
                .ok_or_else(|| TransformError::MissingColumn(column.to_string()))?;
            let millis: Vec<Option<i64>> = cells
                .iter()
                .map(|value| {
                    value
                        .as_deref()
                        .and_then(parse_datetime)
                        .map(|dt| dt.and_utc().timestamp_millis())
                })
                .collect();
            let series = Series::new(column.into(), millis)
                .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?;
            let mut out = data.clone();
            out.with_column(series)?;
            out
        }
        "string" => {
            let col = data.column(column)?;
            let values: Vec<Option<String>> = (0..data.height())
                .map(|idx| {
                    let value = cell(col, idx);
                    if matches!(value, AnyValue::Null) {
                        None
                    } else {
                        Some(any_to_string(&value))
                    }
                })
                .collect();
            set_string_column(data, column, &values)?
        }
        "boolean" => {
            let cells = column_strings(data, column)
                .ok_or_else(|| TransformError::MissingColumn(column.to_string()))?;
            let values: Vec<Option<bool>> = cells
                .iter()
                .map(|value| {
                    value.as_deref().and_then(|v| {
                        let lowered = v.trim().to_lowercase();
                        if BOOLEAN_TRUE.contains(&lowered.as_str()) {
                            Some(true)
                        } else if BOOLEAN_FALSE.contains(&lowered.as_str()) {
                            Some(false)
                        } else {
                            None
                        }
                    })
                })
                .collect();
            let mut out = data.clone();
            out.with_column(Column::new(column.into(), values))?;
            out
        }
        other => {
            return Err(TransformError::InvalidParam {
                key: "target_type",
                transform_type: transformation.transform_type,
                message: format!("unknown cast target '{other}'"),
            });
        }
    };

    Ok((
        out,
        ReversalContext::Cast {
            column: column.to_string(),
            original,
        },
    ))
}

/// Cast back to the recorded original dtype. Lossy conversions (e.g. a
/// datetime formatted back into a string) follow the engine's cast rules.
pub fn reverse(data: &DataFrame, context: &ReversalContext) -> Result<DataFrame, TransformError> {
    let ReversalContext::Cast { column, original } = context else {
        return Err(TransformError::NoReversalContext(String::new()));
    };
    let col = data
        .column(column)
        .map_err(|_| TransformError::MissingColumn(column.clone()))?;
    let restored = col.cast(original)?;
    let mut out = data.clone();
    out.with_column(restored)?;
    Ok(out)
}
