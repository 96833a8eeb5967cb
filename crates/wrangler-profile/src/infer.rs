//! Column type inference.
//!
//! Inference order matters and mirrors the checks below:
//!
//! 1. Boolean (before numeric, since 0/1 columns would otherwise read numeric)
//! 2. Datetime (before numeric, since datetimes can parse as numbers)
//! 3. Numeric
//! 4. Categorical (low cardinality)
//! 5. Text (fallback)

use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use polars::prelude::DataType;
use wrangler_model::InferredType;
use wrangler_model::frame::dtype_is_numeric;

/// Fraction of values that must parse for a type to be accepted.
pub const PARSE_SUCCESS_THRESHOLD: f64 = 0.8;

/// Maximum unique-value ratio for a column to count as categorical.
pub const CATEGORICAL_UNIQUE_RATIO: f64 = 0.6;

const BOOLEAN_LITERALS: [&str; 10] = ["true", "false", "1", "0", "yes", "no", "t", "f", "y", "n"];

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%d-%m-%Y", "%d/%m/%Y"];

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
];

/// Parse a single cell as a datetime, accepting date-only formats.
pub fn parse_datetime_value(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
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

fn is_boolean(values: &[String]) -> bool {
    if values.is_empty() {
        return false;
    }
    values
        .iter()
        .all(|v| BOOLEAN_LITERALS.contains(&v.trim().to_lowercase().as_str()))
}

fn numeric_fraction(values: &[String]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let parsed = values
        .iter()
        .filter(|v| v.trim().parse::<f64>().is_ok())
        .count();
    parsed as f64 / values.len() as f64
}

fn datetime_fraction(values: &[String]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let parsed = values
        .iter()
        .filter(|v| parse_datetime_value(v).is_some())
        .count();
    parsed as f64 / values.len() as f64
}

fn unique_ratio(values: &[String]) -> f64 {
    if values.is_empty() {
        return 1.0;
    }
    let unique: BTreeSet<&str> = values.iter().map(String::as_str).collect();
    unique.len() as f64 / values.len() as f64
}

/// Infer the semantic type of a column from its physical dtype and its
/// non-missing stringified values.
pub fn infer_column_type(dtype: &DataType, values: &[String]) -> InferredType {
    if *dtype == DataType::Boolean || is_boolean(values) {
        return InferredType::Boolean;
    }

    let already_datetime = matches!(
        dtype,
        DataType::Date | DataType::Datetime(_, _) | DataType::Time
    );
    // Numeric strings parse as dates in some formats, so rule numerics out
    // before attempting datetime parsing.
    let looks_numeric = dtype_is_numeric(dtype) || numeric_fraction(values) > PARSE_SUCCESS_THRESHOLD;
    if already_datetime || (!looks_numeric && datetime_fraction(values) > PARSE_SUCCESS_THRESHOLD) {
        return InferredType::Datetime;
    }

    if looks_numeric {
        return InferredType::Numeric;
    }

    if !values.is_empty() && unique_ratio(values) <= CATEGORICAL_UNIQUE_RATIO {
        return InferredType::Categorical;
    }

    InferredType::Text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn infers_boolean_from_literals() {
        let values = strings(&["yes", "no", "yes", "no"]);
        assert_eq!(
            infer_column_type(&DataType::String, &values),
            InferredType::Boolean
        );
    }

    #[test]
    fn zero_one_column_is_boolean_not_numeric() {
        let values = strings(&["0", "1", "1", "0"]);
        assert_eq!(
            infer_column_type(&DataType::Int64, &values),
            InferredType::Boolean
        );
    }

    #[test]
    fn infers_datetime_from_parseable_strings() {
        let values = strings(&["2024-01-15", "2024-02-01", "2024-03-20"]);
        assert_eq!(
            infer_column_type(&DataType::String, &values),
            InferredType::Datetime
        );
    }

    #[test]
    fn infers_numeric_from_dtype_and_strings() {
        let values = strings(&["1.5", "2.5", "3.5"]);
        assert_eq!(
            infer_column_type(&DataType::String, &values),
            InferredType::Numeric
        );
        let values = strings(&["10", "20", "35"]);
        assert_eq!(
            infer_column_type(&DataType::Float64, &values),
            InferredType::Numeric
        );
    }

    #[test]
    fn low_cardinality_strings_are_categorical() {
        let values = strings(&["NYC", "LA", "NYC", "LA", "NYC", "Chicago"]);
        assert_eq!(
            infer_column_type(&DataType::String, &values),
            InferredType::Categorical
        );
    }

    #[test]
    fn high_cardinality_strings_are_text() {
        let values = strings(&["alpha", "beta", "gamma", "delta", "epsilon"]);
        assert_eq!(
            infer_column_type(&DataType::String, &values),
            InferredType::Text
        );
    }

    #[test]
    fn empty_column_defaults_to_text() {
        assert_eq!(infer_column_type(&DataType::String, &[]), InferredType::Text);
    }

    #[test]
    fn datetime_parsing_accepts_common_formats() {
        assert!(parse_datetime_value("2024-01-15").is_some());
        assert!(parse_datetime_value("2024/01/15").is_some());
        assert!(parse_datetime_value("2024-01-15 10:30:00").is_some());
        assert!(parse_datetime_value("2024-01-15T10:30:00").is_some());
        assert!(parse_datetime_value("not a date").is_none());
        assert!(parse_datetime_value("").is_none());
    }
}
