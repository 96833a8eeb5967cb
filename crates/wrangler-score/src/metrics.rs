//! The four quality metric calculations.

use std::collections::BTreeSet;

use polars::prelude::{AnyValue, DataFrame, DataType};

use wrangler_model::DataProfile;
use wrangler_model::frame::{any_to_f64, any_to_string, cell, column_names, dtype_is_numeric, is_missing};

fn clamp(score: f64) -> f64 {
    score.clamp(0.0, 1.0)
}

/// Non-missing cells over total cells. 1.0 for an empty frame.
pub fn completeness(data: &DataFrame) -> f64 {
    let rows = data.height();
    let names = column_names(data);
    let total = rows * names.len();
    if total == 0 {
        return 1.0;
    }

    let mut present = 0usize;
    for name in &names {
        let Ok(column) = data.column(name) else {
            continue;
        };
        present += (0..rows)
            .filter(|idx| !is_missing(&cell(column, *idx)))
            .count();
    }
    clamp(present as f64 / total as f64)
}

/// Mean per-column fraction of values consistent with the column's type.
pub fn consistency(data: &DataFrame) -> f64 {
    column_mean(data, column_consistency)
}

fn column_consistency(data: &DataFrame, name: &str) -> f64 {
    let Ok(column) = data.column(name) else {
        return 1.0;
    };
    let dtype = column.dtype().clone();

    if dtype_is_numeric(&dtype) {
        // Physical numerics are consistent unless non-finite values crept in.
        let mut total = 0usize;
        let mut finite = 0usize;
        for idx in 0..data.height() {
            match cell(column, idx) {
                AnyValue::Null => {}
                AnyValue::Float64(v) => {
                    total += 1;
                    if v.is_finite() {
                        finite += 1;
                    }
                }
                AnyValue::Float32(v) => {
                    total += 1;
                    if v.is_finite() {
                        finite += 1;
                    }
                }
                _ => {
                    total += 1;
                    finite += 1;
                }
            }
        }
        if total == 0 {
            return 1.0;
        }
        return finite as f64 / total as f64;
    }

    if matches!(dtype, DataType::Boolean | DataType::Date | DataType::Datetime(_, _)) {
        return 1.0;
    }

    // Free-form column: score the dominant value kind among bool, numeric,
    // and string.
    let mut bools = 0usize;
    let mut numerics = 0usize;
    let mut strings = 0usize;
    let mut total = 0usize;
    for idx in 0..data.height() {
        let value = cell(column, idx);
        if matches!(value, AnyValue::Null) {
            continue;
        }
        total += 1;
        let text = any_to_string(&value);
        let lowered = text.trim().to_lowercase();
        if lowered == "true" || lowered == "false" {
            bools += 1;
        } else if text.trim().parse::<f64>().is_ok() {
            numerics += 1;
        } else {
            strings += 1;
        }
    }
    if total == 0 {
        return 1.0;
    }
    let dominant = bools.max(numerics).max(strings);
    dominant as f64 / total as f64
}

/// Mean per-column fraction of values within expected bounds.
pub fn validity(data: &DataFrame, profile: Option<&DataProfile>) -> f64 {
    column_mean(data, |frame, name| column_validity(frame, name, profile))
}

fn column_validity(data: &DataFrame, name: &str, profile: Option<&DataProfile>) -> f64 {
    let Ok(column) = data.column(name) else {
        return 1.0;
    };
    let dtype = column.dtype().clone();
    let rows = data.height();

    if dtype_is_numeric(&dtype) {
        let values: Vec<f64> = (0..rows)
            .filter_map(|idx| match cell(column, idx) {
                AnyValue::Float64(v) => Some(v),
                AnyValue::Float32(v) => Some(f64::from(v)),
                AnyValue::Null => None,
                other => any_to_f64(&other),
            })
            .collect();
        if values.is_empty() {
            return 1.0;
        }

        let bounds = profile
            .and_then(|p| p.column(name))
            .map(|c| (c.min_value, c.max_value));
        return match bounds {
            Some((Some(min), Some(max))) => {
                let valid = values.iter().filter(|v| **v >= min && **v <= max).count();
                valid as f64 / values.len() as f64
            }
            Some((Some(min), None)) => {
                let valid = values.iter().filter(|v| **v >= min).count();
                valid as f64 / values.len() as f64
            }
            Some((None, Some(max))) => {
                let valid = values.iter().filter(|v| **v <= max).count();
                valid as f64 / values.len() as f64
            }
            // No bounds known: only non-finite values are invalid.
            _ => {
                let finite = values.iter().filter(|v| v.is_finite()).count();
                finite as f64 / values.len() as f64
            }
        };
    }

    if matches!(dtype, DataType::Date | DataType::Datetime(_, _)) {
        return 1.0;
    }

    // Text-like columns: non-null values must be non-blank.
    let mut non_null = 0usize;
    let mut non_blank = 0usize;
    for idx in 0..rows {
        let value = cell(column, idx);
        if matches!(value, AnyValue::Null) {
            continue;
        }
        non_null += 1;
        if !is_missing(&value) {
            non_blank += 1;
        }
    }
    if non_null == 0 {
        return 1.0;
    }
    non_blank as f64 / non_null as f64
}

/// Mean per-column ratio of distinct values to non-null values. Prefers the
/// profile's unique count when one is recorded.
pub fn uniqueness(data: &DataFrame, profile: Option<&DataProfile>) -> f64 {
    column_mean(data, |frame, name| column_uniqueness(frame, name, profile))
}

fn column_uniqueness(data: &DataFrame, name: &str, profile: Option<&DataProfile>) -> f64 {
    let Ok(column) = data.column(name) else {
        return 1.0;
    };

    let mut values: Vec<String> = Vec::new();
    for idx in 0..data.height() {
        let value = cell(column, idx);
        if !is_missing(&value) {
            values.push(any_to_string(&value));
        }
    }
    if values.is_empty() {
        return 1.0;
    }

    let unique_count = profile
        .and_then(|p| p.column(name))
        .and_then(|c| c.unique_count)
        .unwrap_or_else(|| {
            values
                .iter()
                .map(String::as_str)
                .collect::<BTreeSet<&str>>()
                .len()
        });

    clamp(unique_count as f64 / values.len() as f64)
}

fn column_mean(data: &DataFrame, per_column: impl Fn(&DataFrame, &str) -> f64) -> f64 {
    let names = column_names(data);
    if data.height() == 0 || names.is_empty() {
        return 1.0;
    }
    let sum: f64 = names.iter().map(|name| per_column(data, name)).sum();
    clamp(sum / names.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::df;

    #[test]
    fn completeness_counts_missing_cells() {
        let frame = df! {
            "a" => [Some(1.0), None, Some(3.0), Some(4.0)],
            "b" => ["x", "", "y", "z"],
        }
        .unwrap();
        // 8 cells, one null and one blank string missing.
        assert!((completeness(&frame) - 0.75).abs() < 1e-12);
    }

    #[test]
    fn completeness_of_empty_frame_is_one() {
        assert_eq!(completeness(&DataFrame::empty()), 1.0);
    }

    #[test]
    fn consistency_penalizes_mixed_string_columns() {
        let frame = df! {
            "mixed" => ["1", "2", "3", "banana"],
        }
        .unwrap();
        assert!((consistency(&frame) - 0.75).abs() < 1e-12);
    }

    #[test]
    fn consistency_of_clean_columns_is_one() {
        let frame = df! {
            "n" => [1.0, 2.0, 3.0],
            "s" => ["a", "b", "c"],
        }
        .unwrap();
        assert!((consistency(&frame) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn validity_uses_profile_bounds() {
        use wrangler_model::{ColumnProfile, InferredType};

        let frame = df! { "v" => [5.0, 50.0, 500.0] }.unwrap();
        let mut profile = DataProfile::default();
        profile.columns.insert(
            "v".to_string(),
            ColumnProfile {
                name: "v".to_string(),
                dtype: "f64".to_string(),
                null_count: 0,
                null_percentage: 0.0,
                unique_count: None,
                min_value: Some(0.0),
                max_value: Some(100.0),
                mean: None,
                std: None,
                inferred_type: InferredType::Numeric,
            },
        );

        // 500.0 is out of bounds.
        let score = validity(&frame, Some(&profile));
        assert!((score - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn validity_without_profile_flags_blank_strings() {
        let frame = df! { "s" => ["a", "", "c", "d"] }.unwrap();
        assert!((validity(&frame, None) - 0.75).abs() < 1e-12);
    }

    #[test]
    fn uniqueness_is_distinct_over_non_null() {
        let frame = df! { "v" => ["a", "a", "b", "c"] }.unwrap();
        assert!((uniqueness(&frame, None) - 0.75).abs() < 1e-12);
    }
}
