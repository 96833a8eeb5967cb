//! The profiler itself: walks columns, infers types, and gathers statistics.

use std::collections::{BTreeMap, BTreeSet};

use polars::prelude::DataFrame;
use tracing::debug;

use wrangler_model::frame::{column_names, column_strings, row_key};
use wrangler_model::{ColumnProfile, DataProfile, InferredType};

use crate::infer::infer_column_type;

/// Deterministic dataset profiler.
#[derive(Debug, Clone, Default)]
pub struct DataProfiler;

impl DataProfiler {
    pub fn new() -> Self {
        Self
    }

    /// Profile a frame. Blank strings count as missing everywhere.
    pub fn profile(&self, data: &DataFrame) -> DataProfile {
        let row_count = data.height();
        let names = column_names(data);
        let column_count = names.len();

        let mut columns: BTreeMap<String, ColumnProfile> = BTreeMap::new();
        let mut total_missing = 0usize;

        for name in &names {
            let Ok(column) = data.column(name) else {
                continue;
            };
            let dtype = column.dtype().to_string();
            let cells = column_strings(data, name).unwrap_or_default();
            let non_missing: Vec<String> = cells.iter().flatten().cloned().collect();
            let null_count = row_count - non_missing.len();
            total_missing += null_count;

            let inferred_type = infer_column_type(column.dtype(), &non_missing);

            let unique_count = if non_missing.is_empty() {
                None
            } else {
                let unique: BTreeSet<&str> = non_missing.iter().map(String::as_str).collect();
                Some(unique.len())
            };

            let (min_value, max_value, mean, std) = if inferred_type == InferredType::Numeric {
                numeric_summary(&non_missing)
            } else {
                (None, None, None, None)
            };

            debug!(
                column = name.as_str(),
                inferred = inferred_type.as_str(),
                null_count,
                "profiled column"
            );

            columns.insert(
                name.clone(),
                ColumnProfile {
                    name: name.clone(),
                    dtype,
                    null_count,
                    null_percentage: percentage(null_count, row_count),
                    unique_count,
                    min_value,
                    max_value,
                    mean,
                    std,
                    inferred_type,
                },
            );
        }

        let total_cells = row_count * column_count;
        DataProfile {
            row_count,
            column_count,
            columns,
            overall_missing_percentage: percentage(total_missing, total_cells),
            duplicate_rows: count_duplicate_rows(data, &names),
        }
    }
}

fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// Min, max, mean, and sample standard deviation of the parseable values.
fn numeric_summary(values: &[String]) -> (Option<f64>, Option<f64>, Option<f64>, Option<f64>) {
    let numbers: Vec<f64> = values
        .iter()
        .filter_map(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .collect();
    if numbers.is_empty() {
        return (None, None, None, None);
    }

    let min = numbers.iter().copied().fold(f64::INFINITY, f64::min);
    let max = numbers.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mean = numbers.iter().sum::<f64>() / numbers.len() as f64;
    let std = if numbers.len() < 2 {
        None
    } else {
        let variance = numbers.iter().map(|v| (v - mean).powi(2)).sum::<f64>()
            / (numbers.len() - 1) as f64;
        Some(variance.sqrt())
    };

    (Some(min), Some(max), Some(mean), std)
}

fn count_duplicate_rows(data: &DataFrame, columns: &[String]) -> usize {
    let mut seen = BTreeSet::new();
    let mut duplicates = 0usize;
    for idx in 0..data.height() {
        if !seen.insert(row_key(data, columns, idx)) {
            duplicates += 1;
        }
    }
    duplicates
}
