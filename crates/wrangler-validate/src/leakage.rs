//! Leakage checks: transformed data that still exposes the original values.

use std::collections::BTreeSet;

use polars::prelude::DataFrame;

use wrangler_model::frame::{column_f64s, column_names, column_strings, row_key};
use wrangler_model::{DataProfile, IssueCode, ValidationIssue};

use crate::ValidatorOptions;

pub fn check(
    original: &DataFrame,
    transformed: &DataFrame,
    profile: &DataProfile,
    options: &ValidatorOptions,
) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if exact_row_leakage(original, transformed, options.row_overlap_threshold) {
        issues.push(ValidationIssue::error(
            IssueCode::ExactRowLeakage,
            "transformed data contains exact copies of original rows",
        ));
    }

    issues.extend(categorical_leakage(original, transformed, profile));
    issues.extend(correlation_leakage(
        original,
        transformed,
        profile,
        options.correlation_threshold,
    ));

    issues
}

/// True when too many transformed rows are byte-for-byte identical to
/// original rows while the row count is unchanged.
fn exact_row_leakage(original: &DataFrame, transformed: &DataFrame, threshold: f64) -> bool {
    if original.height() == 0
        || transformed.height() == 0
        || original.height() != transformed.height()
    {
        return false;
    }

    let original_columns = column_names(original);
    let transformed_columns = column_names(transformed);

    let original_rows: BTreeSet<String> = (0..original.height())
        .map(|idx| row_key(original, &original_columns, idx))
        .collect();
    let transformed_rows: BTreeSet<String> = (0..transformed.height())
        .map(|idx| row_key(transformed, &transformed_columns, idx))
        .collect();
    if transformed_rows.is_empty() {
        return false;
    }

    let overlap = original_rows.intersection(&transformed_rows).count();
    overlap as f64 / transformed_rows.len() as f64 > threshold
}

/// Categorical columns whose unique-value sets survived untouched were not
/// really transformed.
fn categorical_leakage(
    original: &DataFrame,
    transformed: &DataFrame,
    profile: &DataProfile,
) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    for (name, column) in &profile.columns {
        if !column.is_categorical() || column.unique_count.is_none() {
            continue;
        }
        let (Some(original_cells), Some(transformed_cells)) = (
            column_strings(original, name),
            column_strings(transformed, name),
        ) else {
            continue;
        };

        let original_values: BTreeSet<String> = original_cells.into_iter().flatten().collect();
        let transformed_values: BTreeSet<String> =
            transformed_cells.into_iter().flatten().collect();
        if !original_values.is_empty() && original_values == transformed_values {
            issues.push(
                ValidationIssue::warning(
                    IssueCode::PotentialLeakage,
                    format!(
                        "column '{name}' appears to have direct value mapping without transformation"
                    ),
                )
                .with_column(name.clone()),
            );
        }
    }

    issues
}

/// Numeric columns almost perfectly correlated with their originals may not
/// have been transformed at all. Informational only.
fn correlation_leakage(
    original: &DataFrame,
    transformed: &DataFrame,
    profile: &DataProfile,
    threshold: f64,
) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    for (name, column) in &profile.columns {
        if !column.is_numeric() {
            continue;
        }
        let (Some(original_values), Some(transformed_values)) =
            (column_f64s(original, name), column_f64s(transformed, name))
        else {
            continue;
        };

        let before: Vec<f64> = original_values.into_iter().flatten().collect();
        let after: Vec<f64> = transformed_values.into_iter().flatten().collect();
        if before.len() != after.len() || before.len() < 2 {
            continue;
        }

        if let Some(correlation) = pearson(&before, &after)
            && correlation > threshold
        {
            issues.push(
                ValidationIssue::info(
                    IssueCode::HighCorrelation,
                    format!(
                        "column '{name}' has very high correlation ({correlation:.4}) with original - may need transformation"
                    ),
                )
                .with_column(name.clone()),
            );
        }
    }

    issues
}

fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let mut covariance = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (a, b) in x.iter().zip(y) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        covariance += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x <= 0.0 || var_y <= 0.0 {
        return None;
    }
    Some(covariance / (var_x.sqrt() * var_y.sqrt()))
}

#[cfg(test)]
mod tests {
    use super::pearson;

    #[test]
    fn pearson_of_linear_map_is_one() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [2.0, 4.0, 6.0, 8.0];
        let r = pearson(&x, &y).unwrap();
        assert!((r - 1.0).abs() < 1e-12);
    }

    #[test]
    fn pearson_of_constant_is_undefined() {
        let x = [1.0, 2.0, 3.0];
        let y = [5.0, 5.0, 5.0];
        assert!(pearson(&x, &y).is_none());
    }
}
