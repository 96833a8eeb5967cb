//! Integrity checks: row counts, column survival, nulls, dtypes.

use polars::prelude::DataFrame;

use wrangler_model::frame::count_missing;
use wrangler_model::{DataProfile, IssueCode, ValidationIssue};

pub fn check(
    original: &DataFrame,
    transformed: &DataFrame,
    profile: &DataProfile,
    row_loss_tolerance: f64,
) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if let Some(issue) = check_row_count(original, transformed, row_loss_tolerance) {
        issues.push(issue);
    }
    issues.extend(check_null_preservation(transformed, profile));
    issues.extend(check_type_preservation(transformed, profile));

    issues
}

fn check_row_count(
    original: &DataFrame,
    transformed: &DataFrame,
    tolerance: f64,
) -> Option<ValidationIssue> {
    let original_count = original.height();
    if original_count == 0 {
        return None;
    }

    let loss_ratio =
        (original_count as f64 - transformed.height() as f64) / original_count as f64;

    if loss_ratio > tolerance {
        return Some(ValidationIssue::error(
            IssueCode::ExcessiveRowLoss,
            format!(
                "row count decreased by {:.1}%, exceeding tolerance of {:.1}%",
                loss_ratio * 100.0,
                tolerance * 100.0
            ),
        ));
    }
    if loss_ratio > 0.0 {
        return Some(ValidationIssue::warning(
            IssueCode::RowLoss,
            format!("row count decreased by {:.1}%", loss_ratio * 100.0),
        ));
    }
    None
}

fn check_null_preservation(
    transformed: &DataFrame,
    profile: &DataProfile,
) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    for (name, column) in &profile.columns {
        let Some(null_count) = count_missing(transformed, name) else {
            issues.push(
                ValidationIssue::error(
                    IssueCode::ColumnRemoved,
                    format!("column '{name}' was removed"),
                )
                .with_column(name.clone()),
            );
            continue;
        };

        // Filling nulls is fine; introducing new ones is not.
        if null_count > column.null_count {
            let increase = null_count - column.null_count;
            issues.push(
                ValidationIssue::error(
                    IssueCode::NullsIncreased,
                    format!("null count increased by {increase} in column '{name}'"),
                )
                .with_column(name.clone()),
            );
        }
    }

    issues
}

fn check_type_preservation(
    transformed: &DataFrame,
    profile: &DataProfile,
) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    for (name, column) in &profile.columns {
        let Ok(current) = transformed.column(name) else {
            continue;
        };
        let current_dtype = current.dtype().to_string();
        if current_dtype != column.dtype {
            issues.push(
                ValidationIssue::warning(
                    IssueCode::TypeChanged,
                    format!(
                        "column '{name}' dtype changed from '{}' to '{current_dtype}'",
                        column.dtype
                    ),
                )
                .with_column(name.clone()),
            );
        }
    }

    issues
}
