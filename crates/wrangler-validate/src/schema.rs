//! Schema compatibility checks.

use polars::prelude::{DataFrame, DataType};

use wrangler_model::frame::{column_names, column_strings};
use wrangler_model::{DataProfile, IssueCode, ValidationIssue};

pub fn check(
    original: &DataFrame,
    transformed: &DataFrame,
    profile: &DataProfile,
) -> Vec<ValidationIssue> {
    let mut issues = check_column_existence(original, transformed);
    issues.extend(check_column_types(transformed, profile));
    issues
}

fn check_column_existence(original: &DataFrame, transformed: &DataFrame) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    for name in column_names(original) {
        if transformed.column(&name).is_err() {
            issues.push(
                ValidationIssue::error(
                    IssueCode::MissingColumn,
                    format!("column '{name}' is missing in transformed data"),
                )
                .with_column(name),
            );
        }
    }
    issues
}

/// A numeric column converted to strings is a warning while the values still
/// parse back ("lossy but recoverable"), an error once they do not.
fn check_column_types(transformed: &DataFrame, profile: &DataProfile) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    for (name, column) in &profile.columns {
        let Ok(current) = transformed.column(name) else {
            continue;
        };

        let original_numeric = dtype_from_profile_is_numeric(&column.dtype);
        let transformed_is_string = current.dtype() == &DataType::String;
        if !(original_numeric && transformed_is_string) {
            continue;
        }

        let parseable = column_strings(transformed, name)
            .map(|cells| {
                cells
                    .iter()
                    .flatten()
                    .all(|value| value.trim().parse::<f64>().is_ok())
            })
            .unwrap_or(true);

        if parseable {
            issues.push(
                ValidationIssue::warning(
                    IssueCode::TypeConversion,
                    format!("column '{name}' converted from numeric to string"),
                )
                .with_column(name.clone()),
            );
        } else {
            issues.push(
                ValidationIssue::error(
                    IssueCode::IncompatibleType,
                    format!(
                        "column '{name}' has incompatible type conversion from '{}' to 'str'",
                        column.dtype
                    ),
                )
                .with_column(name.clone()),
            );
        }
    }

    issues
}

fn dtype_from_profile_is_numeric(dtype: &str) -> bool {
    matches!(
        dtype,
        "i8" | "i16" | "i32" | "i64" | "u8" | "u16" | "u32" | "u64" | "f32" | "f64"
    )
}
