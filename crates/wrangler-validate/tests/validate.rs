use polars::prelude::{DataFrame, df};

use wrangler_model::{IssueCode, Severity};
use wrangler_profile::DataProfiler;
use wrangler_validate::{Validator, ValidatorOptions};

fn profile_of(frame: &DataFrame) -> wrangler_model::DataProfile {
    DataProfiler::new().profile(frame)
}

fn ten_rows() -> DataFrame {
    df! {
        "v" => [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0],
    }
    .unwrap()
}

#[test]
fn dropping_sixty_percent_of_rows_fails() {
    let original = ten_rows();
    let transformed = df! { "v" => [1.0, 2.0, 3.0, 4.0] }.unwrap();
    let profile = profile_of(&original);

    let result = Validator::new().validate(&original, &transformed, &profile);

    assert!(!result.passed);
    assert!(
        result
            .issues
            .iter()
            .any(|i| i.code == IssueCode::ExcessiveRowLoss && i.severity == Severity::Error)
    );
    assert_eq!(result.original_row_count, 10);
    assert_eq!(result.transformed_row_count, 4);
}

#[test]
fn small_row_loss_is_only_a_warning() {
    // 100 rows down to 97: 3% loss against a 10% tolerance.
    let values: Vec<f64> = (0..100).map(f64::from).collect();
    let original = df! { "v" => values.clone() }.unwrap();
    let kept: Vec<f64> = values[..97].to_vec();
    let transformed = df! { "v" => kept }.unwrap();
    let profile = profile_of(&original);

    let result = Validator::new().validate(&original, &transformed, &profile);

    assert!(result.passed);
    assert!(
        result
            .issues
            .iter()
            .any(|i| i.code == IssueCode::RowLoss && i.severity == Severity::Warning)
    );
    assert!(
        !result
            .issues
            .iter()
            .any(|i| i.code == IssueCode::ExcessiveRowLoss)
    );
}

#[test]
fn removed_column_is_an_error() {
    let original = df! {
        "a" => [1.0, 2.0],
        "b" => ["x", "y"],
    }
    .unwrap();
    let transformed = df! { "a" => [1.5, 2.5] }.unwrap();
    let profile = profile_of(&original);

    let result = Validator::new().validate(&original, &transformed, &profile);

    assert!(!result.passed);
    assert!(!result.schema_compatible);
    assert!(result.issues.iter().any(|i| i.code == IssueCode::ColumnRemoved));
    assert!(result.issues.iter().any(|i| i.code == IssueCode::MissingColumn));
}

#[test]
fn increased_nulls_are_an_error() {
    let original = df! { "v" => [Some(1.0), Some(2.0), Some(3.0), Some(4.0)] }.unwrap();
    let transformed = df! { "v" => [Some(0.5), None, Some(1.5), None] }.unwrap();
    let profile = profile_of(&original);

    let result = Validator::new().validate(&original, &transformed, &profile);

    assert!(!result.passed);
    let issue = result
        .issues
        .iter()
        .find(|i| i.code == IssueCode::NullsIncreased)
        .expect("nulls increased issue");
    assert_eq!(issue.column.as_deref(), Some("v"));
}

#[test]
fn filled_nulls_are_not_an_error() {
    let original = df! { "v" => [Some(1.0), None, Some(3.0)] }.unwrap();
    let transformed = df! { "v" => [Some(1.0), Some(2.0), Some(3.0)] }.unwrap();
    let profile = profile_of(&original);

    let result = Validator::new().validate(&original, &transformed, &profile);
    assert!(!result.issues.iter().any(|i| i.code == IssueCode::NullsIncreased));
}

#[test]
fn dtype_change_is_a_warning() {
    let original = df! { "v" => [1i64, 2, 3] }.unwrap();
    let transformed = df! { "v" => [10.0, 20.0, 30.0] }.unwrap();
    let profile = profile_of(&original);

    let result = Validator::new().validate(&original, &transformed, &profile);

    let issue = result
        .issues
        .iter()
        .find(|i| i.code == IssueCode::TypeChanged)
        .expect("type changed issue");
    assert_eq!(issue.severity, Severity::Warning);
}

#[test]
fn identical_output_is_exact_row_leakage() {
    let original = df! {
        "city" => ["NYC", "LA", "NYC", "SF"],
        "v" => [1.0, 2.0, 3.0, 4.0],
    }
    .unwrap();
    let transformed = original.clone();
    let profile = profile_of(&original);

    let result = Validator::new().validate(&original, &transformed, &profile);

    assert!(!result.passed);
    assert!(
        result
            .issues
            .iter()
            .any(|i| i.code == IssueCode::ExactRowLeakage && i.severity == Severity::Error)
    );
}

#[test]
fn untouched_categorical_values_are_potential_leakage() {
    let original = df! {
        "city" => ["NYC", "LA", "NYC", "LA", "NYC", "LA"],
        "v" => [1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
    }
    .unwrap();
    // The numeric column changed, the categorical one did not.
    let transformed = df! {
        "city" => ["LA", "NYC", "LA", "NYC", "LA", "NYC"],
        "v" => [10.0, 2.5, 13.0, 24.0, 3.5, 16.0],
    }
    .unwrap();
    let profile = profile_of(&original);

    let result = Validator::new().validate(&original, &transformed, &profile);

    assert!(
        result
            .issues
            .iter()
            .any(|i| i.code == IssueCode::PotentialLeakage && i.severity == Severity::Warning)
    );
}

#[test]
fn near_perfect_correlation_is_informational() {
    let original = df! { "v" => [1.0, 2.0, 3.0, 4.0, 5.0] }.unwrap();
    // A pure linear rescale correlates perfectly with the original.
    let transformed = df! { "v" => [10.0, 20.0, 30.0, 40.0, 50.0] }.unwrap();
    let profile = profile_of(&original);

    let result = Validator::new().validate(&original, &transformed, &profile);

    let issue = result
        .issues
        .iter()
        .find(|i| i.code == IssueCode::HighCorrelation)
        .expect("high correlation issue");
    assert_eq!(issue.severity, Severity::Info);
    // Informational issues never fail validation on their own.
    assert!(result.passed);
}

#[test]
fn numeric_to_parseable_string_is_a_warning() {
    let original = df! { "v" => [1.0, 2.0, 3.0] }.unwrap();
    let transformed = df! { "v" => ["1.0", "2.0", "3.0"] }.unwrap();
    let profile = profile_of(&original);

    let result = Validator::new().validate(&original, &transformed, &profile);

    assert!(
        result
            .issues
            .iter()
            .any(|i| i.code == IssueCode::TypeConversion && i.severity == Severity::Warning)
    );
    assert!(result.schema_compatible);
}

#[test]
fn numeric_to_garbage_string_is_an_error() {
    let original = df! { "v" => [1.0, 2.0, 3.0] }.unwrap();
    let transformed = df! { "v" => ["one", "two", "three"] }.unwrap();
    let profile = profile_of(&original);

    let result = Validator::new().validate(&original, &transformed, &profile);

    assert!(!result.passed);
    assert!(!result.schema_compatible);
    assert!(
        result
            .issues
            .iter()
            .any(|i| i.code == IssueCode::IncompatibleType && i.severity == Severity::Error)
    );
}

#[test]
fn custom_tolerance_is_honored() {
    let original = ten_rows();
    let transformed = df! { "v" => [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0] }.unwrap();
    let profile = profile_of(&original);

    // 30% loss passes under a 50% tolerance.
    let lenient = Validator::with_options(ValidatorOptions {
        row_loss_tolerance: 0.5,
        ..ValidatorOptions::default()
    });
    let result = lenient.validate(&original, &transformed, &profile);
    assert!(!result.issues.iter().any(|i| i.code == IssueCode::ExcessiveRowLoss));
    assert!(result.issues.iter().any(|i| i.code == IssueCode::RowLoss));
}
