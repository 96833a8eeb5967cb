use std::collections::BTreeMap;

use wrangler_model::{ColumnProfile, DataProfile, InferredType, TransformationType};
use wrangler_transform::CandidateGenerator;

fn column(name: &str, inferred_type: InferredType) -> ColumnProfile {
    ColumnProfile {
        name: name.to_string(),
        dtype: "str".to_string(),
        null_count: 0,
        null_percentage: 0.0,
        unique_count: Some(3),
        min_value: None,
        max_value: None,
        mean: None,
        std: None,
        inferred_type,
    }
}

fn numeric_column(name: &str, null_count: usize) -> ColumnProfile {
    ColumnProfile {
        name: name.to_string(),
        dtype: "f64".to_string(),
        null_count,
        null_percentage: null_count as f64 * 10.0,
        unique_count: Some(8),
        min_value: Some(1.0),
        max_value: Some(100.0),
        mean: Some(42.0),
        std: Some(12.0),
        inferred_type: InferredType::Numeric,
    }
}

fn profile(columns: Vec<ColumnProfile>, duplicate_rows: usize) -> DataProfile {
    let column_count = columns.len();
    let columns: BTreeMap<String, ColumnProfile> =
        columns.into_iter().map(|c| (c.name.clone(), c)).collect();
    DataProfile {
        row_count: 10,
        column_count,
        columns,
        overall_missing_percentage: 0.0,
        duplicate_rows,
    }
}

#[test]
fn numeric_column_with_nulls_gets_mean_median_and_constant_fills() {
    let profile = profile(vec![numeric_column("age", 2)], 0);
    let candidates = CandidateGenerator::new().generate(&profile);

    let fills: Vec<_> = candidates
        .iter()
        .filter(|t| t.transform_type == TransformationType::FillMissing)
        .collect();
    let strategies: Vec<_> = fills
        .iter()
        .filter_map(|t| t.param_str("strategy"))
        .collect();
    assert_eq!(strategies, vec!["mean", "median", "constant"]);
    for fill in &fills {
        assert_eq!(fill.target_columns, vec!["age".to_string()]);
    }
}

#[test]
fn constant_fill_is_the_only_reversible_fill() {
    let profile = profile(vec![numeric_column("age", 2)], 0);
    let candidates = CandidateGenerator::new().generate(&profile);

    for t in candidates
        .iter()
        .filter(|t| t.transform_type == TransformationType::FillMissing)
    {
        let expected = t.param_str("strategy") == Some("constant");
        assert_eq!(t.reversible, expected, "candidate {}", t.id);
    }
}

#[test]
fn numeric_column_gets_both_normalizations_and_both_outlier_removals() {
    let profile = profile(vec![numeric_column("score", 0)], 0);
    let candidates = CandidateGenerator::new().generate(&profile);

    let methods: Vec<_> = candidates
        .iter()
        .filter(|t| t.transform_type == TransformationType::Normalize)
        .filter_map(|t| t.param_str("method"))
        .collect();
    assert_eq!(methods, vec!["standard", "minmax"]);

    let outliers: Vec<_> = candidates
        .iter()
        .filter(|t| t.transform_type == TransformationType::RemoveOutliers)
        .collect();
    assert_eq!(outliers.len(), 2);
    assert!(outliers.iter().all(|t| !t.reversible));
    let iqr = outliers
        .iter()
        .find(|t| t.param_str("method") == Some("iqr"))
        .expect("iqr candidate");
    assert_eq!(iqr.param_f64("threshold"), Some(1.5));
    let zscore = outliers
        .iter()
        .find(|t| t.param_str("method") == Some("zscore"))
        .expect("zscore candidate");
    assert_eq!(zscore.param_f64("threshold"), Some(3.0));
}

#[test]
fn minmax_requires_known_bounds() {
    let mut col = numeric_column("score", 0);
    col.min_value = None;
    let profile = profile(vec![col], 0);
    let candidates = CandidateGenerator::new().generate(&profile);

    let methods: Vec<_> = candidates
        .iter()
        .filter(|t| t.transform_type == TransformationType::Normalize)
        .filter_map(|t| t.param_str("method"))
        .collect();
    assert_eq!(methods, vec!["standard"]);
}

#[test]
fn outlier_candidates_require_known_std() {
    let mut col = numeric_column("score", 0);
    col.std = None;
    let profile = profile(vec![col], 0);
    let candidates = CandidateGenerator::new().generate(&profile);
    assert!(
        !candidates
            .iter()
            .any(|t| t.transform_type == TransformationType::RemoveOutliers)
    );
}

#[test]
fn categorical_column_gets_both_encodings() {
    let profile = profile(vec![column("city", InferredType::Categorical)], 0);
    let candidates = CandidateGenerator::new().generate(&profile);

    let methods: Vec<_> = candidates
        .iter()
        .filter(|t| t.transform_type == TransformationType::EncodeCategorical)
        .filter_map(|t| t.param_str("method"))
        .collect();
    assert_eq!(methods, vec!["onehot", "label"]);
}

#[test]
fn duplicates_yield_exactly_one_drop_duplicates() {
    let profile = profile(vec![column("city", InferredType::Categorical)], 3);
    let candidates = CandidateGenerator::new().generate(&profile);

    let drops: Vec<_> = candidates
        .iter()
        .filter(|t| t.transform_type == TransformationType::DropDuplicates)
        .collect();
    assert_eq!(drops.len(), 1);
    assert!(drops[0].target_columns.is_empty());
    assert!(!drops[0].reversible);
}

#[test]
fn text_columns_get_cast_candidates() {
    let mut with_nulls = column("notes", InferredType::Text);
    with_nulls.null_count = 1;
    let clean = column("code", InferredType::Text);
    let profile = profile(vec![with_nulls, clean], 0);
    let candidates = CandidateGenerator::new().generate(&profile);

    let casts: Vec<_> = candidates
        .iter()
        .filter(|t| t.transform_type == TransformationType::CastType)
        .map(|t| {
            (
                t.target_columns[0].as_str(),
                t.param_str("target_type").unwrap_or(""),
            )
        })
        .collect();
    // A null-free text column gets both casts; one with nulls only datetime.
    assert!(casts.contains(&("code", "datetime")));
    assert!(casts.contains(&("code", "numeric")));
    assert!(casts.contains(&("notes", "datetime")));
    assert!(!casts.contains(&("notes", "numeric")));
}

#[test]
fn empty_profile_yields_no_candidates() {
    let profile = DataProfile::default();
    assert!(CandidateGenerator::new().generate(&profile).is_empty());
}

#[test]
fn generation_is_deterministic() {
    let profile = profile(
        vec![
            numeric_column("age", 2),
            column("city", InferredType::Categorical),
        ],
        1,
    );
    let generator = CandidateGenerator::new();
    let first = generator.generate(&profile);
    let second = generator.generate(&profile);
    assert_eq!(first, second);
}
