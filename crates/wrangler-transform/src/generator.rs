//! Candidate generation from a data profile.
//!
//! Generation is a pure function of the profile: columns are visited in
//! profile order (sorted by name) and identifiers are deterministic slugs,
//! so the same profile always yields the same candidate list.

use std::collections::BTreeMap;

use tracing::debug;

use wrangler_model::{
    ColumnProfile, DataProfile, InferredType, ParamValue, Transformation, TransformationType,
};

use crate::reversibility::ReversibilityClassifier;

/// IQR fence multiplier for outlier-removal candidates.
const IQR_THRESHOLD: f64 = 1.5;
/// Z-score cutoff for outlier-removal candidates.
const ZSCORE_THRESHOLD: f64 = 3.0;

/// Generates transformation candidates from a [`DataProfile`].
#[derive(Debug, Clone, Default)]
pub struct CandidateGenerator;

impl CandidateGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Generate all candidates for the profile. An empty profile yields an
    /// empty list; there is no failure mode.
    pub fn generate(&self, profile: &DataProfile) -> Vec<Transformation> {
        let mut candidates = Vec::new();

        for (name, column) in &profile.columns {
            self.fill_missing_candidates(name, column, &mut candidates);
            self.normalize_candidates(name, column, &mut candidates);
            self.encode_candidates(name, column, &mut candidates);
            self.outlier_candidates(name, column, &mut candidates);
            self.cast_candidates(name, column, &mut candidates);
        }

        if profile.duplicate_rows > 0 {
            candidates.push(make(
                "drop_duplicates".to_string(),
                TransformationType::DropDuplicates,
                Vec::new(),
                BTreeMap::new(),
                "Remove duplicate rows",
            ));
        }

        debug!(count = candidates.len(), "generated transformation candidates");
        candidates
    }

    fn fill_missing_candidates(
        &self,
        name: &str,
        column: &ColumnProfile,
        out: &mut Vec<Transformation>,
    ) {
        if column.null_count == 0 {
            return;
        }

        if column.is_numeric() {
            if column.mean.is_some() {
                out.push(make(
                    format!("fill_missing-{name}-mean"),
                    TransformationType::FillMissing,
                    vec![name.to_string()],
                    params(&[("strategy", ParamValue::from("mean"))]),
                    format!("Fill missing values in {name} with mean"),
                ));
            }
            out.push(make(
                format!("fill_missing-{name}-median"),
                TransformationType::FillMissing,
                vec![name.to_string()],
                params(&[("strategy", ParamValue::from("median"))]),
                format!("Fill missing values in {name} with median"),
            ));
        } else if column.is_categorical() {
            out.push(make(
                format!("fill_missing-{name}-mode"),
                TransformationType::FillMissing,
                vec![name.to_string()],
                params(&[("strategy", ParamValue::from("mode"))]),
                format!("Fill missing values in {name} with mode"),
            ));
        }

        // A constant fill is always on the table.
        out.push(make(
            format!("fill_missing-{name}-constant"),
            TransformationType::FillMissing,
            vec![name.to_string()],
            params(&[
                ("strategy", ParamValue::from("constant")),
                ("fill_value", ParamValue::from(0i64)),
            ]),
            format!("Fill missing values in {name} with constant"),
        ));
    }

    fn normalize_candidates(
        &self,
        name: &str,
        column: &ColumnProfile,
        out: &mut Vec<Transformation>,
    ) {
        if !column.is_numeric() {
            return;
        }

        out.push(make(
            format!("normalize-{name}-standard"),
            TransformationType::Normalize,
            vec![name.to_string()],
            params(&[("method", ParamValue::from("standard"))]),
            format!("Standard normalize {name} (z-score)"),
        ));

        if column.min_value.is_some() && column.max_value.is_some() {
            out.push(make(
                format!("normalize-{name}-minmax"),
                TransformationType::Normalize,
                vec![name.to_string()],
                params(&[("method", ParamValue::from("minmax"))]),
                format!("Min-max normalize {name}"),
            ));
        }
    }

    fn encode_candidates(
        &self,
        name: &str,
        column: &ColumnProfile,
        out: &mut Vec<Transformation>,
    ) {
        if !column.is_categorical() {
            return;
        }

        out.push(make(
            format!("encode_categorical-{name}-onehot"),
            TransformationType::EncodeCategorical,
            vec![name.to_string()],
            params(&[("method", ParamValue::from("onehot"))]),
            format!("One-hot encode {name}"),
        ));
        out.push(make(
            format!("encode_categorical-{name}-label"),
            TransformationType::EncodeCategorical,
            vec![name.to_string()],
            params(&[("method", ParamValue::from("label"))]),
            format!("Label encode {name}"),
        ));
    }

    fn outlier_candidates(
        &self,
        name: &str,
        column: &ColumnProfile,
        out: &mut Vec<Transformation>,
    ) {
        if !column.is_numeric() || column.std.is_none() {
            return;
        }

        out.push(make(
            format!("remove_outliers-{name}-iqr"),
            TransformationType::RemoveOutliers,
            vec![name.to_string()],
            params(&[
                ("method", ParamValue::from("iqr")),
                ("threshold", ParamValue::from(IQR_THRESHOLD)),
            ]),
            format!("Remove outliers from {name} using IQR"),
        ));
        out.push(make(
            format!("remove_outliers-{name}-zscore"),
            TransformationType::RemoveOutliers,
            vec![name.to_string()],
            params(&[
                ("method", ParamValue::from("zscore")),
                ("threshold", ParamValue::from(ZSCORE_THRESHOLD)),
            ]),
            format!("Remove outliers from {name} using z-score"),
        ));
    }

    fn cast_candidates(&self, name: &str, column: &ColumnProfile, out: &mut Vec<Transformation>) {
        if column.inferred_type != InferredType::Text {
            return;
        }

        out.push(make(
            format!("cast_type-{name}-datetime"),
            TransformationType::CastType,
            vec![name.to_string()],
            params(&[("target_type", ParamValue::from("datetime"))]),
            format!("Cast {name} to datetime"),
        ));

        if column.null_count == 0 {
            out.push(make(
                format!("cast_type-{name}-numeric"),
                TransformationType::CastType,
                vec![name.to_string()],
                params(&[("target_type", ParamValue::from("numeric"))]),
                format!("Cast {name} to numeric"),
            ));
        }
    }
}

fn params(entries: &[(&str, ParamValue)]) -> BTreeMap<String, ParamValue> {
    entries
        .iter()
        .map(|(key, value)| ((*key).to_string(), value.clone()))
        .collect()
}

fn make(
    id: String,
    transform_type: TransformationType,
    target_columns: Vec<String>,
    params: BTreeMap<String, ParamValue>,
    description: impl Into<String>,
) -> Transformation {
    let mut transformation = Transformation::new(
        id,
        transform_type,
        target_columns,
        params,
        false,
        description,
    );
    // The reversibility flag always agrees with the classifier.
    transformation.reversible = ReversibilityClassifier::is_reversible(&transformation);
    transformation
}
