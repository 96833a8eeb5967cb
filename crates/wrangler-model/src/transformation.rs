//! Transformation descriptors and execution results.

use std::collections::BTreeMap;
use std::fmt;

use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};

/// The closed set of transformation types the pipeline knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformationType {
    FillMissing,
    Normalize,
    EncodeCategorical,
    RemoveOutliers,
    DropDuplicates,
    CastType,
}

impl TransformationType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FillMissing => "fill_missing",
            Self::Normalize => "normalize",
            Self::EncodeCategorical => "encode_categorical",
            Self::RemoveOutliers => "remove_outliers",
            Self::DropDuplicates => "drop_duplicates",
            Self::CastType => "cast_type",
        }
    }
}

impl fmt::Display for TransformationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single named transformation parameter.
///
/// Parameters are kept as an open mapping so descriptors stay serializable
/// and printable; appliers read them through the typed accessors on
/// [`Transformation`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl ParamValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            Self::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// A data transformation descriptor.
///
/// Immutable once created by the candidate generator. Identifiers are
/// deterministic slugs (`<type>-<column>-<qualifier>`) so candidate generation
/// stays a pure function of the data profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transformation {
    pub id: String,
    #[serde(rename = "type")]
    pub transform_type: TransformationType,
    pub target_columns: Vec<String>,
    pub params: BTreeMap<String, ParamValue>,
    pub reversible: bool,
    pub description: String,
}

impl Transformation {
    pub fn new(
        id: impl Into<String>,
        transform_type: TransformationType,
        target_columns: Vec<String>,
        params: BTreeMap<String, ParamValue>,
        reversible: bool,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            transform_type,
            target_columns,
            params,
            reversible,
            description: description.into(),
        }
    }

    /// The first target column, for single-column transformations.
    pub fn primary_column(&self) -> Option<&str> {
        self.target_columns.first().map(String::as_str)
    }

    pub fn param(&self, key: &str) -> Option<&ParamValue> {
        self.params.get(key)
    }

    pub fn param_str(&self, key: &str) -> Option<&str> {
        self.params.get(key).and_then(ParamValue::as_str)
    }

    pub fn param_f64(&self, key: &str) -> Option<f64> {
        self.params.get(key).and_then(ParamValue::as_f64)
    }
}

/// Result of applying a single transformation.
///
/// The output frame is transient and intentionally not serialized; on failure
/// it carries the input data unchanged.
#[derive(Debug, Clone)]
pub struct TransformationResult {
    pub transformation: Transformation,
    pub success: bool,
    pub output: DataFrame,
    pub error_message: Option<String>,
    pub execution_time_ms: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_tag_round_trips_as_snake_case() {
        let json = serde_json::to_string(&TransformationType::FillMissing).unwrap();
        assert_eq!(json, "\"fill_missing\"");
        let back: TransformationType = serde_json::from_str("\"remove_outliers\"").unwrap();
        assert_eq!(back, TransformationType::RemoveOutliers);
    }

    #[test]
    fn params_expose_typed_accessors() {
        let mut params = BTreeMap::new();
        params.insert("strategy".to_string(), ParamValue::from("mean"));
        params.insert("threshold".to_string(), ParamValue::from(1.5));
        let t = Transformation::new(
            "fill_missing-age-mean",
            TransformationType::FillMissing,
            vec!["age".to_string()],
            params,
            false,
            "Fill missing values in age with mean",
        );
        assert_eq!(t.param_str("strategy"), Some("mean"));
        assert_eq!(t.param_f64("threshold"), Some(1.5));
        assert_eq!(t.primary_column(), Some("age"));
    }
}
