//! Data profile types produced by the profiler and consumed downstream.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Inferred semantic type of a column, independent of its physical dtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InferredType {
    Numeric,
    Categorical,
    Datetime,
    Text,
    Boolean,
}

impl InferredType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::Categorical => "categorical",
            Self::Datetime => "datetime",
            Self::Text => "text",
            Self::Boolean => "boolean",
        }
    }
}

impl fmt::Display for InferredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Profile information for a single column.
///
/// Null counting treats blank strings as missing, so `null_count` can exceed
/// the physical null count of the backing column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnProfile {
    pub name: String,
    /// Physical dtype of the column at profiling time (Polars dtype string).
    pub dtype: String,
    pub null_count: usize,
    pub null_percentage: f64,
    pub unique_count: Option<usize>,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub inferred_type: InferredType,
}

impl ColumnProfile {
    pub fn is_numeric(&self) -> bool {
        self.inferred_type == InferredType::Numeric
    }

    pub fn is_categorical(&self) -> bool {
        self.inferred_type == InferredType::Categorical
    }
}

/// Complete profile of a dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataProfile {
    pub row_count: usize,
    pub column_count: usize,
    pub columns: BTreeMap<String, ColumnProfile>,
    pub overall_missing_percentage: f64,
    pub duplicate_rows: usize,
}

impl DataProfile {
    pub fn column(&self, name: &str) -> Option<&ColumnProfile> {
        self.columns.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
