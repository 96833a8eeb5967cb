//! Typed reversal contexts recorded by the executor during `apply`.

use polars::prelude::DataType;

/// Per-transformation state required to undo an applied transformation.
///
/// One variant per reversible operation; irreversible operations record
/// [`ReversalContext::Irreversible`] so a later reverse attempt fails
/// explicitly instead of silently no-opping. Contexts live only for the
/// lifetime of an [`Executor`](crate::Executor); they are not persisted.
#[derive(Debug, Clone, PartialEq)]
pub enum ReversalContext {
    /// Z-score normalization: `x' = (x - mean) / std`.
    Standardize { column: String, mean: f64, std: f64 },
    /// Min-max normalization: `x' = (x - min) / (max - min)`.
    MinMax { column: String, min: f64, max: f64 },
    /// Robust normalization: `x' = (x - median) / iqr`.
    Robust {
        column: String,
        median: f64,
        iqr: f64,
    },
    /// Label encoding; the code of a value is its index in `mapping`.
    LabelEncode {
        column: String,
        mapping: Vec<String>,
    },
    /// One-hot encoding; `categories` holds the original values in the order
    /// their indicator columns were created.
    OneHot {
        column: String,
        categories: Vec<String>,
    },
    /// Constant fill; `filled_rows` are the row indexes that were missing.
    FillConstant {
        column: String,
        filled_rows: Vec<usize>,
    },
    /// Type cast; `original` is the dtype to cast back to.
    Cast { column: String, original: DataType },
    /// The operation destroyed information and cannot be undone.
    Irreversible,
}

impl ReversalContext {
    pub fn is_reversible(&self) -> bool {
        !matches!(self, Self::Irreversible)
    }
}
