//! Polars `AnyValue` and column helpers shared across pipeline crates.

use polars::prelude::{AnyValue, Column, DataFrame, DataType};

/// Converts a Polars `AnyValue` to a string representation.
///
/// Null becomes the empty string; floats are trimmed of trailing zeros so a
/// cell holding `3.0` stringifies the same whether it came from a float or an
/// integer column.
pub fn any_to_string(value: &AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::Int8(v) => v.to_string(),
        AnyValue::Int16(v) => v.to_string(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::UInt8(v) => v.to_string(),
        AnyValue::UInt16(v) => v.to_string(),
        AnyValue::UInt32(v) => v.to_string(),
        AnyValue::UInt64(v) => v.to_string(),
        AnyValue::Float32(v) => format_numeric(f64::from(*v)),
        AnyValue::Float64(v) => format_numeric(*v),
        AnyValue::String(s) => (*s).to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Boolean(b) => if *b { "true" } else { "false" }.to_string(),
        other => other.to_string(),
    }
}

/// Formats a float without unnecessary trailing zeros.
pub fn format_numeric(v: f64) -> String {
    let s = format!("{v}");
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

/// Converts an `AnyValue` to `f64`, parsing numeric strings as well.
///
/// Non-finite results are treated as absent.
pub fn any_to_f64(value: &AnyValue<'_>) -> Option<f64> {
    let parsed = match value {
        AnyValue::Null => None,
        AnyValue::Int8(v) => Some(f64::from(*v)),
        AnyValue::Int16(v) => Some(f64::from(*v)),
        AnyValue::Int32(v) => Some(f64::from(*v)),
        AnyValue::Int64(v) => Some(*v as f64),
        AnyValue::UInt8(v) => Some(f64::from(*v)),
        AnyValue::UInt16(v) => Some(f64::from(*v)),
        AnyValue::UInt32(v) => Some(f64::from(*v)),
        AnyValue::UInt64(v) => Some(*v as f64),
        AnyValue::Float32(v) => Some(f64::from(*v)),
        AnyValue::Float64(v) => Some(*v),
        AnyValue::Boolean(b) => Some(if *b { 1.0 } else { 0.0 }),
        AnyValue::String(s) => s.trim().parse::<f64>().ok(),
        AnyValue::StringOwned(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

/// True when a cell counts as missing: null, or a blank string.
pub fn is_missing(value: &AnyValue<'_>) -> bool {
    match value {
        AnyValue::Null => true,
        AnyValue::String(s) => s.trim().is_empty(),
        AnyValue::StringOwned(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Cell accessor that never fails; out-of-range or errored reads yield Null.
pub fn cell<'a>(column: &'a Column, idx: usize) -> AnyValue<'a> {
    column.get(idx).unwrap_or(AnyValue::Null)
}

/// Owned column names of a frame.
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names_owned()
        .into_iter()
        .map(|name| name.to_string())
        .collect()
}

/// Numeric view of a column: one `Option<f64>` per row, numeric strings
/// coerced, non-finite values dropped to `None`.
pub fn column_f64s(df: &DataFrame, column: &str) -> Option<Vec<Option<f64>>> {
    let col = df.column(column).ok()?;
    Some((0..df.height()).map(|idx| any_to_f64(&cell(col, idx))).collect())
}

/// String view of a column: one `Option<String>` per row, missing cells
/// (nulls and blank strings) dropped to `None`.
pub fn column_strings(df: &DataFrame, column: &str) -> Option<Vec<Option<String>>> {
    let col = df.column(column).ok()?;
    Some(
        (0..df.height())
            .map(|idx| {
                let value = cell(col, idx);
                if is_missing(&value) {
                    None
                } else {
                    Some(any_to_string(&value))
                }
            })
            .collect(),
    )
}

/// Count of missing cells (nulls and blank strings) in a column.
pub fn count_missing(df: &DataFrame, column: &str) -> Option<usize> {
    let col = df.column(column).ok()?;
    Some(
        (0..df.height())
            .filter(|idx| is_missing(&cell(col, *idx)))
            .count(),
    )
}

/// Composite key for one row over the given columns, used for duplicate and
/// row-overlap detection. Columns are joined with `|` in the given order.
pub fn row_key(df: &DataFrame, columns: &[String], idx: usize) -> String {
    let mut composite = String::new();
    for (pos, name) in columns.iter().enumerate() {
        if pos > 0 {
            composite.push('|');
        }
        if let Ok(col) = df.column(name) {
            composite.push_str(any_to_string(&cell(col, idx)).trim());
        }
    }
    composite
}

/// True when the dtype is one of the physical numeric dtypes.
pub fn dtype_is_numeric(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::df;

    #[test]
    fn missing_covers_nulls_and_blanks() {
        assert!(is_missing(&AnyValue::Null));
        assert!(is_missing(&AnyValue::String("  ")));
        assert!(!is_missing(&AnyValue::String("x")));
        assert!(!is_missing(&AnyValue::Float64(0.0)));
    }

    #[test]
    fn f64_coercion_parses_strings_and_rejects_nonsense() {
        assert_eq!(any_to_f64(&AnyValue::String("2.5")), Some(2.5));
        assert_eq!(any_to_f64(&AnyValue::Int64(3)), Some(3.0));
        assert_eq!(any_to_f64(&AnyValue::String("abc")), None);
        assert_eq!(any_to_f64(&AnyValue::Float64(f64::INFINITY)), None);
    }

    #[test]
    fn row_keys_distinguish_rows() {
        let frame = df! {
            "a" => ["x", "x"],
            "b" => [1i64, 2i64],
        }
        .unwrap();
        let columns = column_names(&frame);
        assert_ne!(row_key(&frame, &columns, 0), row_key(&frame, &columns, 1));
    }

    #[test]
    fn column_views_align_with_height() {
        let frame = df! {
            "v" => [Some("1.5"), None, Some("oops")],
        }
        .unwrap();
        let numeric = column_f64s(&frame, "v").unwrap();
        assert_eq!(numeric, vec![Some(1.5), None, None]);
        let strings = column_strings(&frame, "v").unwrap();
        assert_eq!(strings[2].as_deref(), Some("oops"));
        assert_eq!(count_missing(&frame, "v"), Some(1));
    }
}
