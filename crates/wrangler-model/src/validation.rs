//! Validation issue and result types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Issue severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// Fixed vocabulary of validation issue codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueCode {
    ExcessiveRowLoss,
    RowLoss,
    ColumnRemoved,
    NullsIncreased,
    TypeChanged,
    MissingColumn,
    TypeConversion,
    IncompatibleType,
    ExactRowLeakage,
    PotentialLeakage,
    HighCorrelation,
}

impl IssueCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ExcessiveRowLoss => "EXCESSIVE_ROW_LOSS",
            Self::RowLoss => "ROW_LOSS",
            Self::ColumnRemoved => "COLUMN_REMOVED",
            Self::NullsIncreased => "NULLS_INCREASED",
            Self::TypeChanged => "TYPE_CHANGED",
            Self::MissingColumn => "MISSING_COLUMN",
            Self::TypeConversion => "TYPE_CONVERSION",
            Self::IncompatibleType => "INCOMPATIBLE_TYPE",
            Self::ExactRowLeakage => "EXACT_ROW_LEAKAGE",
            Self::PotentialLeakage => "POTENTIAL_LEAKAGE",
            Self::HighCorrelation => "HIGH_CORRELATION",
        }
    }
}

impl fmt::Display for IssueCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single issue found while validating transformed data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub code: IssueCode,
    pub message: String,
    pub column: Option<String>,
}

impl ValidationIssue {
    pub fn error(code: IssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
            column: None,
        }
    }

    pub fn warning(code: IssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
            column: None,
        }
    }

    pub fn info(code: IssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            code,
            message: message.into(),
            column: None,
        }
    }

    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }
}

/// Outcome of validating transformed data against the original.
///
/// `passed` is false iff any error-severity issue exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub passed: bool,
    pub issues: Vec<ValidationIssue>,
    pub original_row_count: usize,
    pub transformed_row_count: usize,
    pub schema_compatible: bool,
}

impl ValidationResult {
    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(|i| i.severity == Severity::Error)
    }

    pub fn error_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Warning)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_codes_serialize_screaming_snake() {
        let json = serde_json::to_string(&IssueCode::ExcessiveRowLoss).unwrap();
        assert_eq!(json, "\"EXCESSIVE_ROW_LOSS\"");
        let back: IssueCode = serde_json::from_str("\"NULLS_INCREASED\"").unwrap();
        assert_eq!(back, IssueCode::NullsIncreased);
    }

    #[test]
    fn builders_attach_column() {
        let issue = ValidationIssue::warning(IssueCode::TypeChanged, "dtype changed")
            .with_column("age");
        assert_eq!(issue.column.as_deref(), Some("age"));
        assert_eq!(issue.severity, Severity::Warning);
    }
}
