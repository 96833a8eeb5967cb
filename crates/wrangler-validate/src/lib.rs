//! Validation of transformed data against the original dataset.
//!
//! Three independent check families run unconditionally and their issues are
//! concatenated:
//!
//! - **Integrity** — row-count loss, removed columns, null increases, dtype
//!   changes
//! - **Leakage** — untransformed row overlap, identical categorical value
//!   sets, near-perfect numeric correlation
//! - **Schema** — missing columns and numeric-to-string conversions
//!
//! A result passes iff no error-severity issue exists; schema compatibility
//! derives from schema-check errors alone.

mod integrity;
mod leakage;
mod schema;

use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use tracing::debug;

use wrangler_model::{DataProfile, Severity, ValidationResult};

/// Thresholds for the validator. The leakage numbers are empirical defaults
/// carried over from the reference behavior, configurable rather than fixed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ValidatorOptions {
    /// Maximum tolerated fraction of rows lost before an error is raised.
    pub row_loss_tolerance: f64,
    /// Fraction of identical rows (with equal row counts) that counts as
    /// exact row leakage.
    pub row_overlap_threshold: f64,
    /// Pearson correlation above which a numeric column is flagged as
    /// possibly untransformed.
    pub correlation_threshold: f64,
}

impl Default for ValidatorOptions {
    fn default() -> Self {
        Self {
            row_loss_tolerance: 0.1,
            row_overlap_threshold: 0.5,
            correlation_threshold: 0.99,
        }
    }
}

/// Runs all validation checks against an original/transformed frame pair.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    options: ValidatorOptions,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ValidatorOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ValidatorOptions {
        &self.options
    }

    /// Validate transformed data. All check families run even when an
    /// earlier one has already failed.
    pub fn validate(
        &self,
        original: &DataFrame,
        transformed: &DataFrame,
        profile: &DataProfile,
    ) -> ValidationResult {
        let mut issues = Vec::new();

        issues.extend(integrity::check(
            original,
            transformed,
            profile,
            self.options.row_loss_tolerance,
        ));
        issues.extend(leakage::check(original, transformed, profile, &self.options));

        let schema_issues = schema::check(original, transformed, profile);
        let schema_compatible = !schema_issues
            .iter()
            .any(|issue| issue.severity == Severity::Error);
        issues.extend(schema_issues);

        let passed = !issues.iter().any(|issue| issue.severity == Severity::Error);
        debug!(
            passed,
            issue_count = issues.len(),
            "validation finished"
        );

        ValidationResult {
            passed,
            issues,
            original_row_count: original.height(),
            transformed_row_count: transformed.height(),
            schema_compatible,
        }
    }

    /// Quick leakage probe: true when any leakage error is present.
    pub fn has_leakage(&self, original: &DataFrame, transformed: &DataFrame) -> bool {
        leakage::check(original, transformed, &DataProfile::default(), &self.options)
            .iter()
            .any(|issue| issue.severity == Severity::Error)
    }
}
