//! Static reversibility classification.
//!
//! Normalization, categorical encoding, and type casts can be undone given
//! their recorded parameters. Outlier removal and deduplication destroy rows.
//! Missing-value fills sit in between: a constant fill keeps enough
//! information to restore the original nulls, statistical fills do not.

use wrangler_model::{Transformation, TransformationType};

/// Decides whether a transformation can be undone, with a textual reason.
pub struct ReversibilityClassifier;

impl ReversibilityClassifier {
    pub fn is_reversible(transformation: &Transformation) -> bool {
        match transformation.transform_type {
            TransformationType::Normalize
            | TransformationType::EncodeCategorical
            | TransformationType::CastType => true,
            TransformationType::RemoveOutliers | TransformationType::DropDuplicates => false,
            TransformationType::FillMissing => {
                transformation.param_str("strategy") == Some("constant")
            }
        }
    }

    /// Human-readable explanation of the classification, for diagnostics.
    pub fn reason(transformation: &Transformation) -> String {
        match transformation.transform_type {
            TransformationType::Normalize
            | TransformationType::EncodeCategorical
            | TransformationType::CastType => format!(
                "{} transformations are reversible",
                transformation.transform_type
            ),
            TransformationType::RemoveOutliers => {
                "outlier removal permanently discards values".to_string()
            }
            TransformationType::DropDuplicates => {
                "duplicate removal permanently removes rows".to_string()
            }
            TransformationType::FillMissing => {
                let strategy = transformation.param_str("strategy").unwrap_or("");
                if strategy == "constant" {
                    "constant fill is reversible (the fill value is known)".to_string()
                } else {
                    format!("fill with {strategy} is not reversible (original values lost)")
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use wrangler_model::ParamValue;

    fn transformation(
        transform_type: TransformationType,
        params: &[(&str, ParamValue)],
    ) -> Transformation {
        let params: BTreeMap<String, ParamValue> = params
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect();
        Transformation::new("t", transform_type, vec!["col".to_string()], params, false, "")
    }

    #[test]
    fn static_classification() {
        assert!(ReversibilityClassifier::is_reversible(&transformation(
            TransformationType::Normalize,
            &[]
        )));
        assert!(ReversibilityClassifier::is_reversible(&transformation(
            TransformationType::EncodeCategorical,
            &[]
        )));
        assert!(ReversibilityClassifier::is_reversible(&transformation(
            TransformationType::CastType,
            &[]
        )));
        assert!(!ReversibilityClassifier::is_reversible(&transformation(
            TransformationType::RemoveOutliers,
            &[]
        )));
        assert!(!ReversibilityClassifier::is_reversible(&transformation(
            TransformationType::DropDuplicates,
            &[]
        )));
    }

    #[test]
    fn fill_missing_is_conditional() {
        assert!(ReversibilityClassifier::is_reversible(&transformation(
            TransformationType::FillMissing,
            &[("strategy", ParamValue::from("constant"))]
        )));
        assert!(!ReversibilityClassifier::is_reversible(&transformation(
            TransformationType::FillMissing,
            &[("strategy", ParamValue::from("mean"))]
        )));
        assert!(!ReversibilityClassifier::is_reversible(&transformation(
            TransformationType::FillMissing,
            &[]
        )));
    }

    #[test]
    fn reasons_mention_the_strategy() {
        let t = transformation(
            TransformationType::FillMissing,
            &[("strategy", ParamValue::from("median"))],
        );
        assert!(ReversibilityClassifier::reason(&t).contains("median"));
    }
}
