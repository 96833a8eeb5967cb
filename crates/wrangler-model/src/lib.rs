//! Shared data model for the wrangler pipeline.
//!
//! This crate defines the types passed between pipeline stages: transformation
//! descriptors, data profiles, validation results, quality metrics, candidates,
//! and the persistent pipeline state. It also provides `AnyValue` helpers for
//! working with Polars cells (see [`frame`]).

pub mod frame;
pub mod pipeline;
pub mod profile;
pub mod quality;
pub mod ranking;
pub mod transformation;
pub mod validation;

pub use pipeline::{PipelineState, PipelineStep};
pub use profile::{ColumnProfile, DataProfile, InferredType};
pub use quality::{MetricWeights, QualityDelta, QualityError, QualityMetrics, WEIGHT_TOLERANCE};
pub use ranking::{RankedTransformation, TransformationCandidate};
pub use transformation::{ParamValue, Transformation, TransformationResult, TransformationType};
pub use validation::{IssueCode, Severity, ValidationIssue, ValidationResult};
