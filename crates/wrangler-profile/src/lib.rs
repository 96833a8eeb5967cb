//! Dataset profiling.
//!
//! Produces a [`DataProfile`] from a raw `DataFrame`: per-column inferred
//! semantic type, missing-value counts (blank strings count as missing),
//! numeric summaries, unique counts, and a duplicate-row count. The profiler
//! is fully deterministic; no sampling is involved.

mod infer;
mod profiler;

pub use infer::{infer_column_type, parse_datetime_value};
pub use profiler::DataProfiler;

use polars::prelude::DataFrame;
use wrangler_model::DataProfile;

/// Contract consumed by the orchestrator.
pub trait Profiler: Send + Sync {
    fn profile(&self, data: &DataFrame) -> anyhow::Result<DataProfile>;
}

impl Profiler for DataProfiler {
    fn profile(&self, data: &DataFrame) -> anyhow::Result<DataProfile> {
        Ok(self.profile(data))
    }
}
