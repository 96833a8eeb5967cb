//! Command implementations.

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use polars::prelude::{CsvReadOptions, CsvWriter, DataFrame, SerReader, SerWriter};
use tracing::info;

use wrangler_model::PipelineState;
use wrangler_pipeline::{
    CancelToken, FailureRecovery, FailureStrategy, JsonStateStore, PipelineOptions,
    PipelineOutcome, PipelineRunner,
};
use wrangler_profile::DataProfiler;
use wrangler_rank::{CompositeScorePolicy, ImprovementPolicy, RankingPolicy};
use wrangler_validate::{Validator, ValidatorOptions};

use crate::cli::{PolicyArg, ProfileArgs, ResumeArgs, RunArgs, StrategyArg};

pub fn read_csv(path: &Path) -> Result<DataFrame> {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(100))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .with_context(|| format!("failed to open {}", path.display()))?
        .finish()
        .with_context(|| format!("failed to parse {}", path.display()))
}

fn write_csv(path: &Path, data: &mut DataFrame) -> Result<()> {
    let mut file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    CsvWriter::new(&mut file)
        .finish(data)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

pub fn run_pipeline(args: &RunArgs) -> Result<PipelineOutcome> {
    let data = read_csv(&args.input)?;
    info!(
        rows = data.height(),
        columns = data.width(),
        "loaded dataset from {}",
        args.input.display()
    );

    let policy: Box<dyn RankingPolicy> = match args.policy {
        PolicyArg::Composite => Box::new(CompositeScorePolicy::new()),
        PolicyArg::Improvement => Box::new(ImprovementPolicy::new(args.metric.clone())),
    };
    let strategy = match args.strategy {
        StrategyArg::Skip => FailureStrategy::Skip,
        StrategyArg::Retry => FailureStrategy::Retry,
        StrategyArg::Abort => FailureStrategy::Abort,
        StrategyArg::Fallback => FailureStrategy::Fallback,
    };
    let mut options = PipelineOptions {
        enable_ranking: !args.no_ranking,
        ..PipelineOptions::default()
    };
    if args.workers > 0 {
        options.workers = args.workers;
    }

    let mut runner = PipelineRunner::new(
        Box::new(DataProfiler::new()),
        Box::new(JsonStateStore::new(&args.state_dir)),
    )
    .with_options(options)
    .with_policy(policy)
    .with_validator(Validator::with_options(ValidatorOptions {
        row_loss_tolerance: args.row_loss_tolerance,
        ..ValidatorOptions::default()
    }))
    .with_recovery(FailureRecovery::new(strategy));

    let outcome = runner.run(&data, &args.name, &CancelToken::new());

    if let (Some(output), Some(data)) = (&args.output, &outcome.data) {
        let mut data = data.clone();
        write_csv(output, &mut data)?;
        info!("wrote final dataset to {}", output.display());
    }

    Ok(outcome)
}

pub fn run_profile(args: &ProfileArgs) -> Result<wrangler_model::DataProfile> {
    let data = read_csv(&args.input)?;
    Ok(DataProfiler::new().profile(&data))
}

pub fn run_resume(args: &ResumeArgs) -> Result<Option<PipelineState>> {
    let mut runner = PipelineRunner::new(
        Box::new(DataProfiler::new()),
        Box::new(JsonStateStore::new(&args.state_dir)),
    );
    runner
        .recover(&args.name)
        .with_context(|| format!("failed to load checkpoint '{}'", args.name))
}
