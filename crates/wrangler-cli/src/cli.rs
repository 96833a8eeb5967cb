//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(
    name = "wrangler",
    about = "Evaluate, score, and rank data-cleaning transformations",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub verbosity: clap_verbosity_flag::Verbosity<clap_verbosity_flag::InfoLevel>,

    #[command(flatten)]
    pub color: colorchoice_clap::Color,

    /// Log output format.
    #[arg(long, value_enum, default_value_t = LogFormatArg::Pretty, global = true)]
    pub log_format: LogFormatArg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PolicyArg {
    /// Weighted improvement blended with final quality.
    Composite,
    /// Delta of a single primary metric.
    Improvement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    Skip,
    Retry,
    Abort,
    Fallback,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the full pipeline against a CSV dataset.
    Run(RunArgs),
    /// Profile a CSV dataset and print the column summary.
    Profile(ProfileArgs),
    /// Inspect a saved pipeline checkpoint.
    Resume(ResumeArgs),
}

#[derive(Debug, clap::Args)]
pub struct RunArgs {
    /// Input CSV file.
    #[arg(long, short = 'i')]
    pub input: PathBuf,

    /// Directory for pipeline checkpoints.
    #[arg(long, default_value = ".wrangler-state")]
    pub state_dir: PathBuf,

    /// Checkpoint name for this run.
    #[arg(long, default_value = "default")]
    pub name: String,

    /// Write the final dataset to this CSV file.
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Disable candidate ranking.
    #[arg(long)]
    pub no_ranking: bool,

    /// Ranking policy.
    #[arg(long, value_enum, default_value_t = PolicyArg::Composite)]
    pub policy: PolicyArg,

    /// Primary metric for the improvement policy.
    #[arg(long, default_value = "overall")]
    pub metric: String,

    /// Worker threads for candidate evaluation (0 = auto).
    #[arg(long, default_value_t = 0)]
    pub workers: usize,

    /// Failure-recovery strategy for step-level errors.
    #[arg(long, value_enum, default_value_t = StrategyArg::Skip)]
    pub strategy: StrategyArg,

    /// Row-loss tolerance for validation (fraction, default 0.1).
    #[arg(long, default_value_t = 0.1)]
    pub row_loss_tolerance: f64,

    /// Show at most this many ranked transformations.
    #[arg(long, default_value_t = 10)]
    pub top: usize,
}

#[derive(Debug, clap::Args)]
pub struct ProfileArgs {
    /// Input CSV file.
    #[arg(long, short = 'i')]
    pub input: PathBuf,
}

#[derive(Debug, clap::Args)]
pub struct ResumeArgs {
    /// Directory holding pipeline checkpoints.
    #[arg(long, default_value = ".wrangler-state")]
    pub state_dir: PathBuf,

    /// Checkpoint name to load.
    #[arg(long, default_value = "default")]
    pub name: String,
}
