//! Wrangler CLI entry point.

use clap::{ColorChoice, Parser};
use std::io::IsTerminal;

use wrangler_cli::cli::{Cli, Command, LogFormatArg};
use wrangler_cli::commands::{run_pipeline, run_profile, run_resume};
use wrangler_cli::logging::{LogConfig, LogFormat, init_logging};
use wrangler_cli::summary::{print_outcome, print_profile, print_state};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    init_logging(&log_config_from_cli(&cli));

    let exit_code = match &cli.command {
        Command::Run(args) => match run_pipeline(args) {
            Ok(outcome) => {
                print_outcome(&outcome, args.top);
                if outcome.success { 0 } else { 1 }
            }
            Err(error) => {
                eprintln!("error: {error:#}");
                1
            }
        },
        Command::Profile(args) => match run_profile(args) {
            Ok(profile) => {
                print_profile(&profile);
                0
            }
            Err(error) => {
                eprintln!("error: {error:#}");
                1
            }
        },
        Command::Resume(args) => match run_resume(args) {
            Ok(Some(state)) => {
                print_state(&state);
                0
            }
            Ok(None) => {
                eprintln!("no checkpoint named '{}' found", args.name);
                1
            }
            Err(error) => {
                eprintln!("error: {error:#}");
                1
            }
        },
    };
    std::process::exit(exit_code);
}

fn log_config_from_cli(cli: &Cli) -> LogConfig {
    LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        use_env_filter: !cli.verbosity.is_present(),
        format: match cli.log_format {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Compact => LogFormat::Compact,
            LogFormatArg::Json => LogFormat::Json,
        },
        with_ansi: match cli.color.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => std::io::stderr().is_terminal(),
        },
    }
}
