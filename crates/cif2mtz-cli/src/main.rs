//! cif2mtz: convert SF-mmCIF reflection data to MTZ.

use std::io::{self, IsTerminal};

use cif2mtz_cli::logging::{LogConfig, LogFormat, init_logging};
use clap::{ColorChoice, Parser};
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;
mod report;
mod summary;
mod types;

use crate::cli::{Cli, LogFormatArg, LogLevelArg};
use crate::commands::{load_spec, run_convert, run_print_spec};
use crate::report::write_report;
use crate::summary::print_summary;
use crate::types::Failure;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    std::process::exit(run(&cli));
}

fn run(cli: &Cli) -> i32 {
    if cli.print_spec {
        run_print_spec();
        return 0;
    }
    let spec = match load_spec(cli.spec.as_deref()) {
        Ok(spec) => spec,
        Err(error) => {
            eprintln!("Problem with spec: {error}");
            return Failure::Spec.exit_code();
        }
    };
    let report = match run_convert(cli, &spec) {
        Ok(report) => report,
        Err(error) => {
            eprintln!("error: {error:#}");
            return Failure::Conversion.exit_code();
        }
    };
    for block in &report.blocks {
        if let Some(error) = &block.error {
            eprintln!("error: {error}");
        }
    }
    if cli.summary {
        print_summary(&report);
    }
    let exit_code = report.exit_code();
    if let Some(path) = &cli.report
        && let Err(error) = write_report(path, &report)
    {
        eprintln!("error: {error:#}");
        return exit_code.max(Failure::Conversion.exit_code());
    }
    exit_code
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
