//! Command-line arguments of `cif2mtz`.

use std::num::NonZeroUsize;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "cif2mtz",
    version,
    about = "Convert SF-mmCIF reflection data to MTZ",
    long_about = "Convert SF-mmCIF reflection data to MTZ.\n\n\
                  First variant: converts the first block of CIF_FILE, or the block\n\
                  specified with --block=NAME, to MTZ file with given name.\n\n\
                  Second variant: converts each block of CIF_FILE to one MTZ file\n\
                  (block-name.mtz) in the specified DIRECTORY.\n\n\
                  If CIF_FILE is -, the input is read from stdin.",
    override_usage = "cif2mtz [OPTIONS] CIF_FILE MTZ_FILE\n       \
                      cif2mtz [OPTIONS] CIF_FILE --dir=DIRECTORY"
)]
pub struct Cli {
    /// mmCIF input, optionally gzipped; `-` for stdin.
    #[arg(value_name = "CIF_FILE", required_unless_present = "print_spec")]
    pub cif_file: Option<PathBuf>,

    /// MTZ output.
    #[arg(
        value_name = "MTZ_FILE",
        required_unless_present_any = ["print_spec", "dir"],
        conflicts_with = "dir"
    )]
    pub mtz_file: Option<PathBuf>,

    /// mmCIF block to convert.
    #[arg(short = 'b', long = "block", value_name = "NAME", conflicts_with = "dir")]
    pub block: Option<String>,

    /// Output directory; one file per block.
    #[arg(short = 'd', long = "dir", value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Conversion spec.
    #[arg(long = "spec", value_name = "FILE")]
    pub spec: Option<PathBuf>,

    /// Print default spec and exit.
    #[arg(long = "print-spec")]
    pub print_spec: bool,

    /// MTZ title.
    #[arg(long = "title", value_name = "TITLE")]
    pub title: Option<String>,

    /// Add a history line.
    #[arg(short = 'H', long = "history", value_name = "LINE")]
    pub history: Vec<String>,

    /// Write unmerged MTZ file(s).
    #[arg(short = 'u', long = "unmerged")]
    pub unmerged: bool,

    /// Print a table of converted blocks.
    #[arg(long = "summary")]
    pub summary: bool,

    /// Write a JSON report of the run.
    #[arg(long = "report", value_name = "PATH")]
    pub report: Option<PathBuf>,

    /// Blocks converted in parallel with --dir (default: number of CPUs).
    #[arg(short = 'j', long = "jobs", value_name = "N")]
    pub jobs: Option<NonZeroUsize>,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format.
    #[arg(long = "log-format", value_enum, default_value = "pretty")]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_command_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_single_file_arguments() {
        let cli = Cli::try_parse_from([
            "cif2mtz", "-b", "r1abcsf", "--title", "T", "-H", "one", "-H", "two", "-u", "in.cif",
            "out.mtz",
        ])
        .unwrap();
        assert_eq!(cli.block.as_deref(), Some("r1abcsf"));
        assert_eq!(cli.history, vec!["one", "two"]);
        assert!(cli.unmerged);
        assert_eq!(cli.mtz_file, Some(PathBuf::from("out.mtz")));
    }

    #[test]
    fn test_dir_mode() {
        let cli = Cli::try_parse_from(["cif2mtz", "in.cif", "--dir=out", "-j", "2"]).unwrap();
        assert_eq!(cli.dir, Some(PathBuf::from("out")));
        assert_eq!(cli.jobs.map(NonZeroUsize::get), Some(2));
        assert!(Cli::try_parse_from(["cif2mtz", "in.cif", "out.mtz", "--dir=out"]).is_err());
    }

    #[test]
    fn test_required_arguments() {
        assert!(Cli::try_parse_from(["cif2mtz", "in.cif"]).is_err());
        assert!(Cli::try_parse_from(["cif2mtz", "--print-spec"]).is_ok());
        assert!(Cli::try_parse_from(["cif2mtz", "in.cif", "out.mtz", "-j", "0"]).is_err());
    }
}
