//! cifdiff: compare (or just list) categories and tags of mmCIF files.
//! First block only.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use cif2mtz_cif::{Document, read_document};
use cif2mtz_cli::diff::{DiffOptions, diff_blocks};
use cif2mtz_cli::logging::{LogConfig, init_logging};
use clap::Parser;
use clap_verbosity_flag::{Verbosity, WarnLevel};

#[derive(Parser)]
#[command(
    name = "cifdiff",
    version,
    about = "Compares (or just prints) categories and tags in CIF files. First block only.",
    override_usage = "cifdiff [OPTIONS] FILE1.cif FILE2.cif\n       cifdiff [OPTIONS] -n FILE.cif"
)]
struct Args {
    /// Print only categories.
    #[arg(short = 'q')]
    only_categories: bool,

    /// No comparison, just list categories and tags.
    #[arg(short = 'n')]
    no_comparison: bool,

    #[arg(value_name = "FILE1")]
    file1: PathBuf,

    #[arg(value_name = "FILE2", required_unless_present = "no_comparison")]
    file2: Option<PathBuf>,

    #[command(flatten)]
    verbosity: Verbosity<WarnLevel>,
}

fn main() {
    let args = Args::parse();
    let config = LogConfig::default()
        .with_level(args.verbosity.tracing_level_filter())
        .with_ansi(false);
    if let Err(error) = init_logging(&config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    if let Err(error) = run(&args) {
        eprintln!("ERROR: {error:#}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let options = DiffOptions {
        only_categories: args.only_categories,
    };
    let second = if args.no_comparison {
        None
    } else {
        args.file2.as_deref()
    };
    let prefix = if second.is_some() { "--- " } else { "" };
    println!("{prefix}Reading {}", args.file1.display());
    let doc1 = read(&args.file1)?;
    let b1 = doc1
        .blocks
        .first()
        .with_context(|| format!("no blocks in {}", args.file1.display()))?;
    let listing = match second {
        Some(path2) => {
            println!("+++ Reading {}", path2.display());
            let doc2 = read(path2)?;
            let b2 = doc2
                .blocks
                .first()
                .with_context(|| format!("no blocks in {}", path2.display()))?;
            diff_blocks(b1, b2, options)
        }
        None => diff_blocks(b1, b1, options),
    };
    print!("{listing}");
    Ok(())
}

fn read(path: &Path) -> Result<Document> {
    Ok(read_document(path)?)
}
