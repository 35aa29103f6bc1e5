use std::borrow::Cow;
use std::ffi::OsStr;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use anyhow::{Context, Result, anyhow};
use cif2mtz_cif::read_document;
use cif2mtz_core::{
    ConversionError, ConvertOptions, Converter, FileSink, ReflnBlock, SpecError, SpecTable,
    as_refln_blocks, select_block,
};
use tracing::{debug, info};

use crate::cli::Cli;
use crate::types::{BlockReport, RunReport};

pub fn run_print_spec() {
    print!("{}", SpecTable::render_default());
}

/// The spec given with `--spec`, or the built-in one.
pub fn load_spec(path: Option<&Path>) -> Result<Cow<'static, SpecTable>, SpecError> {
    match path {
        Some(path) => {
            info!("reading spec {}", path.display());
            SpecTable::read(path).map(Cow::Owned)
        }
        None => Ok(Cow::Borrowed(SpecTable::default_table())),
    }
}

pub fn convert_options(cli: &Cli) -> ConvertOptions {
    let options = ConvertOptions::new()
        .with_history(cli.history.iter().cloned())
        .with_force_unmerged(cli.unmerged);
    match &cli.title {
        Some(title) => options.with_title(title.as_str()),
        None => options,
    }
}

/// Convert one block to `MTZ_FILE`, or every block into `--dir`.
///
/// Errors are problems with the input as a whole; per-block failures are
/// recorded in the report.
pub fn run_convert(cli: &Cli, spec: &SpecTable) -> Result<RunReport> {
    let input = cli
        .cif_file
        .as_deref()
        .ok_or_else(|| anyhow!("missing CIF_FILE"))?;
    info!("reading {}", input.display());
    let doc = read_document(input)?;
    let blocks = as_refln_blocks(&doc);
    let converter = Converter::new(spec, convert_options(cli));

    let reports = match (&cli.dir, &cli.mtz_file) {
        (Some(dir), _) => {
            if blocks.is_empty() {
                return Err(ConversionError::NoBlocks)
                    .with_context(|| format!("converting {}", input.display()));
            }
            let jobs = cli
                .jobs
                .or_else(|| thread::available_parallelism().ok())
                .map_or(1, NonZeroUsize::get);
            convert_all(&converter, &blocks, dir, jobs)
        }
        (None, Some(output)) => {
            let rb = select_block(&blocks, cli.block.as_deref())
                .with_context(|| format!("converting {}", input.display()))?;
            vec![convert_block(&converter, rb, output.clone())]
        }
        (None, None) => return Err(anyhow!("missing MTZ_FILE or --dir")),
    };
    info!("done");
    Ok(RunReport {
        input: input.to_path_buf(),
        spec: cli.spec.clone(),
        blocks: reports,
    })
}

fn convert_block(converter: &Converter<'_>, rb: &ReflnBlock<'_>, output: PathBuf) -> BlockReport {
    match converter.convert_to(rb, &output, &FileSink) {
        Ok(conversion) => BlockReport::converted(output, conversion),
        Err(error) => BlockReport::failed(rb.name(), output, &error),
    }
}

/// `<dir>/<name>.mtz`, refusing names that would leave `dir`.
fn block_output(dir: &Path, name: &str) -> Result<PathBuf, ConversionError> {
    let file_name = format!("{name}.mtz");
    if name.contains(std::path::is_separator)
        || Path::new(&file_name).file_name() != Some(OsStr::new(&file_name))
    {
        return Err(ConversionError::UnusableBlockName {
            name: name.to_string(),
        });
    }
    Ok(dir.join(file_name))
}

/// Convert every block to `<dir>/<block>.mtz` on up to `jobs` threads.
/// Reports come back in block order.
fn convert_all(
    converter: &Converter<'_>,
    blocks: &[ReflnBlock<'_>],
    dir: &Path,
    jobs: usize,
) -> Vec<BlockReport> {
    let next = &AtomicUsize::new(0);
    let workers = jobs.clamp(1, blocks.len().max(1));
    debug!(blocks = blocks.len(), workers, "converting blocks");

    let mut done: Vec<(usize, BlockReport)> = thread::scope(|scope| {
        let handles: Vec<_> = (0..workers)
            .map(|_| {
                scope.spawn(move || {
                    let mut done = Vec::new();
                    loop {
                        let i = next.fetch_add(1, Ordering::Relaxed);
                        let Some(rb) = blocks.get(i) else {
                            break;
                        };
                        let report = match block_output(dir, rb.name()) {
                            Ok(output) => convert_block(converter, rb, output),
                            Err(error) => {
                                BlockReport::failed(rb.name(), dir.to_path_buf(), &error)
                            }
                        };
                        done.push((i, report));
                    }
                    done
                })
            })
            .collect();
        handles
            .into_iter()
            .flat_map(|handle| match handle.join() {
                Ok(done) => done,
                Err(panic) => std::panic::resume_unwind(panic),
            })
            .collect()
    });
    done.sort_by_key(|(i, _)| *i);
    done.into_iter().map(|(_, report)| report).collect()
}
