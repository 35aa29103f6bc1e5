//! Block conversion pipeline.
//!
//! Each block goes through the same steps, in order:
//!
//! 1. **Source selection** - `_refln`, else `_diffrn_refln`
//! 2. **Resolution** - spec entries matched to loop tags
//! 3. **Container** - columns, datasets and batches fixed
//! 4. **Rows** - indices reduced when unmerged, values converted
//! 5. **Write** - handed to an [`MtzSink`], all or nothing
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use cif2mtz_core::{ConvertOptions, Converter, FileSink, SpecTable, as_refln_blocks};
//!
//! let doc = cif2mtz_cif::read_document(Path::new("r1abcsf.ent.gz"))?;
//! let blocks = as_refln_blocks(&doc);
//! let converter = Converter::new(SpecTable::default_table(), ConvertOptions::new());
//! converter.convert_to(&blocks[0], Path::new("1abc.mtz"), &FileSink)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::path::Path;

use cif2mtz_mtz::{Mtz, write_mtz};
use tracing::{info, info_span};

use crate::canonicalize::{AsuReducer, IndexReducer};
use crate::container::build_container;
use crate::error::{ConversionError, Result};
use crate::materialize::{CellWarning, IndexMode, materialize};
use crate::options::ConvertOptions;
use crate::resolve::resolve;
use crate::source::ReflnBlock;
use crate::spec::SpecTable;

/// Destination for finished containers.
pub trait MtzSink: Send + Sync {
    fn write(&self, mtz: &Mtz, path: &Path) -> cif2mtz_mtz::Result<()>;
}

/// Writes MTZ files to disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSink;

impl MtzSink for FileSink {
    fn write(&self, mtz: &Mtz, path: &Path) -> cif2mtz_mtz::Result<()> {
        write_mtz(path, mtz)
    }
}

/// A converted block.
#[derive(Debug, Clone)]
pub struct Conversion {
    pub block: String,
    pub mtz: Mtz,
    pub warnings: Vec<CellWarning>,
    pub unmerged: bool,
}

/// Converts reflection blocks with one spec table and one set of options.
///
/// Shared read-only between threads when blocks are converted in parallel.
pub struct Converter<'s> {
    spec: &'s SpecTable,
    options: ConvertOptions,
    reducer: Option<Box<dyn IndexReducer>>,
}

impl<'s> Converter<'s> {
    pub fn new(spec: &'s SpecTable, options: ConvertOptions) -> Self {
        Self {
            spec,
            options,
            reducer: None,
        }
    }

    /// Use `reducer` for unmerged data instead of the block's space group.
    pub fn with_reducer(mut self, reducer: Box<dyn IndexReducer>) -> Self {
        self.reducer = Some(reducer);
        self
    }

    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    pub fn convert(&self, rb: &ReflnBlock<'_>) -> Result<Conversion> {
        let name = rb.name();
        let _span = info_span!("block", block = %name).entered();

        let source = rb.reflection_source(self.options.force_unmerged)?;
        info!("searching tags with known MTZ equivalents");
        let resolution = resolve(self.spec, &source, name)?;
        let table = source.reflections.table();
        let mut mtz = build_container(rb, &resolution, &self.options, table.length());

        let warnings = if resolution.unmerged {
            let fallback;
            let reducer: &dyn IndexReducer = match &self.reducer {
                Some(reducer) => reducer.as_ref(),
                None => {
                    fallback = AsuReducer::for_spacegroup(rb.spacegroup, name)?;
                    &fallback
                }
            };
            materialize(
                &mut mtz,
                table,
                &resolution.columns,
                IndexMode::Unmerged(reducer),
                name,
            )?
        } else {
            materialize(&mut mtz, table, &resolution.columns, IndexMode::Merged, name)?
        };

        Ok(Conversion {
            block: name.to_string(),
            mtz,
            warnings,
            unmerged: resolution.unmerged,
        })
    }

    /// Convert and write. Nothing is written when conversion fails.
    pub fn convert_to(
        &self,
        rb: &ReflnBlock<'_>,
        path: &Path,
        sink: &dyn MtzSink,
    ) -> Result<Conversion> {
        let conversion = self.convert(rb)?;
        info!(block = %conversion.block, "writing {}", path.display());
        sink.write(&conversion.mtz, path)
            .map_err(|e| ConversionError::write(path, e))?;
        Ok(conversion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::Mutex;

    use cif2mtz_cif::parse;
    use cif2mtz_mtz::MtzError;

    #[derive(Default)]
    struct RecordingSink {
        written: Mutex<Vec<PathBuf>>,
    }

    impl MtzSink for RecordingSink {
        fn write(&self, _mtz: &Mtz, path: &Path) -> cif2mtz_mtz::Result<()> {
            self.written.lock().unwrap().push(path.to_path_buf());
            Ok(())
        }
    }

    struct FailingSink;

    impl MtzSink for FailingSink {
        fn write(&self, _mtz: &Mtz, _path: &Path) -> cif2mtz_mtz::Result<()> {
            Err(MtzError::invalid_format("disk full"))
        }
    }

    const MERGED: &str = "\
data_m
loop_
_refln.index_h
_refln.index_k
_refln.index_l
_refln.F_meas_au
_refln.F_meas_sigma_au
1 2 3 100.0 5.0
";

    #[test]
    fn test_convert_to_sink() {
        let doc = parse(MERGED).unwrap();
        let rb = ReflnBlock::from_block(&doc.blocks[0]);
        let sink = RecordingSink::default();
        let converter = Converter::new(SpecTable::default_table(), ConvertOptions::new());
        let conversion = converter.convert_to(&rb, Path::new("m.mtz"), &sink).unwrap();
        assert_eq!(conversion.block, "m");
        assert!(!conversion.unmerged);
        assert_eq!(*sink.written.lock().unwrap(), vec![PathBuf::from("m.mtz")]);
    }

    #[test]
    fn test_write_failure_names_path() {
        let doc = parse(MERGED).unwrap();
        let rb = ReflnBlock::from_block(&doc.blocks[0]);
        let converter = Converter::new(SpecTable::default_table(), ConvertOptions::new());
        let err = converter
            .convert_to(&rb, Path::new("out/m.mtz"), &FailingSink)
            .unwrap_err();
        assert!(err.is_write_error());
        assert!(err.to_string().contains("out/m.mtz"));
    }

    #[test]
    fn test_failed_conversion_is_not_written() {
        let doc = parse("data_x\nloop_\n_refln.index_h\n_refln.index_k\n1 2\n").unwrap();
        let rb = ReflnBlock::from_block(&doc.blocks[0]);
        let sink = RecordingSink::default();
        let converter = Converter::new(SpecTable::default_table(), ConvertOptions::new());
        let err = converter.convert_to(&rb, Path::new("x.mtz"), &sink).unwrap_err();
        assert!(matches!(err, ConversionError::MissingIndexTag { .. }));
        assert!(sink.written.lock().unwrap().is_empty());
    }

    #[test]
    fn test_converter_is_sync() {
        fn assert_sync<T: Sync>() {}
        assert_sync::<Converter<'static>>();
    }
}
