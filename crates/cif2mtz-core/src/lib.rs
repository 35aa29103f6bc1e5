//! Spec-driven conversion of SF-mmCIF reflection blocks to MTZ.
//!
//! A [`SpecTable`] maps `_refln` / `_diffrn_refln` tags to MTZ columns.
//! [`Converter`] applies it to one [`ReflnBlock`] at a time:
//! merged data is copied as is, unmerged data gets its indices reduced to
//! the asymmetric unit plus `M/ISYM` and `BATCH` columns.

mod canonicalize;
mod container;
mod error;
mod materialize;
mod options;
mod pipeline;
mod resolve;
mod source;
mod spec;

pub use canonicalize::{AsuReducer, IndexReducer};
pub use container::{BASE_DATASET, BATCH_LABEL, DATA_DATASET, ISYM_LABEL, build_container};
pub use error::{ConversionError, Result, SpecError};
pub use materialize::{CellWarning, IndexMode, materialize, status_to_flag};
pub use options::ConvertOptions;
pub use pipeline::{Conversion, Converter, FileSink, MtzSink};
pub use resolve::{Resolution, ResolvedColumn, resolve};
pub use source::{ReflectionLoop, ReflectionSource, ReflnBlock, as_refln_blocks, select_block};
pub use spec::{COLUMN_TYPES, MappingEntry, STATUS_TYPE, SpecTable};
