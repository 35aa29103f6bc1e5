//! MTZ reflection file model, writer and reader.
//!
//! MTZ is the CCP4 binary format for reflection data: a matrix of `f32`
//! values (one row per reflection, one column per quantity) followed by
//! 80-character ASCII header records.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use cif2mtz_mtz::{Column, Mtz, read_mtz, write_mtz};
//!
//! let mut mtz = Mtz::new();
//! mtz.add_dataset("HKL_base");
//! mtz.columns = vec![
//!     Column::new("H", 'H', 0),
//!     Column::new("K", 'H', 0),
//!     Column::new("L", 'H', 0),
//! ];
//! mtz.reindex_columns();
//! mtz.nreflections = 1;
//! mtz.data = vec![1.0, 2.0, 3.0];
//! write_mtz(Path::new("out.mtz"), &mtz).unwrap();
//!
//! let back = read_mtz(Path::new("out.mtz")).unwrap();
//! assert_eq!(back.data, mtz.data);
//! ```

mod error;
pub mod header;
mod model;
mod reader;
mod writer;

pub use error::{MtzError, Result};
pub use model::{BATCH_FLOATS, BATCH_INTS, Batch, Column, Dataset, MAX_LABEL_LEN, Mtz};
pub use reader::{MtzReader, read_mtz};
pub use writer::{MtzWriter, write_mtz};
