//! CIF 1.1 / mmCIF reader.
//!
//! Two layers:
//! - **Parser** ([`parse`], [`read_document`]): turns text into an untyped
//!   [`Document`] of blocks, key-value pairs and loops.
//! - **Value helpers** ([`is_null`], [`as_number`], [`as_int`], [`as_string`]):
//!   interpret the raw tokens stored in the document.
//!
//! Values are kept exactly as they appear in the file, quotes and text-field
//! delimiters included. A quoted `'.'` is therefore a string, while a bare `.`
//! is the "not applicable" marker.
//!
//! ```
//! use cif2mtz_cif::{as_number, is_null, parse};
//!
//! let doc = parse("data_r1\nloop_\n_refln.index_h\n_refln.F_meas_au\n1 12.5\n2 .\n").unwrap();
//! let lp = doc.blocks[0].find_loop("_refln.index_h").unwrap();
//! assert_eq!(lp.length(), 2);
//! assert_eq!(as_number(lp.value(0, 1)), Some(12.5));
//! assert!(is_null(lp.value(1, 1)));
//! ```

mod dom;
mod error;
mod parse;
mod read;
mod value;

pub use dom::{Block, CategoryTable, Document, Item, Loop};
pub use error::{CifError, Result};
pub use parse::parse;
pub use read::{read_document, read_input};
pub use value::{as_int, as_number, as_string, is_null};
