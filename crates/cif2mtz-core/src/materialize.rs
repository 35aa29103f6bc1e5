//! Filling the data matrix from the source loop.

use std::fmt;

use cif2mtz_cif::{Loop, as_int, as_number, is_null};
use cif2mtz_mtz::Mtz;
use serde::Serialize;
use tracing::warn;

use crate::canonicalize::IndexReducer;
use crate::error::{ConversionError, Result};
use crate::resolve::ResolvedColumn;

/// How the leading index columns of each row are written.
#[derive(Clone, Copy)]
pub enum IndexMode<'r> {
    /// `H K L` as read.
    Merged,
    /// Reduced `H K L`, then `M/ISYM` and `BATCH` (always 1).
    Unmerged(&'r dyn IndexReducer),
}

/// A non-null value that is not a number. Written as NaN.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CellWarning {
    pub row: usize,
    /// Position of the value in the loop, counted over all rows.
    pub value_index: usize,
    pub label: String,
    pub tag: String,
    pub value: String,
}

impl fmt::Display for CellWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Value #{} in the loop is not a number: {}",
            self.value_index, self.value
        )
    }
}

/// Free-R flag from a `status` value: `o` is 1, `f` is 0, anything else NaN.
/// A leading quote is skipped.
pub fn status_to_flag(raw: &str) -> f32 {
    let mut chars = raw.chars();
    let c = match chars.next() {
        Some('\'' | '"') => chars.next(),
        c => c,
    };
    match c {
        Some('o') => 1.0,
        Some('f') => 0.0,
        _ => f32::NAN,
    }
}

/// Write every row of `table` into the data matrix of `mtz`.
///
/// `columns` starts with the three index columns; the container must already
/// have its final shape. Unparsable values become NaN and are returned as
/// warnings; a non-integer Miller index is an error.
pub fn materialize(
    mtz: &mut Mtz,
    table: &Loop,
    columns: &[ResolvedColumn],
    mode: IndexMode<'_>,
    block: &str,
) -> Result<Vec<CellWarning>> {
    let (index_columns, value_columns) = columns.split_at(3usize.min(columns.len()));
    let lead = match mode {
        IndexMode::Merged => 3,
        IndexMode::Unmerged(_) => 5,
    };
    let ncol = mtz.columns.len();
    let width = table.width();
    let mut warnings = Vec::new();
    if ncol == 0 {
        return Ok(warnings);
    }

    for (row, (values, out)) in table.rows().zip(mtz.data.chunks_exact_mut(ncol)).enumerate() {
        let mut hkl = [0; 3];
        for (slot, col) in hkl.iter_mut().zip(index_columns) {
            let raw = &values[col.source_index];
            *slot = as_int(raw)
                .ok_or_else(|| ConversionError::invalid_miller_index(block, row, &col.tag, raw))?;
        }
        match mode {
            IndexMode::Merged => {
                for (slot, h) in out.iter_mut().zip(hkl) {
                    *slot = h as f32;
                }
            }
            IndexMode::Unmerged(reducer) => {
                let ([h, k, l], isym) = reducer.reduce(hkl);
                out[..5].copy_from_slice(&[h as f32, k as f32, l as f32, isym as f32, 1.0]);
            }
        }

        for (slot, col) in out[lead..].iter_mut().zip(value_columns) {
            let raw = values[col.source_index].as_str();
            *slot = if col.is_status {
                status_to_flag(raw)
            } else if is_null(raw) {
                f32::NAN
            } else {
                match as_number(raw) {
                    Some(v) => v as f32,
                    None => {
                        let warning = CellWarning {
                            row,
                            value_index: row * width + col.source_index,
                            label: col.label.clone(),
                            tag: col.tag.clone(),
                            value: raw.to_string(),
                        };
                        warn!(block, row, label = %col.label, tag = %col.tag, "{warning}");
                        warnings.push(warning);
                        f32::NAN
                    }
                }
            };
        }
    }
    Ok(warnings)
}
