//! MTZ header records.
//!
//! # File layout
//!
//! | Offset       | Length     | Content                                        |
//! |--------------|------------|------------------------------------------------|
//! | 0            | 4          | `MTZ `                                         |
//! | 4            | 4          | header position, in 4-byte words, 1-based      |
//! | 8            | 4          | machine stamp `0x44 0x41 0x00 0x00` (IEEE, LE) |
//! | 12           | 68         | zero padding                                   |
//! | 80           | 4·ncol·nref| reflection data, `f32`, row by row             |
//! | header pos   | 80·n       | ASCII records, `MTZBATS` binary blocks inline  |
//!
//! Records are space-padded to [`RECORD_LEN`] bytes.

use cif2mtz_symmetry::{Op, UnitCell};

use crate::error::Result;
use crate::model::{Batch, Column, Dataset, Mtz};

/// Header record length in bytes.
pub const RECORD_LEN: usize = 80;

/// File magic.
pub const MAGIC: &[u8; 4] = b"MTZ ";

/// Little-endian IEEE machine stamp.
pub const MACHINE_STAMP: [u8; 4] = [0x44, 0x41, 0x00, 0x00];

/// Words (4 bytes each) before the reflection data.
pub const PREAMBLE_WORDS: usize = RECORD_LEN / 4;

/// Batch numbers per `BATCH` record.
const BATCHES_PER_RECORD: usize = 12;

/// Space-pad or truncate text to one record.
pub fn pad_record(text: &str) -> [u8; RECORD_LEN] {
    let mut record = [b' '; RECORD_LEN];
    for (slot, byte) in record.iter_mut().zip(text.bytes()) {
        *slot = if byte.is_ascii() { byte } else { b'?' };
    }
    record
}

pub fn build_cell_record(keyword: &str, cell: &UnitCell) -> String {
    let p = cell.parameters();
    format!(
        "{keyword} {:9.4} {:9.4} {:9.4} {:9.4} {:9.4} {:9.4}",
        p[0], p[1], p[2], p[3], p[4], p[5]
    )
}

/// `SYMINF nsym nprim lattice number 'name' pointgroup`
pub fn build_syminf_record(
    nsym: usize,
    nprim: usize,
    lattice: char,
    number: u16,
    name: &str,
    point_group: &str,
) -> String {
    format!(
        "SYMINF {nsym:3} {nprim:2} {lattice} {number:5} {:>22} {point_group:>5}",
        format!("'{name}'")
    )
}

pub fn build_symm_record(op: &Op) -> String {
    format!("SYMM {}", op.triplet().to_uppercase().replace(',', ",  "))
}

pub fn build_column_record(column: &Column, min: f32, max: f32) -> String {
    format!(
        "COLUMN {:<30} {} {:17.4} {:17.4} {:4}",
        column.label, column.col_type, min, max, column.dataset_id
    )
}

pub fn build_dataset_records(dataset: &Dataset) -> [String; 5] {
    let id = dataset.id;
    [
        format!("PROJECT {id:7} {}", dataset.project_name),
        format!("CRYSTAL {id:7} {}", dataset.crystal_name),
        format!("DATASET {id:7} {}", dataset.dataset_name),
        format!(
            "DCELL {id:9} {:10.4} {:10.4} {:10.4} {:10.4} {:10.4} {:10.4}",
            dataset.cell.a,
            dataset.cell.b,
            dataset.cell.c,
            dataset.cell.alpha,
            dataset.cell.beta,
            dataset.cell.gamma
        ),
        format!("DWAVEL {id:8} {:10.5}", dataset.wavelength),
    ]
}

/// Every record from `VERS` to `END`.
pub fn build_main_records(mtz: &Mtz) -> Result<Vec<String>> {
    let mut records = vec![
        "VERS MTZ:V1.1".to_string(),
        format!("TITLE {}", mtz.title),
        format!(
            "NCOL {:8} {:12} {:8}",
            mtz.columns.len(),
            mtz.nreflections,
            mtz.batches.len()
        ),
        build_cell_record("CELL ", &mtz.cell),
        format!("SORT {:3} {:3} {:3} {:3} {:3}", 0, 0, 0, 0, 0),
    ];

    if let Some(sg) = mtz.spacegroup {
        let ops = sg.operations()?;
        records.push(build_syminf_record(
            ops.order(),
            ops.sym_ops.len(),
            sg.lattice(),
            sg.number,
            sg.hm,
            sg.point_group,
        ));
        records.extend(ops.all_ops().map(|op| build_symm_record(&op)));
    }

    if let Some((lo, hi)) = mtz.resolution_range() {
        records.push(format!("RESO {lo:<20.12} {hi:<20.12}"));
    }
    records.push("VALM NAN".to_string());

    for column in &mtz.columns {
        let (min, max) = mtz.column_range(column.idx);
        records.push(build_column_record(column, min, max));
    }

    records.push(format!("NDIF {:8}", mtz.datasets.len()));
    for dataset in &mtz.datasets {
        records.extend(build_dataset_records(dataset));
    }

    for chunk in mtz.batches.chunks(BATCHES_PER_RECORD) {
        let numbers: String = chunk.iter().map(|b| format!("{:6}", b.number)).collect();
        records.push(format!("BATCH {numbers}"));
    }
    records.push("END".to_string());
    Ok(records)
}

/// `MTZHIST n` followed by the history lines.
pub fn build_history_records(history: &[String]) -> Vec<String> {
    let mut records = Vec::with_capacity(history.len() + 1);
    records.push(format!("MTZHIST {:3}", history.len()));
    records.extend(history.iter().cloned());
    records
}

/// One batch: `BH`, `TITLE`, the binary orientation block and `BHCH`.
pub fn build_batch_header(batch: &Batch) -> Vec<u8> {
    let mut out = Vec::with_capacity(3 * RECORD_LEN + 4 * (batch.ints.len() + batch.floats.len()));
    let word = |i: usize| batch.ints.get(i).copied().unwrap_or(0);
    out.extend_from_slice(&pad_record(&format!(
        "BH {:8}{:8}{:8}{:8}",
        batch.number,
        word(0),
        word(1),
        word(2)
    )));
    out.extend_from_slice(&pad_record(&format!("TITLE {}", batch.title)));
    for value in &batch.ints {
        out.extend_from_slice(&value.to_le_bytes());
    }
    for value in &batch.floats {
        out.extend_from_slice(&value.to_le_bytes());
    }
    let axes: String = batch.axes.iter().map(|a| format!(" {a:>7}")).collect();
    out.extend_from_slice(&pad_record(&format!("BHCH{axes}")));
    out
}
