//! MTZ file reader.
//!
//! Reads files in the layout produced by [`MtzWriter`](crate::MtzWriter):
//! little-endian data and the header records this crate writes.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use cif2mtz_symmetry::{UnitCell, find_spacegroup_by_number};

use crate::error::{MtzError, Result};
use crate::header::{MAGIC, RECORD_LEN};
use crate::model::{Batch, Column, Dataset, Mtz};

/// MTZ file reader.
pub struct MtzReader<R: Read> {
    reader: BufReader<R>,
}

impl<R: Read> MtzReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
        }
    }

    /// Read and parse the entire file.
    pub fn read_mtz(mut self) -> Result<Mtz> {
        let mut bytes = Vec::new();
        self.reader.read_to_end(&mut bytes)?;
        parse_mtz(&bytes)
    }
}

/// Read an MTZ file.
pub fn read_mtz(path: &Path) -> Result<Mtz> {
    let file = File::open(path).map_err(|e| MtzError::Io(e).with_path(path))?;
    MtzReader::new(file)
        .read_mtz()
        .map_err(|e| e.with_path(path))
}

/// Byte cursor over the header section.
struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self.pos + n;
        let slice = self
            .bytes
            .get(self.pos..end)
            .ok_or_else(|| MtzError::invalid_format(format!("truncated header at byte {}", self.pos)))?;
        self.pos = end;
        Ok(slice)
    }

    fn record(&mut self) -> Result<String> {
        let raw = self.take(RECORD_LEN)?;
        Ok(String::from_utf8_lossy(raw).trim_end().to_string())
    }
}

fn parse_mtz(bytes: &[u8]) -> Result<Mtz> {
    if bytes.len() < RECORD_LEN || &bytes[..4] != MAGIC {
        return Err(MtzError::invalid_format("missing MTZ magic"));
    }
    let header_pos = i32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
    let header_start = usize::try_from(header_pos - 1)
        .map(|w| w * 4)
        .map_err(|_| MtzError::invalid_format(format!("bad header position {header_pos}")))?;
    if header_start < RECORD_LEN || header_start > bytes.len() {
        return Err(MtzError::invalid_format(format!(
            "header position {header_pos} outside the file"
        )));
    }

    let mut mtz = Mtz::new();
    let mut cursor = Cursor {
        bytes,
        pos: header_start,
    };
    parse_main_records(&mut cursor, &mut mtz)?;
    parse_trailing_records(&mut cursor, &mut mtz)?;
    mtz.reindex_columns();

    let nvalues = mtz.columns.len() * mtz.nreflections;
    if RECORD_LEN + 4 * nvalues != header_start {
        return Err(MtzError::invalid_format(format!(
            "{} columns x {} reflections do not fill the data section",
            mtz.columns.len(),
            mtz.nreflections
        )));
    }
    mtz.data = bytes[RECORD_LEN..header_start]
        .chunks_exact(4)
        .map(|w| f32::from_le_bytes([w[0], w[1], w[2], w[3]]))
        .collect();
    Ok(mtz)
}

fn parse_main_records(cursor: &mut Cursor<'_>, mtz: &mut Mtz) -> Result<()> {
    loop {
        let record = cursor.record()?;
        let (keyword, rest) = record.split_once(' ').unwrap_or((record.as_str(), ""));
        let fields: Vec<&str> = rest.split_whitespace().collect();
        match keyword {
            "END" => return Ok(()),
            "TITLE" => mtz.title = rest.trim().to_string(),
            "NCOL" => mtz.nreflections = parse_field(&record, &fields, 1)?,
            "CELL" => mtz.cell = parse_cell(&record, &fields)?,
            "SYMINF" => {
                let number: u16 = parse_field(&record, &fields, 3)?;
                mtz.spacegroup = find_spacegroup_by_number(number);
            }
            "COLUMN" => {
                let (label, col_type) = match fields[..] {
                    [label, col_type, ..] => (label, col_type),
                    _ => return Err(bad_record(&record)),
                };
                mtz.columns.push(Column::new(
                    label,
                    col_type.chars().next().unwrap_or(' '),
                    parse_field(&record, &fields, fields.len() - 1)?,
                ));
            }
            "PROJECT" | "CRYSTAL" | "DATASET" | "DCELL" | "DWAVEL" => {
                let id: i32 = parse_field(&record, &fields, 0)?;
                let name = fields.get(1..).map(|f| f.join(" ")).unwrap_or_default();
                let dataset = dataset_mut(mtz, id);
                match keyword {
                    "PROJECT" => dataset.project_name = name,
                    "CRYSTAL" => dataset.crystal_name = name,
                    "DATASET" => dataset.dataset_name = name,
                    "DCELL" => dataset.cell = parse_cell(&record, &fields[1..])?,
                    _ => dataset.wavelength = parse_field(&record, &fields, 1)?,
                }
            }
            _ => {}
        }
    }
}

fn parse_trailing_records(cursor: &mut Cursor<'_>, mtz: &mut Mtz) -> Result<()> {
    loop {
        let record = cursor.record()?;
        let fields: Vec<&str> = record.split_whitespace().collect();
        match fields.first().copied() {
            Some("MTZENDOFHEADERS") => return Ok(()),
            Some("MTZHIST") => {
                let n: usize = parse_field(&record, &fields, 1)?;
                for _ in 0..n {
                    mtz.history.push(cursor.record()?);
                }
            }
            Some("BH") => mtz.batches.push(parse_batch(cursor, &record, &fields)?),
            _ => {}
        }
    }
}

fn parse_batch(cursor: &mut Cursor<'_>, record: &str, fields: &[&str]) -> Result<Batch> {
    let number: i32 = parse_field(record, fields, 1)?;
    let nints: usize = parse_field(record, fields, 3)?;
    let nfloats: usize = parse_field(record, fields, 4)?;
    let title = cursor.record()?;
    let title = title.strip_prefix("TITLE").unwrap_or(&title).trim().to_string();
    let ints = cursor
        .take(4 * nints)?
        .chunks_exact(4)
        .map(|w| i32::from_le_bytes([w[0], w[1], w[2], w[3]]))
        .collect();
    let floats = cursor
        .take(4 * nfloats)?
        .chunks_exact(4)
        .map(|w| f32::from_le_bytes([w[0], w[1], w[2], w[3]]))
        .collect();
    let bhch = cursor.record()?;
    let axes = bhch
        .strip_prefix("BHCH")
        .unwrap_or_default()
        .split_whitespace()
        .map(str::to_string)
        .collect();
    Ok(Batch {
        number,
        title,
        ints,
        floats,
        axes,
    })
}

fn dataset_mut(mtz: &mut Mtz, id: i32) -> &mut Dataset {
    let pos = match mtz.datasets.iter().position(|d| d.id == id) {
        Some(pos) => pos,
        None => {
            mtz.datasets.push(Dataset {
                id,
                project_name: String::new(),
                crystal_name: String::new(),
                dataset_name: String::new(),
                cell: UnitCell::default(),
                wavelength: 0.0,
            });
            mtz.datasets.len() - 1
        }
    };
    &mut mtz.datasets[pos]
}

fn parse_cell(record: &str, fields: &[&str]) -> Result<UnitCell> {
    let mut p = [0.0; 6];
    for (i, slot) in p.iter_mut().enumerate() {
        *slot = parse_field(record, fields, i)?;
    }
    Ok(UnitCell::new(p[0], p[1], p[2], p[3], p[4], p[5]))
}

fn parse_field<T: std::str::FromStr>(record: &str, fields: &[&str], i: usize) -> Result<T> {
    fields
        .get(i)
        .and_then(|f| f.parse().ok())
        .ok_or_else(|| bad_record(record))
}

fn bad_record(record: &str) -> MtzError {
    MtzError::invalid_format(format!("malformed record '{record}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_mtz() {
        let err = parse_mtz(&[0u8; 100]).unwrap_err();
        assert!(matches!(err, MtzError::InvalidFormat { .. }));
    }

    #[test]
    fn test_rejects_bad_header_position() {
        let mut bytes = vec![0u8; 100];
        bytes[..4].copy_from_slice(b"MTZ ");
        bytes[4..8].copy_from_slice(&1000i32.to_le_bytes());
        assert!(parse_mtz(&bytes).is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = read_mtz(Path::new("/nonexistent/x.mtz")).unwrap_err();
        assert!(matches!(err, MtzError::File { .. }));
    }
}
