//! MTZ file writer.

use std::io::{BufWriter, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{MtzError, Result};
use crate::header::{
    MACHINE_STAMP, MAGIC, PREAMBLE_WORDS, RECORD_LEN, build_batch_header, build_history_records,
    build_main_records, pad_record,
};
use crate::model::Mtz;

/// MTZ file writer.
///
/// Writes little-endian MTZ files: preamble, data, then header records.
pub struct MtzWriter<W: Write> {
    writer: BufWriter<W>,
}

impl<W: Write> MtzWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
        }
    }

    /// Write the whole container.
    pub fn write_mtz(mut self, mtz: &Mtz) -> Result<()> {
        mtz.validate()?;
        let records = build_main_records(mtz)?;

        self.write_preamble(mtz)?;
        for value in &mtz.data {
            self.writer.write_all(&value.to_le_bytes())?;
        }
        for record in &records {
            self.writer.write_all(&pad_record(record))?;
        }
        for record in build_history_records(&mtz.history) {
            self.writer.write_all(&pad_record(&record))?;
        }
        if !mtz.batches.is_empty() {
            self.writer.write_all(&pad_record("MTZBATS"))?;
            for batch in &mtz.batches {
                self.writer.write_all(&build_batch_header(batch))?;
            }
        }
        self.writer.write_all(&pad_record("MTZENDOFHEADERS"))?;
        self.writer.flush()?;
        Ok(())
    }

    fn write_preamble(&mut self, mtz: &Mtz) -> Result<()> {
        let words = PREAMBLE_WORDS + mtz.columns.len() * mtz.nreflections + 1;
        let header_pos = i32::try_from(words)
            .map_err(|_| MtzError::invalid_format("too much data for a 32-bit header offset"))?;
        let mut preamble = [0u8; RECORD_LEN];
        preamble[..4].copy_from_slice(MAGIC);
        preamble[4..8].copy_from_slice(&header_pos.to_le_bytes());
        preamble[8..12].copy_from_slice(&MACHINE_STAMP);
        self.writer.write_all(&preamble)?;
        Ok(())
    }
}

/// Write an MTZ file.
///
/// Data goes to a temporary file next to `path` that is renamed into place
/// only after everything was written, so a failed write leaves no file.
pub fn write_mtz(path: &Path, mtz: &Mtz) -> Result<()> {
    mtz.validate()?;
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| MtzError::Io(e).with_path(dir))?;
    MtzWriter::new(tmp.as_file_mut())
        .write_mtz(mtz)
        .map_err(|e| e.with_path(path))?;
    tmp.persist(path)
        .map_err(|e| MtzError::Io(e.error).with_path(path))?;
    debug!(
        path = %path.display(),
        columns = mtz.columns.len(),
        reflections = mtz.nreflections,
        "wrote MTZ"
    );
    Ok(())
}
