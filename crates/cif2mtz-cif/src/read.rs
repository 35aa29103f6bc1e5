//! Reading CIF documents from files, gzip files or standard input.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use flate2::read::GzDecoder;
use tracing::debug;

use crate::dom::Document;
use crate::error::{CifError, Result};
use crate::parse::parse;

/// Read and parse a CIF file. `-` reads standard input; a `.gz` suffix
/// selects gzip decompression.
pub fn read_document(path: &Path) -> Result<Document> {
    let text = read_input(path)?;
    let doc = parse(&text)?;
    debug!(path = %path.display(), blocks = doc.blocks.len(), "parsed CIF");
    Ok(doc)
}

/// Read the whole input as text without parsing it.
pub fn read_input(path: &Path) -> Result<String> {
    let mut text = String::new();
    if path.as_os_str() == "-" {
        io::stdin()
            .lock()
            .read_to_string(&mut text)
            .map_err(|e| CifError::io(path, e))?;
        return Ok(text);
    }
    let file = File::open(path).map_err(|e| CifError::io(path, e))?;
    let is_gz = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"));
    if is_gz {
        GzDecoder::new(file).read_to_string(&mut text)
    } else {
        io::BufReader::new(file).read_to_string(&mut text)
    }
    .map_err(|e| CifError::io(path, e))?;
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use flate2::Compression;
    use flate2::write::GzEncoder;

    const SAMPLE: &str = "data_r1sf\n_cell.length_a 40.0\n";

    #[test]
    fn test_reads_plain_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("r1sf.cif");
        std::fs::write(&path, SAMPLE).unwrap();
        let doc = read_document(&path).unwrap();
        assert_eq!(doc.blocks[0].name, "r1sf");
    }

    #[test]
    fn test_reads_gzip_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("r1sf.cif.gz");
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(SAMPLE.as_bytes()).unwrap();
        std::fs::write(&path, encoder.finish().unwrap()).unwrap();
        assert_eq!(read_input(&path).unwrap(), SAMPLE);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = read_document(Path::new("/nonexistent/x.cif")).unwrap_err();
        assert!(matches!(err, CifError::Io { .. }));
    }
}
