//! Conversion spec: which mmCIF tag goes to which MTZ column.
//!
//! A spec file has one mapping per line, four whitespace-separated words:
//!
//! ```text
//! F_meas_au FP F 1
//! ```
//!
//! 1. tag without the category (`_refln.` or `_diffrn_refln.` is prepended)
//! 2. MTZ column label
//! 3. MTZ column type, or `s` for a `status` column written as a free-R flag
//! 4. MTZ dataset, `0` or `1`
//!
//! Lines sharing a label are alternatives and must be adjacent; the first
//! one whose tag is present wins.

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;
use std::sync::LazyLock;

use serde::Serialize;

use crate::error::SpecError;

/// MTZ column types accepted in a spec, plus the status marker `s`.
pub const COLUMN_TYPES: &str = "HIJQKMFGLDPWAYBs";

/// Type marker for `status` columns.
pub const STATUS_TYPE: char = 's';

/// The built-in mappings, in priority order.
const DEFAULT_ENTRIES: [(&str, &str, char, i32); 32] = [
    ("index_h", "H", 'H', 0),
    ("index_k", "K", 'H', 0),
    ("index_l", "L", 'H', 0),
    ("pdbx_r_free_flag", "FreeR_flag", 'I', 0),
    ("status", "FreeR_flag", 's', 0),
    ("intensity_meas", "I", 'J', 1),
    ("intensity_net", "I", 'J', 1),
    ("intensity_sigma", "SIGI", 'Q', 1),
    ("pdbx_I_plus", "I(+)", 'K', 1),
    ("pdbx_I_plus_sigma", "SIGI(+)", 'M', 1),
    ("pdbx_I_minus", "I(-)", 'K', 1),
    ("pdbx_I_minus_sigma", "SIGI(-)", 'M', 1),
    ("F_meas_au", "FP", 'F', 1),
    ("F_meas_sigma_au", "SIGFP", 'Q', 1),
    ("pdbx_F_plus", "F(+)", 'G', 1),
    ("pdbx_F_plus_sigma", "SIGF(+)", 'L', 1),
    ("pdbx_F_minus", "F(-)", 'G', 1),
    ("pdbx_F_minus_sigma", "SIGF(-)", 'L', 1),
    ("pdbx_anom_difference", "DP", 'D', 1),
    ("pdbx_anom_difference_sigma", "SIGDP", 'Q', 1),
    ("F_calc", "FC", 'F', 1),
    ("phase_calc", "PHIC", 'P', 1),
    ("fom", "FOM", 'W', 1),
    ("weight", "FOM", 'W', 1),
    ("pdbx_HL_A_iso", "HLA", 'A', 1),
    ("pdbx_HL_B_iso", "HLB", 'A', 1),
    ("pdbx_HL_C_iso", "HLC", 'A', 1),
    ("pdbx_HL_D_iso", "HLD", 'A', 1),
    ("pdbx_FWT", "FWT", 'F', 1),
    ("pdbx_PHWT", "PHWT", 'P', 1),
    ("pdbx_DELFWT", "DELFWT", 'F', 1),
    ("pdbx_DELPHWT", "DELPHWT", 'P', 1),
];

const SPEC_HEADER: &str = "\
# Each line in the spec contains four words:
# - tag (without category) from _refln or _diffrn_refln
# - MTZ column label
# - MTZ column type
# - MTZ dataset for the column (must be 0 or 1)
";

static DEFAULT: LazyLock<SpecTable> = LazyLock::new(|| SpecTable {
    entries: DEFAULT_ENTRIES
        .iter()
        .map(|&(tag, label, col_type, dataset_id)| MappingEntry {
            source_tag: tag.to_string(),
            dest_label: label.to_string(),
            dest_type: col_type,
            dataset_id,
        })
        .collect(),
});

/// One spec line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MappingEntry {
    /// Tag without the category prefix, e.g. `F_meas_au`.
    pub source_tag: String,
    pub dest_label: String,
    pub dest_type: char,
    pub dataset_id: i32,
}

impl MappingEntry {
    pub fn is_status(&self) -> bool {
        self.dest_type == STATUS_TYPE
    }

    pub fn is_miller_index(&self) -> bool {
        self.dest_type == 'H'
    }
}

/// Ordered list of mappings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SpecTable {
    entries: Vec<MappingEntry>,
}

impl SpecTable {
    /// The built-in table.
    pub fn default_table() -> &'static SpecTable {
        &DEFAULT
    }

    /// Parse spec text. Blank lines and `#` comments are skipped.
    pub fn parse(text: &str) -> Result<Self, SpecError> {
        Self::from_numbered_lines(text.lines().enumerate().map(|(i, line)| (i + 1, line)))
    }

    /// Build a table from lines that are already split.
    pub fn from_lines<'a, I>(lines: I) -> Result<Self, SpecError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        Self::from_numbered_lines(lines.into_iter().enumerate().map(|(i, line)| (i + 1, line)))
    }

    /// Read a spec file; `-` reads stdin.
    pub fn read(path: &Path) -> Result<Self, SpecError> {
        let read_err = |source| SpecError::Read {
            path: path.to_path_buf(),
            source,
        };
        let text = if path.as_os_str() == "-" {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .map_err(read_err)?;
            text
        } else {
            std::fs::read_to_string(path).map_err(read_err)?
        };
        Self::parse(&text)
    }

    /// Text printed by `--print-spec`.
    pub fn render_default() -> String {
        let mut out = SPEC_HEADER.to_string();
        for entry in Self::default_table().entries() {
            out.push_str(&entry.to_string());
            out.push('\n');
        }
        out
    }

    pub fn entries(&self) -> &[MappingEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn from_numbered_lines<'a>(
        lines: impl Iterator<Item = (usize, &'a str)>,
    ) -> Result<Self, SpecError> {
        let mut entries: Vec<MappingEntry> = Vec::new();
        let mut closed_labels: HashSet<String> = HashSet::new();
        for (number, line) in lines {
            let trimmed = line.trim_start();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let entry = parse_line(number, line)?;
            match entries.last() {
                Some(prev) if prev.dest_label == entry.dest_label => {}
                prev => {
                    if closed_labels.contains(&entry.dest_label) {
                        return Err(SpecError::ScatteredAlternatives {
                            number,
                            label: entry.dest_label,
                            line: line.to_string(),
                        });
                    }
                    if let Some(prev) = prev {
                        closed_labels.insert(prev.dest_label.clone());
                    }
                }
            }
            entries.push(entry);
        }
        Ok(Self { entries })
    }
}

impl std::fmt::Display for MappingEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.source_tag, self.dest_label, self.dest_type, self.dataset_id
        )
    }
}

fn parse_line(number: usize, line: &str) -> Result<MappingEntry, SpecError> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let [tag, label, col_type, dataset] = words[..] else {
        return Err(SpecError::malformed(number, line));
    };
    let mut type_chars = col_type.chars();
    let dest_type = match (type_chars.next(), type_chars.next()) {
        (Some(c), None) => c,
        _ => return Err(SpecError::invalid_field(number, line, "type must be one character")),
    };
    if !COLUMN_TYPES.contains(dest_type) {
        return Err(SpecError::invalid_field(
            number,
            line,
            format!("unknown column type '{dest_type}'"),
        ));
    }
    let dataset_id = match dataset {
        "0" => 0,
        "1" => 1,
        _ => return Err(SpecError::invalid_field(number, line, "dataset must be 0 or 1")),
    };
    Ok(MappingEntry {
        source_tag: tag.to_string(),
        dest_label: label.to_string(),
        dest_type,
        dataset_id,
    })
}
