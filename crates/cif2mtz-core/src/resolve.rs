//! Matching spec entries against the tags of a reflection loop.

use serde::Serialize;
use tracing::debug;

use crate::error::{ConversionError, Result};
use crate::source::ReflectionSource;
use crate::spec::SpecTable;

/// A spec entry matched to a loop column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedColumn {
    pub dataset_id: i32,
    /// MTZ type; status columns are stored as `I`.
    pub col_type: char,
    pub label: String,
    /// Full tag, e.g. `_refln.F_meas_au`.
    pub tag: String,
    /// Column of the tag in the source loop.
    pub source_index: usize,
    /// Values are `o`/`f` flags to re-encode.
    pub is_status: bool,
}

/// Resolved columns in output order (synthetic columns excluded).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub columns: Vec<ResolvedColumn>,
    pub unmerged: bool,
}

/// State carried across the spec entries.
#[derive(Default)]
struct Fold<'s> {
    columns: Vec<ResolvedColumn>,
    last_label: Option<&'s str>,
}

/// Resolve `spec` against the loop of `source`.
///
/// Entries are visited in table order:
///
/// 1. A missing tag skips the entry, except for Miller indices (type `H`).
/// 2. An entry whose label was just resolved is a satisfied alternative.
/// 3. Status entries are dropped for unmerged output.
/// 4. Anything else becomes the next column.
pub fn resolve(spec: &SpecTable, source: &ReflectionSource<'_>, block: &str) -> Result<Resolution> {
    let table = source.reflections.table();
    let category = source.reflections.category();
    let unmerged = source.unmerged;

    let fold = spec
        .entries()
        .iter()
        .try_fold(Fold::default(), |mut fold, entry| {
            let tag = format!("{category}{}", entry.source_tag);
            let Some(source_index) = table.find_tag(&tag) else {
                if entry.is_miller_index() {
                    return Err(ConversionError::missing_index_tag(block, &tag));
                }
                return Ok(fold);
            };
            if fold.last_label == Some(entry.dest_label.as_str()) {
                return Ok(fold);
            }
            if unmerged && entry.is_status() {
                debug!(%tag, "ignoring status column of unmerged data");
                return Ok(fold);
            }
            debug!("  {tag} -> {}", entry.dest_label);
            fold.columns.push(ResolvedColumn {
                dataset_id: entry.dataset_id,
                col_type: if entry.is_status() { 'I' } else { entry.dest_type },
                label: entry.dest_label.clone(),
                tag,
                source_index,
                is_status: entry.is_status(),
            });
            fold.last_label = Some(&entry.dest_label);
            Ok(fold)
        })?;

    let columns = fold.columns;
    if columns.len() < 3 || columns[..3].iter().any(|c| c.col_type != 'H') {
        return Err(ConversionError::MisplacedIndexColumns {
            block: block.to_string(),
            labels: columns
                .iter()
                .take(3)
                .map(|c| c.label.as_str())
                .collect::<Vec<_>>()
                .join(","),
        });
    }
    Ok(Resolution { columns, unmerged })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::ReflnBlock;
    use cif2mtz_cif::{Document, parse};

    fn doc(category: &str, tags: &[&str]) -> Document {
        let mut text = String::from("data_t\nloop_\n");
        for tag in tags {
            text.push_str(&format!("{category}.{tag}\n"));
        }
        text.push_str(&vec!["1"; tags.len()].join(" "));
        text.push('\n');
        parse(&text).unwrap()
    }

    fn resolve_default(doc: &Document, force_unmerged: bool) -> Result<Resolution> {
        let rb = ReflnBlock::from_block(&doc.blocks[0]);
        let source = rb.reflection_source(force_unmerged)?;
        resolve(SpecTable::default_table(), &source, rb.name())
    }

    fn labels(res: &Resolution) -> Vec<&str> {
        res.columns.iter().map(|c| c.label.as_str()).collect()
    }

    #[test]
    fn test_merged_columns() {
        let doc = doc(
            "_refln",
            &["index_h", "index_k", "index_l", "F_meas_au", "F_meas_sigma_au"],
        );
        let res = resolve_default(&doc, false).unwrap();
        assert!(!res.unmerged);
        assert_eq!(labels(&res), vec!["H", "K", "L", "FP", "SIGFP"]);
        let types: String = res.columns.iter().map(|c| c.col_type).collect();
        assert_eq!(types, "HHHFQ");
        assert_eq!(res.columns[3].tag, "_refln.F_meas_au");
        assert_eq!(res.columns[4].source_index, 4);
    }

    #[test]
    fn test_first_alternative_present_wins() {
        let doc = doc(
            "_refln",
            &["index_h", "index_k", "index_l", "intensity_net", "intensity_meas"],
        );
        let res = resolve_default(&doc, false).unwrap();
        assert_eq!(labels(&res), vec!["H", "K", "L", "I"]);
        assert_eq!(res.columns[3].tag, "_refln.intensity_meas");
        assert_eq!(res.columns[3].source_index, 4);
    }

    #[test]
    fn test_second_alternative_used_when_first_missing() {
        let doc = doc("_refln", &["index_h", "index_k", "index_l", "weight"]);
        let res = resolve_default(&doc, false).unwrap();
        assert_eq!(labels(&res), vec!["H", "K", "L", "FOM"]);
        assert_eq!(res.columns[3].tag, "_refln.weight");
    }

    #[test]
    fn test_status_becomes_integer_flag() {
        let doc = doc("_refln", &["index_h", "index_k", "index_l", "status", "F_meas_au"]);
        let res = resolve_default(&doc, false).unwrap();
        assert_eq!(labels(&res), vec!["H", "K", "L", "FreeR_flag", "FP"]);
        assert_eq!(res.columns[3].col_type, 'I');
        assert!(res.columns[3].is_status);
        assert!(res.columns.iter().any(|c| c.is_status));
    }

    #[test]
    fn test_free_flag_preferred_over_status() {
        let doc = doc(
            "_refln",
            &["index_h", "index_k", "index_l", "status", "pdbx_r_free_flag"],
        );
        let res = resolve_default(&doc, false).unwrap();
        assert_eq!(labels(&res), vec!["H", "K", "L", "FreeR_flag"]);
        assert!(!res.columns.iter().any(|c| c.is_status));
    }

    #[test]
    fn test_status_dropped_when_unmerged() {
        let doc = doc("_refln", &["index_h", "index_k", "index_l", "status", "intensity_meas"]);
        let res = resolve_default(&doc, true).unwrap();
        assert!(res.unmerged);
        assert_eq!(labels(&res), vec!["H", "K", "L", "I"]);
    }

    #[test]
    fn test_diffrn_loop() {
        let doc = doc(
            "_diffrn_refln",
            &["index_h", "index_k", "index_l", "intensity_net", "intensity_sigma"],
        );
        let res = resolve_default(&doc, false).unwrap();
        assert!(res.unmerged);
        assert_eq!(labels(&res), vec!["H", "K", "L", "I", "SIGI"]);
    }

    #[test]
    fn test_missing_index_tag() {
        for missing in ["index_h", "index_k", "index_l"] {
            let tags: Vec<&str> = ["index_h", "index_k", "index_l", "F_meas_au"]
                .into_iter()
                .filter(|t| *t != missing)
                .collect();
            let doc = doc("_refln", &tags);
            let err = resolve_default(&doc, false).unwrap_err();
            match err {
                ConversionError::MissingIndexTag { block, tag } => {
                    assert_eq!(block, "t");
                    assert_eq!(tag, format!("_refln.{missing}"));
                }
                other => panic!("unexpected error: {other}"),
            }
        }
    }

    #[test]
    fn test_spec_without_indices() {
        let doc = doc("_refln", &["index_h", "index_k", "index_l", "F_meas_au"]);
        let rb = ReflnBlock::from_block(&doc.blocks[0]);
        let source = rb.reflection_source(false).unwrap();
        let spec = SpecTable::from_lines(["F_meas_au FP F 1"]).unwrap();
        let err = resolve(&spec, &source, rb.name()).unwrap_err();
        assert!(matches!(err, ConversionError::MisplacedIndexColumns { .. }));
    }
}
