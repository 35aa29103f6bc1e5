//! Category and tag comparison behind `cifdiff`.
//!
//! Output looks like a unified diff so that colordiff can highlight it:
//!
//! ```text
//! --- Reading a.cif
//! +++ Reading b.cif
//!   block name: r1abcsf
//!   _refln.                               rows:   120  ->   118
//!         index_h
//! -       status
//! +       pdbx_r_free_flag
//! ```

use cif2mtz_cif::Block;

/// Change marker of one listed item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Same,
    Removed,
    Added,
}

impl Change {
    pub fn marker(self) -> char {
        match self {
            Self::Same => ' ',
            Self::Removed => '-',
            Self::Added => '+',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffItem {
    pub change: Change,
    pub text: String,
}

/// Merge two ordered lists: items of `b` in order, with items only in `a`
/// inserted after the last common item seen.
pub fn make_diff<S: AsRef<str>>(a: &[S], b: &[S]) -> Vec<DiffItem> {
    let mut diff: Vec<DiffItem> = b
        .iter()
        .map(|s| DiffItem {
            change: Change::Added,
            text: s.as_ref().to_string(),
        })
        .collect();
    let mut idx = 0;
    for s in a {
        let s = s.as_ref();
        match diff.iter().position(|d| d.text == s) {
            Some(pos) => {
                diff[pos].change = Change::Same;
                idx = pos + 1;
            }
            None => {
                diff.insert(
                    idx,
                    DiffItem {
                        change: Change::Removed,
                        text: s.to_string(),
                    },
                );
                idx += 1;
            }
        }
    }
    diff
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DiffOptions {
    /// Categories only, no tags.
    pub only_categories: bool,
}

/// Listing of the categories and tags of `b1` against `b2`.
///
/// Comparing a block with itself gives a plain listing.
pub fn diff_blocks(b1: &Block, b2: &Block, options: DiffOptions) -> String {
    let mut lines = Vec::new();
    if b1.name == b2.name {
        lines.push(format!("  block name: {}", b1.name));
    } else {
        lines.push(format!("- block name: {}", b1.name));
        lines.push(format!("+ block name: {}", b2.name));
    }
    for cat in make_diff(&b1.mmcif_categories(), &b2.mmcif_categories()) {
        let t1 = b1.category_table(&cat.text);
        let t2 = b2.category_table(&cat.text);
        let mut line = format!("{} {:<37} rows: {:5}", cat.change.marker(), cat.text, t1.rows);
        if t2.rows != t1.rows {
            line.push_str(&format!("  -> {:5}", t2.rows));
        }
        lines.push(line);
        if options.only_categories {
            continue;
        }
        for tag in make_diff(&t1.tags, &t2.tags) {
            let name = tag.text.get(cat.text.len()..).unwrap_or(&tag.text);
            lines.push(format!("{}       {}", tag.change.marker(), name));
        }
    }
    lines.into_iter().map(|line| line + "\n").collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cif2mtz_cif::parse;

    fn markers(diff: &[DiffItem]) -> String {
        diff.iter()
            .map(|d| format!("{}{}", d.change.marker(), d.text))
            .collect::<Vec<_>>()
            .join(",")
    }

    #[test]
    fn test_make_diff() {
        assert_eq!(markers(&make_diff(&["a", "b", "c"], &["a", "c", "d"])), " a,-b, c,+d");
        assert_eq!(markers(&make_diff(&["x"], &["a"])), "-x,+a");
        assert_eq!(markers(&make_diff::<&str>(&[], &[])), "");
        assert_eq!(markers(&make_diff(&["a", "b"], &["a", "b"])), " a, b");
    }

    #[test]
    fn test_diff_blocks() {
        let a = parse(
            "data_one\n_cell.length_a 10\nloop_\n_refln.index_h\n_refln.status\n1 o\n2 f\n",
        )
        .unwrap();
        let b = parse(
            "data_one\nloop_\n_refln.index_h\n_refln.pdbx_r_free_flag\n1 1\n2 0\n3 1\n_exptl.method X\n",
        )
        .unwrap();
        let text = diff_blocks(&a.blocks[0], &b.blocks[0], DiffOptions::default());
        let expected = [
            "  block name: one",
            "- _cell.                                rows:     1  ->     0",
            "-       length_a",
            "  _refln.                               rows:     2  ->     3",
            "        index_h",
            "-       status",
            "+       pdbx_r_free_flag",
            "+ _exptl.                               rows:     0  ->     1",
            "+       method",
        ];
        assert_eq!(text.lines().collect::<Vec<_>>(), expected);

        let quiet = diff_blocks(&a.blocks[0], &a.blocks[0], DiffOptions { only_categories: true });
        assert_eq!(
            quiet,
            "  block name: one\n  _cell.                                rows:     1\n  _refln.                               rows:     2\n"
        );
    }
}
