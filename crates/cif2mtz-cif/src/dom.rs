//! Untyped CIF document model.
//!
//! Tags are matched case-insensitively, as CIF requires. Values are raw tokens.

/// A parsed CIF document containing one or more data blocks.
#[derive(Debug, Clone, Default)]
pub struct Document {
    pub blocks: Vec<Block>,
}

/// A data block (`data_NAME`).
#[derive(Debug, Clone, Default)]
pub struct Block {
    pub name: String,
    pub items: Vec<Item>,
}

/// One item of a block, in file order.
#[derive(Debug, Clone)]
pub enum Item {
    /// A single `_tag value` pair.
    Pair { tag: String, value: String },
    /// A `loop_` table.
    Loop(Loop),
    /// A save frame (dictionaries only).
    Frame(Block),
}

/// A looped table: tags plus row-major raw values.
#[derive(Debug, Clone, Default)]
pub struct Loop {
    pub tags: Vec<String>,
    /// Row-major values, `tags.len()` per row.
    pub values: Vec<String>,
}

/// Tags and row count of one mmCIF category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryTable {
    pub tags: Vec<String>,
    pub rows: usize,
}

impl Loop {
    /// Number of rows.
    pub fn length(&self) -> usize {
        if self.tags.is_empty() {
            0
        } else {
            self.values.len() / self.tags.len()
        }
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.tags.len()
    }

    /// Column index of `tag`.
    pub fn find_tag(&self, tag: &str) -> Option<usize> {
        self.tags.iter().position(|t| t.eq_ignore_ascii_case(tag))
    }

    /// Raw value at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if the position is outside the loop.
    pub fn value(&self, row: usize, col: usize) -> &str {
        &self.values[row * self.tags.len() + col]
    }

    /// All raw values of one row.
    pub fn row(&self, row: usize) -> &[String] {
        let width = self.tags.len();
        &self.values[row * width..(row + 1) * width]
    }

    /// Iterate over rows as slices.
    pub fn rows(&self) -> impl Iterator<Item = &[String]> {
        self.values.chunks(self.tags.len().max(1))
    }

    /// Iterate over one column's raw values.
    pub fn column(&self, col: usize) -> impl Iterator<Item = &str> {
        self.rows().map(move |row| row[col].as_str())
    }
}

impl Block {
    /// Create an empty block.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            items: Vec::new(),
        }
    }

    /// Iterate over the loops of this block.
    pub fn loops(&self) -> impl Iterator<Item = &Loop> {
        self.items.iter().filter_map(|item| match item {
            Item::Loop(lp) => Some(lp),
            _ => None,
        })
    }

    /// Iterate over the key-value pairs of this block.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.items.iter().filter_map(|item| match item {
            Item::Pair { tag, value } => Some((tag.as_str(), value.as_str())),
            _ => None,
        })
    }

    /// Raw value of a key-value pair.
    pub fn find_value(&self, tag: &str) -> Option<&str> {
        self.pairs()
            .find(|(t, _)| t.eq_ignore_ascii_case(tag))
            .map(|(_, v)| v)
    }

    /// The loop containing `tag`.
    pub fn find_loop(&self, tag: &str) -> Option<&Loop> {
        self.loops().find(|lp| lp.find_tag(tag).is_some())
    }

    /// All raw values of `tag`: one for a pair, a whole column for a loop.
    pub fn find_values(&self, tag: &str) -> Vec<&str> {
        if let Some(value) = self.find_value(tag) {
            return vec![value];
        }
        match self.find_loop(tag) {
            Some(lp) => lp
                .find_tag(tag)
                .map(|col| lp.column(col).collect())
                .unwrap_or_default(),
            None => Vec::new(),
        }
    }

    /// Category names (`_category.`) in order of first appearance.
    pub fn mmcif_categories(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        let mut push = |tag: &str| {
            let name = category_of(tag);
            if !names.iter().any(|n| n.eq_ignore_ascii_case(name)) {
                names.push(name.to_string());
            }
        };
        for item in &self.items {
            match item {
                Item::Pair { tag, .. } => push(tag),
                Item::Loop(lp) => {
                    if let Some(first) = lp.tags.first() {
                        push(first);
                    }
                }
                Item::Frame(_) => {}
            }
        }
        names
    }

    /// Tags and row count of a category; pairs count as a single row.
    pub fn category_table(&self, category: &str) -> CategoryTable {
        let matches = |tag: &str| category_of(tag).eq_ignore_ascii_case(category);
        if let Some(lp) = self
            .loops()
            .find(|lp| lp.tags.first().is_some_and(|t| matches(t)))
        {
            return CategoryTable {
                tags: lp.tags.clone(),
                rows: lp.length(),
            };
        }
        let tags: Vec<String> = self
            .pairs()
            .filter(|(tag, _)| matches(tag))
            .map(|(tag, _)| tag.to_string())
            .collect();
        let rows = usize::from(!tags.is_empty());
        CategoryTable { tags, rows }
    }
}

impl Document {
    /// Find a block by name (case-sensitive, as block names are file names).
    pub fn find_block(&self, name: &str) -> Option<&Block> {
        self.blocks.iter().find(|b| b.name == name)
    }
}

/// `_refln.index_h` -> `_refln.`; tags without a dot are their own category.
fn category_of(tag: &str) -> &str {
    match tag.find('.') {
        Some(pos) => &tag[..=pos],
        None => tag,
    }
}
