//! Reflection data blocks of an SF-mmCIF document.

use cif2mtz_cif::{Block, Document, Loop, as_number, as_string, is_null};
use cif2mtz_symmetry::{SpaceGroup, UnitCell, find_spacegroup_by_name, find_spacegroup_by_number};
use tracing::debug;

use crate::error::{ConversionError, Result};

const CELL_TAGS: [&str; 6] = [
    "_cell.length_a",
    "_cell.length_b",
    "_cell.length_c",
    "_cell.angle_alpha",
    "_cell.angle_beta",
    "_cell.angle_gamma",
];
const SPACEGROUP_NAME_TAGS: [&str; 2] =
    ["_symmetry.space_group_name_H-M", "_space_group.name_H-M_alt"];
const SPACEGROUP_NUMBER_TAGS: [&str; 2] = ["_symmetry.Int_Tables_number", "_space_group.IT_number"];
const WAVELENGTH_TAG: &str = "_diffrn_radiation_wavelength.wavelength";
const MERGED_INDEX_TAG: &str = "_refln.index_h";
const DIFFRN_INDEX_TAG: &str = "_diffrn_refln.index_h";

/// A data block with the metadata needed for conversion.
#[derive(Debug, Clone)]
pub struct ReflnBlock<'a> {
    pub block: &'a Block,
    pub cell: UnitCell,
    /// `None` when the block names no space group or one outside the table.
    pub spacegroup: Option<&'static SpaceGroup>,
    /// Space group as written in the file.
    pub spacegroup_name: Option<String>,
    pub wavelength: f64,
    /// `_refln` loop (merged data).
    pub refln_loop: Option<&'a Loop>,
    /// `_diffrn_refln` loop (unmerged data).
    pub diffrn_refln_loop: Option<&'a Loop>,
}

/// The loop a block's reflections are read from.
#[derive(Debug, Clone, Copy)]
pub enum ReflectionLoop<'a> {
    Merged(&'a Loop),
    Diffrn(&'a Loop),
}

/// Selected reflection loop and whether the output is unmerged.
#[derive(Debug, Clone, Copy)]
pub struct ReflectionSource<'a> {
    pub reflections: ReflectionLoop<'a>,
    pub unmerged: bool,
}

impl<'a> ReflnBlock<'a> {
    pub fn from_block(block: &'a Block) -> Self {
        let cell = read_cell(block).unwrap_or_else(|| {
            debug!(block = %block.name, "no unit cell, using default");
            UnitCell::default()
        });
        let spacegroup_name = SPACEGROUP_NAME_TAGS
            .iter()
            .find_map(|tag| single_value(block, tag))
            .map(|raw| as_string(raw).trim().to_string());
        let spacegroup = spacegroup_name
            .as_deref()
            .and_then(find_spacegroup_by_name)
            .or_else(|| {
                SPACEGROUP_NUMBER_TAGS
                    .iter()
                    .find_map(|tag| single_value(block, tag))
                    .and_then(as_number)
                    .and_then(|n| u16::try_from(n as i64).ok())
                    .and_then(find_spacegroup_by_number)
            });
        let wavelength = single_value(block, WAVELENGTH_TAG)
            .and_then(as_number)
            .unwrap_or(0.0);
        Self {
            block,
            cell,
            spacegroup,
            spacegroup_name,
            wavelength,
            refln_loop: block.find_loop(MERGED_INDEX_TAG),
            diffrn_refln_loop: block.find_loop(DIFFRN_INDEX_TAG),
        }
    }

    pub fn name(&self) -> &'a str {
        &self.block.name
    }

    /// Pick the reflection loop; `_refln` wins over `_diffrn_refln`.
    ///
    /// Data from `_diffrn_refln` is always unmerged.
    pub fn reflection_source(&self, force_unmerged: bool) -> Result<ReflectionSource<'a>> {
        let reflections = match (self.refln_loop, self.diffrn_refln_loop) {
            (Some(lp), _) => ReflectionLoop::Merged(lp),
            (None, Some(lp)) => ReflectionLoop::Diffrn(lp),
            (None, None) => return Err(ConversionError::no_reflection_loop(self.name())),
        };
        let unmerged = force_unmerged || matches!(reflections, ReflectionLoop::Diffrn(_));
        Ok(ReflectionSource {
            reflections,
            unmerged,
        })
    }
}

impl<'a> ReflectionLoop<'a> {
    pub fn table(&self) -> &'a Loop {
        match self {
            Self::Merged(lp) | Self::Diffrn(lp) => lp,
        }
    }

    /// Category prefix of the loop, dot included: `_refln.`.
    pub fn category(&self) -> &'a str {
        let first = self.table().tags.first().map(String::as_str).unwrap_or("");
        match first.find('.') {
            Some(pos) => &first[..=pos],
            None => "",
        }
    }
}

/// All blocks of a document, in file order.
pub fn as_refln_blocks(doc: &Document) -> Vec<ReflnBlock<'_>> {
    doc.blocks.iter().map(ReflnBlock::from_block).collect()
}

/// The block called `name`, or the first block.
pub fn select_block<'b, 'a>(
    blocks: &'b [ReflnBlock<'a>],
    name: Option<&str>,
) -> Result<&'b ReflnBlock<'a>> {
    match name {
        Some(name) => blocks
            .iter()
            .find(|rb| rb.name() == name)
            .ok_or_else(|| ConversionError::BlockNotFound {
                name: name.to_string(),
            }),
        None => blocks.first().ok_or(ConversionError::NoBlocks),
    }
}

/// The value of a tag that occurs once, unless it is null.
fn single_value<'a>(block: &'a Block, tag: &str) -> Option<&'a str> {
    match block.find_values(tag)[..] {
        [value] if !is_null(value) => Some(value),
        _ => None,
    }
}

fn read_cell(block: &Block) -> Option<UnitCell> {
    let mut p = [0.0; 6];
    for (slot, tag) in p.iter_mut().zip(CELL_TAGS) {
        *slot = single_value(block, tag).and_then(as_number)?;
    }
    Some(UnitCell::new(p[0], p[1], p[2], p[3], p[4], p[5]))
}
