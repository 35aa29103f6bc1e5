//! Error types for spec loading and block conversion.

use std::path::PathBuf;

use cif2mtz_mtz::MtzError;
use cif2mtz_symmetry::SymmetryError;
use thiserror::Error;

/// Problems with a spec table. Reported before any conversion starts.
#[derive(Debug, Error)]
pub enum SpecError {
    #[error("spec line {number} should have 4 words: {line}")]
    MalformedSpecLine { number: usize, line: String },

    #[error("spec line {number} is incorrect ({reason}): {line}")]
    InvalidSpecField {
        number: usize,
        line: String,
        reason: String,
    },

    /// Alternatives for one label must be consecutive.
    #[error("spec line {number}: label {label} already used by a non-adjacent line: {line}")]
    ScatteredAlternatives {
        number: usize,
        label: String,
        line: String,
    },

    #[error("failed to read spec file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that end the conversion of a block.
#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("no data blocks in the input")]
    NoBlocks,

    #[error("block not found: {name}")]
    BlockNotFound { name: String },

    /// The block name would place its output file outside `--dir`.
    #[error("block name {name:?} cannot be used as an output file name")]
    UnusableBlockName { name: String },

    #[error("_refln category not found in mmCIF block: {block}")]
    NoReflectionLoop { block: String },

    #[error("Miller index tag not found in block {block}: {tag}")]
    MissingIndexTag { block: String, tag: String },

    /// The first three resolved columns are not the Miller indices.
    #[error("block {block}: the first three columns must be H, K and L (got {labels})")]
    MisplacedIndexColumns { block: String, labels: String },

    #[error("block {block}, row {row}: {tag} is not an integer: {value}")]
    InvalidMillerIndex {
        block: String,
        row: usize,
        tag: String,
        value: String,
    },

    #[error(transparent)]
    Symmetry(#[from] SymmetryError),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: MtzError,
    },
}

impl SpecError {
    pub(crate) fn malformed(number: usize, line: &str) -> Self {
        Self::MalformedSpecLine {
            number,
            line: line.to_string(),
        }
    }

    pub(crate) fn invalid_field(number: usize, line: &str, reason: impl Into<String>) -> Self {
        Self::InvalidSpecField {
            number,
            line: line.to_string(),
            reason: reason.into(),
        }
    }
}

impl ConversionError {
    pub fn no_reflection_loop(block: &str) -> Self {
        Self::NoReflectionLoop {
            block: block.to_string(),
        }
    }

    pub fn missing_index_tag(block: &str, tag: &str) -> Self {
        Self::MissingIndexTag {
            block: block.to_string(),
            tag: tag.to_string(),
        }
    }

    pub fn invalid_miller_index(block: &str, row: usize, tag: &str, value: &str) -> Self {
        Self::InvalidMillerIndex {
            block: block.to_string(),
            row,
            tag: tag.to_string(),
            value: value.to_string(),
        }
    }

    pub fn write(path: impl Into<PathBuf>, source: MtzError) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }

    /// True when only the final write failed.
    pub fn is_write_error(&self) -> bool {
        matches!(self, Self::Write { .. })
    }
}

/// Result type for conversion operations.
pub type Result<T> = std::result::Result<T, ConversionError>;
