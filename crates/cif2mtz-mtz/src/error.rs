//! Error types for MTZ file operations.

use std::path::PathBuf;

use cif2mtz_symmetry::SymmetryError;
use thiserror::Error;

/// Errors that can occur when reading or writing MTZ files.
#[derive(Debug, Error)]
pub enum MtzError {
    /// I/O error on a named file.
    #[error("{path}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The data array does not match the column and reflection counts.
    #[error("data has {actual} values, expected {ncol} columns x {nreflections} reflections")]
    DataSize {
        actual: usize,
        ncol: usize,
        nreflections: usize,
    },

    /// Column label longer than the 30 characters of a COLUMN record.
    #[error("column label '{label}' exceeds 30 characters")]
    LabelTooLong { label: String },

    /// Column refers to a dataset that is not defined.
    #[error("column {label} refers to undefined dataset {dataset_id}")]
    UnknownDataset { label: String, dataset_id: i32 },

    /// Batch header with the wrong number of words.
    #[error("batch {number} has {ints} ints and {floats} floats, expected 29 and 156")]
    BatchSize {
        number: i32,
        ints: usize,
        floats: usize,
    },

    /// Malformed MTZ file.
    #[error("invalid MTZ file: {message}")]
    InvalidFormat { message: String },

    /// Symmetry operators of the space group could not be generated.
    #[error(transparent)]
    Symmetry(#[from] SymmetryError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for MTZ operations.
pub type Result<T> = std::result::Result<T, MtzError>;

impl MtzError {
    /// Create an InvalidFormat error.
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::InvalidFormat {
            message: message.into(),
        }
    }

    /// Attach a path to a bare I/O error.
    pub(crate) fn with_path(self, path: impl Into<PathBuf>) -> Self {
        match self {
            Self::Io(source) => Self::File {
                path: path.into(),
                source,
            },
            other => other,
        }
    }
}
