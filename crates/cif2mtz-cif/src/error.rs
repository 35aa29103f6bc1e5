//! Error types for CIF reading.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading or parsing a CIF file.
#[derive(Debug, Error)]
pub enum CifError {
    /// Failed to read the input.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A quoted value is not closed before the end of the line.
    #[error("line {line}: unterminated quoted string")]
    UnterminatedQuote { line: usize },

    /// A semicolon text field is not closed.
    #[error("line {line}: unterminated text field")]
    UnterminatedTextField { line: usize },

    /// A tag is not followed by a value.
    #[error("line {line}: tag {tag} has no value")]
    MissingValue { tag: String, line: usize },

    /// A value appears outside of any pair or loop.
    #[error("line {line}: unexpected value {value}")]
    UnexpectedValue { value: String, line: usize },

    /// `loop_` without tags.
    #[error("line {line}: loop_ without tags")]
    EmptyLoop { line: usize },

    /// The number of values in a loop is not a multiple of the tag count.
    #[error("line {line}: loop starting with {first_tag} has {values} values for {tags} tags")]
    LoopValueCount {
        first_tag: String,
        tags: usize,
        values: usize,
        line: usize,
    },

    /// Content before the first `data_` header.
    #[error("line {line}: content before the first data block")]
    OutsideBlock { line: usize },
}

/// Result type for CIF operations.
pub type Result<T> = std::result::Result<T, CifError>;

impl CifError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
