//! Error types for symmetry operations.

use thiserror::Error;

/// Errors that can occur while interpreting symmetry data.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SymmetryError {
    /// A coordinate triplet such as `-y,x-y,z+1/3` could not be parsed.
    #[error("invalid symmetry operator '{triplet}': {reason}")]
    InvalidTriplet { triplet: String, reason: String },
}

/// Result type for symmetry operations.
pub type Result<T> = std::result::Result<T, SymmetryError>;

impl SymmetryError {
    pub(crate) fn invalid_triplet(triplet: &str, reason: impl Into<String>) -> Self {
        Self::InvalidTriplet {
            triplet: triplet.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SymmetryError::invalid_triplet("x,y", "expected 3 components, found 2");
        assert_eq!(
            err.to_string(),
            "invalid symmetry operator 'x,y': expected 3 components, found 2"
        );
    }
}
