//! Error types for eidolon operations.

use eidolon_core::CoreError;
use eidolon_io::MatrixError;
use thiserror::Error;

/// Errors raised by the matrix-level algorithms.
#[derive(Error, Debug)]
pub enum EidolonError {
    /// Error from the matrix container.
    #[error(transparent)]
    Matrix(#[from] MatrixError),

    /// Error from the math layer.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// An input matrix is too narrow for the operation.
    #[error("matrix '{name}' has {got} columns, at least {expected} required")]
    Columns {
        /// Name of the offending matrix.
        name: String,
        /// Minimum number of columns.
        expected: usize,
        /// Actual number of columns.
        got: usize,
    },

    /// A value stream is shorter than the matrix it fills.
    #[error("stream holds {got} values, {needed} needed")]
    ShortStream {
        /// Cells in the target matrix.
        needed: usize,
        /// Values in the stream.
        got: usize,
    },

    /// An image stack with no images was supplied.
    #[error("image stack is empty")]
    EmptyStack,
}

impl EidolonError {
    /// Fail unless `m` has at least `expected` columns.
    pub(crate) fn require_columns<T: eidolon_io::Element>(
        m: &eidolon_io::Matrix<T>,
        expected: usize,
    ) -> Result<()> {
        if m.m() < expected {
            Err(EidolonError::Columns {
                name: m.name().to_owned(),
                expected,
                got: m.m(),
            })
        } else {
            Ok(())
        }
    }
}

/// Result type for eidolon operations.
pub type Result<T> = std::result::Result<T, EidolonError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EidolonError::Columns {
            name: "inds".into(),
            expected: 3,
            got: 2,
        };
        assert_eq!(
            err.to_string(),
            "matrix 'inds' has 2 columns, at least 3 required"
        );
        assert_eq!(EidolonError::EmptyStack.to_string(), "image stack is empty");
    }

    #[test]
    fn test_conversions_are_transparent() {
        let err: EidolonError = MatrixError::NotShared("a".into()).into();
        assert_eq!(err.to_string(), "matrix 'a' is not shared");

        let err: EidolonError = CoreError::SingularMatrix.into();
        assert!(matches!(err, EidolonError::Core(CoreError::SingularMatrix)));
    }
}
