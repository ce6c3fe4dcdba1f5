//! Error types for eidolon_core operations.
//!
//! Provides a simple error enum with no external dependencies for no_std compatibility.
//! Geometric queries that find nothing (ray misses, points outside an element) return
//! `Option`/empty results rather than errors.

use core::fmt;

/// Error types that can occur during eidolon_core operations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CoreError {
    /// An index was outside the valid range `0 <= value < max`.
    Index {
        /// Name of the offending index parameter.
        name: &'static str,
        /// The value that was supplied.
        value: usize,
        /// The exclusive upper bound.
        max: usize,
    },
    /// A ray was constructed with a zero-length direction vector.
    ZeroDirection,
    /// A matrix inverse was requested for a matrix with a zero determinant.
    SingularMatrix,
}

/// Result type for eidolon_core operations.
pub type Result<T> = core::result::Result<T, CoreError>;

impl CoreError {
    /// Check `value` against `max`, producing an `Index` error if out of range.
    #[inline]
    pub fn check_index(name: &'static str, value: usize, max: usize) -> Result<usize> {
        if value < max {
            Ok(value)
        } else {
            Err(CoreError::Index { name, value, max })
        }
    }
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::Index { name, value, max } => {
                write!(
                    f,
                    "Bad value {} for index '{}' (0 <= {} < {})",
                    value, name, name, max
                )
            }
            CoreError::ZeroDirection => write!(f, "direction vector is zero length"),
            CoreError::SingularMatrix => write!(f, "matrix is singular"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for CoreError {}
