//! Error types for eidolon_io operations.

use eidolon_core::CoreError;
use thiserror::Error;

/// Errors that can occur when building, sharing, or loading matrices.
#[derive(Error, Debug)]
pub enum MatrixError {
    /// A row or column index was out of range.
    #[error("Bad value {value} for index '{name}' (0 <= {name} < {max})")]
    Index {
        /// Name of the offending index, `"n"` for rows and `"m"` for columns.
        name: &'static str,
        /// The value that was supplied.
        value: usize,
        /// The exclusive upper bound.
        max: usize,
    },

    /// A shared segment operation or a structural change failed.
    #[error("{msg}")]
    Memory {
        /// Description of the failure.
        msg: String,
        /// The OS error behind it, if any.
        #[source]
        source: Option<std::io::Error>,
    },

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A text matrix file could not be parsed.
    #[error("parse error on line {line}: {msg}")]
    Parse {
        /// One-based line number.
        line: usize,
        /// Description of the problem.
        msg: String,
    },

    /// A shared-only operation was requested on a local matrix.
    #[error("matrix '{0}' is not shared")]
    NotShared(String),

    /// A shared matrix cannot change its dimensions.
    #[error("cannot resize shared matrix '{0}'")]
    SharedResize(String),

    /// Error from the math layer.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl MatrixError {
    /// A `Memory` error with no OS cause.
    pub fn memory(msg: impl Into<String>) -> Self {
        MatrixError::Memory {
            msg: msg.into(),
            source: None,
        }
    }

    /// A `Memory` error carrying the OS error text in its message.
    pub fn os(what: impl core::fmt::Display, source: std::io::Error) -> Self {
        MatrixError::Memory {
            msg: format!("{}: {}", what, source),
            source: Some(source),
        }
    }

    /// Check a row index against `n`.
    #[inline]
    pub fn check_row(row: usize, n: usize) -> Result<usize> {
        if row < n {
            Ok(row)
        } else {
            Err(MatrixError::Index {
                name: "n",
                value: row,
                max: n,
            })
        }
    }

    /// Check a column index against `m`.
    #[inline]
    pub fn check_col(col: usize, m: usize) -> Result<usize> {
        if col < m {
            Ok(col)
        } else {
            Err(MatrixError::Index {
                name: "m",
                value: col,
                max: m,
            })
        }
    }
}

/// Result type for eidolon_io operations.
pub type Result<T> = std::result::Result<T, MatrixError>;
