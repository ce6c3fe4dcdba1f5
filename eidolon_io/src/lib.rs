//! eidolon_io - matrix storage, shared memory and file formats for Eidolon data.
//!
//! This crate provides the container layer: a named, typed, row-major
//! [`Matrix<T>`] whose cells live either on the local heap or in a POSIX shared
//! memory segment another process can attach to.
//!
//! # Element Types
//!
//! The `T` parameter is any [`Element`]:
//! - `Real` (`f64`): field values
//! - `IndexVal` (`u32`): topology indices
//! - `Vec3`: node positions
//! - `Color`: per-node colors
//!
//! # Core Types
//!
//! - [`Matrix<T>`]: the container, with checked and unchecked cell access
//! - [`Storage<T>`]: local, shared-creator or shared-attached backing
//! - [`SharedDescriptor`]: what another process needs to attach
//! - [`Meta`]: sorted string metadata
//! - [`CellRange`] and [`Op`]: element-wise arithmetic over rectangular ranges
//! - [`MatrixConfig`]: growth and shared naming settings
//!
//! # Example
//!
//! ```
//! use eidolon_io::{CellRange, Matrix, Op};
//! use eidolon_core::Real;
//!
//! let mut field: Matrix<Real> = Matrix::new("field", "scalar", 0, 2, false).unwrap();
//! field.append_row(&[1.0, 2.0]).unwrap();
//! field.append_row(&[3.0, 4.0]).unwrap();
//!
//! field.scalar_op(Op::Mul, &2.0, CellRange::cols(1, 2));
//! assert_eq!(field.data(), &[1.0, 4.0, 3.0, 8.0]);
//!
//! // Move into shared memory and hand the descriptor to another process
//! field.set_shared(true).unwrap();
//! let desc = field.descriptor().unwrap();
//! let view: Matrix<Real> = Matrix::from_descriptor(&desc).unwrap();
//! assert_eq!(view.get_at(1, 1).unwrap(), 8.0);
//! ```
//!
//! # Crate Features
//!
//! - `serde`: derives `Serialize`/`Deserialize` on [`MatrixConfig`], [`Meta`] and
//!   [`SharedDescriptor`]
//!
//! Shared memory needs a Unix platform.

#![warn(missing_docs)]
#![warn(clippy::all)]

#[cfg(not(unix))]
compile_error!("eidolon_io requires a Unix platform for shared memory");

pub mod config;
pub mod element;
pub mod error;
pub mod format;
pub mod matrix;
pub mod meta;
pub mod ops;
pub mod shared;

// Re-export core types from eidolon_core
pub use eidolon_core::{Color, IndexVal, Real, Rotator, Transform, Vec3};

// Re-export main types
pub use config::MatrixConfig;
pub use element::Element;
pub use error::{MatrixError, Result};
pub use matrix::{Matrix, Storage};
pub use meta::Meta;
pub use ops::{Arith, CellRange, Op};

// Re-export format and shared memory types
pub use format::{read_binary_header, HEADER_VALUE_SIZE};
pub use shared::{shared_name, unlink, SharedAttached, SharedCreator, SharedDescriptor};

/// Matrix of reals.
pub type RealMatrix = Matrix<Real>;
/// Matrix of indices.
pub type IndexMatrix = Matrix<IndexVal>;
/// Matrix of 3-vectors.
pub type Vec3Matrix = Matrix<Vec3>;
/// Matrix of colors.
pub type ColorMatrix = Matrix<Color>;
