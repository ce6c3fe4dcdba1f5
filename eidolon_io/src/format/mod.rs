//! Matrix file formats.
//!
//! Two layouts are supported:
//!
//! - **Binary** ([`binary`]): an optional run of native-endian `i32` header values
//!   followed by a raw row-major dump of the cells.
//! - **Text** ([`text`]): header lines of integers, then one row per non-blank
//!   line with whitespace-separated values.
//!
//! ```text
//! binary: ┌──────────────────────┬──────────────────────────────────┐
//!         │ header: [i32; count] │ cells: [T; n * m], native endian │
//!         └──────────────────────┴──────────────────────────────────┘
//! ```
//!
//! Neither format records the element type or dimensions; the caller supplies a
//! matrix of the right shape (binary) or width (text).

pub mod binary;
pub mod text;

pub use binary::{read_binary_header, HEADER_VALUE_SIZE};
