//! Shared memory backing for matrices.
//!
//! A shared matrix keeps its cells in a POSIX shared memory segment so another
//! process can map the same rows. The process that creates a segment owns its name;
//! any other process attaches by name using a [`SharedDescriptor`].
//!
//! # Naming
//!
//! ```text
//! __viz__{ppid}_{pid}_{name}            first attempt
//! __viz__{ppid}_{pid}_{counter:x}_{name} after a name collision
//! ```
//!
//! # Lifecycle
//!
//! | Role              | Drop                |
//! |-------------------|---------------------|
//! | [`SharedCreator`]  | unmap, then unlink  |
//! | [`SharedAttached`] | unmap only          |
//!
//! There is no locking across processes. Writers and readers coordinate outside
//! this crate.

pub mod name;
pub mod segment;

pub use name::{shared_name, MAX_SHARED_NAME_LEN};
pub use segment::{unlink, SharedAttached, SharedCreator};

/// Everything another process needs to attach to a shared matrix.
///
/// Produced by [`crate::Matrix::descriptor`] and consumed by
/// [`crate::Matrix::from_descriptor`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SharedDescriptor {
    /// Matrix name.
    pub name: String,
    /// Free-form type tag.
    pub type_tag: String,
    /// Resolved system-wide segment name.
    pub shared_name: String,
    /// Metadata in `key||value||` form.
    pub meta: String,
    /// Row count.
    pub n: usize,
    /// Column count.
    pub m: usize,
}
