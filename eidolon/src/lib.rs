//! # eidolon
//!
//! Matrix-level geometry and imaging algorithms for Eidolon data.
//!
//! This crate sits on top of [`eidolon_io`] (the named, optionally shared
//! [`Matrix`] container) and [`eidolon_core`] (vectors, rays, transforms,
//! element basis functions and color spectra). It provides the routines that
//! work over whole matrices:
//!
//! - **Meshes** ([`mesh`]): ray casting against indexed triangle meshes with
//!   bounding-sphere pruning, bounding boxes and per-node normals
//! - **Images** ([`image`]): bilinear and stack sampling, resampling an image
//!   stack through a pair of transforms, histograms and region bounds
//! - **Reductions** ([`stats`]): sums, ranges and value counts
//! - **Color mapping** ([`colormap`]): field values to colors via a [`Spectrum`]
//!
//! ## Quick Start
//!
//! ```
//! use eidolon::prelude::*;
//!
//! let nodes: Vec3Matrix = Matrix::from_data(
//!     "nodes",
//!     "",
//!     &[Vec3::ZERO, Vec3::X, Vec3::Y],
//!     3,
//!     1,
//!     false,
//! )?;
//! let inds: IndexMatrix = Matrix::from_data("inds", "", &[0, 1, 2], 1, 3, false)?;
//!
//! let ray = Ray::new(Vec3::new(0.2, 0.2, 1.0), -Vec3::Z)?;
//! let hits = intersects_tri_mesh(&ray, &nodes, &inds, None, None, None)?;
//! assert_eq!(hits.len(), 1);
//! assert!((hits[0].hit.t - 1.0).abs() < 1e-12);
//! # Ok::<(), EidolonError>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `rayon`: process image rows in parallel in [`interpolate_image_stack`] and
//!   [`fill_color_matrix`]; results are identical to the sequential path
//! - `serde`: forwards to the `serde` features of `eidolon_core` and `eidolon_io`
//!
//! ## Concurrency
//!
//! Nothing here locks. A shared matrix may be attached by several processes at
//! once; callers serialize access to it themselves.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod colormap;
pub mod error;
pub mod image;
pub mod mesh;
pub mod stats;

// Re-export main types
pub use colormap::fill_color_matrix;
pub use error::{EidolonError, Result};
pub use image::{
    bilerp, calculate_bound_square, calculate_image_histogram, convert_stream_to_real,
    cubic_interp_matrices, find_boundary_points, image_stack_value, interpolate_image_stack,
    trilerp,
};
pub use mesh::{
    calculate_bound_box, calculate_tri_normals, calculate_tri_spheres, intersects_tri_mesh,
    MeshHit, TriSpheres,
};
pub use stats::{count_values_in_range, minmax_matrix, sum_matrix};

// Re-export types from eidolon_io
pub use eidolon_io::{
    CellRange, ColorMatrix, Element, IndexMatrix, Matrix, MatrixConfig, MatrixError, Meta, Op,
    RealMatrix, SharedDescriptor, Vec3Matrix,
};

// Re-export eidolon_core types for convenience
pub use eidolon_core::{
    Color, CoreError, IndexVal, Mat4, Ray, Real, Rotator, Spectrum, Transform, TriHit, Vec3,
    EPSILON,
};

/// Prelude module for convenient imports.
///
/// ```
/// use eidolon::prelude::*;
/// ```
pub mod prelude {
    pub use crate::colormap::fill_color_matrix;
    pub use crate::error::{EidolonError, Result};
    pub use crate::image::{image_stack_value, interpolate_image_stack};
    pub use crate::mesh::{intersects_tri_mesh, MeshHit, TriSpheres};

    pub use eidolon_io::{
        CellRange, ColorMatrix, IndexMatrix, Matrix, Op, RealMatrix, SharedDescriptor, Vec3Matrix,
    };

    pub use eidolon_core::{Color, Ray, Real, Spectrum, Transform, Vec3};
}
