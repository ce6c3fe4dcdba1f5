//! # eidolon_core
//!
//! Geometry and color mathematics for the Eidolon data backbone.
//!
//! This crate holds the storage-independent algorithms that operate on node positions,
//! field values and colors: element basis functions, point-in-element search, ray
//! queries, plane slicing, spline curves and color spectra. Containers for the data
//! live in `eidolon_io`.
//!
//! ## Features
//!
//! - **no_std compatible**: only `alloc` is required
//! - **Closed-form element search**: linear tetrahedra solved directly, hexahedra by
//!   a fixed five-tetrahedron decomposition
//! - **Option for misses**: a ray that misses or a point outside an element yields `None`
//!
//! ## Feature Flags
//!
//! - `std` (default): enables `std::error::Error` and the shared NURBS knot cache
//! - `serde`: derives `Serialize`/`Deserialize` on the value types
//!
//! ## Modules
//!
//! - [`types`]: `Vec3`, `Color` and scalar helpers
//! - [`rotator`]: quaternion rotations
//! - [`transform`]: `Mat4` and translate-scale-rotate transforms
//! - [`basis`]: linear, NURBS and Catmull-Rom basis functions
//! - [`search`]: point-in-tetrahedron and point-in-hexahedron search
//! - [`ray`]: ray intersection queries
//! - [`slice`]: plane and iso-value slicing of elements
//! - [`curve`]: control-point splines
//! - [`spectrum`]: position to color mapping
//! - [`error`]: error types
//!
//! ## Usage
//!
//! ```
//! use eidolon_core::prelude::*;
//!
//! let tet = [Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::Z];
//! let xi = point_in_tet(Vec3::new(0.1, 0.2, 0.3), &tet).unwrap();
//! assert!(xi.approx_eq(Vec3::new(0.1, 0.2, 0.3)));
//!
//! let ray = Ray::new(Vec3::new(0.25, 0.25, 1.0), -Vec3::Z).unwrap();
//! let hit = ray.intersects_tri(Vec3::ZERO, Vec3::X, Vec3::Y).unwrap();
//! assert!((hit.t - 1.0).abs() < 1e-12);
//! ```

#![no_std]
#![warn(missing_docs)]
#![warn(clippy::all)]

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

pub mod basis;
pub mod curve;
pub mod error;
pub mod ray;
pub mod rotator;
pub mod search;
pub mod slice;
pub mod spectrum;
pub mod transform;
pub mod types;

/// Prelude module for convenient imports.
///
/// Provides the most commonly used types and functions.
pub mod prelude {
    pub use crate::basis::{
        apply_basis, catmull_rom, default_knots, hex1_linear, nurbs_basis, nurbs_default,
        tet1_linear, HEX_CORNERS,
    };
    pub use crate::curve::{ControlCurve, Vec3Curve};
    pub use crate::error::{CoreError, Result};
    pub use crate::ray::{Ray, TriHit};
    pub use crate::rotator::Rotator;
    pub use crate::search::{
        bound_box, point_in_hex, point_in_tet, point_search_lin_hex, point_search_lin_tet,
    };
    pub use crate::slice::{hex_plane_slice, hex_value_intersects, EdgeIntersect};
    pub use crate::spectrum::Spectrum;
    pub use crate::transform::{Mat4, Transform};
    pub use crate::types::{Color, IndexVal, Real, Rgba, Vec3, EPSILON};
}

// Re-export everything at crate root for convenience
pub use basis::{
    apply_basis, catmull_rom, default_knots, hex1_linear, nurbs_basis, nurbs_default, scale_xi,
    tet1_linear, Knots, HEX_CORNERS,
};
pub use curve::{ControlCurve, CurveValue, Vec3Curve};
pub use error::{CoreError, Result};
pub use ray::{Ray, TriHit};
pub use rotator::Rotator;
pub use search::{
    bound_box, point_in_hex, point_in_tet, point_search_lin_hex, point_search_lin_tet,
    tet_volume, xi_in_tet, HEX_DIV_TETS,
};
pub use slice::{
    hex_plane_slice, hex_value_intersects, line_plane_slice, sort_circular, tet_value_intersects,
    tri_plane_slice, EdgeIntersect, EdgeList, PointList, SliceList, HEX_EDGES,
};
pub use spectrum::Spectrum;
pub use transform::{Mat4, Transform};
pub use types::{
    clamp, equals_epsilon, lerp, lerp_xi, Color, IndexVal, Real, Rgba, Vec3, EPSILON, PI,
};
