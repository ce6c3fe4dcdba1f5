//! Element basis functions.
//!
//! Linear nodal Lagrange tetrahedron and hexahedron bases, NURBS basis evaluation
//! by the Cox-de Boor recursion, and Catmull-Rom spline weights.
//!
//! ## Hexahedron Node Ordering
//!
//! Node `i` of a hexahedron sits at the xi corner whose bits are `(x, y, z) = (i & 1, (i >> 1) & 1, i >> 2)`:
//!
//! ```text
//!        6----------7
//!       /|         /|
//!      4----------5 |
//!      | |        | |
//!      | 2--------|-3
//!      |/         |/
//!      0----------1
//! ```

use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::types::{lerp, Real, Vec3};

/// Denominators below this are treated as zero in the Cox-de Boor recursion.
const NURBS_DENOM_EPSILON: Real = 1e-7;

/// Shared knot vector as returned by [`default_knots`].
pub type Knots = Arc<[Real]>;

/// Linear tetrahedron basis: `[1 - a - b - c, a, b, c]`.
#[inline]
pub fn tet1_linear(xi: Vec3) -> [Real; 4] {
    [1.0 - xi.x - xi.y - xi.z, xi.x, xi.y, xi.z]
}

/// Linear hexahedron basis, one coefficient per node in the order shown in the module docs.
#[inline]
pub fn hex1_linear(xi: Vec3) -> [Real; 8] {
    let (xi0, xi1, xi2) = (xi.x, xi.y, xi.z);
    let xi012 = xi0 * xi1 * xi2;
    let xi12 = xi1 * xi2;
    let xi01 = xi0 * xi1;
    let xi02 = xi0 * xi2;

    [
        1.0 - xi0 - xi1 - xi2 + xi01 + xi02 + xi12 - xi012,
        xi0 - xi01 - xi02 + xi012,
        xi1 - xi01 - xi12 + xi012,
        xi01 - xi012,
        xi2 - xi02 - xi12 + xi012,
        xi02 - xi012,
        xi12 - xi012,
        xi012,
    ]
}

/// Apply basis coefficients to node values.
#[inline]
pub fn apply_basis<const N: usize>(coeffs: &[Real; N], nodes: &[Vec3; N]) -> Vec3 {
    coeffs
        .iter()
        .zip(nodes.iter())
        .fold(Vec3::ZERO, |acc, (c, n)| acc + *n * *c)
}

/// The xi corners of the hexahedron nodes.
pub const HEX_CORNERS: [Vec3; 8] = [
    Vec3::new(0.0, 0.0, 0.0),
    Vec3::new(1.0, 0.0, 0.0),
    Vec3::new(0.0, 1.0, 0.0),
    Vec3::new(1.0, 1.0, 0.0),
    Vec3::new(0.0, 0.0, 1.0),
    Vec3::new(1.0, 0.0, 1.0),
    Vec3::new(0.0, 1.0, 1.0),
    Vec3::new(1.0, 1.0, 1.0),
];

/// NURBS basis value for control point `ctrl_pt` of the given degree at `xi`.
///
/// `knots` must hold at least `ctrl_pt + degree + 2` values.
pub fn nurbs_basis(ctrl_pt: usize, degree: usize, xi: Real, knots: &[Real]) -> Real {
    let pt1 = knots[ctrl_pt];
    let pt2 = knots[ctrl_pt + 1];

    if degree == 0 {
        return if pt1 <= xi && xi <= pt2 { 1.0 } else { 0.0 };
    }

    let pt3 = knots[ctrl_pt + degree];
    let pt4 = knots[ctrl_pt + degree + 1];

    let dd1 = pt3 - pt1;
    let f = if libm::fabs(dd1) < NURBS_DENOM_EPSILON {
        0.0
    } else {
        (xi - pt1) / dd1
    };

    let dd2 = pt4 - pt2;
    let g = if libm::fabs(dd2) < NURBS_DENOM_EPSILON {
        0.0
    } else {
        (pt4 - xi) / dd2
    };

    let b1 = nurbs_basis(ctrl_pt, degree - 1, xi, knots);
    let b2 = nurbs_basis(ctrl_pt + 1, degree - 1, xi, knots);

    f * b1 + g * b2
}

fn compute_knots(length: usize, degree: usize) -> Knots {
    let count = length + degree;
    let step = 1.0 / count as Real;
    let mut knots: Vec<Real> = (0..count).map(|i| i as Real * step).collect();
    knots.push(1.0);
    knots.into()
}

/// Uniform knot vector of `length + degree + 1` values over `[0, 1]`.
///
/// With the `std` feature the vectors are cached per `(length, degree)`.
#[cfg(feature = "std")]
pub fn default_knots(length: usize, degree: usize) -> Knots {
    use once_cell::sync::Lazy;
    use parking_lot::Mutex;
    use std::collections::HashMap;

    static CACHE: Lazy<Mutex<HashMap<(usize, usize), Knots>>> =
        Lazy::new(|| Mutex::new(HashMap::new()));

    CACHE
        .lock()
        .entry((length, degree))
        .or_insert_with(|| compute_knots(length, degree))
        .clone()
}

/// Uniform knot vector of `length + degree + 1` values over `[0, 1]`.
#[cfg(not(feature = "std"))]
pub fn default_knots(length: usize, degree: usize) -> Knots {
    compute_knots(length, degree)
}

/// Map a unit `xi` into the valid parameter range of a knot vector.
#[inline]
pub fn scale_xi(xi: Real, degree: usize, knots: &[Real]) -> Real {
    lerp(xi, knots[degree], knots[knots.len() - degree - 1])
}

/// Tensor-product NURBS basis over a `ul x vl x wl` control lattice with default knots.
///
/// Coefficients are indexed `i + j * ul + k * ul * vl` and normalized to sum to one.
pub fn nurbs_default(xi: Vec3, lengths: [usize; 3], degrees: [usize; 3]) -> Vec<Real> {
    let [ul, vl, wl] = lengths;
    let axis = |t: Real, len: usize, degree: usize| -> Vec<Real> {
        let knots = default_knots(len, degree);
        let t = scale_xi(t, degree, &knots);
        (0..len).map(|i| nurbs_basis(i, degree, t, &knots)).collect()
    };

    let ub = axis(xi.x, ul, degrees[0]);
    let vb = axis(xi.y, vl, degrees[1]);
    let wb = axis(xi.z, wl, degrees[2]);

    let mut coeffs = Vec::with_capacity(ul * vl * wl);
    for w in &wb {
        for v in &vb {
            for u in &ub {
                coeffs.push(u * v * w);
            }
        }
    }

    let denom: Real = coeffs.iter().sum();
    if denom != 0.0 {
        for c in coeffs.iter_mut() {
            *c /= denom;
        }
    }
    coeffs
}

/// Catmull-Rom weights ordered `[value 1, value 2, derivative 1, derivative 2]`.
#[inline]
pub fn catmull_rom(t: Real) -> [Real; 4] {
    let t2 = t * t;
    let t3 = t2 * t;
    let t3_05 = t3 * 0.5;
    let t3_15 = t3 * 1.5;
    let t_05 = t * 0.5;

    [
        t3_15 - 2.5 * t2 + 1.0,
        2.0 * t2 + t_05 - t3_15,
        t2 - t_05 - t3_05,
        t3_05 - 0.5 * t2,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sum<const N: usize>(c: &[Real; N]) -> Real {
        c.iter().sum()
    }

    #[test]
    fn test_tet_partition_of_unity() {
        let c = tet1_linear(Vec3::new(0.2, 0.3, 0.1));
        assert!((sum(&c) - 1.0).abs() < 1e-12);
        assert_eq!(tet1_linear(Vec3::ZERO), [1.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_hex_corners_select_node() {
        for (i, corner) in HEX_CORNERS.iter().enumerate() {
            let c = hex1_linear(*corner);
            for (j, v) in c.iter().enumerate() {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_eq!(*v, expected, "corner {} coeff {}", i, j);
            }
        }
    }

    #[test]
    fn test_hex_center_is_even() {
        let c = hex1_linear(Vec3::splat(0.5));
        for v in c {
            assert!((v - 0.125).abs() < 1e-12);
        }
    }

    #[test]
    fn test_apply_basis_reproduces_position() {
        let p = Vec3::new(0.3, 0.6, 0.9);
        assert!(apply_basis(&hex1_linear(p), &HEX_CORNERS).approx_eq(p));
    }

    #[test]
    fn test_default_knots() {
        let k = default_knots(4, 2);
        assert_eq!(k.len(), 7);
        assert_eq!(k[0], 0.0);
        assert_eq!(k[6], 1.0);
        assert!(k.windows(2).all(|w| w[0] < w[1]));

        // cached instances are shared
        let again = default_knots(4, 2);
        assert_eq!(&*k, &*again);
    }

    #[test]
    fn test_nurbs_default_normalized() {
        let c = nurbs_default(Vec3::new(0.25, 0.5, 0.75), [4, 3, 3], [2, 2, 1]);
        assert_eq!(c.len(), 36);
        assert!((c.iter().sum::<Real>() - 1.0).abs() < 1e-9);
        assert!(c.iter().all(|v| *v >= 0.0));
    }

    #[test]
    fn test_nurbs_degree_zero_is_box() {
        let knots = [0.0, 0.5, 1.0];
        assert_eq!(nurbs_basis(0, 0, 0.25, &knots), 1.0);
        assert_eq!(nurbs_basis(1, 0, 0.25, &knots), 0.0);
    }

    #[test]
    fn test_catmull_rom_endpoints() {
        assert_eq!(catmull_rom(0.0), [1.0, 0.0, 0.0, 0.0]);
        let c = catmull_rom(1.0);
        assert!((c[0]).abs() < 1e-12);
        assert!((c[1] - 1.0).abs() < 1e-12);
        assert!((c[0] + c[1] - 1.0).abs() < 1e-12);
    }
}
