//! Point-in-element search for linear tetrahedra and hexahedra.
//!
//! A search returns the xi coordinate of the point within the element, or `None`
//! when the point lies outside it.

use crate::basis::{apply_basis, hex1_linear, tet1_linear};
use crate::transform::Mat4;
use crate::types::{Real, Vec3, EPSILON};

/// Sub-tetrahedra of the unit hexahedron, as xi corners, used for hexahedral search.
pub const HEX_DIV_TETS: [[Vec3; 4]; 5] = [
    [
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(1.0, 0.0, 1.0),
        Vec3::new(1.0, 1.0, 0.0),
        Vec3::new(0.0, 1.0, 1.0),
    ],
    [
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(1.0, 1.0, 0.0),
        Vec3::new(0.0, 1.0, 0.0),
        Vec3::new(0.0, 1.0, 1.0),
    ],
    [
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(1.0, 0.0, 1.0),
        Vec3::new(0.0, 1.0, 1.0),
        Vec3::new(0.0, 0.0, 1.0),
    ],
    [
        Vec3::new(1.0, 0.0, 1.0),
        Vec3::new(1.0, 1.0, 0.0),
        Vec3::new(0.0, 1.0, 1.0),
        Vec3::new(1.0, 1.0, 1.0),
    ],
    [
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(1.0, 1.0, 0.0),
        Vec3::new(1.0, 0.0, 1.0),
    ],
];

/// Axis-aligned bounds of a set of points.
pub fn bound_box(pts: &[Vec3]) -> Option<(Vec3, Vec3)> {
    let (first, rest) = pts.split_first()?;
    Some(rest.iter().fold((*first, *first), |(lo, hi), p| {
        (lo.min_vals(*p), hi.max_vals(*p))
    }))
}

/// Signed volume of the tetrahedron; negative when the element is inverted.
pub fn tet_volume(a: Vec3, b: Vec3, c: Vec3, d: Vec3) -> Real {
    let m = Mat4::new([
        [a.x, b.x, c.x, d.x],
        [a.y, b.y, c.y, d.y],
        [a.z, b.z, c.z, d.z],
        [1.0, 1.0, 1.0, 1.0],
    ]);
    -m.determinant() / 6.0
}

/// Solve for the xi coordinate of `pt` in the tetrahedron `nodes` by closed-form inverse.
///
/// The coordinate is computed for any point inside the tetrahedron's bounding box, even
/// if outside the tetrahedron itself; use [`point_in_tet`] for containment.
/// Returns `None` if the point is outside the bounding box or the element is degenerate.
pub fn point_search_lin_tet(pt: Vec3, nodes: &[Vec3; 4]) -> Option<Vec3> {
    let (minv, maxv) = bound_box(nodes)?;
    if !pt.in_aabb(minv, maxv) {
        return None;
    }

    let [n1, n2, n3, n4] = *nodes;
    let d = pt - n1;
    let d2 = n2 - n1;
    let d3 = n3 - n1;
    let d4 = n4 - n1;

    let det = d2.x * (d4.z * d3.y - d3.z * d4.y) - d2.y * (d4.z * d3.x - d3.z * d4.x)
        + d2.z * (d4.y * d3.x - d3.y * d4.x);
    if det == 0.0 {
        return None;
    }
    let inv_det = 1.0 / det;

    let xi1 = inv_det
        * (d.x * (d4.z * d3.y - d3.z * d4.y)
            + d.y * (d3.z * d4.x - d4.z * d3.x)
            + d.z * (d4.y * d3.x - d3.y * d4.x));
    let xi2 = inv_det
        * (d.x * (d2.z * d4.y - d4.z * d2.y)
            + d.y * (d4.z * d2.x - d2.z * d4.x)
            + d.z * (d2.y * d4.x - d4.y * d2.x));
    let xi3 = inv_det
        * (d.x * (d3.z * d2.y - d2.z * d3.y)
            + d.y * (d2.z * d3.x - d3.z * d2.x)
            + d.z * (d3.y * d2.x - d2.y * d3.x));

    Some(Vec3::new(xi1, xi2, xi3))
}

/// True if the xi coordinate lies inside the unit simplex.
#[inline]
pub fn xi_in_tet(xi: Vec3) -> bool {
    xi.is_in_unit_cube(EPSILON) && xi.x + xi.y + xi.z <= 1.0 + EPSILON
}

/// Find the xi coordinate of `pt` in the tetrahedron, or `None` if the point is outside.
pub fn point_in_tet(pt: Vec3, nodes: &[Vec3; 4]) -> Option<Vec3> {
    point_search_lin_tet(pt, nodes).filter(|xi| xi_in_tet(*xi))
}

/// Find the xi coordinate of `pt` in the hexahedron by testing its five sub-tetrahedra.
///
/// Nodes follow the ordering of [`crate::basis::hex1_linear`]. Exact for hexahedra with
/// planar faces.
pub fn point_search_lin_hex(pt: Vec3, nodes: &[Vec3; 8]) -> Option<Vec3> {
    let (minv, maxv) = bound_box(nodes)?;
    if !pt.in_aabb(minv, maxv) {
        return None;
    }

    HEX_DIV_TETS.iter().find_map(|div| {
        let tet = div.map(|corner| apply_basis(&hex1_linear(corner), nodes));
        point_in_tet(pt, &tet).map(|xi| apply_basis(&tet1_linear(xi), div))
    })
}

/// True if `pt` lies within the hexahedron.
#[inline]
pub fn point_in_hex(pt: Vec3, nodes: &[Vec3; 8]) -> bool {
    point_search_lin_hex(pt, nodes).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basis::HEX_CORNERS;

    fn unit_tet() -> [Vec3; 4] {
        [Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::Z]
    }

    #[test]
    fn test_tet_vertices() {
        let tet = unit_tet();
        assert_eq!(point_in_tet(tet[0], &tet), Some(Vec3::ZERO));
        assert_eq!(point_in_tet(tet[1], &tet), Some(Vec3::X));
        assert_eq!(point_in_tet(tet[3], &tet), Some(Vec3::Z));
    }

    #[test]
    fn test_tet_centroid() {
        let tet = [
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(3.0, 1.5, 1.0),
            Vec3::new(1.5, 4.0, 1.2),
            Vec3::new(1.2, 1.7, 3.5),
        ];
        let centroid = (tet[0] + tet[1] + tet[2] + tet[3]) / 4.0;
        let xi = point_in_tet(centroid, &tet).unwrap();
        let bary = tet1_linear(xi);
        for b in bary {
            assert!(b > 0.0 && b < 1.0);
            assert!((b - 0.25).abs() < 1e-9);
        }
        assert!((bary.iter().sum::<Real>() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_tet_outside() {
        let tet = unit_tet();
        // inside the bounding box but beyond the slanted face
        assert_eq!(point_in_tet(Vec3::splat(0.9), &tet), None);
        assert_eq!(point_in_tet(Vec3::splat(2.0), &tet), None);
        assert!(point_search_lin_tet(Vec3::splat(0.9), &tet).is_some());
    }

    #[test]
    fn test_degenerate_tet() {
        let flat = [Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::new(1.0, 1.0, 0.0)];
        assert_eq!(point_search_lin_tet(Vec3::new(0.2, 0.2, 0.0), &flat), None);
    }

    #[test]
    fn test_tet_volume() {
        let v = tet_volume(Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::Z);
        assert!((v.abs() - 1.0 / 6.0).abs() < 1e-12);
        let inverted = tet_volume(Vec3::ZERO, Vec3::Y, Vec3::X, Vec3::Z);
        assert!((v + inverted).abs() < 1e-12);
    }

    #[test]
    fn test_hex_vertices() {
        assert_eq!(point_search_lin_hex(HEX_CORNERS[0], &HEX_CORNERS), Some(Vec3::ZERO));
        assert_eq!(
            point_search_lin_hex(HEX_CORNERS[7], &HEX_CORNERS),
            Some(Vec3::splat(1.0))
        );
    }

    #[test]
    fn test_hex_centroid_scaled() {
        let nodes = HEX_CORNERS.map(|c| c * Vec3::new(2.0, 3.0, 4.0) + Vec3::splat(-1.0));
        let centroid = nodes.iter().fold(Vec3::ZERO, |a, n| a + *n) / 8.0;
        let xi = point_search_lin_hex(centroid, &nodes).unwrap();
        for c in xi.as_array() {
            assert!(c > 0.0 && c < 1.0);
            assert!((c - 0.5).abs() < 1e-9);
        }
    }

    #[test]
    fn test_hex_interior_point() {
        let p = Vec3::new(0.8, 0.1, 0.3);
        let xi = point_search_lin_hex(p, &HEX_CORNERS).unwrap();
        assert!(xi.dist_to(p) < 1e-9);
    }

    #[test]
    fn test_hex_outside() {
        assert_eq!(point_search_lin_hex(Vec3::splat(1.5), &HEX_CORNERS), None);
        assert!(!point_in_hex(Vec3::new(-0.1, 0.5, 0.5), &HEX_CORNERS));
    }
}
