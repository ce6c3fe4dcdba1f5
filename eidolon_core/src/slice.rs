//! Plane and iso-value slicing of triangles, segments, tetrahedra and hexahedra.

use core::cmp::Ordering;

use crate::types::{lerp_xi, Real, Vec3};

/// Edges of a hexahedron as node index pairs, in the node ordering of [`crate::basis::hex1_linear`].
pub const HEX_EDGES: [(usize, usize); 12] = [
    (0, 1),
    (1, 3),
    (3, 2),
    (2, 0),
    (4, 5),
    (5, 7),
    (7, 6),
    (6, 4),
    (0, 4),
    (1, 5),
    (2, 6),
    (3, 7),
];

/// A hexahedron edge crossing: the edge's node indices and the fraction along it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EdgeIntersect {
    /// First node of the edge.
    pub from: usize,
    /// Second node of the edge.
    pub to: usize,
    /// Fraction of the way from `from` to `to`.
    pub t: Real,
}

/// Where the edges `a-b`, `b-c` and `c-a` of a triangle cross a plane.
///
/// Each value is the signed distance of the edge's first node divided by the summed
/// absolute distances of both nodes, so its magnitude is the fraction along the edge
/// and its sign tells which side the first node is on. All zero if the triangle is
/// degenerate or does not straddle the plane.
pub fn tri_plane_slice(plane_pt: Vec3, plane_norm: Vec3, a: Vec3, b: Vec3, c: Vec3) -> [Real; 3] {
    if a.approx_eq(b) || b.approx_eq(c) || a.approx_eq(c) {
        return [0.0; 3];
    }

    let ad = a.plane_dist(plane_pt, plane_norm);
    let bd = b.plane_dist(plane_pt, plane_norm);
    let cd = c.plane_dist(plane_pt, plane_norm);

    let one_side = (ad >= 0.0 && bd >= 0.0 && cd >= 0.0) || (ad <= 0.0 && bd <= 0.0 && cd <= 0.0);
    if (ad == bd && bd == cd) || one_side {
        return [0.0; 3];
    }

    let frac = |d: Real, e: Real| {
        let sum = libm::fabs(d) + libm::fabs(e);
        if sum > 0.0 {
            d / sum
        } else {
            0.0
        }
    };

    [frac(ad, bd), frac(bd, cd), frac(cd, ad)]
}

/// Signed crossing fraction of segment `a-b` with a plane, as for [`tri_plane_slice`].
///
/// Zero if the segment is degenerate or does not straddle the plane.
pub fn line_plane_slice(plane_pt: Vec3, plane_norm: Vec3, a: Vec3, b: Vec3) -> Real {
    if a.approx_eq(b) {
        return 0.0;
    }

    let ad = a.plane_dist(plane_pt, plane_norm);
    let bd = b.plane_dist(plane_pt, plane_norm);

    if ad == bd || (ad >= 0.0 && bd >= 0.0) || (ad <= 0.0 && bd <= 0.0) {
        return 0.0;
    }

    let sum = libm::fabs(ad) + libm::fabs(bd);
    if sum > 0.0 {
        ad / sum
    } else {
        0.0
    }
}

/// Fraction along the edge `a -> b` where the linear field equals `val`.
fn tet_edge_intersect(val: Real, a: Real, b: Real) -> Option<Real> {
    if a <= val && val <= b {
        Some(lerp_xi(val, a, b))
    } else if b <= val && val <= a {
        Some(1.0 - lerp_xi(val, b, a))
    } else {
        None
    }
}

/// Where the iso-value `val` crosses each tetrahedron edge.
///
/// Edges are ordered `a-b, a-c, a-d, b-c, b-d, c-d`.
pub fn tet_value_intersects(val: Real, vals: [Real; 4]) -> [Option<Real>; 6] {
    let [a, b, c, d] = vals;
    [
        tet_edge_intersect(val, a, b),
        tet_edge_intersect(val, a, c),
        tet_edge_intersect(val, a, d),
        tet_edge_intersect(val, b, c),
        tet_edge_intersect(val, b, d),
        tet_edge_intersect(val, c, d),
    ]
}

/// Edges of a hexahedron crossed by the iso-value `val`, at most six.
pub fn hex_value_intersects(val: Real, vals: &[Real; 8]) -> EdgeList {
    let abs = vals.map(|v| libm::fabs(val - v));
    let mut result = EdgeList::new();

    for &(i1, i2) in HEX_EDGES.iter() {
        if result.is_full() {
            break;
        }

        let (h1, h2) = (vals[i1], vals[i2]);
        let crosses = if h1 >= val { h2 < val } else { h2 >= val };
        if crosses {
            let sum = abs[i1] + abs[i2];
            let t = if sum == 0.0 { 0.0 } else { abs[i1] / sum };
            result.push(EdgeIntersect { from: i1, to: i2, t });
        }
    }

    result
}

/// Polygon where a plane cuts a hexahedron, vertices in circular order about the plane normal.
///
/// Returns up to six points; fewer than three means the plane misses or only touches
/// the element.
pub fn hex_plane_slice(plane_pt: Vec3, plane_norm: Vec3, nodes: &[Vec3; 8]) -> PointList {
    let heights = nodes.map(|n| n.plane_dist(plane_pt, plane_norm));
    let mut pts = PointList::new();

    for hit in hex_value_intersects(0.0, &heights).iter() {
        pts.push(nodes[hit.from].lerp(hit.t, nodes[hit.to]));
    }

    sort_circular(pts.as_mut_slice(), plane_norm);
    pts
}

/// Order points circularly about `norm` by insertion sort, anchored at the first point.
pub fn sort_circular(pts: &mut [Vec3], norm: Vec3) {
    let Some(&anchor) = pts.first() else {
        return;
    };

    for j in 1..pts.len() {
        let mut jj = j;
        while jj > 0 && anchor.plane_order(norm, pts[jj], pts[jj - 1]) == Ordering::Greater {
            pts.swap(jj, jj - 1);
            jj -= 1;
        }
    }
}

/// Maximum number of crossings a plane can make with a hexahedron.
pub const MAX_HEX_INTERSECTS: usize = 6;

/// Inline list of at most [`MAX_HEX_INTERSECTS`] slice results.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliceList<T> {
    items: [T; MAX_HEX_INTERSECTS],
    len: usize,
}

/// Hexahedron edge crossings.
pub type EdgeList = SliceList<EdgeIntersect>;

/// Slice polygon vertices.
pub type PointList = SliceList<Vec3>;

impl<T: Copy + Default> Default for SliceList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy + Default> SliceList<T> {
    /// Create an empty list.
    pub fn new() -> Self {
        Self {
            items: [T::default(); MAX_HEX_INTERSECTS],
            len: 0,
        }
    }

    /// Append a value; ignored once the list is full.
    pub fn push(&mut self, v: T) {
        if self.len < MAX_HEX_INTERSECTS {
            self.items[self.len] = v;
            self.len += 1;
        }
    }
}

impl<T> SliceList<T> {
    /// Number of values stored.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// True once the list is at capacity.
    pub fn is_full(&self) -> bool {
        self.len == MAX_HEX_INTERSECTS
    }

    /// The stored values.
    pub fn as_slice(&self) -> &[T] {
        &self.items[..self.len]
    }

    /// The stored values, mutably.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.items[..self.len]
    }

    /// Iterate over the stored values.
    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.as_slice().iter()
    }
}

impl<T> core::ops::Index<usize> for SliceList<T> {
    type Output = T;

    fn index(&self, i: usize) -> &T {
        &self.as_slice()[i]
    }
}
