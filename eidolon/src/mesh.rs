//! Ray casting and geometry over triangle meshes stored in matrices.
//!
//! A mesh is a `Vec3Matrix` of node positions (column 0) and an `IndexMatrix` of
//! triangles, one per row, whose first three columns index into the nodes.

use eidolon_core::{bound_box, Ray, Real, TriHit, Vec3};
use eidolon_io::{IndexMatrix, Matrix, RealMatrix, Vec3Matrix};

use crate::error::{EidolonError, Result};

/// Precomputed bounding spheres, one row per triangle.
#[derive(Debug, Clone, Copy)]
pub struct TriSpheres<'a> {
    /// Sphere centers.
    pub centers: &'a Vec3Matrix,
    /// Squared sphere radii.
    pub radii_sq: &'a RealMatrix,
}

/// A triangle struck by a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshHit {
    /// Row of the triangle in the index matrix.
    pub tri: usize,
    /// Distance and barycentric coordinates of the hit.
    pub hit: TriHit,
}

fn tri_nodes(nodes: &Vec3Matrix, inds: &IndexMatrix, row: usize) -> Result<[Vec3; 3]> {
    let mut out = [Vec3::ZERO; 3];
    for (k, v) in out.iter_mut().enumerate() {
        *v = nodes.get_at(inds.at(row, k) as usize, 0)?;
    }
    Ok(out)
}

fn sphere_of(tri: &[Vec3; 3]) -> (Vec3, Real) {
    let center = (tri[0] + tri[1] + tri[2]) / 3.0;
    let rad_sq = tri
        .iter()
        .map(|v| center.dist_to_sq(*v))
        .fold(0.0, Real::max);
    (center, rad_sq)
}

/// Find the triangles of a mesh struck by `ray`, in index order.
///
/// Each triangle is first tested against its bounding sphere: the point on the
/// ray as far along as the sphere center is from the ray origin must fall inside
/// the sphere. With `spheres` the centers and squared radii are read from the
/// given matrices and only as many triangles as all three matrices have rows are
/// tested; without, they are computed on the fly.
///
/// At most `max_results` hits are returned when given, and the triangle at row
/// `exclude` is skipped, which suits rays cast from a point on the mesh itself.
pub fn intersects_tri_mesh(
    ray: &Ray,
    nodes: &Vec3Matrix,
    inds: &IndexMatrix,
    spheres: Option<TriSpheres<'_>>,
    max_results: Option<usize>,
    exclude: Option<usize>,
) -> Result<Vec<MeshHit>> {
    EidolonError::require_columns(inds, 3)?;

    let mut len = inds.n();
    if let Some(s) = spheres {
        len = len.min(s.centers.n()).min(s.radii_sq.n());
    }

    let limit = max_results.unwrap_or(usize::MAX);
    let mut results = Vec::new();

    for tri in 0..len {
        if results.len() >= limit {
            break;
        }
        if exclude == Some(tri) {
            continue;
        }

        let verts = tri_nodes(nodes, inds, tri)?;
        let (center, rad_sq) = match spheres {
            Some(s) => (s.centers.at(tri, 0), s.radii_sq.at(tri, 0)),
            None => sphere_of(&verts),
        };

        let near = ray.position_at(center.dist_to(ray.position()));
        if near.dist_to_sq(center) > rad_sq {
            continue;
        }

        if let Some(hit) = ray.intersects_tri(verts[0], verts[1], verts[2]) {
            results.push(MeshHit { tri, hit });
        }
    }

    Ok(results)
}

/// Bounding sphere centers and squared radii for every triangle, for reuse with
/// [`intersects_tri_mesh`].
pub fn calculate_tri_spheres(
    nodes: &Vec3Matrix,
    inds: &IndexMatrix,
) -> Result<(Vec3Matrix, RealMatrix)> {
    EidolonError::require_columns(inds, 3)?;

    let n = inds.n();
    let mut centers: Vec3Matrix = Matrix::new("centers", "", n, 1, false)?;
    let mut radii: RealMatrix = Matrix::new("radii2", "", n, 1, false)?;

    for tri in 0..n {
        let (c, r) = sphere_of(&tri_nodes(nodes, inds, tri)?);
        centers.set_unchecked(c, tri, 0);
        radii.set_unchecked(r, tri, 0);
    }

    Ok((centers, radii))
}

/// Minimum and maximum corners of all positions, or `None` if there are none.
pub fn calculate_bound_box(nodes: &Vec3Matrix) -> Option<(Vec3, Vec3)> {
    bound_box(nodes.data())
}

/// Per-node normals: the normalized sum of the unit normals of every triangle
/// using the node. Nodes used by no triangle get the zero vector.
pub fn calculate_tri_normals(nodes: &Vec3Matrix, inds: &IndexMatrix) -> Result<Vec3Matrix> {
    EidolonError::require_columns(inds, 3)?;

    let mut norms: Vec3Matrix = Matrix::new("norms", "", nodes.n(), 1, false)?;

    for tri in 0..inds.n() {
        let [a, b, c] = tri_nodes(nodes, inds, tri)?;
        let norm = a.plane_norm(b, c);
        for k in 0..3 {
            *norms.at_mut(inds.at(tri, k) as usize, 0) += norm;
        }
    }

    norms.apply(|v, _, _| v.norm(), eidolon_io::CellRange::ALL);
    Ok(norms)
}
