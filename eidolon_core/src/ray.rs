//! Ray queries against planes, boxes, spheres, other rays, segments and triangles.
//!
//! Misses are reported as `None` rather than negative sentinel distances.

use crate::error::{CoreError, Result};
use crate::types::{equals_epsilon, Real, Vec3, EPSILON, PI};

/// Intersection of a ray with a triangle.
///
/// The hit point is `(1 - u - v) * v0 + u * v1 + v * v2`, at distance `t` along the ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriHit {
    /// Distance along the ray.
    pub t: Real,
    /// Barycentric weight of the second vertex.
    pub u: Real,
    /// Barycentric weight of the third vertex.
    pub v: Real,
}

/// A ray with a normalized direction.
///
/// The inverse direction and its sign bits are cached for the slab test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pos: Vec3,
    dir: Vec3,
    inv_dir: Vec3,
    sign: [bool; 3],
}

impl Ray {
    /// Create a ray from an origin and direction.
    ///
    /// # Errors
    /// Returns `ZeroDirection` if `dir` has zero length.
    pub fn new(pos: Vec3, dir: Vec3) -> Result<Self> {
        let mut ray = Self {
            pos,
            dir: Vec3::Z,
            inv_dir: Vec3::Z,
            sign: [false; 3],
        };
        ray.set_direction(dir)?;
        Ok(ray)
    }

    /// Origin of the ray.
    #[inline]
    pub fn position(&self) -> Vec3 {
        self.pos
    }

    /// Normalized direction of the ray.
    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.dir
    }

    /// Point at distance `t` along the ray.
    #[inline]
    pub fn position_at(&self, t: Real) -> Vec3 {
        self.pos + self.dir * t
    }

    /// Move the origin.
    #[inline]
    pub fn set_position(&mut self, pos: Vec3) {
        self.pos = pos;
    }

    /// Change the direction, normalizing it.
    ///
    /// # Errors
    /// Returns `ZeroDirection` if `dir` has zero length; the ray is left unchanged.
    pub fn set_direction(&mut self, dir: Vec3) -> Result<()> {
        if dir.is_zero() {
            return Err(CoreError::ZeroDirection);
        }

        self.dir = dir.norm();
        // Infinite components keep the slab test correct for axis-aligned rays.
        self.inv_dir = Vec3::new(1.0 / self.dir.x, 1.0 / self.dir.y, 1.0 / self.dir.z);
        self.sign = [
            self.inv_dir.x < 0.0,
            self.inv_dir.y < 0.0,
            self.inv_dir.z < 0.0,
        ];
        Ok(())
    }

    /// Distance along the ray to the projection of `v`.
    #[inline]
    pub fn dist_to(&self, v: Vec3) -> Real {
        self.dir.dot(v - self.pos)
    }

    /// Distance along the ray at which it meets the plane.
    ///
    /// Negative if the plane is behind the origin, infinite if the ray is parallel to it.
    #[inline]
    pub fn intersects_plane(&self, plane_pos: Vec3, plane_norm: Vec3) -> Real {
        plane_norm.dot(plane_pos - self.pos) / plane_norm.dot(self.dir)
    }

    /// Entry and exit distances through the box `[minv, maxv]`, or `None` if the line misses it.
    ///
    /// Distances can be negative when the box lies behind the origin or contains it.
    pub fn intersects_aabb(&self, minv: Vec3, maxv: Vec3) -> Option<(Real, Real)> {
        let pick = |s: bool, a: Real, b: Real| if s { (b, a) } else { (a, b) };

        let (lo, hi) = pick(self.sign[0], minv.x, maxv.x);
        let mut tmin = (lo - self.pos.x) * self.inv_dir.x;
        let mut tmax = (hi - self.pos.x) * self.inv_dir.x;

        let (lo, hi) = pick(self.sign[1], minv.y, maxv.y);
        let tymin = (lo - self.pos.y) * self.inv_dir.y;
        let tymax = (hi - self.pos.y) * self.inv_dir.y;

        if tmin > tymax || tymin > tmax {
            return None;
        }
        if tymin > tmin || tmin.is_nan() {
            tmin = tymin;
        }
        if tymax < tmax || tmax.is_nan() {
            tmax = tymax;
        }

        let (lo, hi) = pick(self.sign[2], minv.z, maxv.z);
        let tzmin = (lo - self.pos.z) * self.inv_dir.z;
        let tzmax = (hi - self.pos.z) * self.inv_dir.z;

        if tmin > tzmax || tzmin > tmax {
            return None;
        }
        if tzmin > tmin || tmin.is_nan() {
            tmin = tzmin;
        }
        if tzmax < tmax || tmax.is_nan() {
            tmax = tzmax;
        }

        Some((tmin, tmax))
    }

    /// Distances `(near, far)` at which the ray crosses the sphere.
    ///
    /// When the ray misses, or the center is behind the origin, both values equal the
    /// distance to the projection of the center onto the ray.
    pub fn intersects_sphere(&self, center: Vec3, rad: Real) -> (Real, Real) {
        let tca = self.dist_to(center);
        let mut thc = 0.0;

        if tca > 0.0 {
            let r2 = rad * rad;
            let l = center - self.pos;
            let d2 = l.dot(l) - tca * tca;
            if d2 < r2 {
                thc = libm::sqrt(r2 - d2);
            }
        }

        (tca - thc, tca + thc)
    }

    /// Distances `(t, s)` at which this ray meets `ray` and `ray` meets this one.
    ///
    /// Both are zero when the rays do not meet, except when they share an origin.
    pub fn intersects_ray(&self, ray: &Ray) -> (Real, Real) {
        let (mut t, mut s) = (0.0, 0.0);
        let p1 = self.pos;
        let p2 = ray.pos;
        let t1 = self.dist_to(p2);
        let t2 = ray.dist_to(p1);
        let pt1 = self.position_at(t1);
        let pt2 = ray.position_at(t2);

        let self_hits = p2.approx_eq(pt1);
        let other_hits = p1.approx_eq(pt2);

        if self_hits || other_hits {
            if self_hits {
                t = t1;
            }
            if other_hits {
                s = t2;
            }
        } else {
            let norm = p1.plane_norm(p2, self.position_at(1.0));
            if ray.position_at(1.0).on_plane(p1, norm) {
                let rd = ray.dir;
                let angle = self.dir.angle_to(rd);
                if angle > EPSILON && angle < PI - EPSILON {
                    t = self.intersects_plane(p2, rd.cross(norm));
                    s = ray.dist_to(self.position_at(t));
                }
            }
        }

        (t, s)
    }

    /// Distance at which the ray crosses the segment `v1 -> v2`, or `None` if it misses.
    pub fn intersects_line_seg(&self, v1: Vec3, v2: Vec3) -> Option<Real> {
        let dist = self.intersects_plane(v1, self.pos.plane_norm(v1, v2).cross(v2 - v1));
        if dist >= 0.0 && dist.is_finite() {
            let on_line = self
                .position_at(dist)
                .line_dist(v1, v2)
                .map_or(false, |d| equals_epsilon(d, 0.0));
            if on_line {
                return Some(dist);
            }
        }
        None
    }

    /// Determinant-based ray/triangle test.
    ///
    /// Returns `None` when the ray is parallel to the triangle, passes outside it, or
    /// points away from it.
    pub fn intersects_tri(&self, v0: Vec3, v1: Vec3, v2: Vec3) -> Option<TriHit> {
        let e1 = v1 - v0;
        let e2 = v2 - v0;
        let p = self.dir.cross(e2);
        let det = e1.dot(p);

        if equals_epsilon(det, 0.0) {
            return None;
        }

        let inv_det = 1.0 / det;
        let tv = self.pos - v0;
        let u = p.dot(tv) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = tv.cross(e1);
        let v = self.dir.dot(q) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = e2.dot(q) * inv_det;
        (t > EPSILON).then_some(TriHit { t, u, v })
    }
}
