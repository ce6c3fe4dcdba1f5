//! Affine transforms: 4x4 matrices and the translate/scale/rotate [`Transform`].

use core::ops::Mul;

use crate::error::{CoreError, Result};
use crate::ray::Ray;
use crate::rotator::Rotator;
use crate::types::{Real, Vec3};

/// A row-major 4x4 matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4 {
    /// Rows of the matrix.
    pub m: [[Real; 4]; 4],
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mat4 {
    /// The identity matrix.
    pub const IDENTITY: Mat4 = Mat4::new([
        [1.0, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]);

    /// The zero matrix.
    pub const ZERO: Mat4 = Mat4::new([[0.0; 4]; 4]);

    /// Create a matrix from rows.
    #[inline]
    pub const fn new(m: [[Real; 4]; 4]) -> Self {
        Self { m }
    }

    /// Transposed copy.
    pub fn transpose(&self) -> Self {
        let mut t = Self::ZERO;
        for (i, row) in self.m.iter().enumerate() {
            for (j, v) in row.iter().enumerate() {
                t.m[j][i] = *v;
            }
        }
        t
    }

    /// Determinant by cofactor expansion over 2x2 minors.
    pub fn determinant(&self) -> Real {
        let (s, c) = self.minors();
        s[0] * c[5] - s[1] * c[4] + s[2] * c[3] + s[3] * c[2] - s[4] * c[1] + s[5] * c[0]
    }

    /// Matrix inverse.
    ///
    /// # Errors
    /// Returns `SingularMatrix` when the determinant is zero.
    pub fn inverse(&self) -> Result<Self> {
        let m = &self.m;
        let (s, c) = self.minors();
        let det = s[0] * c[5] - s[1] * c[4] + s[2] * c[3] + s[3] * c[2] - s[4] * c[1]
            + s[5] * c[0];

        if det == 0.0 {
            return Err(CoreError::SingularMatrix);
        }

        let inv = 1.0 / det;
        Ok(Self::new([
            [
                (c[3] * m[1][3] - c[4] * m[1][2] + c[5] * m[1][1]) * inv,
                (-c[3] * m[0][3] + c[4] * m[0][2] - c[5] * m[0][1]) * inv,
                (m[3][1] * s[5] - m[3][2] * s[4] + m[3][3] * s[3]) * inv,
                (-m[2][1] * s[5] + m[2][2] * s[4] - m[2][3] * s[3]) * inv,
            ],
            [
                (-c[1] * m[1][3] + c[2] * m[1][2] - c[5] * m[1][0]) * inv,
                (c[1] * m[0][3] - c[2] * m[0][2] + c[5] * m[0][0]) * inv,
                (-m[3][0] * s[5] + m[3][2] * s[2] - m[3][3] * s[1]) * inv,
                (m[2][0] * s[5] - m[2][2] * s[2] + m[2][3] * s[1]) * inv,
            ],
            [
                (c[0] * m[1][3] - c[2] * m[1][1] + c[4] * m[1][0]) * inv,
                (-c[0] * m[0][3] + c[2] * m[0][1] - c[4] * m[0][0]) * inv,
                (m[3][0] * s[4] - m[3][1] * s[2] + m[3][3] * s[0]) * inv,
                (-m[2][0] * s[4] + m[2][1] * s[2] - m[2][3] * s[0]) * inv,
            ],
            [
                (-c[0] * m[1][2] + c[1] * m[1][1] - c[3] * m[1][0]) * inv,
                (c[0] * m[0][2] - c[1] * m[0][1] + c[3] * m[0][0]) * inv,
                (-m[3][0] * s[3] + m[3][1] * s[1] - m[3][2] * s[0]) * inv,
                (m[2][0] * s[3] - m[2][1] * s[1] + m[2][2] * s[0]) * inv,
            ],
        ]))
    }

    /// 2x2 minors of the top two rows (`s`) and bottom two rows (`c`).
    fn minors(&self) -> ([Real; 6], [Real; 6]) {
        let m = &self.m;
        let s = [
            m[0][0] * m[1][1] - m[0][1] * m[1][0],
            m[0][0] * m[1][2] - m[0][2] * m[1][0],
            m[0][0] * m[1][3] - m[0][3] * m[1][0],
            m[0][1] * m[1][2] - m[0][2] * m[1][1],
            m[0][1] * m[1][3] - m[0][3] * m[1][1],
            m[0][2] * m[1][3] - m[0][3] * m[1][2],
        ];
        let c = [
            m[2][0] * m[3][1] - m[2][1] * m[3][0],
            m[2][0] * m[3][2] - m[2][2] * m[3][0],
            m[2][0] * m[3][3] - m[2][3] * m[3][0],
            m[2][1] * m[3][2] - m[2][2] * m[3][1],
            m[2][1] * m[3][3] - m[2][3] * m[3][1],
            m[2][2] * m[3][3] - m[2][3] * m[3][2],
        ];
        (s, c)
    }
}

/// Applies the matrix to a point with a homogeneous divide; a zero `w` yields the zero vector.
impl Mul<Vec3> for Mat4 {
    type Output = Vec3;

    fn mul(self, v: Vec3) -> Vec3 {
        let m = &self.m;
        let row = |r: &[Real; 4]| r[0] * v.x + r[1] * v.y + r[2] * v.z + r[3];
        let d = row(&m[3]);
        if d == 0.0 {
            Vec3::ZERO
        } else {
            Vec3::new(row(&m[0]), row(&m[1]), row(&m[2])) / d
        }
    }
}

impl Mul for Mat4 {
    type Output = Mat4;

    fn mul(self, o: Mat4) -> Mat4 {
        let mut r = Mat4::ZERO;
        for i in 0..4 {
            for j in 0..4 {
                r.m[i][j] = (0..4).map(|k| self.m[i][k] * o.m[k][j]).sum();
            }
        }
        r
    }
}

/// Translation, scale and rotation applied as one operation.
///
/// A forward transform scales, rotates then translates. An inverse transform
/// translates, rotates then scales, so `t.inverse() * (t * v) == v`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transform {
    /// Translation component.
    pub trans: Vec3,
    /// Per-axis scale.
    pub scale: Vec3,
    /// Rotation component.
    pub rot: Rotator,
    /// Whether operations are applied in reverse order.
    pub is_inverse: bool,
}

impl Default for Transform {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Vec3::splat(1.0), Rotator::IDENTITY, false)
    }
}

impl Transform {
    /// Create a transform.
    #[inline]
    pub const fn new(trans: Vec3, scale: Vec3, rot: Rotator, is_inverse: bool) -> Self {
        Self {
            trans,
            scale,
            rot,
            is_inverse,
        }
    }

    /// Create a forward transform from a translation, scale and Euler angles.
    pub fn from_euler(trans: Vec3, scale: Vec3, yaw: Real, pitch: Real, roll: Real) -> Self {
        Self::new(trans, scale, Rotator::from_euler(yaw, pitch, roll), false)
    }

    /// The transform undoing this one.
    #[inline]
    pub fn inverse(&self) -> Self {
        Self::new(
            self.trans * -1.0,
            self.scale.inv(),
            self.rot.inverse(),
            !self.is_inverse,
        )
    }

    /// This transform without its translation, for direction vectors.
    #[inline]
    pub fn directional(&self) -> Self {
        Self::new(Vec3::ZERO, self.scale, self.rot, self.is_inverse)
    }

    /// Transform a ray: its origin fully and its direction by [`Transform::directional`].
    ///
    /// # Errors
    /// Returns `ZeroDirection` if the transformed direction collapses.
    pub fn apply_ray(&self, ray: &Ray) -> Result<Ray> {
        Ray::new(*self * ray.position(), self.directional() * ray.direction())
    }

    /// Homogeneous matrix equivalent.
    pub fn to_matrix(&self) -> Mat4 {
        let mut mat = self.rot.to_matrix();
        let s = self.scale;
        let m = &mut mat.m;

        if self.is_inverse {
            for (row, sc) in [s.x, s.y, s.z].iter().enumerate() {
                for v in m[row].iter_mut().take(3) {
                    *v *= sc;
                }
            }
            for row in 0..3 {
                m[row][3] = self.trans.dot(Vec3::new(m[row][0], m[row][1], m[row][2]));
            }
        } else {
            for r in m.iter_mut().take(3) {
                r[0] *= s.x;
                r[1] *= s.y;
                r[2] *= s.z;
            }
            m[0][3] = self.trans.x;
            m[1][3] = self.trans.y;
            m[2][3] = self.trans.z;
        }

        mat
    }

    /// Approximate equality of all components.
    pub fn approx_eq(&self, t: &Transform) -> bool {
        self.trans.approx_eq(t.trans)
            && self.scale.approx_eq(t.scale)
            && self.rot.approx_eq(&t.rot)
            && self.is_inverse == t.is_inverse
    }
}

impl Mul<Vec3> for Transform {
    type Output = Vec3;

    #[inline]
    fn mul(self, v: Vec3) -> Vec3 {
        if self.is_inverse {
            self.scale * (self.rot * (v + self.trans))
        } else {
            self.trans + self.rot * (v * self.scale)
        }
    }
}
