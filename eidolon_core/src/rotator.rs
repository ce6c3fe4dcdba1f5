//! Quaternion rotations.

use core::ops::{Add, Mul, Neg, Sub};

use crate::transform::Mat4;
use crate::types::{equals_epsilon, Real, Vec3, EPSILON, PI};

/// A rotation stored as a unit quaternion `(x, y, z, w)`.
///
/// The default value is the identity rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rotator {
    /// Vector part X.
    pub x: Real,
    /// Vector part Y.
    pub y: Real,
    /// Vector part Z.
    pub z: Real,
    /// Scalar part.
    pub w: Real,
}

impl Default for Rotator {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Rotator {
    /// The identity rotation.
    pub const IDENTITY: Rotator = Rotator::new(0.0, 0.0, 0.0, 1.0);

    /// Create a rotator from raw quaternion components.
    #[inline]
    pub const fn new(x: Real, y: Real, z: Real, w: Real) -> Self {
        Self { x, y, z, w }
    }

    /// Rotation of `rads` radians about `axis`.
    ///
    /// A zero angle or zero axis produces the identity.
    pub fn from_axis(axis: Vec3, rads: Real) -> Self {
        if equals_epsilon(rads, 0.0) || axis.is_zero() {
            return Self::IDENTITY;
        }

        let na = axis.norm();
        let s = libm::sin(rads / 2.0);
        Self::new(na.x * s, na.y * s, na.z * s, libm::cos(rads / 2.0))
    }

    /// Rotation taking the direction `from` onto `to` about their cross product.
    pub fn from_to(from: Vec3, to: Vec3) -> Self {
        if from.approx_eq(to) {
            Self::IDENTITY
        } else {
            Self::from_axis(from.cross(to), from.angle_to(to))
        }
    }

    /// Rotation from Euler angles: yaw about Z, pitch about X, roll about Y.
    pub fn from_euler(yaw: Real, pitch: Real, roll: Real) -> Self {
        let (s1, c1) = (libm::sin(0.5 * roll), libm::cos(0.5 * roll));
        let (s2, c2) = (libm::sin(0.5 * yaw), libm::cos(0.5 * yaw));
        let (s3, c3) = (libm::sin(0.5 * pitch), libm::cos(0.5 * pitch));
        let c1c2 = c1 * c2;
        let s1s2 = s1 * s2;
        let c1s2 = c1 * s2;
        let s1c2 = s1 * c2;

        Self::new(
            c1c2 * s3 + s1s2 * c3,
            s1c2 * c3 + c1s2 * s3,
            c1s2 * c3 - s1c2 * s3,
            c1c2 * c3 - s1s2 * s3,
        )
    }

    /// Rotation from the upper 3x3 block of a rotation matrix, given in row-major order.
    #[allow(clippy::too_many_arguments)]
    pub fn from_matrix3(
        m00: Real,
        m01: Real,
        m02: Real,
        m10: Real,
        m11: Real,
        m12: Real,
        m20: Real,
        m21: Real,
        m22: Real,
    ) -> Self {
        let tr = m00 + m11 + m22;

        if tr > 0.0 {
            let s = libm::sqrt(tr + 1.0) * 2.0;
            Self::new((m21 - m12) / s, (m02 - m20) / s, (m10 - m01) / s, 0.25 * s)
        } else if m00 > m11 && m00 > m22 {
            let s = libm::sqrt(1.0 + m00 - m11 - m22) * 2.0;
            Self::new(0.25 * s, (m01 + m10) / s, (m02 + m20) / s, (m21 - m12) / s)
        } else if m11 > m22 {
            let s = libm::sqrt(1.0 + m11 - m00 - m22) * 2.0;
            Self::new((m01 + m10) / s, 0.25 * s, (m12 + m21) / s, (m02 - m20) / s)
        } else {
            let s = libm::sqrt(1.0 + m22 - m00 - m11) * 2.0;
            Self::new((m02 + m20) / s, (m12 + m21) / s, 0.25 * s, (m10 - m01) / s)
        }
    }

    /// Rotation taking the plane spanned by `(row2, col2)` onto the plane `(row1, col1)`,
    /// aligning `row2` with `row1`. All inputs are expected to be normalized.
    pub fn from_planes(row1: Vec3, col1: Vec3, row2: Vec3, col2: Vec3) -> Self {
        let norm1 = col1.cross(row1).norm();
        let norm2 = col2.cross(row2).norm();

        let rot = if norm1.approx_eq(-norm2) {
            Self::from_axis(row1, PI)
        } else {
            Self::from_to(norm2, norm1)
        };

        Self::from_to(rot * row2, row1) * rot
    }

    /// Pitch angle, rotation about the X axis.
    pub fn pitch(&self) -> Real {
        let test = self.x * self.y + self.z * self.w;
        if test > 0.5 - EPSILON || test < -0.5 + EPSILON {
            return 0.0;
        }
        libm::atan2(
            2.0 * self.x * self.w - 2.0 * self.y * self.z,
            1.0 - 2.0 * self.x * self.x - 2.0 * self.z * self.z,
        )
    }

    /// Yaw angle, rotation about the Z axis.
    pub fn yaw(&self) -> Real {
        let test = self.x * self.y + self.z * self.w;
        if test > 0.5 - EPSILON {
            PI * 0.5
        } else if test < -0.5 + EPSILON {
            PI * -0.5
        } else {
            libm::asin(2.0 * test)
        }
    }

    /// Roll angle, rotation about the Y axis.
    pub fn roll(&self) -> Real {
        let test = self.x * self.y + self.z * self.w;
        if test > 0.5 - EPSILON {
            2.0 * libm::atan2(self.x, self.w)
        } else if test < -0.5 + EPSILON {
            -2.0 * libm::atan2(self.x, self.w)
        } else {
            libm::atan2(
                2.0 * self.y * self.w - 2.0 * self.x * self.z,
                1.0 - 2.0 * self.y * self.y - 2.0 * self.z * self.z,
            )
        }
    }

    /// Quaternion conjugate.
    #[inline]
    pub fn conjugate(&self) -> Self {
        Self::new(-self.x, -self.y, -self.z, self.w)
    }

    /// Quaternion magnitude.
    #[inline]
    pub fn len(&self) -> Real {
        libm::sqrt(self.dot(self))
    }

    /// Four-component dot product.
    #[inline]
    pub fn dot(&self, r: &Rotator) -> Real {
        self.x * r.x + self.y * r.y + self.z * r.z + self.w * r.w
    }

    /// Normalized copy; a zero quaternion is returned unchanged.
    pub fn norm(&self) -> Self {
        let n = self.len();
        if n == 0.0 {
            *self
        } else {
            Self::new(self.x / n, self.y / n, self.z / n, self.w / n)
        }
    }

    /// The opposite rotation.
    #[inline]
    pub fn inverse(&self) -> Self {
        self.conjugate().norm()
    }

    /// Rotate `v` by the inverse of this rotation.
    #[inline]
    pub fn unrotate(&self, v: Vec3) -> Vec3 {
        self.inverse() * v
    }

    /// Normalized linear blend toward `r`, taking the shorter arc.
    pub fn interpolate(&self, t: Real, r: &Rotator) -> Self {
        if t >= 1.0 {
            return *r;
        }
        if t <= 0.0 {
            return *self;
        }

        let target = if self.dot(r) < 0.0 { -*r } else { *r };
        (*self + (target - *self) * t).norm()
    }

    /// Epsilon comparison, treating `q` and `-q` as the same rotation.
    pub fn approx_eq(&self, r: &Rotator) -> bool {
        let same = |a: &Rotator, b: &Rotator| {
            equals_epsilon(a.w, b.w)
                && equals_epsilon(a.x, b.x)
                && equals_epsilon(a.y, b.y)
                && equals_epsilon(a.z, b.z)
        };
        same(self, r) || same(&-*self, r)
    }

    /// Homogeneous rotation matrix.
    pub fn to_matrix(&self) -> Mat4 {
        let r = self.norm();
        let (x2, y2, z2) = (r.x * r.x, r.y * r.y, r.z * r.z);
        let (xy, xz, yz) = (r.x * r.y, r.x * r.z, r.y * r.z);
        let (wx, wy, wz) = (r.w * r.x, r.w * r.y, r.w * r.z);

        Mat4::new([
            [1.0 - 2.0 * (y2 + z2), 2.0 * (xy - wz), 2.0 * (xz + wy), 0.0],
            [2.0 * (xy + wz), 1.0 - 2.0 * (x2 + z2), 2.0 * (yz - wx), 0.0],
            [2.0 * (xz - wy), 2.0 * (yz + wx), 1.0 - 2.0 * (x2 + y2), 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }
}

impl Mul<Vec3> for Rotator {
    type Output = Vec3;

    #[inline]
    fn mul(self, v: Vec3) -> Vec3 {
        let axis = Vec3::new(self.x, self.y, self.z);
        let vc = axis.cross(v);
        let vcc = axis.cross(vc);
        vc * (2.0 * self.w) + vcc * 2.0 + v
    }
}

/// Composition: `a * b` applies `b` then `a`.
impl Mul for Rotator {
    type Output = Rotator;

    fn mul(self, r: Rotator) -> Rotator {
        Rotator::new(
            self.w * r.x + self.x * r.w + self.y * r.z - self.z * r.y,
            self.w * r.y + self.y * r.w + self.z * r.x - self.x * r.z,
            self.w * r.z + self.z * r.w + self.x * r.y - self.y * r.x,
            self.w * r.w - self.x * r.x - self.y * r.y - self.z * r.z,
        )
    }
}

impl Mul<Real> for Rotator {
    type Output = Rotator;

    #[inline]
    fn mul(self, s: Real) -> Rotator {
        Rotator::new(self.x * s, self.y * s, self.z * s, self.w * s)
    }
}

impl Add for Rotator {
    type Output = Rotator;

    #[inline]
    fn add(self, r: Rotator) -> Rotator {
        Rotator::new(self.x + r.x, self.y + r.y, self.z + r.z, self.w + r.w)
    }
}

impl Sub for Rotator {
    type Output = Rotator;

    #[inline]
    fn sub(self, r: Rotator) -> Rotator {
        Rotator::new(self.x - r.x, self.y - r.y, self.z - r.z, self.w - r.w)
    }
}

impl Neg for Rotator {
    type Output = Rotator;

    #[inline]
    fn neg(self) -> Rotator {
        Rotator::new(-self.x, -self.y, -self.z, -self.w)
    }
}
