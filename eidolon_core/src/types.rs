//! Core value types: 3-space vectors, colors and the scalar helpers shared by every module.
//!
//! All spatial math is done in `f64`; colors carry `f32` channels as the renderer consumes them.

use core::cmp::Ordering;
use core::ops::{Add, AddAssign, Div, Index, Mul, Neg, Sub, SubAssign};

/// Real scalar type used for positions and field values.
pub type Real = f64;

/// Unsigned index type used for topology matrices.
pub type IndexVal = u32;

/// Packed 32-bit red-green-blue-alpha value.
pub type Rgba = u32;

/// Tolerance used by approximate comparisons throughout the crate.
pub const EPSILON: Real = 1e-10;

/// Half-turn in radians.
pub const PI: Real = core::f64::consts::PI;

/// Returns true if `a` and `b` are within [`EPSILON`] of each other.
#[inline]
pub fn equals_epsilon(a: Real, b: Real) -> bool {
    libm::fabs(a - b) <= EPSILON
}

/// Clamp `v` to the closed interval `[lo, hi]`.
#[inline]
pub fn clamp(v: Real, lo: Real, hi: Real) -> Real {
    if v < lo {
        lo
    } else if v > hi {
        hi
    } else {
        v
    }
}

/// Linear interpolation from `a` to `b` by `t`.
#[inline]
pub fn lerp(t: Real, a: Real, b: Real) -> Real {
    a + (b - a) * t
}

/// Inverse of [`lerp`]: the fraction of the way `v` lies from `a` to `b`.
///
/// Returns `v` unchanged when the interval is empty.
#[inline]
pub fn lerp_xi(v: Real, a: Real, b: Real) -> Real {
    if b == a {
        v
    } else {
        (v - a) / (b - a)
    }
}

/// A 3-space vector of reals.
///
/// Equality is exact; use [`Vec3::approx_eq`] for the epsilon comparison the
/// geometric routines depend on.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, bytemuck::Pod, bytemuck::Zeroable)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec3 {
    /// X component.
    pub x: Real,
    /// Y component.
    pub y: Real,
    /// Z component.
    pub z: Real,
}

impl Vec3 {
    /// The zero vector.
    pub const ZERO: Vec3 = Vec3::splat(0.0);

    /// Unit X axis.
    pub const X: Vec3 = Vec3::new(1.0, 0.0, 0.0);

    /// Unit Y axis.
    pub const Y: Vec3 = Vec3::new(0.0, 1.0, 0.0);

    /// Unit Z axis.
    pub const Z: Vec3 = Vec3::new(0.0, 0.0, 1.0);

    /// Create a new vector.
    #[inline]
    pub const fn new(x: Real, y: Real, z: Real) -> Self {
        Self { x, y, z }
    }

    /// Create a vector with all components set to `v`.
    #[inline]
    pub const fn splat(v: Real) -> Self {
        Self { x: v, y: v, z: v }
    }

    /// Convert to an array.
    #[inline]
    pub const fn as_array(&self) -> [Real; 3] {
        [self.x, self.y, self.z]
    }

    /// Component-wise absolute value.
    #[inline]
    pub fn abs(self) -> Self {
        Self::new(libm::fabs(self.x), libm::fabs(self.y), libm::fabs(self.z))
    }

    /// Component-wise reciprocal, with zero components left as zero.
    #[inline]
    pub fn inv(self) -> Self {
        let inv = |v: Real| if v != 0.0 { 1.0 / v } else { 0.0 };
        Self::new(inv(self.x), inv(self.y), inv(self.z))
    }

    /// Component-wise sign, 1 for non-negative and -1 otherwise.
    #[inline]
    pub fn sign(self) -> Self {
        let s = |v: Real| if v >= 0.0 { 1.0 } else { -1.0 };
        Self::new(s(self.x), s(self.y), s(self.z))
    }

    /// Cross product.
    #[inline]
    pub fn cross(self, v: Self) -> Self {
        Self {
            x: self.y * v.z - self.z * v.y,
            y: self.z * v.x - self.x * v.z,
            z: self.x * v.y - self.y * v.x,
        }
    }

    /// Dot product.
    #[inline]
    pub fn dot(self, v: Self) -> Real {
        self.x * v.x + self.y * v.y + self.z * v.z
    }

    /// Length of the vector.
    #[inline]
    pub fn len(self) -> Real {
        libm::sqrt(self.len_sq())
    }

    /// Squared length of the vector.
    #[inline]
    pub fn len_sq(self) -> Real {
        self.dot(self)
    }

    /// Unit vector in the same direction, or zero for a zero-length vector.
    #[inline]
    pub fn norm(self) -> Self {
        let l = self.len();
        if l == 0.0 {
            Self::ZERO
        } else {
            self * (1.0 / l)
        }
    }

    /// Distance to `v`.
    #[inline]
    pub fn dist_to(self, v: Self) -> Real {
        (self - v).len()
    }

    /// Squared distance to `v`.
    #[inline]
    pub fn dist_to_sq(self, v: Self) -> Real {
        (self - v).len_sq()
    }

    /// Clamp each component into the box spanned by `lo` and `hi`.
    #[inline]
    pub fn clamp(self, lo: Self, hi: Self) -> Self {
        Self::new(
            clamp(self.x, lo.x, hi.x),
            clamp(self.y, lo.y, hi.y),
            clamp(self.z, lo.z, hi.z),
        )
    }

    /// Component-wise minimum.
    #[inline]
    pub fn min_vals(self, v: Self) -> Self {
        Self::new(self.x.min(v.x), self.y.min(v.y), self.z.min(v.z))
    }

    /// Component-wise maximum.
    #[inline]
    pub fn max_vals(self, v: Self) -> Self {
        Self::new(self.x.max(v.x), self.y.max(v.y), self.z.max(v.z))
    }

    /// Cartesian to polar `(azimuth, inclination, radius)`.
    pub fn to_polar(self) -> Self {
        let l = self.len();
        if l == 0.0 {
            Self::ZERO
        } else {
            Self::new(libm::atan2(self.y, self.x), libm::acos(self.z / l), l)
        }
    }

    /// Cartesian to cylindrical `(azimuth, height, radius)`.
    pub fn to_cylindrical(self) -> Self {
        Self::new(
            libm::atan2(self.y, self.x),
            self.z,
            libm::sqrt(self.y * self.y + self.x * self.x),
        )
    }

    /// Polar `(azimuth, inclination, radius)` to cartesian.
    pub fn from_polar(self) -> Self {
        Self::new(
            libm::cos(self.x) * libm::sin(self.y) * self.z,
            libm::sin(self.y) * libm::sin(self.x) * self.z,
            libm::cos(self.y) * self.z,
        )
    }

    /// Cylindrical `(azimuth, height, radius)` to cartesian.
    pub fn from_cylindrical(self) -> Self {
        Self::new(
            libm::cos(self.x) * self.z,
            libm::sin(self.x) * self.z,
            self.y,
        )
    }

    /// True if the vector length is within [`EPSILON`] of zero.
    #[inline]
    pub fn is_zero(self) -> bool {
        self.len_sq() <= EPSILON * EPSILON
    }

    /// Epsilon comparison of each component.
    #[inline]
    pub fn approx_eq(self, v: Self) -> bool {
        equals_epsilon(self.x, v.x) && equals_epsilon(self.y, v.y) && equals_epsilon(self.z, v.z)
    }

    /// True if every component is greater than the matching one in `v`, with an epsilon margin.
    #[inline]
    pub fn gt_epsilon(self, v: Self) -> bool {
        self.x + EPSILON > v.x && self.y + EPSILON > v.y && self.z + EPSILON > v.z
    }

    /// True if every component is less than the matching one in `v`, with an epsilon margin.
    #[inline]
    pub fn lt_epsilon(self, v: Self) -> bool {
        self.x - EPSILON < v.x && self.y - EPSILON < v.y && self.z - EPSILON < v.z
    }

    /// True if the vector lies in the axis-aligned box `[minv, maxv]`, with an epsilon margin.
    #[inline]
    pub fn in_aabb(self, minv: Self, maxv: Self) -> bool {
        self.gt_epsilon(minv) && self.lt_epsilon(maxv)
    }

    /// True if the vector is within `radius` of `center`.
    #[inline]
    pub fn in_sphere(self, center: Self, radius: Real) -> bool {
        self.dist_to_sq(center) <= radius * radius + EPSILON
    }

    /// True if each component is in `[-margin, 1 + margin]`.
    #[inline]
    pub fn is_in_unit_cube(self, margin: Real) -> bool {
        let inside = |v: Real| v >= -margin && v <= 1.0 + margin;
        inside(self.x) && inside(self.y) && inside(self.z)
    }

    /// True if `v` points in the same or opposite direction.
    #[inline]
    pub fn is_parallel(self, v: Self) -> bool {
        self.cross(v).is_zero()
    }

    /// Angle in radians between this vector and `v`, zero if either is zero-length.
    pub fn angle_to(self, v: Self) -> Real {
        let l = libm::sqrt(self.len_sq() * v.len_sq());
        if l < EPSILON {
            return 0.0;
        }

        let vl = self.dot(v) / l;
        if vl >= 1.0 - EPSILON {
            0.0
        } else if vl <= -1.0 + EPSILON {
            PI
        } else {
            libm::acos(vl)
        }
    }

    /// Normal of the plane through `self`, `v2` and `v3` with clockwise winding.
    #[inline]
    pub fn plane_norm(self, v2: Self, v3: Self) -> Self {
        (v2 - self).cross(v3 - self).norm()
    }

    /// Signed distance to the plane through `plane_pt` with normal `plane_norm`.
    #[inline]
    pub fn plane_dist(self, plane_pt: Self, plane_norm: Self) -> Real {
        plane_norm.dot(self - plane_pt)
    }

    /// Projection onto the plane through `plane_pt` with normal `plane_norm`.
    #[inline]
    pub fn plane_project(self, plane_pt: Self, plane_norm: Self) -> Self {
        self - plane_norm * self.plane_dist(plane_pt, plane_norm)
    }

    /// True if the vector lies on the plane, within epsilon.
    #[inline]
    pub fn on_plane(self, plane_pt: Self, plane_norm: Self) -> bool {
        equals_epsilon(self.plane_dist(plane_pt, plane_norm), 0.0)
    }

    /// Circular ordering of `v1` and `v2` around `self` in the plane with normal `plane_norm`.
    ///
    /// `Greater` means `v1 -> v2` turns counter-clockwise when viewed down the normal.
    #[inline]
    pub fn plane_order(self, plane_norm: Self, v1: Self, v2: Self) -> Ordering {
        let order = (v1 - self).cross(v2 - self).dot(plane_norm);
        if order > 0.0 {
            Ordering::Greater
        } else if order < 0.0 {
            Ordering::Less
        } else {
            Ordering::Equal
        }
    }

    /// Area of the triangle `(self, b, c)`.
    pub fn tri_area(self, b: Self, c: Self) -> Real {
        (b - self).cross(c - self).len() * 0.5
    }

    /// Distance from this point to the segment `p1 -> p2` measured perpendicular to it.
    ///
    /// Returns `None` if the segment is degenerate or the point lies outside the
    /// cylinder having the segment as its center line.
    pub fn line_dist(self, p1: Self, p2: Self) -> Option<Real> {
        let p = p2 - p1;
        let pl = p.len();
        if pl < EPSILON {
            return None;
        }

        if self.plane_dist(p1, p) < 0.0 || self.plane_dist(p2, -p) < 0.0 {
            return None;
        }

        Some(p.cross(p1 - self).len() / pl)
    }

    /// Linear interpolation toward `v` by `t`.
    #[inline]
    pub fn lerp(self, t: Real, v: Self) -> Self {
        Self {
            x: self.x + (v.x - self.x) * t,
            y: self.y + (v.y - self.y) * t,
            z: self.z + (v.z - self.z) * t,
        }
    }

    /// Normal of the triangle `(a, b, c)`.
    #[inline]
    pub fn tri_normal(a: Self, b: Self, c: Self) -> Self {
        a.plane_norm(b, c)
    }
}

impl From<[Real; 3]> for Vec3 {
    #[inline]
    fn from(a: [Real; 3]) -> Self {
        Self::new(a[0], a[1], a[2])
    }
}

impl From<Vec3> for [Real; 3] {
    #[inline]
    fn from(v: Vec3) -> Self {
        v.as_array()
    }
}

impl Index<usize> for Vec3 {
    type Output = Real;

    #[inline]
    fn index(&self, i: usize) -> &Real {
        match i {
            0 => &self.x,
            1 => &self.y,
            _ => &self.z,
        }
    }
}

macro_rules! vec3_binop {
    ($trait:ident, $fn:ident, $op:tt) => {
        impl $trait for Vec3 {
            type Output = Vec3;

            #[inline]
            fn $fn(self, v: Vec3) -> Vec3 {
                Vec3::new(self.x $op v.x, self.y $op v.y, self.z $op v.z)
            }
        }

        impl $trait<Real> for Vec3 {
            type Output = Vec3;

            #[inline]
            fn $fn(self, v: Real) -> Vec3 {
                Vec3::new(self.x $op v, self.y $op v, self.z $op v)
            }
        }
    };
}

vec3_binop!(Add, add, +);
vec3_binop!(Sub, sub, -);
vec3_binop!(Mul, mul, *);
vec3_binop!(Div, div, /);

impl Neg for Vec3 {
    type Output = Vec3;

    #[inline]
    fn neg(self) -> Vec3 {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}

impl AddAssign for Vec3 {
    #[inline]
    fn add_assign(&mut self, v: Vec3) {
        *self = *self + v;
    }
}

impl SubAssign for Vec3 {
    #[inline]
    fn sub_assign(&mut self, v: Vec3) {
        *self = *self - v;
    }
}

/// A red-green-blue-alpha color with `f32` channels.
///
/// The default color is opaque white.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Color {
    /// Red channel.
    pub r: f32,
    /// Green channel.
    pub g: f32,
    /// Blue channel.
    pub b: f32,
    /// Alpha channel.
    pub a: f32,
}

impl Default for Color {
    fn default() -> Self {
        Self::new(1.0, 1.0, 1.0, 1.0)
    }
}

impl Color {
    /// Create a new color.
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Unpack an `0xRRGGBBAA` value.
    #[inline]
    pub fn from_rgba(c: Rgba) -> Self {
        let ch = |shift: u32| ((c >> shift) & 0xff) as f32 / 255.0;
        Self::new(ch(24), ch(16), ch(8), ch(0))
    }

    /// Pack into `0xRRGGBBAA`, channels saturating to `[0, 255]`.
    #[inline]
    pub fn to_rgba(&self) -> Rgba {
        let ch = |v: f32| (v * 255.0) as u8 as u32;
        (ch(self.r) << 24) | (ch(self.g) << 16) | (ch(self.b) << 8) | ch(self.a)
    }

    /// Linear blend toward `col`; `t <= 0` yields `self` and `t >= 1` yields `col`.
    pub fn interpolate(&self, t: Real, col: &Color) -> Color {
        if t >= 1.0 {
            return *col;
        }
        if t <= 0.0 {
            return *self;
        }

        let t = t as f32;
        let t1 = 1.0 - t;
        Color::new(
            self.r * t1 + col.r * t,
            self.g * t1 + col.g * t,
            self.b * t1 + col.b * t,
            self.a * t1 + col.a * t,
        )
    }

    /// Clamp every channel to `[0, 1]`.
    #[inline]
    pub fn unit_clamp(&self) -> Color {
        Color::new(
            self.r.clamp(0.0, 1.0),
            self.g.clamp(0.0, 1.0),
            self.b.clamp(0.0, 1.0),
            self.a.clamp(0.0, 1.0),
        )
    }

    /// Copy of this color with a new alpha.
    #[inline]
    pub const fn with_alpha(&self, a: f32) -> Color {
        Color::new(self.r, self.g, self.b, a)
    }

    /// Epsilon comparison of each channel.
    #[inline]
    pub fn approx_eq(&self, c: &Color) -> bool {
        equals_epsilon(self.r as Real, c.r as Real)
            && equals_epsilon(self.g as Real, c.g as Real)
            && equals_epsilon(self.b as Real, c.b as Real)
            && equals_epsilon(self.a as Real, c.a as Real)
    }
}

macro_rules! color_binop {
    ($trait:ident, $fn:ident, $op:tt) => {
        impl $trait for Color {
            type Output = Color;

            #[inline]
            fn $fn(self, c: Color) -> Color {
                Color::new(self.r $op c.r, self.g $op c.g, self.b $op c.b, self.a $op c.a)
            }
        }

        impl $trait<f32> for Color {
            type Output = Color;

            #[inline]
            fn $fn(self, v: f32) -> Color {
                Color::new(self.r $op v, self.g $op v, self.b $op v, self.a $op v)
            }
        }
    };
}

color_binop!(Add, add, +);
color_binop!(Sub, sub, -);
color_binop!(Mul, mul, *);
color_binop!(Div, div, /);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_arithmetic() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);

        assert_eq!(a + b, Vec3::new(5.0, 7.0, 9.0));
        assert_eq!(b - a, Vec3::splat(3.0));
        assert_eq!(a * 2.0, Vec3::new(2.0, 4.0, 6.0));
        assert_eq!(-a, Vec3::new(-1.0, -2.0, -3.0));
        assert_eq!(a.dot(b), 32.0);
        assert_eq!(Vec3::X.cross(Vec3::Y), Vec3::Z);
    }

    #[test]
    fn test_vec3_norm_of_zero_is_zero() {
        assert_eq!(Vec3::ZERO.norm(), Vec3::ZERO);
        assert!((Vec3::new(3.0, 4.0, 0.0).norm().len() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_vec3_inv_keeps_zero() {
        assert_eq!(Vec3::new(2.0, 0.0, -4.0).inv(), Vec3::new(0.5, 0.0, -0.25));
    }

    #[test]
    fn test_in_aabb_is_inclusive_with_margin() {
        let minv = Vec3::ZERO;
        let maxv = Vec3::splat(1.0);
        assert!(Vec3::ZERO.in_aabb(minv, maxv));
        assert!(Vec3::splat(1.0).in_aabb(minv, maxv));
        assert!(Vec3::splat(0.5).in_aabb(minv, maxv));
        assert!(!Vec3::new(1.1, 0.5, 0.5).in_aabb(minv, maxv));
    }

    #[test]
    fn test_angle_to() {
        assert!((Vec3::X.angle_to(Vec3::Y) - PI / 2.0).abs() < 1e-12);
        assert_eq!(Vec3::X.angle_to(Vec3::X), 0.0);
        assert_eq!(Vec3::X.angle_to(-Vec3::X), PI);
        assert_eq!(Vec3::ZERO.angle_to(Vec3::X), 0.0);
    }

    #[test]
    fn test_plane_order_follows_normal() {
        let c = Vec3::ZERO;
        assert_eq!(c.plane_order(Vec3::Z, Vec3::X, Vec3::Y), Ordering::Greater);
        assert_eq!(c.plane_order(Vec3::Z, Vec3::Y, Vec3::X), Ordering::Less);
        assert_eq!(c.plane_order(Vec3::Z, Vec3::X, Vec3::X * 2.0), Ordering::Equal);
    }

    #[test]
    fn test_line_dist() {
        let p = Vec3::new(0.5, 1.0, 0.0);
        assert_eq!(p.line_dist(Vec3::ZERO, Vec3::X), Some(1.0));
        assert_eq!(Vec3::new(2.0, 1.0, 0.0).line_dist(Vec3::ZERO, Vec3::X), None);
        assert_eq!(p.line_dist(Vec3::X, Vec3::X), None);
    }

    #[test]
    fn test_polar_round_trip() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert!(v.to_polar().from_polar().approx_eq(v));
        assert!(v.to_cylindrical().from_cylindrical().approx_eq(v));
    }

    #[test]
    fn test_color_interpolate_clamps() {
        let black = Color::new(0.0, 0.0, 0.0, 1.0);
        let white = Color::default();

        assert_eq!(black.interpolate(-1.0, &white), black);
        assert_eq!(black.interpolate(2.0, &white), white);
        assert_eq!(black.interpolate(0.5, &white), Color::new(0.5, 0.5, 0.5, 1.0));
    }

    #[test]
    fn test_color_rgba_packing() {
        let c = Color::new(1.0, 0.0, 1.0, 0.0);
        assert_eq!(c.to_rgba(), 0xff00ff00);
        assert_eq!(Color::from_rgba(0xff00ff00), c);
    }

    #[test]
    fn test_lerp_xi() {
        assert_eq!(lerp_xi(0.5, 0.0, 2.0), 0.25);
        assert_eq!(lerp(0.25, 0.0, 2.0), 0.5);
        assert_eq!(lerp_xi(3.0, 1.0, 1.0), 3.0);
    }
}
