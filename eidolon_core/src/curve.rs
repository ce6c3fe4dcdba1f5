//! Control curves: piecewise cubic Bezier splines passing through every control point.
//!
//! The inner Bezier control points of each segment are derived from a natural spline
//! solved as a tridiagonal system over all points. The system is solved again in full
//! after every edit.
//!
//! ```text
//!   p0 ----- d0.0 ----- d0.1 ----- p1 ----- d1.0 ----- d1.1 ----- p2
//!   |<--------- segment 0 -------->|<--------- segment 1 -------->|
//! ```

use alloc::vec::Vec;
use core::ops::{Add, Div, Mul, Sub};

use crate::error::{CoreError, Result};
use crate::types::{clamp, lerp, lerp_xi, Real, Vec3};

/// Default x tolerance for [`Vec3Curve::at_x`].
pub const AT_X_THRESHOLD: Real = 1e-4;

/// Values a [`ControlCurve`] can interpolate.
pub trait CurveValue:
    Copy + Add<Output = Self> + Sub<Output = Self> + Mul<Real, Output = Self> + Div<Real, Output = Self>
{
}

impl<T> CurveValue for T where
    T: Copy + Add<Output = T> + Sub<Output = T> + Mul<Real, Output = T> + Div<Real, Output = T>
{
}

/// A smooth curve through an ordered list of control points.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ControlCurve<T> {
    ctrls: Vec<T>,
    derivs: Vec<[T; 2]>,
}

impl<T: CurveValue> ControlCurve<T> {
    /// Create an empty curve.
    pub fn new() -> Self {
        Self {
            ctrls: Vec::new(),
            derivs: Vec::new(),
        }
    }

    /// Create a curve through the given points.
    pub fn from_points(pts: &[T]) -> Self {
        let mut curve = Self::new();
        curve.set_points(pts);
        curve
    }

    /// Number of control points.
    #[inline]
    pub fn len(&self) -> usize {
        self.ctrls.len()
    }

    /// True if the curve has no control points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ctrls.is_empty()
    }

    /// The control points in order.
    #[inline]
    pub fn points(&self) -> &[T] {
        &self.ctrls
    }

    /// Control point at `index`.
    pub fn point(&self, index: usize) -> Result<T> {
        CoreError::check_index("index", index, self.ctrls.len()).map(|i| self.ctrls[i])
    }

    /// Append a control point.
    pub fn add_point(&mut self, pt: T) {
        self.ctrls.push(pt);
        self.calculate_derivs();
    }

    /// Replace the control point at `index`.
    pub fn set_point(&mut self, pt: T, index: usize) -> Result<()> {
        let i = CoreError::check_index("index", index, self.ctrls.len())?;
        self.ctrls[i] = pt;
        self.calculate_derivs();
        Ok(())
    }

    /// Remove and return the control point at `index`.
    pub fn remove_point(&mut self, index: usize) -> Result<T> {
        let i = CoreError::check_index("index", index, self.ctrls.len())?;
        let pt = self.ctrls.remove(i);
        self.calculate_derivs();
        Ok(pt)
    }

    /// Replace all control points.
    pub fn set_points(&mut self, pts: &[T]) {
        self.ctrls.clear();
        self.ctrls.extend_from_slice(pts);
        self.calculate_derivs();
    }

    /// Remove every control point.
    pub fn clear(&mut self) {
        self.ctrls.clear();
        self.derivs.clear();
    }

    fn calculate_derivs(&mut self) {
        let c = &self.ctrls;
        let n = c.len();

        self.derivs = match n {
            0 => Vec::new(),
            1 => alloc::vec![[c[0], c[0]]],
            2 => alloc::vec![[c[0], c[1]], [c[1], c[0]]],
            _ => {
                let mut local = c.clone();
                let mut diag = alloc::vec![4.0; n];
                let mut sub = alloc::vec![1.0; n];
                let sup = 1.0;

                if n == 3 {
                    local[1] = c[1] * 6.0 - c[0] - c[2];
                } else {
                    local[1] = c[1] * 6.0 - c[0];
                    local[n - 2] = c[n - 2] * 6.0 - c[n - 1];
                    for i in 2..n - 2 {
                        local[i] = c[i] * 6.0;
                    }
                }

                // forward elimination over the interior rows
                for i in 2..n - 1 {
                    sub[i] /= diag[i - 1];
                    diag[i] -= sub[i] * sup;
                    local[i] = local[i] - local[i - 1] * sub[i];
                }

                local[n - 2] = local[n - 2] / diag[n - 2];
                for i in (1..n - 2).rev() {
                    local[i] = (local[i] - local[i + 1] * sup) / diag[i];
                }

                (0..n)
                    .map(|s| {
                        let e = (s + 1).min(n - 1);
                        [
                            local[s] * (2.0 / 3.0) + local[e] / 3.0,
                            local[s] / 3.0 + local[e] * (2.0 / 3.0),
                        ]
                    })
                    .collect()
            }
        };
    }

    /// Evaluate the curve at `t` in `[0, 1]`; values outside are clamped.
    ///
    /// Returns `None` for an empty curve.
    pub fn at(&self, t: Real) -> Option<T> {
        let n = self.ctrls.len();
        if n == 0 {
            return None;
        }

        let tn = clamp(t, 0.0, 1.0) * (n - 1) as Real;
        let s = (libm::floor(tn) as usize).min(n - 1);
        let e = (s + 1).min(n - 1);

        let t = tn - s as Real;
        let t1 = 1.0 - t;
        let [d1, d2] = self.derivs[s];

        Some(
            self.ctrls[s] * (t1 * t1 * t1)
                + self.ctrls[e] * (t * t * t)
                + d1 * (3.0 * t1 * t1 * t)
                + d2 * (3.0 * t1 * t * t),
        )
    }
}

/// A [`ControlCurve`] over 3-vectors, optionally constrained to a function of x.
///
/// In x-function mode control points have x monotone in `[0, 1]`, y in `[0, 1]` and
/// z zero, so the curve can be queried by x with [`Vec3Curve::at_x`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Vec3Curve {
    curve: ControlCurve<Vec3>,
    x_func: bool,
    linear: bool,
}

impl Vec3Curve {
    /// Create an empty curve; `x_func` enables the x-function constraints.
    pub fn new(x_func: bool) -> Self {
        Self {
            curve: ControlCurve::new(),
            x_func,
            linear: false,
        }
    }

    /// Builder method: evaluate [`Vec3Curve::at_x`] by linear interpolation.
    pub fn with_linear(mut self, linear: bool) -> Self {
        self.linear = linear;
        self
    }

    /// Set linear x-lookup mode.
    pub fn set_linear(&mut self, linear: bool) {
        self.linear = linear;
    }

    /// True if [`Vec3Curve::at_x`] interpolates linearly between control points.
    pub fn is_linear(&self) -> bool {
        self.linear
    }

    /// True if the curve is constrained to a function of x.
    pub fn is_x_func(&self) -> bool {
        self.x_func
    }

    /// The underlying spline.
    pub fn curve(&self) -> &ControlCurve<Vec3> {
        &self.curve
    }

    /// Number of control points.
    pub fn len(&self) -> usize {
        self.curve.len()
    }

    /// True if the curve has no control points.
    pub fn is_empty(&self) -> bool {
        self.curve.is_empty()
    }

    /// The control points in order.
    pub fn points(&self) -> &[Vec3] {
        self.curve.points()
    }

    /// Control point at `index`.
    pub fn point(&self, index: usize) -> Result<Vec3> {
        self.curve.point(index)
    }

    fn constrain(pt: Vec3, minx: Real) -> Vec3 {
        Vec3::new(clamp(pt.x, minx, 1.0), clamp(pt.y, 0.0, 1.0), 0.0)
    }

    /// Append a control point, constrained to follow the last one in x-function mode.
    pub fn add_point(&mut self, pt: Vec3) {
        let pt = if self.x_func {
            let minx = self.curve.ctrls.last().map_or(0.0, |p| p.x);
            Self::constrain(pt, minx)
        } else {
            pt
        };
        self.curve.ctrls.push(pt);
        self.update();
    }

    /// Replace the control point at `index`.
    ///
    /// In x-function mode later points are pushed right so x stays monotone.
    pub fn set_point(&mut self, pt: Vec3, index: usize) -> Result<()> {
        let i = CoreError::check_index("index", index, self.curve.len())?;
        let ctrls = &mut self.curve.ctrls;

        if self.x_func {
            let minx = if i == 0 { 0.0 } else { ctrls[i - 1].x };
            ctrls[i] = Self::constrain(pt, minx);
            for j in i + 1..ctrls.len() {
                ctrls[j].x = clamp(ctrls[j].x, ctrls[j - 1].x, 1.0);
            }
        } else {
            ctrls[i] = pt;
        }

        self.update();
        Ok(())
    }

    /// Remove and return the control point at `index`.
    pub fn remove_point(&mut self, index: usize) -> Result<Vec3> {
        let i = CoreError::check_index("index", index, self.curve.len())?;
        let pt = self.curve.ctrls.remove(i);
        self.update();
        Ok(pt)
    }

    /// Replace all control points.
    ///
    /// In x-function mode the points are sorted by x and constrained as in
    /// [`Vec3Curve::add_point`].
    pub fn set_points(&mut self, pts: &[Vec3]) {
        let ctrls = &mut self.curve.ctrls;
        ctrls.clear();
        ctrls.extend_from_slice(pts);
        if self.x_func {
            ctrls.sort_by(|a, b| a.x.total_cmp(&b.x));
            let mut minx = 0.0;
            for pt in ctrls.iter_mut() {
                *pt = Self::constrain(*pt, minx);
                minx = pt.x;
            }
        }
        self.update();
    }

    /// Remove every control point.
    pub fn clear(&mut self) {
        self.curve.clear();
    }

    fn update(&mut self) {
        if self.x_func {
            self.curve.ctrls.sort_by(|a, b| a.x.total_cmp(&b.x));
        }
        self.curve.calculate_derivs();
    }

    /// Evaluate the curve at parameter `t`.
    pub fn at(&self, t: Real) -> Option<Vec3> {
        self.curve.at(t)
    }

    /// The curve's y value at `x`, see [`Vec3Curve::at_x_threshold`].
    pub fn at_x(&self, x: Real) -> Option<Real> {
        self.at_x_threshold(x, AT_X_THRESHOLD)
    }

    /// The curve's y value at `x`.
    ///
    /// Below the first or above the last control point the end y value is returned.
    /// In linear mode the bracketing control points are interpolated directly, otherwise
    /// the parameter is bisected until the curve's x is within `threshold` of `x`.
    pub fn at_x_threshold(&self, x: Real, threshold: Real) -> Option<Real> {
        let ctrls = self.curve.points();
        let first = ctrls.first()?;
        let last = ctrls.last()?;

        if x <= first.x {
            return Some(first.y);
        }
        if x >= last.x {
            return Some(last.y);
        }

        if self.linear {
            let i = ctrls.iter().position(|p| p.x >= x)?.max(1);
            let (a, b) = (ctrls[i - 1], ctrls[i]);
            return Some(lerp(lerp_xi(x, a.x, b.x), a.y, b.y));
        }

        let (mut start, mut end, mut mid) = (0.0, 1.0, 0.5);
        let mut val = self.curve.at(mid)?;
        let mut diff = val.x - x;

        while libm::fabs(diff) > threshold && (end - start) > threshold {
            if diff > 0.0 {
                end = mid;
            } else {
                start = mid;
            }
            mid = start + (end - start) * 0.5;
            val = self.curve.at(mid)?;
            diff = val.x - x;
        }

        Some(val.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Real, b: Real) -> bool {
        libm::fabs(a - b) < 1e-9
    }

    #[test]
    fn test_empty_curve() {
        let c: ControlCurve<Real> = ControlCurve::new();
        assert_eq!(c.at(0.5), None);
        assert!(c.point(0).is_err());
    }

    #[test]
    fn test_single_point() {
        let c = ControlCurve::from_points(&[Vec3::new(1.0, 2.0, 3.0)]);
        assert_eq!(c.at(0.0), Some(Vec3::new(1.0, 2.0, 3.0)));
        assert_eq!(c.at(0.7), Some(Vec3::new(1.0, 2.0, 3.0)));
    }

    #[test]
    fn test_two_points_midpoint() {
        let c = ControlCurve::from_points(&[0.0, 4.0]);
        assert!(close(c.at(0.5).unwrap(), 2.0));
        assert!(close(c.at(1.0).unwrap(), 4.0));
    }

    #[test]
    fn test_passes_through_control_points() {
        let pts = [0.0, 3.0, -1.0, 2.0, 5.0, 4.0];
        let c = ControlCurve::from_points(&pts);
        let n = pts.len();
        for (i, p) in pts.iter().enumerate() {
            let v = c.at(i as Real / (n - 1) as Real).unwrap();
            assert!(close(v, *p), "point {}: {} != {}", i, v, p);
        }
    }

    #[test]
    fn test_collinear_points_stay_linear() {
        let c = ControlCurve::from_points(&[0.0, 1.0, 2.0]);
        assert!(close(c.at(0.25).unwrap(), 0.5));
        assert!(close(c.at(0.75).unwrap(), 1.5));
    }

    #[test]
    fn test_edit_points() {
        let mut c = ControlCurve::from_points(&[0.0, 1.0, 2.0]);
        c.set_point(5.0, 2).unwrap();
        assert!(close(c.at(1.0).unwrap(), 5.0));
        assert_eq!(c.remove_point(1), Ok(1.0));
        assert_eq!(c.len(), 2);
        assert_eq!(
            c.set_point(0.0, 2),
            Err(CoreError::Index { name: "index", value: 2, max: 2 })
        );
        c.clear();
        assert!(c.is_empty());
    }

    #[test]
    fn test_x_func_constraints() {
        let mut c = Vec3Curve::new(true);
        c.add_point(Vec3::new(0.5, 2.0, 7.0));
        c.add_point(Vec3::new(0.2, 0.5, 0.0));
        assert_eq!(c.point(0), Ok(Vec3::new(0.5, 1.0, 0.0)));
        assert_eq!(c.point(1), Ok(Vec3::new(0.5, 0.5, 0.0)));

        c.add_point(Vec3::new(0.7, 0.1, 0.0));
        c.set_point(Vec3::new(0.9, 0.5, 0.0), 0).unwrap();
        assert!(c.points().windows(2).all(|w| w[0].x <= w[1].x));
        assert!(c.points().iter().all(|p| p.x >= 0.9));
    }

    #[test]
    fn test_set_points_constrained() {
        let mut c = Vec3Curve::new(true);
        c.set_points(&[
            Vec3::new(1.4, 0.5, 3.0),
            Vec3::new(-0.3, -1.0, 1.0),
            Vec3::new(0.4, 0.25, 0.0),
        ]);
        assert_eq!(
            c.points(),
            &[
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(0.4, 0.25, 0.0),
                Vec3::new(1.0, 0.5, 0.0),
            ]
        );

        let mut free = Vec3Curve::new(false);
        free.set_points(&[Vec3::new(2.0, -1.0, 5.0)]);
        assert_eq!(free.points(), &[Vec3::new(2.0, -1.0, 5.0)]);
    }

    #[test]
    fn test_at_x_linear() {
        let mut c = Vec3Curve::new(true).with_linear(true);
        c.set_points(&[
            Vec3::new(0.5, 1.0, 0.0),
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
        ]);
        assert_eq!(c.point(0), Ok(Vec3::ZERO));
        assert!(close(c.at_x(0.25).unwrap(), 0.5));
        assert!(close(c.at_x(0.75).unwrap(), 0.5));
        assert_eq!(c.at_x(-1.0), Some(0.0));
        assert_eq!(c.at_x(2.0), Some(0.0));
    }

    #[test]
    fn test_at_x_bisection() {
        let mut c = Vec3Curve::new(true);
        c.add_point(Vec3::ZERO);
        c.add_point(Vec3::new(1.0, 1.0, 0.0));
        for x in [0.1, 0.3, 0.5, 0.9] {
            let y = c.at_x(x).unwrap();
            assert!(libm::fabs(y - x) <= 1e-3, "at_x({}) = {}", x, y);
        }
        assert_eq!(Vec3Curve::new(true).at_x(0.5), None);
    }
}
