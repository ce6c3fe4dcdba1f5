//! Color spectra mapping unit field values to colors.
//!
//! A spectrum is a list of `(position, color)` entries kept sorted by position plus an
//! alpha curve in x-function mode. Colors are interpolated linearly between the two
//! entries bracketing a position; alpha comes from the curve when it has at least two
//! control points, scaled by the spectrum's global alpha.

use alloc::string::String;
use alloc::vec::Vec;

use crate::curve::Vec3Curve;
use crate::error::{CoreError, Result};
use crate::types::{clamp, equals_epsilon, lerp_xi, Color, Real, Vec3};

/// Ordered position to color mapping with an independent alpha curve.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    name: String,
    entries: Vec<(Real, Color)>,
    alpha_curve: Vec3Curve,
    alpha: Option<f32>,
    default_color: Color,
}

impl Default for Spectrum {
    fn default() -> Self {
        Self::new("")
    }
}

impl Spectrum {
    /// Create an empty spectrum with global alpha 1 and a white default color.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
            alpha_curve: Vec3Curve::new(true),
            alpha: Some(1.0),
            default_color: Color::default(),
        }
    }

    /// Builder method: set the global alpha, `None` to leave colors' alpha untouched.
    pub fn with_alpha(mut self, alpha: Option<f32>) -> Self {
        self.alpha = alpha;
        self
    }

    /// Builder method: set the color returned when the spectrum has no entries.
    pub fn with_default_color(mut self, color: Color) -> Self {
        self.default_color = color;
        self
    }

    /// The spectrum's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Global alpha applied by [`Spectrum::interpolate_color`].
    pub fn alpha(&self) -> Option<f32> {
        self.alpha
    }

    /// Set the global alpha.
    pub fn set_alpha(&mut self, alpha: Option<f32>) {
        self.alpha = alpha;
    }

    /// Color returned when the spectrum has no entries.
    pub fn default_color(&self) -> Color {
        self.default_color
    }

    /// Remove all color entries and alpha control points.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.alpha_curve.clear();
    }

    /// Copy the entries and alpha curve of another spectrum, keeping this one's name.
    pub fn copy_from(&mut self, other: &Spectrum) {
        self.entries.clone_from(&other.entries);
        self.alpha_curve.clone_from(&other.alpha_curve);
    }

    fn sort(&mut self) {
        self.entries.sort_by(|a, b| a.0.total_cmp(&b.0));
    }

    /// Add a color entry at `pos`.
    pub fn add(&mut self, pos: Real, color: Color) {
        self.entries.push((pos, color));
        self.sort();
    }

    /// Replace the entry at `index`; the list is re-sorted afterwards.
    pub fn set(&mut self, index: usize, pos: Real, color: Color) -> Result<()> {
        let i = CoreError::check_index("index", index, self.entries.len())?;
        self.entries[i] = (pos, color);
        self.sort();
        Ok(())
    }

    /// Remove and return the entry at `index`.
    pub fn remove(&mut self, index: usize) -> Result<(Real, Color)> {
        let i = CoreError::check_index("index", index, self.entries.len())?;
        Ok(self.entries.remove(i))
    }

    /// Index of the entry matching `pos` (within epsilon) and `color` exactly.
    pub fn find(&self, pos: Real, color: Color) -> Option<usize> {
        self.entries
            .iter()
            .position(|(p, c)| equals_epsilon(*p, pos) && *c == color)
    }

    /// Number of color entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if there are no color entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Position of the entry at `index`.
    pub fn position(&self, index: usize) -> Result<Real> {
        CoreError::check_index("index", index, self.entries.len()).map(|i| self.entries[i].0)
    }

    /// Color of the entry at `index`.
    pub fn color(&self, index: usize) -> Result<Color> {
        CoreError::check_index("index", index, self.entries.len()).map(|i| self.entries[i].1)
    }

    /// The sorted entries.
    pub fn entries(&self) -> &[(Real, Color)] {
        &self.entries
    }

    /// The alpha curve.
    pub fn alpha_curve(&self) -> &Vec3Curve {
        &self.alpha_curve
    }

    /// Append an alpha control point `(position, alpha, 0)`.
    pub fn add_alpha_ctrl(&mut self, pt: Vec3) {
        self.alpha_curve.add_point(pt);
    }

    /// Replace the alpha control point at `index`.
    pub fn set_alpha_ctrl(&mut self, pt: Vec3, index: usize) -> Result<()> {
        self.alpha_curve.set_point(pt, index)
    }

    /// Remove the alpha control point at `index`.
    pub fn remove_alpha_ctrl(&mut self, index: usize) -> Result<Vec3> {
        self.alpha_curve.remove_point(index)
    }

    /// Replace every alpha control point.
    pub fn set_alpha_curve(&mut self, pts: &[Vec3]) {
        self.alpha_curve.set_points(pts);
    }

    /// Interpolate alpha linearly between control points instead of along the spline.
    pub fn set_linear_alpha(&mut self, linear: bool) {
        self.alpha_curve.set_linear(linear);
    }

    /// True if alpha is interpolated linearly.
    pub fn is_linear_alpha(&self) -> bool {
        self.alpha_curve.is_linear()
    }

    /// Color at `pos`.
    ///
    /// Positions at or beyond either end return that end's color exactly; otherwise the
    /// two bracketing entries are blended linearly.
    pub fn interpolate_color(&self, pos: Real) -> Color {
        let mut result = match (self.entries.first(), self.entries.last()) {
            (None, _) | (_, None) => self.default_color,
            (Some(&(p0, c0)), _) if pos <= p0 => c0,
            (_, Some(&(pn, cn))) if pos >= pn => cn,
            _ => {
                // first entry is below `pos` and the last above, so a bracket exists
                let i = self
                    .entries
                    .windows(2)
                    .position(|w| w[1].0 >= pos)
                    .unwrap_or(self.entries.len() - 2);
                let (pa, ca) = self.entries[i];
                let (pb, cb) = self.entries[i + 1];
                ca.interpolate(lerp_xi(pos, pa, pb), &cb)
            }
        };

        if self.alpha_curve.len() > 1 {
            let mut a = self
                .alpha_curve
                .at_x(pos)
                .map_or(1.0, |y| clamp(y, 0.0, 1.0)) as f32;
            if let Some(alpha) = self.alpha.filter(|_| !self.entries.is_empty()) {
                a *= alpha;
            }
            result.a = a;
        } else if let Some(alpha) = self.alpha {
            result.a = alpha;
        }

        result
    }
}
