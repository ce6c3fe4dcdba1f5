//! Image and image-stack sampling.
//!
//! Images are `RealMatrix` values indexed `(row, column)`, addressed in unit
//! coordinates where `x` runs along columns and `y` along rows. An image stack is
//! a bottom-up slice of equally sized images; `z` in `[0, 1]` runs through it.
//!
//! # Example
//!
//! ```
//! use eidolon::image::{bilerp, image_stack_value};
//! use eidolon::{Matrix, RealMatrix, Vec3};
//!
//! let lower: RealMatrix = Matrix::from_data("lower", "", &[0.0, 1.0, 2.0, 3.0], 2, 2, false).unwrap();
//! let mut upper = lower.clone();
//! upper.add(4.0);
//!
//! assert_eq!(bilerp(&lower, 0.5, 0.5), 1.5);
//!
//! let stack = [lower, upper];
//! let mid = image_stack_value(&stack, Vec3::splat(0.5)).unwrap();
//! assert!((mid - 3.5).abs() < 1e-6);
//! ```

use core::ops::Add;

use eidolon_core::{catmull_rom, lerp, lerp_xi, Real, Transform, Vec3, EPSILON};
use eidolon_io::{Arith, Element, Matrix, RealMatrix};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::error::{EidolonError, Result};

/// Borrowed cells of one image, shareable across threads.
#[derive(Clone, Copy)]
struct Plane<'a> {
    cells: &'a [Real],
    n: usize,
    m: usize,
}

impl<'a> Plane<'a> {
    fn of(mat: &'a RealMatrix) -> Self {
        Self {
            cells: mat.data(),
            n: mat.n(),
            m: mat.m(),
        }
    }

    #[inline]
    fn at(&self, row: usize, col: usize) -> Real {
        self.cells[row.min(self.n - 1) * self.m + col.min(self.m - 1)]
    }

    fn bilerp(&self, x: Real, y: Real) -> Real {
        if self.cells.is_empty() || !(0.0..=1.0).contains(&x) || !(0.0..=1.0).contains(&y) {
            return 0.0;
        }

        let x = x * (self.m - 1) as Real;
        let y = y * (self.n - 1) as Real;
        let (sx, sy) = (x.floor() as usize, y.floor() as usize);
        let dx = x - sx as Real;
        let dy = y - sy as Real;
        let (dx1, dy1) = (1.0 - dx, 1.0 - dy);

        dx * (dy * self.at(sy + 1, sx + 1) + dy1 * self.at(sy, sx + 1))
            + dx1 * (dy * self.at(sy + 1, sx) + dy1 * self.at(sy, sx))
    }
}

fn trilerp_planes(p1: Plane<'_>, p2: Plane<'_>, v1: Vec3, v2: Vec3) -> Real {
    let val1 = p1.bilerp(v1.x, v1.y);
    let val2 = p2.bilerp(v2.x, v2.y);
    let absz = v1.z.abs();
    lerp(lerp_xi(absz, 0.0, absz + v2.z.abs()), val1, val2)
}

/// Sample a non-empty stack of planes at a unit-cube position.
fn stack_value(planes: &[Plane<'_>], pos: Vec3) -> Real {
    let cpos = pos.clamp(Vec3::splat(EPSILON), Vec3::splat(1.0 - EPSILON));
    let last = (planes.len() - 1) as Real;
    let img1 = (cpos.z * last).floor() as usize;
    let img2 = (cpos.z * last).ceil() as usize;
    let dz = if last == 0.0 {
        0.0
    } else {
        lerp_xi(cpos.z, img1 as Real / last, img2 as Real / last)
    };

    trilerp_planes(
        planes[img1],
        planes[img2],
        Vec3::new(cpos.x, cpos.y, dz),
        Vec3::new(cpos.x, cpos.y, 1.0 - dz),
    )
}

/// Bilinearly interpolate `mat` at unit coordinates `(x, y)`.
///
/// Returns zero when either coordinate lies outside `[0, 1]` or the matrix is empty.
pub fn bilerp(mat: &RealMatrix, x: Real, y: Real) -> Real {
    Plane::of(mat).bilerp(x, y)
}

/// Interpolate between two images.
///
/// The x and y components of `v1` and `v2` are unit coordinates on `mat1` and
/// `mat2` respectively; their z components are heights above each plane and
/// weight the blend of the two bilinear samples.
pub fn trilerp(mat1: &RealMatrix, mat2: &RealMatrix, v1: Vec3, v2: Vec3) -> Real {
    trilerp_planes(Plane::of(mat1), Plane::of(mat2), v1, v2)
}

/// Sample an image stack at `pos` in the unit cube.
///
/// Points outside the cube sample as zero. Points on its faces are pulled just
/// inside before sampling.
///
/// # Errors
/// Returns `EmptyStack` if `stack` holds no images.
pub fn image_stack_value(stack: &[RealMatrix], pos: Vec3) -> Result<Real> {
    if stack.is_empty() {
        return Err(EidolonError::EmptyStack);
    }
    if !pos.is_in_unit_cube(EPSILON) {
        return Ok(0.0);
    }
    let planes: Vec<_> = stack.iter().map(Plane::of).collect();
    Ok(stack_value(&planes, pos))
}

/// Resample an image stack into the image `out`.
///
/// Each cell of `out` at unit coordinates `(column / (m-1), row / (n-1), 0)` is
/// mapped by `out_transform` into world space and then by `stack_inverse` into
/// the stack's unit cube. Cells landing inside the cube receive the stack value,
/// the rest are zero. The smallest and largest values written, seeded with the
/// first cell of the bottom image, are recorded as "min" and "max" metadata.
///
/// # Errors
/// Returns `EmptyStack` if `stack` holds no images and an index error if the
/// bottom image is empty.
pub fn interpolate_image_stack(
    stack: &[RealMatrix],
    stack_inverse: &Transform,
    out: &mut RealMatrix,
    out_transform: &Transform,
) -> Result<()> {
    let first = stack.first().ok_or(EidolonError::EmptyStack)?;
    let seed = first.get_at(0, 0)?;
    let planes: Vec<_> = stack.iter().map(Plane::of).collect();

    let (n, m) = (out.n(), out.m());
    let trans = stack_inverse.to_matrix() * out_transform.to_matrix();
    let unit = |k: usize, len: usize| {
        if len > 1 {
            k as Real / (len - 1) as Real
        } else {
            0.0
        }
    };

    let fill_row = |i: usize, row: &mut [Real]| -> Option<(Real, Real)> {
        let mut range: Option<(Real, Real)> = None;
        for (j, cell) in row.iter_mut().enumerate() {
            let pos = trans * Vec3::new(unit(j, m), unit(i, n), 0.0);
            *cell = 0.0;
            if pos.is_in_unit_cube(EPSILON) {
                let val = stack_value(&planes, pos.clamp(Vec3::ZERO, Vec3::splat(1.0)));
                *cell = val;
                range = Some(match range {
                    Some((lo, hi)) => (lo.min(val), hi.max(val)),
                    None => (val, val),
                });
            }
        }
        range
    };

    let mut minv = seed;
    let mut maxv = seed;

    if m > 0 {
        #[cfg(feature = "rayon")]
        let ranges: Vec<_> = out
            .data_mut()
            .par_chunks_mut(m)
            .enumerate()
            .map(|(i, row)| fill_row(i, row))
            .collect();

        #[cfg(not(feature = "rayon"))]
        let ranges: Vec<_> = out
            .data_mut()
            .chunks_mut(m)
            .enumerate()
            .map(|(i, row)| fill_row(i, row))
            .collect();

        for (lo, hi) in ranges.into_iter().flatten() {
            minv = minv.min(lo);
            maxv = maxv.max(hi);
        }
    }

    set_min_max(out, minv, maxv);
    log::debug!(
        "interpolated {}x{} image {} from a stack of {}",
        n,
        m,
        out.name(),
        stack.len()
    );
    Ok(())
}

/// Count the rounded values of `img` into the rows of `hist`.
///
/// A value `v` lands in row `round(v) - min_value`; values falling outside the
/// histogram are ignored.
pub fn calculate_image_histogram(img: &RealMatrix, hist: &mut RealMatrix, min_value: i32) {
    let bins = hist.n();
    let cells = hist.data_mut();

    for &v in img.data() {
        let bin = (v + 0.5) as i32 as i64 - min_value as i64;
        if (0..bins as i64).contains(&bin) {
            cells[bin as usize] += 1.0;
        }
    }
}

/// Smallest rectangle containing every cell greater than `threshold`, as
/// `(min_col, min_row, max_col, max_row)`, or `None` if no cell qualifies.
pub fn calculate_bound_square<T>(mat: &Matrix<T>, threshold: T) -> Option<(usize, usize, usize, usize)>
where
    T: Element + PartialOrd,
{
    let m = mat.m();
    let mut found = mat
        .data()
        .iter()
        .enumerate()
        .filter(|(_, v)| **v > threshold)
        .map(|(k, _)| (k % m, k / m));

    let (col, row) = found.next()?;
    Some(found.fold((col, row, col, row), |(x0, y0, x1, y1), (x, y)| {
        (x0.min(x), y0.min(y), x1.max(x), y1.max(y))
    }))
}

/// Cells at or above `threshold` with at least one of their eight neighbours
/// below it, as `(row, column, 0)` in row-major order.
///
/// Neighbours beyond the matrix edge are not considered.
pub fn find_boundary_points<T>(mat: &Matrix<T>, threshold: T) -> Vec<Vec3>
where
    T: Element + PartialOrd,
{
    let (n, m) = (mat.n(), mat.m());
    let mut result = Vec::new();

    for i in 0..n {
        for j in 0..m {
            if mat.at(i, j) < threshold {
                continue;
            }

            let edge = (i.saturating_sub(1)..(i + 2).min(n)).any(|r| {
                (j.saturating_sub(1)..(j + 2).min(m))
                    .any(|c| (r, c) != (i, j) && mat.at(r, c) < threshold)
            });

            if edge {
                result.push(Vec3::new(i as Real, j as Real, 0.0));
            }
        }
    }

    result
}

/// Catmull-Rom blend of four matrices into `result`:
/// `c0 * v1 + c1 * v2 + c2 * m1 + c3 * m2` with weights from [`catmull_rom`].
///
/// Only the rows and columns common to all five matrices are written.
pub fn cubic_interp_matrices<T>(
    t: Real,
    v1: &Matrix<T>,
    v2: &Matrix<T>,
    m1: &Matrix<T>,
    m2: &Matrix<T>,
    result: &mut Matrix<T>,
) where
    T: Element + Arith<Real> + Add<Output = T>,
{
    let [c0, c1, c2, c3] = catmull_rom(t);
    let inputs = [v1, v2, m1, m2];
    let rows = inputs.iter().map(|x| x.n()).fold(result.n(), usize::min);
    let cols = inputs.iter().map(|x| x.m()).fold(result.m(), usize::min);

    for i in 0..rows {
        for j in 0..cols {
            let val = v1.at(i, j) * c0 + v2.at(i, j) * c1 + m1.at(i, j) * c2 + m2.at(i, j) * c3;
            result.set_unchecked(val, i, j);
        }
    }
}

/// Copy the first `n * m` values of `stream` into `mat` and record their range
/// as "min" and "max" metadata.
///
/// # Errors
/// Returns `ShortStream` if `stream` holds fewer values than `mat` has cells.
pub fn convert_stream_to_real<S>(stream: &[S], mat: &mut RealMatrix) -> Result<()>
where
    S: Copy + Into<Real>,
{
    let needed = mat.len();
    if stream.len() < needed {
        return Err(EidolonError::ShortStream {
            needed,
            got: stream.len(),
        });
    }
    let Some(first) = stream.first() else {
        return Ok(());
    };

    let first: Real = (*first).into();
    let mut minv = first;
    let mut maxv = first;

    for (cell, v) in mat.data_mut().iter_mut().zip(stream) {
        let v: Real = (*v).into();
        minv = minv.min(v);
        maxv = maxv.max(v);
        *cell = v;
    }

    set_min_max(mat, minv, maxv);
    Ok(())
}

fn set_min_max(mat: &mut RealMatrix, minv: Real, maxv: Real) {
    mat.set_meta("min", &minv.to_string());
    mat.set_meta("max", &maxv.to_string());
}
