//! Element-wise arithmetic over rectangular ranges of a matrix.
//!
//! Every operation takes a [`CellRange`]; its bounds are clamped to the matrix
//! (and to the operand matrix, for matrix-matrix operations) rather than rejected,
//! so an oversized range simply covers everything available.

use core::ops::{Add, Div, Mul, Range, Sub};

use eidolon_core::{Rotator, Transform, Vec3};

use crate::element::Element;
use crate::matrix::Matrix;

/// The four arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    /// `a + b`
    Add,
    /// `a - b`
    Sub,
    /// `a * b`
    Mul,
    /// `a / b`
    Div,
}

/// Types closed under the four operators with a right-hand side of `R`.
pub trait Arith<R = Self>:
    Sized + Add<R, Output = Self> + Sub<R, Output = Self> + Mul<R, Output = Self> + Div<R, Output = Self>
{
}

impl<T, R> Arith<R> for T where
    T: Add<R, Output = T> + Sub<R, Output = T> + Mul<R, Output = T> + Div<R, Output = T>
{
}

impl Op {
    /// Compute `a op b`.
    #[inline]
    pub fn eval<T: Arith<R>, R>(self, a: T, b: R) -> T {
        match self {
            Op::Add => a + b,
            Op::Sub => a - b,
            Op::Mul => a * b,
            Op::Div => a / b,
        }
    }
}

/// A block of cells, `[min_row, max_row) x [min_col, max_col)`.
///
/// `None` upper bounds extend to the end of the matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellRange {
    /// First row.
    pub min_row: usize,
    /// One past the last row, or `None` for all remaining rows.
    pub max_row: Option<usize>,
    /// First column.
    pub min_col: usize,
    /// One past the last column, or `None` for all remaining columns.
    pub max_col: Option<usize>,
}

impl CellRange {
    /// Every cell.
    pub const ALL: CellRange = CellRange {
        min_row: 0,
        max_row: None,
        min_col: 0,
        max_col: None,
    };

    /// All columns of rows `[min, max)`.
    pub const fn rows(min: usize, max: usize) -> Self {
        Self {
            min_row: min,
            max_row: Some(max),
            min_col: 0,
            max_col: None,
        }
    }

    /// All rows of columns `[min, max)`.
    pub const fn cols(min: usize, max: usize) -> Self {
        Self {
            min_row: 0,
            max_row: None,
            min_col: min,
            max_col: Some(max),
        }
    }

    /// Row and column ranges clamped to an `n x m` extent.
    pub fn clamp(&self, n: usize, m: usize) -> (Range<usize>, Range<usize>) {
        let max_row = self.max_row.map_or(n, |r| r.min(n));
        let max_col = self.max_col.map_or(m, |c| c.min(m));
        (
            self.min_row.min(max_row)..max_row,
            self.min_col.min(max_col)..max_col,
        )
    }
}

impl<T: Element> Matrix<T> {
    /// Replace each cell in `range` with `f(value, row, col)`.
    pub fn apply<F>(&mut self, mut f: F, range: CellRange)
    where
        F: FnMut(T, usize, usize) -> T,
    {
        let (rows, cols) = range.clamp(self.n(), self.m());
        for i in rows {
            let row = self.row_mut(i);
            for j in cols.clone() {
                row[j] = f(row[j], i, j);
            }
        }
    }

    /// Combine each cell in `range` with `value`.
    pub fn scalar_op<R: Copy>(&mut self, op: Op, value: &R, range: CellRange)
    where
        T: Arith<R>,
    {
        let value = *value;
        self.apply(|v, _, _| op.eval(v, value), range);
    }

    /// Combine each cell in `range` with the cell at the same position in `other`.
    ///
    /// The range is also clamped to the extent of `other`.
    pub fn matrix_op<R: Element>(&mut self, op: Op, other: &Matrix<R>, range: CellRange)
    where
        T: Arith<R>,
    {
        let (rows, cols) = range.clamp(self.n().min(other.n()), self.m().min(other.m()));
        for i in rows {
            let src = other.row(i);
            let dst = self.row_mut(i);
            for j in cols.clone() {
                dst[j] = op.eval(dst[j], src[j]);
            }
        }
    }

    /// Add `value` to every cell.
    pub fn add<R: Copy>(&mut self, value: R)
    where
        T: Arith<R>,
    {
        self.scalar_op(Op::Add, &value, CellRange::ALL);
    }

    /// Subtract `value` from every cell.
    pub fn sub<R: Copy>(&mut self, value: R)
    where
        T: Arith<R>,
    {
        self.scalar_op(Op::Sub, &value, CellRange::ALL);
    }

    /// Multiply every cell by `value`.
    pub fn mul<R: Copy>(&mut self, value: R)
    where
        T: Arith<R>,
    {
        self.scalar_op(Op::Mul, &value, CellRange::ALL);
    }

    /// Divide every cell by `value`.
    pub fn div<R: Copy>(&mut self, value: R)
    where
        T: Arith<R>,
    {
        self.scalar_op(Op::Div, &value, CellRange::ALL);
    }

    /// Add `other` cell-wise over the shared extent.
    pub fn add_m<R: Element>(&mut self, other: &Matrix<R>)
    where
        T: Arith<R>,
    {
        self.matrix_op(Op::Add, other, CellRange::ALL);
    }

    /// Subtract `other` cell-wise over the shared extent.
    pub fn sub_m<R: Element>(&mut self, other: &Matrix<R>)
    where
        T: Arith<R>,
    {
        self.matrix_op(Op::Sub, other, CellRange::ALL);
    }

    /// Multiply by `other` cell-wise over the shared extent.
    pub fn mul_m<R: Element>(&mut self, other: &Matrix<R>)
    where
        T: Arith<R>,
    {
        self.matrix_op(Op::Mul, other, CellRange::ALL);
    }

    /// Divide by `other` cell-wise over the shared extent.
    pub fn div_m<R: Element>(&mut self, other: &Matrix<R>)
    where
        T: Arith<R>,
    {
        self.matrix_op(Op::Div, other, CellRange::ALL);
    }
}

impl Matrix<Vec3> {
    /// Rotate each vector in `range`.
    pub fn rotate(&mut self, rot: &Rotator, range: CellRange) {
        let rot = *rot;
        self.apply(|v, _, _| rot * v, range);
    }

    /// Transform each vector in `range`.
    pub fn transform(&mut self, trans: &Transform, range: CellRange) {
        let trans = *trans;
        self.apply(|v, _, _| trans * v, range);
    }
}
