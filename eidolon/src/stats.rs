//! Whole-matrix reductions.

use core::ops::Add;

use eidolon_io::{Element, Matrix};

/// Number of cells `v` with `minv <= v <= maxv`.
pub fn count_values_in_range<T>(mat: &Matrix<T>, minv: T, maxv: T) -> usize
where
    T: Element + PartialOrd,
{
    mat.data().iter().filter(|&&v| v >= minv && v <= maxv).count()
}

/// Sum of every cell, starting from the zero value.
pub fn sum_matrix<T>(mat: &Matrix<T>) -> T
where
    T: Element + Add<Output = T>,
{
    mat.data().iter().fold(T::zero(), |acc, &v| acc + v)
}

/// Smallest and largest cell, or `None` for an empty matrix.
pub fn minmax_matrix<T>(mat: &Matrix<T>) -> Option<(T, T)>
where
    T: Element + PartialOrd,
{
    let (first, rest) = mat.data().split_first()?;
    Some(rest.iter().fold((*first, *first), |(lo, hi), &v| {
        (
            if v < lo { v } else { lo },
            if v > hi { v } else { hi },
        )
    }))
}
