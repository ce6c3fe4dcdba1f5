//! Coloring field values through a [`Spectrum`].

use eidolon_core::{Color, Real, Spectrum};
use eidolon_io::{ColorMatrix, RealMatrix};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Fill `col` with the spectrum colors of the unit values in `mat`.
///
/// Only the rows and columns the two matrices share are written. When `mat` has
/// at least twice as many columns as `col`, the alpha of the color for column `j`
/// is scaled by `mat[(i, col.m() + j)]`; otherwise, with `use_val_as_alpha`, it is
/// scaled by the value itself.
pub fn fill_color_matrix(
    spectrum: &Spectrum,
    col: &mut ColorMatrix,
    mat: &RealMatrix,
    use_val_as_alpha: bool,
) {
    let (col_m, mat_m) = (col.m(), mat.m());
    if col_m == 0 || mat_m == 0 {
        return;
    }

    let has_mat_alpha = mat_m >= col_m * 2;
    let width = col_m.min(mat_m);

    let color_row = |dst: &mut [Color], src: &[Real]| {
        for (j, cell) in dst.iter_mut().take(width).enumerate() {
            let val = src[j];
            let mut c = spectrum.interpolate_color(val);

            if has_mat_alpha {
                c.a *= src[col_m + j] as f32;
            } else if use_val_as_alpha {
                c.a *= val as f32;
            }

            *cell = c;
        }
    };

    #[cfg(feature = "rayon")]
    col.data_mut()
        .par_chunks_mut(col_m)
        .zip(mat.data().par_chunks(mat_m))
        .for_each(|(dst, src)| color_row(dst, src));

    #[cfg(not(feature = "rayon"))]
    col.data_mut()
        .chunks_mut(col_m)
        .zip(mat.data().chunks(mat_m))
        .for_each(|(dst, src)| color_row(dst, src));
}
