//! Whitespace-separated text matrix files.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::element::Element;
use crate::error::{MatrixError, Result};
use crate::matrix::Matrix;

impl<T: Element> Matrix<T> {
    /// Replace the rows of this matrix with those in the text file at `path`.
    ///
    /// Leading lines are skipped until `header_count` integer tokens have been
    /// seen. After that every non-blank line is one row: up to `m` values are
    /// parsed with [`Element::parse_text`] and missing trailing values are zero.
    /// Extra tokens on a line are ignored.
    pub fn read_text_file<P: AsRef<Path>>(&mut self, path: P, header_count: usize) -> Result<()> {
        let path = path.as_ref();
        let reader = BufReader::new(File::open(path)?);

        self.set_n(0)?;

        let m = self.m();
        let mut header_left = header_count;
        let mut row = vec![T::zero(); m];

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let lineno = idx + 1;

            if header_left > 0 {
                header_left = header_left.saturating_sub(line.split_whitespace().count());
                continue;
            }

            if line.trim().is_empty() {
                continue;
            }

            let mut tokens = line.split_whitespace();
            for cell in row.iter_mut() {
                *cell = T::parse_text(&mut tokens)
                    .map_err(|msg| MatrixError::Parse { line: lineno, msg })?
                    .unwrap_or_else(T::zero);
            }
            self.append_row(&row)?;
        }

        log::info!(
            "read {}x{} {} matrix {} from text file {}",
            self.n(),
            m,
            T::TYPE_NAME,
            self.name(),
            path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eidolon_core::{IndexVal, Real, Vec3};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn text_file(contents: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f.flush().unwrap();
        f
    }

    #[test]
    fn test_header_and_blank_lines_skipped() {
        let f = text_file("3 2\n\n1 2\n  \n3 4\n5 6\n");
        let mut mat: Matrix<IndexVal> = Matrix::new("inds", "", 0, 2, false).unwrap();
        mat.read_text_file(f.path(), 2).unwrap();
        assert_eq!(mat.n(), 3);
        assert_eq!(mat.data(), &[1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_header_spread_over_lines() {
        let f = text_file("4\n1\n0.5\n");
        let mut mat: Matrix<Real> = Matrix::new("vals", "", 0, 1, false).unwrap();
        mat.read_text_file(f.path(), 2).unwrap();
        assert_eq!(mat.data(), &[0.5]);
    }

    #[test]
    fn test_vec3_rows_fill_missing_components() {
        let f = text_file("1 2 3 4 5 6\n7 8\n");
        let mut mat: Matrix<Vec3> = Matrix::new("nodes", "", 0, 2, false).unwrap();
        mat.read_text_file(f.path(), 0).unwrap();
        assert_eq!(mat.n(), 2);
        assert_eq!(mat.at(0, 1), Vec3::new(4.0, 5.0, 6.0));
        assert_eq!(mat.at(1, 0), Vec3::new(7.0, 8.0, 0.0));
        assert_eq!(mat.at(1, 1), Vec3::ZERO);
    }

    #[test]
    fn test_existing_rows_replaced() {
        let f = text_file("9\n");
        let mut mat: Matrix<IndexVal> = Matrix::from_data("a", "", &[1, 2], 2, 1, false).unwrap();
        mat.read_text_file(f.path(), 0).unwrap();
        assert_eq!(mat.data(), &[9]);
    }

    #[test]
    fn test_bad_token_reports_line() {
        let f = text_file("1.0\nabc\n");
        let mut mat: Matrix<Real> = Matrix::new("vals", "", 0, 1, false).unwrap();
        let err = mat.read_text_file(f.path(), 0).unwrap_err();
        assert!(matches!(err, MatrixError::Parse { line: 2, .. }));
    }
}
