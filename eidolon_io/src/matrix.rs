//! The `Matrix<T>` container.
//!
//! A matrix is a named, row-major `n x m` block of [`Element`] values. Its cells
//! live either in a local heap buffer or in a shared memory segment that other
//! processes can map.
//!
//! Local matrices over-allocate rows so appends are amortized; the first
//! allocation is exact and later growth follows [`MatrixConfig::grown_capacity`].
//! Shared matrices are sized exactly and can never change shape.

use core::fmt;
use core::ops::{Index, IndexMut};

use crate::config::MatrixConfig;
use crate::element::Element;
use crate::error::{MatrixError, Result};
use crate::meta::Meta;
use crate::shared::{SharedAttached, SharedCreator, SharedDescriptor};

/// Where a matrix keeps its cells.
pub enum Storage<T: Element> {
    /// Heap buffer holding `capacity * m` cells.
    Local(Vec<T>),
    /// Shared segment created by this matrix; unlinked on drop.
    SharedCreator(SharedCreator),
    /// Shared segment created by another handle; only unmapped on drop.
    SharedAttached(SharedAttached),
}

impl<T: Element> Storage<T> {
    #[inline]
    fn cells(&self) -> &[T] {
        match self {
            Storage::Local(v) => v,
            Storage::SharedCreator(s) => bytemuck::cast_slice(s.bytes()),
            Storage::SharedAttached(s) => bytemuck::cast_slice(s.bytes()),
        }
    }

    #[inline]
    fn cells_mut(&mut self) -> &mut [T] {
        match self {
            Storage::Local(v) => v,
            Storage::SharedCreator(s) => bytemuck::cast_slice_mut(s.bytes_mut()),
            Storage::SharedAttached(s) => bytemuck::cast_slice_mut(s.bytes_mut()),
        }
    }

    /// The segment name for shared storage.
    pub fn shared_name(&self) -> Option<&str> {
        match self {
            Storage::Local(_) => None,
            Storage::SharedCreator(s) => Some(s.name()),
            Storage::SharedAttached(s) => Some(s.name()),
        }
    }

    /// True for either shared variant.
    #[inline]
    pub fn is_shared(&self) -> bool {
        !matches!(self, Storage::Local(_))
    }
}

/// A named two-dimensional array of `T`.
///
/// # Example
///
/// ```
/// use eidolon_io::Matrix;
/// use eidolon_core::Vec3;
///
/// let mut nodes: Matrix<Vec3> = Matrix::new("nodes", "", 0, 1, false).unwrap();
/// nodes.append_value(Vec3::new(1.0, 2.0, 3.0), 0).unwrap();
/// nodes.append_value(Vec3::new(4.0, 5.0, 6.0), 0).unwrap();
///
/// assert_eq!(nodes.n(), 2);
/// assert_eq!(nodes.get_at(1, 0).unwrap(), Vec3::new(4.0, 5.0, 6.0));
/// ```
pub struct Matrix<T: Element> {
    name: String,
    type_tag: String,
    meta: Meta,
    n: usize,
    m: usize,
    /// Allocated rows, at least `n`.
    capacity: usize,
    storage: Storage<T>,
    config: MatrixConfig,
}

impl<T: Element> Matrix<T> {
    /// Create an `n x m` matrix of zeros, in shared memory if `shared`.
    pub fn new(name: &str, type_tag: &str, n: usize, m: usize, shared: bool) -> Result<Self> {
        Self::with_config(name, type_tag, n, m, shared, MatrixConfig::default())
    }

    /// Like [`Matrix::new`] with explicit growth and naming settings.
    pub fn with_config(
        name: &str,
        type_tag: &str,
        n: usize,
        m: usize,
        shared: bool,
        config: MatrixConfig,
    ) -> Result<Self> {
        let mut mat = Self {
            name: name.to_owned(),
            type_tag: type_tag.to_owned(),
            meta: Meta::new(),
            n,
            m,
            capacity: n,
            storage: Storage::Local(vec![T::zero(); n * m]),
            config,
        };
        mat.set_shared(shared)?;
        Ok(mat)
    }

    /// Create an `n x m` matrix holding a copy of `data` in row-major order.
    pub fn from_data(
        name: &str,
        type_tag: &str,
        data: &[T],
        n: usize,
        m: usize,
        shared: bool,
    ) -> Result<Self> {
        if data.len() != n * m {
            return Err(MatrixError::memory(format!(
                "Data length {} does not match dimensions {}x{}",
                data.len(),
                n,
                m
            )));
        }
        let mut mat = Self::new(name, type_tag, n, m, shared)?;
        mat.data_mut().copy_from_slice(data);
        Ok(mat)
    }

    /// Attach to a shared matrix created by another handle or process.
    pub fn from_descriptor(desc: &SharedDescriptor) -> Result<Self> {
        let size = desc.n * desc.m * core::mem::size_of::<T>();
        let segment = SharedAttached::attach(&desc.shared_name, size)?;

        Ok(Self {
            name: desc.name.clone(),
            type_tag: desc.type_tag.clone(),
            meta: Meta::from_serialized(&desc.meta),
            n: desc.n,
            m: desc.m,
            capacity: desc.n,
            storage: Storage::SharedAttached(segment),
            config: MatrixConfig::default(),
        })
    }

    /// Describe this shared matrix for [`Matrix::from_descriptor`].
    ///
    /// Fails with [`MatrixError::NotShared`] on a local matrix.
    pub fn descriptor(&self) -> Result<SharedDescriptor> {
        let shared_name = self
            .shared_name()
            .ok_or_else(|| MatrixError::NotShared(self.name.clone()))?;

        Ok(SharedDescriptor {
            name: self.name.clone(),
            type_tag: self.type_tag.clone(),
            shared_name: shared_name.to_owned(),
            meta: self.meta.serialize(),
            n: self.n,
            m: self.m,
        })
    }

    // ========================================================================
    // Attributes
    // ========================================================================

    /// Matrix name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the matrix. A shared segment keeps its original name.
    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_owned();
    }

    /// Free-form type tag.
    #[inline]
    pub fn type_tag(&self) -> &str {
        &self.type_tag
    }

    /// Replace the type tag.
    pub fn set_type_tag(&mut self, type_tag: &str) {
        self.type_tag = type_tag.to_owned();
    }

    /// Number of rows.
    #[inline]
    pub fn n(&self) -> usize {
        self.n
    }

    /// Number of columns.
    #[inline]
    pub fn m(&self) -> usize {
        self.m
    }

    /// Number of cells, `n * m`.
    #[inline]
    pub fn len(&self) -> usize {
        self.n * self.m
    }

    /// True if there are no cells.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Allocated rows.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Size of the cells in bytes.
    #[inline]
    pub fn mem_size(&self) -> usize {
        self.len() * core::mem::size_of::<T>()
    }

    /// Growth and naming settings.
    #[inline]
    pub fn config(&self) -> &MatrixConfig {
        &self.config
    }

    /// The backing storage.
    #[inline]
    pub fn storage(&self) -> &Storage<T> {
        &self.storage
    }

    /// True if the cells live in shared memory.
    #[inline]
    pub fn is_shared(&self) -> bool {
        self.storage.is_shared()
    }

    /// True if this handle created its shared segment.
    #[inline]
    pub fn is_creator(&self) -> bool {
        matches!(self.storage, Storage::SharedCreator(_))
    }

    /// Resolved segment name of a shared matrix.
    #[inline]
    pub fn shared_name(&self) -> Option<&str> {
        self.storage.shared_name()
    }

    // ========================================================================
    // Cell access
    // ========================================================================

    /// All `n * m` cells in row-major order.
    #[inline]
    pub fn data(&self) -> &[T] {
        let len = self.len();
        &self.storage.cells()[..len]
    }

    /// All `n * m` cells in row-major order, writable.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [T] {
        let len = self.len();
        &mut self.storage.cells_mut()[..len]
    }

    /// The cells of `row`. Panics if `row >= n`.
    #[inline]
    pub fn row(&self, row: usize) -> &[T] {
        &self.data()[row * self.m..(row + 1) * self.m]
    }

    /// The cells of `row`, writable. Panics if `row >= n`.
    #[inline]
    pub fn row_mut(&mut self, row: usize) -> &mut [T] {
        let m = self.m;
        &mut self.data_mut()[row * m..(row + 1) * m]
    }

    /// Cell `(row, col)` without range checks beyond debug assertions.
    #[inline]
    pub fn at(&self, row: usize, col: usize) -> T {
        debug_assert!(row < self.n && col < self.m);
        self.storage.cells()[col + self.m * row]
    }

    /// Mutable reference to cell `(row, col)` without range checks beyond debug assertions.
    #[inline]
    pub fn at_mut(&mut self, row: usize, col: usize) -> &mut T {
        debug_assert!(row < self.n && col < self.m);
        let m = self.m;
        &mut self.storage.cells_mut()[col + m * row]
    }

    /// Store `value` at `(row, col)` without range checks beyond debug assertions.
    #[inline]
    pub fn set_unchecked(&mut self, value: T, row: usize, col: usize) {
        *self.at_mut(row, col) = value;
    }

    /// Cell `(row, col)`, or an index error naming the offending dimension.
    pub fn get_at(&self, row: usize, col: usize) -> Result<T> {
        let idx = self.checked_index(row, col)?;
        Ok(self.storage.cells()[idx])
    }

    /// Store `value` at `(row, col)`, or fail with an index error.
    pub fn set_at(&mut self, value: T, row: usize, col: usize) -> Result<()> {
        let idx = self.checked_index(row, col)?;
        self.storage.cells_mut()[idx] = value;
        Ok(())
    }

    #[inline]
    fn checked_index(&self, row: usize, col: usize) -> Result<usize> {
        MatrixError::check_row(row, self.n)?;
        MatrixError::check_col(col, self.m)?;
        Ok(col + self.m * row)
    }

    /// Position of the first cell equal to `value`, scanning row-major from
    /// `(after_row, after_col)` inclusive.
    pub fn index_of(&self, value: &T, after_row: usize, after_col: usize) -> Option<(usize, usize)> {
        if self.m == 0 {
            return None;
        }
        let start = after_col + after_row * self.m;
        self.data()
            .iter()
            .enumerate()
            .skip(start)
            .find(|(_, v)| *v == value)
            .map(|(i, _)| (i / self.m, i % self.m))
    }

    // ========================================================================
    // Bulk operations
    // ========================================================================

    /// Set every cell to `value`.
    pub fn fill(&mut self, value: T) {
        self.data_mut().fill(value);
    }

    /// Copy bytes from `other`, as many as the smaller of the two holds.
    pub fn copy_from<R: Element>(&mut self, other: &Matrix<R>) {
        let src: &[u8] = bytemuck::cast_slice(other.data());
        let dst: &mut [u8] = bytemuck::cast_slice_mut(self.data_mut());
        let len = src.len().min(dst.len());
        dst[..len].copy_from_slice(&src[..len]);
    }

    /// Reverse the byte order of every cell.
    pub fn swap_endian(&mut self) {
        for v in self.data_mut() {
            *v = v.swap_endian();
        }
    }

    /// Permute the columns of every row: new column `j` takes old column `order[j]`.
    pub fn reorder_columns(&mut self, order: &[usize]) -> Result<()> {
        if order.len() != self.m {
            return Err(MatrixError::memory(format!(
                "Column order lists {} indices, matrix has {} columns",
                order.len(),
                self.m
            )));
        }
        for &o in order {
            if o >= self.m {
                return Err(MatrixError::Index {
                    name: "order",
                    value: o,
                    max: self.m,
                });
            }
        }

        let mut buf = vec![T::zero(); self.m];
        for i in 0..self.n {
            let row = self.row_mut(i);
            buf.copy_from_slice(row);
            for (dst, &o) in row.iter_mut().zip(order) {
                *dst = buf[o];
            }
        }
        Ok(())
    }

    /// A new `n x m` matrix copied from this one starting at `(row_off, col_off)`.
    pub fn sub_matrix(
        &self,
        name: &str,
        n: usize,
        m: usize,
        row_off: usize,
        col_off: usize,
        shared: bool,
    ) -> Result<Self> {
        if n > self.n || m > self.m {
            return Err(MatrixError::memory(
                "Submatrix dimensions may not exceed matrix dimensions",
            ));
        }
        if n + row_off > self.n || m + col_off > self.m {
            return Err(MatrixError::memory(
                "Submatrix dimensions plus offsets may not exceed matrix dimensions",
            ));
        }

        let mut mat = Self::with_config(name, &self.type_tag, n, m, shared, self.config)?;
        for i in 0..n {
            let src = &self.row(i + row_off)[col_off..col_off + m];
            mat.row_mut(i).copy_from_slice(src);
        }
        Ok(mat)
    }

    /// A new `n x m` matrix holding the first cells of this one in row-major order.
    pub fn reshape(&self, name: &str, n: usize, m: usize, shared: bool) -> Result<Self> {
        let mut mat = Self::with_config(name, &self.type_tag, n, m, shared, self.config)?;
        let len = mat.len().min(self.len());
        mat.data_mut()[..len].copy_from_slice(&self.data()[..len]);
        Ok(mat)
    }

    /// An independent copy named `name`, carrying the type tag and metadata.
    pub fn clone_as(&self, name: &str, shared: bool) -> Result<Self> {
        let mut mat = Self::with_config(name, &self.type_tag, self.n, self.m, shared, self.config)?;
        mat.data_mut().copy_from_slice(self.data());
        mat.meta.extend_from(&self.meta);
        Ok(mat)
    }

    // ========================================================================
    // Sizing
    // ========================================================================

    fn check_not_shared(&self) -> Result<()> {
        if self.is_shared() {
            Err(MatrixError::SharedResize(self.name.clone()))
        } else {
            Ok(())
        }
    }

    /// Make room for `n + reserve` rows, reallocating a local buffer if needed.
    fn ensure_capacity(&mut self, reserve: usize) {
        if self.n + reserve <= self.capacity {
            return;
        }

        let new_cap = self.config.grown_capacity(self.n, reserve);
        if let Storage::Local(cells) = &mut self.storage {
            cells.resize(new_cap * self.m, T::zero());
        }
        log::debug!(
            "matrix {} grown from {} to {} rows",
            self.name,
            self.capacity,
            new_cap
        );
        self.capacity = new_cap;
    }

    /// Set the row count. New rows are zero; capacity never shrinks.
    pub fn set_n(&mut self, n: usize) -> Result<()> {
        self.check_not_shared()?;
        let old_n = self.n;
        self.n = n;
        self.ensure_capacity(0);

        if n > old_n {
            let m = self.m;
            self.storage.cells_mut()[old_n * m..n * m].fill(T::zero());
        }
        Ok(())
    }

    /// Regroup the existing cells into rows of `m` columns, dropping any
    /// incomplete last row. `m` is raised to at least 1.
    pub fn set_m(&mut self, m: usize) -> Result<()> {
        self.check_not_shared()?;
        let m = m.max(1);
        if m > self.len() {
            return Err(MatrixError::memory("New m value larger than matrix size"));
        }

        let cells = self.capacity * self.m;
        self.n = self.len() / m;
        self.capacity = cells / m;
        self.m = m;
        if let Storage::Local(v) = &mut self.storage {
            v.truncate(self.capacity * m);
        }
        Ok(())
    }

    /// Add `num` zeroed rows.
    pub fn add_rows(&mut self, num: usize) -> Result<()> {
        self.set_n(self.n + num)
    }

    /// Ensure `num` rows beyond `n` are allocated.
    pub fn reserve_rows(&mut self, num: usize) -> Result<()> {
        self.check_not_shared()?;
        self.ensure_capacity(num);
        Ok(())
    }

    /// Append one row of exactly `m` values.
    pub fn append_row(&mut self, values: &[T]) -> Result<()> {
        if values.len() != self.m {
            return Err(MatrixError::memory(format!(
                "Column dimensions of matrix ({}) and row ({}) do not match",
                self.m,
                values.len()
            )));
        }
        self.add_rows(1)?;
        let last = self.n - 1;
        self.row_mut(last).copy_from_slice(values);
        Ok(())
    }

    /// Append a zero row with `value` in column `col`.
    pub fn append_value(&mut self, value: T, col: usize) -> Result<()> {
        MatrixError::check_col(col, self.m)?;
        self.add_rows(1)?;
        let last = self.n - 1;
        self.set_unchecked(value, last, col);
        Ok(())
    }

    /// Append every row of `other`.
    pub fn append(&mut self, other: &Matrix<T>) -> Result<()> {
        if other.m != self.m {
            return Err(MatrixError::memory(format!(
                "Column dimensions of matrix ({}) and appended matrix ({}) do not match",
                self.m, other.m
            )));
        }
        let old_len = self.len();
        self.add_rows(other.n)?;
        self.data_mut()[old_len..].copy_from_slice(other.data());
        Ok(())
    }

    /// Remove `row`, shifting later rows up.
    pub fn remove_row(&mut self, row: usize) -> Result<()> {
        self.check_not_shared()?;
        MatrixError::check_row(row, self.n)?;

        let m = self.m;
        let end = self.len();
        self.storage.cells_mut().copy_within((row + 1) * m..end, row * m);
        self.set_n(self.n - 1)
    }

    /// Move the cells into or out of shared memory.
    ///
    /// Does nothing if the matrix is already in the requested mode. Becoming
    /// shared creates a segment sized exactly `n * m` and copies the cells in.
    /// Becoming local copies the cells to the heap and releases the segment.
    pub fn set_shared(&mut self, shared: bool) -> Result<()> {
        if shared == self.is_shared() {
            return Ok(());
        }

        if shared {
            let mut segment = SharedCreator::create(&self.name, self.mem_size(), &self.config)?;
            let cells: &mut [T] = bytemuck::cast_slice_mut(segment.bytes_mut());
            cells.copy_from_slice(self.data());
            self.storage = Storage::SharedCreator(segment);
        } else {
            let cells = self.data().to_vec();
            self.storage = Storage::Local(cells);
        }

        self.capacity = self.n;
        Ok(())
    }

    // ========================================================================
    // Metadata
    // ========================================================================

    /// The metadata map.
    #[inline]
    pub fn meta(&self) -> &Meta {
        &self.meta
    }

    /// The metadata map, writable.
    #[inline]
    pub fn meta_mut(&mut self) -> &mut Meta {
        &mut self.meta
    }

    /// Store `value` under `key`; `|` characters are dropped from both.
    pub fn set_meta(&mut self, key: &str, value: &str) {
        self.meta.set(key, value);
    }

    /// The value stored under `key`.
    pub fn get_meta(&self, key: &str) -> Option<&str> {
        self.meta.get(key)
    }

    /// True if `key` is stored.
    pub fn has_meta(&self, key: &str) -> bool {
        self.meta.contains(key)
    }

    /// Stored keys in ascending order.
    pub fn meta_keys(&self) -> Vec<String> {
        self.meta.keys().map(str::to_owned).collect()
    }

    /// Metadata as `key||value||...`.
    pub fn serialize_meta(&self) -> String {
        self.meta.serialize()
    }

    /// Merge metadata from `key||value||...` form.
    pub fn deserialize_meta(&mut self, s: &str) {
        self.meta.deserialize(s);
    }
}

impl<T: Element> Clone for Matrix<T> {
    /// Always produces a local matrix.
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            type_tag: self.type_tag.clone(),
            meta: self.meta.clone(),
            n: self.n,
            m: self.m,
            capacity: self.n,
            storage: Storage::Local(self.data().to_vec()),
            config: self.config,
        }
    }
}

impl<T: Element> fmt::Debug for Matrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matrix")
            .field("name", &self.name)
            .field("type_tag", &self.type_tag)
            .field("elem", &T::TYPE_NAME)
            .field("n", &self.n)
            .field("m", &self.m)
            .field("capacity", &self.capacity)
            .field("shared_name", &self.shared_name())
            .finish()
    }
}

impl<T: Element> Index<(usize, usize)> for Matrix<T> {
    type Output = T;

    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &T {
        debug_assert!(row < self.n && col < self.m);
        &self.storage.cells()[col + self.m * row]
    }
}

impl<T: Element> IndexMut<(usize, usize)> for Matrix<T> {
    #[inline]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        self.at_mut(row, col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eidolon_core::{IndexVal, Real, Vec3};

    #[test]
    fn test_new_is_zeroed_and_exact() {
        let mat: Matrix<Real> = Matrix::new("a", "", 3, 2, false).unwrap();
        assert_eq!(mat.len(), 6);
        assert_eq!(mat.capacity(), 3);
        assert!(mat.data().iter().all(|&v| v == 0.0));
        assert!(!mat.is_shared());
        assert_eq!(mat.shared_name(), None);
    }

    #[test]
    fn test_checked_access_reports_dimension() {
        let mut mat: Matrix<IndexVal> = Matrix::new("a", "", 2, 3, false).unwrap();
        mat.set_at(7, 1, 2).unwrap();
        assert_eq!(mat.get_at(1, 2).unwrap(), 7);
        assert_eq!(mat.at(1, 2), 7);
        assert_eq!(mat[(1, 2)], 7);

        let err = mat.get_at(2, 0).unwrap_err();
        assert_eq!(err.to_string(), "Bad value 2 for index 'n' (0 <= n < 2)");
        let err = mat.set_at(1, 0, 3).unwrap_err();
        assert_eq!(err.to_string(), "Bad value 3 for index 'm' (0 <= m < 3)");
    }

    #[test]
    fn test_growth_over_allocates() {
        let mut mat: Matrix<Real> = Matrix::new("a", "", 0, 1, false).unwrap();
        assert_eq!(mat.capacity(), 0);

        mat.append_value(1.0, 0).unwrap();
        assert_eq!(mat.capacity(), 1000);

        mat.set_n(2000).unwrap();
        assert_eq!(mat.capacity(), 3000);
        assert_eq!(mat.at(0, 0), 1.0);
        assert_eq!(mat.at(1999, 0), 0.0);
    }

    #[test]
    fn test_set_n_zeroes_reexposed_rows() {
        let mut mat: Matrix<Real> = Matrix::new("a", "", 3, 1, false).unwrap();
        mat.fill(5.0);
        mat.set_n(1).unwrap();
        mat.set_n(3).unwrap();
        assert_eq!(mat.data(), &[5.0, 0.0, 0.0]);
    }

    #[test]
    fn test_append_row_width_mismatch() {
        let mut mat: Matrix<Real> = Matrix::new("a", "", 0, 3, false).unwrap();
        mat.append_row(&[1.0, 2.0, 3.0]).unwrap();
        assert!(matches!(
            mat.append_row(&[1.0]),
            Err(MatrixError::Memory { .. })
        ));
        assert_eq!(mat.n(), 1);
    }

    #[test]
    fn test_append_matrix() {
        let mut a: Matrix<IndexVal> = Matrix::from_data("a", "", &[1, 2], 1, 2, false).unwrap();
        let b: Matrix<IndexVal> = Matrix::from_data("b", "", &[3, 4, 5, 6], 2, 2, false).unwrap();
        a.append(&b).unwrap();
        assert_eq!(a.data(), &[1, 2, 3, 4, 5, 6]);

        let c: Matrix<IndexVal> = Matrix::new("c", "", 1, 3, false).unwrap();
        let err = a.append(&c).unwrap_err();
        assert!(err.to_string().contains("do not match"));
    }

    #[test]
    fn test_remove_row() {
        let mut mat: Matrix<IndexVal> =
            Matrix::from_data("a", "", &[1, 2, 3, 4, 5, 6], 3, 2, false).unwrap();
        mat.remove_row(1).unwrap();
        assert_eq!(mat.data(), &[1, 2, 5, 6]);
        mat.remove_row(1).unwrap();
        assert_eq!(mat.data(), &[1, 2]);
        assert!(mat.remove_row(1).is_err());
    }

    #[test]
    fn test_set_m_regroups_cells() {
        let mut mat: Matrix<IndexVal> =
            Matrix::from_data("a", "", &[1, 2, 3, 4, 5, 6, 7], 7, 1, false).unwrap();
        mat.set_m(3).unwrap();
        assert_eq!((mat.n(), mat.m()), (2, 3));
        assert_eq!(mat.row(1), &[4, 5, 6]);
        assert!(mat.set_m(100).is_err());
    }

    #[test]
    fn test_reorder_columns() {
        let mut mat: Matrix<IndexVal> =
            Matrix::from_data("a", "", &[1, 2, 3, 4, 5, 6], 2, 3, false).unwrap();
        mat.reorder_columns(&[2, 0, 1]).unwrap();
        assert_eq!(mat.data(), &[3, 1, 2, 6, 4, 5]);
        assert!(matches!(
            mat.reorder_columns(&[0, 1, 3]),
            Err(MatrixError::Index { name: "order", .. })
        ));
    }

    #[test]
    fn test_index_of() {
        let mat: Matrix<IndexVal> =
            Matrix::from_data("a", "", &[1, 2, 3, 2, 5, 6], 2, 3, false).unwrap();
        assert_eq!(mat.index_of(&2, 0, 0), Some((0, 1)));
        assert_eq!(mat.index_of(&2, 0, 2), Some((1, 0)));
        assert_eq!(mat.index_of(&9, 0, 0), None);
    }

    #[test]
    fn test_sub_matrix_and_reshape() {
        let mat: Matrix<IndexVal> =
            Matrix::from_data("a", "tag", &[1, 2, 3, 4, 5, 6, 7, 8, 9], 3, 3, false).unwrap();

        let sub = mat.sub_matrix("s", 2, 2, 1, 1, false).unwrap();
        assert_eq!(sub.data(), &[5, 6, 8, 9]);
        assert_eq!(sub.type_tag(), "tag");
        assert!(mat.sub_matrix("s", 2, 2, 2, 0, false).is_err());
        assert!(mat.sub_matrix("s", 4, 1, 0, 0, false).is_err());

        let flat = mat.reshape("r", 2, 2, false).unwrap();
        assert_eq!(flat.data(), &[1, 2, 3, 4]);
        let big = mat.reshape("r", 5, 2, false).unwrap();
        assert_eq!(&big.data()[8..], &[9, 0]);
    }

    #[test]
    fn test_clone_does_not_alias() {
        let mut a: Matrix<Vec3> = Matrix::new("a", "", 2, 1, false).unwrap();
        a.set_meta("k", "v");
        let mut b = a.clone_as("b", false).unwrap();
        b.set_unchecked(Vec3::X, 0, 0);
        assert_eq!(a.at(0, 0), Vec3::ZERO);
        assert_eq!(b.get_meta("k"), Some("v"));

        let c = b.clone();
        b.fill(Vec3::Y);
        assert_eq!(c.at(0, 0), Vec3::X);
    }

    #[test]
    fn test_copy_from_other_type() {
        let src: Matrix<IndexVal> = Matrix::from_data("s", "", &[1, 2, 3, 4], 4, 1, false).unwrap();
        let mut dst: Matrix<IndexVal> = Matrix::new("d", "", 2, 1, false).unwrap();
        dst.copy_from(&src);
        assert_eq!(dst.data(), &[1, 2]);

        let vecs: Matrix<Vec3> =
            Matrix::from_data("v", "", &[Vec3::new(1.0, 2.0, 3.0)], 1, 1, false).unwrap();
        let mut reals: Matrix<Real> = Matrix::new("r", "", 4, 1, false).unwrap();
        reals.copy_from(&vecs);
        assert_eq!(reals.data(), &[1.0, 2.0, 3.0, 0.0]);
    }

    #[test]
    fn test_shared_refuses_resize() {
        let mut mat: Matrix<Real> = Matrix::new("matrix_test_resize", "", 2, 2, true).unwrap();
        assert!(mat.is_shared() && mat.is_creator());
        assert!(matches!(mat.set_n(3), Err(MatrixError::SharedResize(_))));
        assert!(matches!(mat.append_row(&[1.0, 2.0]), Err(MatrixError::SharedResize(_))));
        assert!(mat.reserve_rows(10).is_err());
        assert_eq!(mat.n(), 2);
    }

    #[test]
    fn test_set_shared_round_trip() {
        let mut mat: Matrix<Real> =
            Matrix::from_data("matrix_test_toggle", "", &[1.0, 2.0], 2, 1, false).unwrap();
        mat.set_shared(true).unwrap();
        assert!(mat.shared_name().is_some());
        assert_eq!(mat.data(), &[1.0, 2.0]);

        mat.set_shared(true).unwrap();
        mat.set_shared(false).unwrap();
        assert!(!mat.is_shared());
        mat.append_value(3.0, 0).unwrap();
        assert_eq!(mat.data(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_empty_cannot_be_shared() {
        let err = Matrix::<Real>::new("matrix_test_empty", "", 0, 3, true).unwrap_err();
        assert_eq!(err.to_string(), "Cannot make empty matrix shared");
    }

    #[test]
    fn test_descriptor_requires_shared() {
        let mat: Matrix<Real> = Matrix::new("local", "", 1, 1, false).unwrap();
        assert!(matches!(mat.descriptor(), Err(MatrixError::NotShared(_))));
    }
}
