//! Raw binary matrix files.
//!
//! Reads map the whole file with `mmap` and copy the cells out starting after the
//! header; writes stream the header values and cell bytes through a buffered file.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::os::fd::AsRawFd;
use std::path::Path;
use std::ptr::NonNull;

use crate::element::Element;
use crate::error::{MatrixError, Result};
use crate::matrix::Matrix;

/// Size in bytes of one header value.
pub const HEADER_VALUE_SIZE: usize = core::mem::size_of::<i32>();

/// A read-only mapping of a whole file.
struct FileMap {
    ptr: NonNull<u8>,
    len: usize,
}

impl FileMap {
    fn open(file: &File, len: usize) -> Result<Self> {
        // Safety: file is open for reading and at least `len` bytes long; the
        // mapping is private to this value.
        let ptr = unsafe {
            libc::mmap(
                core::ptr::null_mut(),
                len,
                libc::PROT_READ,
                libc::MAP_SHARED,
                file.as_raw_fd(),
                0,
            )
        };

        if ptr == libc::MAP_FAILED {
            return Err(MatrixError::os("Failed to mmap file", io::Error::last_os_error()));
        }

        NonNull::new(ptr as *mut u8)
            .map(|ptr| Self { ptr, len })
            .ok_or_else(|| MatrixError::memory("Failed to mmap file"))
    }

    fn bytes(&self) -> &[u8] {
        // Safety: ptr is valid for len bytes until drop.
        unsafe { core::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }
}

impl Drop for FileMap {
    fn drop(&mut self) {
        // Safety: ptr/len came from a successful mmap.
        if unsafe { libc::munmap(self.ptr.as_ptr() as *mut libc::c_void, self.len) } == -1 {
            log::warn!("Failed to munmap file: {}", io::Error::last_os_error());
        }
    }
}

/// Open `path` and map `needed` bytes of it, failing if the file is shorter.
fn map_file(path: &Path, needed: usize) -> Result<FileMap> {
    let file = File::open(path)?;
    let len = file.metadata()?.len() as usize;

    if len < needed {
        return Err(MatrixError::memory(format!(
            "File {} holds {} bytes, {} needed",
            path.display(),
            len,
            needed
        )));
    }

    FileMap::open(&file, len)
}

/// Read the first `count` header values of a binary matrix file.
pub fn read_binary_header<P: AsRef<Path>>(path: P, count: usize) -> Result<Vec<i32>> {
    if count == 0 {
        return Ok(Vec::new());
    }

    let size = count * HEADER_VALUE_SIZE;
    let map = map_file(path.as_ref(), size)?;
    Ok(map.bytes()[..size]
        .chunks_exact(HEADER_VALUE_SIZE)
        .map(|c| i32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

impl<T: Element> Matrix<T> {
    /// Fill this matrix from the binary file at `path`, skipping `header_count`
    /// `i32` header values.
    ///
    /// The file must hold at least the header plus `n * m` cells; the matrix
    /// shape is not changed.
    pub fn read_binary_file<P: AsRef<Path>>(&mut self, path: P, header_count: usize) -> Result<()> {
        let path = path.as_ref();
        let offset = header_count * HEADER_VALUE_SIZE;
        let size = self.mem_size();

        if size == 0 {
            return Ok(());
        }

        let map = map_file(path, offset + size)?;
        let dst: &mut [u8] = bytemuck::cast_slice_mut(self.data_mut());
        dst.copy_from_slice(&map.bytes()[offset..offset + size]);

        log::info!(
            "read {}x{} {} matrix {} from {}",
            self.n(),
            self.m(),
            T::TYPE_NAME,
            self.name(),
            path.display()
        );
        Ok(())
    }

    /// Write `header` followed by the cells to `path`, replacing any existing file.
    pub fn store_binary_file<P: AsRef<Path>>(&self, path: P, header: &[i32]) -> Result<()> {
        let path = path.as_ref();
        let mut out = BufWriter::new(File::create(path)?);
        out.write_all(bytemuck::cast_slice(header))?;
        out.write_all(bytemuck::cast_slice(self.data()))?;
        out.flush()?;

        log::info!(
            "stored {}x{} {} matrix {} to {}",
            self.n(),
            self.m(),
            T::TYPE_NAME,
            self.name(),
            path.display()
        );
        Ok(())
    }
}
