//! POSIX shared memory segments.
//!
//! A segment is opened with `shm_open`, sized with `ftruncate` by its creator, and
//! mapped read-write with `mmap`. The process that claims a name owns it: dropping
//! a [`SharedCreator`] unmaps and unlinks, dropping a [`SharedAttached`] only unmaps.

use std::ffi::CString;
use std::io;
use std::os::fd::{AsRawFd, FromRawFd, OwnedFd};
use std::ptr::NonNull;

use super::name::shared_name;
use crate::config::MatrixConfig;
use crate::error::{MatrixError, Result};

/// A live `mmap` of a segment. Unmapped on drop.
struct Mapping {
    ptr: NonNull<u8>,
    len: usize,
}

// Safety: the mapping is plain memory owned by this value; moving it between
// threads does not change who may touch it.
unsafe impl Send for Mapping {}

impl Mapping {
    fn new(fd: &OwnedFd, len: usize) -> io::Result<Self> {
        // Safety: fd is an open shared memory descriptor at least `len` bytes long
        // and the mapping is not aliased by any Rust reference yet.
        let ptr = unsafe {
            libc::mmap(
                core::ptr::null_mut(),
                len,
                libc::PROT_READ | libc::PROT_WRITE,
                libc::MAP_SHARED,
                fd.as_raw_fd(),
                0,
            )
        };

        if ptr == libc::MAP_FAILED {
            return Err(io::Error::last_os_error());
        }

        NonNull::new(ptr as *mut u8)
            .map(|ptr| Self { ptr, len })
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "mmap returned null"))
    }

    #[inline]
    fn bytes(&self) -> &[u8] {
        // Safety: ptr is valid for len bytes until drop.
        unsafe { core::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    #[inline]
    fn bytes_mut(&mut self) -> &mut [u8] {
        // Safety: ptr is valid for len bytes until drop and `&mut self` is unique
        // within this process.
        unsafe { core::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }
}

impl Drop for Mapping {
    fn drop(&mut self) {
        // Safety: ptr/len came from a successful mmap and are unmapped only here.
        let res = unsafe { libc::munmap(self.ptr.as_ptr() as *mut libc::c_void, self.len) };
        if res == -1 {
            log::warn!(
                "Failed to unmap memory section: {}",
                io::Error::last_os_error()
            );
        } else {
            log::debug!("unmapped shared segment ({} bytes)", self.len);
        }
    }
}

fn c_name(name: &str) -> Result<CString> {
    CString::new(format!("/{}", name))
        .map_err(|_| MatrixError::memory(format!("Invalid shared memory name '{}'", name)))
}

fn shm_open(name: &CString, flags: libc::c_int, mode: u32) -> io::Result<OwnedFd> {
    // Safety: name is a valid NUL-terminated string.
    let fd = unsafe { libc::shm_open(name.as_ptr(), flags, mode as libc::mode_t) };
    if fd == -1 {
        Err(io::Error::last_os_error())
    } else {
        // Safety: fd was just opened and is owned by nobody else.
        Ok(unsafe { OwnedFd::from_raw_fd(fd) })
    }
}

/// Remove the segment registered under `name`.
///
/// Existing mappings stay valid; the name becomes free for reuse.
pub fn unlink(name: &str) -> Result<()> {
    let c = c_name(name)?;
    // Safety: c is a valid NUL-terminated string.
    if unsafe { libc::shm_unlink(c.as_ptr()) } == -1 {
        return Err(MatrixError::os(
            format_args!("Unable to unlink shared memory segment {}", name),
            io::Error::last_os_error(),
        ));
    }
    log::debug!("unlinked shared segment {}", name);
    Ok(())
}

/// A segment this process created. Unlinked from the system on drop.
pub struct SharedCreator {
    mapping: Mapping,
    name: String,
}

impl SharedCreator {
    /// Create a segment of `size` bytes named after `base_name`.
    ///
    /// The first candidate is [`shared_name`] with no counter. While the name is
    /// taken (`EEXIST`) a new one with an increasing hex counter is tried, up to
    /// `config.max_name_retries` attempts in total.
    pub fn create(base_name: &str, size: usize, config: &MatrixConfig) -> Result<Self> {
        if size == 0 {
            return Err(MatrixError::memory("Cannot make empty matrix shared"));
        }

        let flags = libc::O_CREAT | libc::O_RDWR | libc::O_EXCL;
        let mut counter = 0;

        let (name, fd) = loop {
            let name = shared_name(config.name_prefix, base_name, counter);
            let c = c_name(&name)?;

            match shm_open(&c, flags, config.shared_mode) {
                Ok(fd) => break (name, fd),
                Err(e)
                    if e.raw_os_error() == Some(libc::EEXIST)
                        && counter + 1 < config.max_name_retries =>
                {
                    log::warn!("shared name {} already exists, choosing another", name);
                    counter += 1;
                }
                Err(e) => {
                    return Err(MatrixError::os(
                        format_args!("Unable to open shared memory descriptor, filename:{}", name),
                        e,
                    ))
                }
            }
        };

        // Safety: fd is open for writing.
        if unsafe { libc::ftruncate(fd.as_raw_fd(), size as libc::off_t) } == -1 {
            let err = io::Error::last_os_error();
            let _ = unlink(&name);
            return Err(MatrixError::os(
                format_args!("Unable to extend shared memory section, filename:{}", name),
                err,
            ));
        }

        let mapping = match Mapping::new(&fd, size) {
            Ok(mapping) => mapping,
            Err(e) => {
                let _ = unlink(&name);
                return Err(MatrixError::os("Unable to mmap shared memory", e));
            }
        };

        log::debug!("created shared segment {} ({} bytes)", name, size);
        Ok(Self { mapping, name })
    }

    /// The resolved system-wide name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Mapped size in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.mapping.len
    }

    /// True if the mapping holds no bytes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.mapping.len == 0
    }

    /// The mapped bytes.
    ///
    /// Other processes attached to the segment may write concurrently; callers
    /// coordinate access themselves.
    #[inline]
    pub fn bytes(&self) -> &[u8] {
        self.mapping.bytes()
    }

    /// The mapped bytes, writable.
    #[inline]
    pub fn bytes_mut(&mut self) -> &mut [u8] {
        self.mapping.bytes_mut()
    }
}

impl Drop for SharedCreator {
    fn drop(&mut self) {
        if let Err(e) = unlink(&self.name) {
            log::warn!("{}", e);
        }
    }
}

/// A segment created elsewhere and mapped here. Only unmapped on drop.
pub struct SharedAttached {
    mapping: Mapping,
    name: String,
}

impl SharedAttached {
    /// Map the existing segment `name`, which must hold at least `size` bytes.
    pub fn attach(name: &str, size: usize) -> Result<Self> {
        if size == 0 {
            return Err(MatrixError::memory("Cannot attach empty shared segment"));
        }

        let c = c_name(name)?;
        let fd = shm_open(&c, libc::O_RDWR, 0).map_err(|e| {
            MatrixError::os(
                format_args!("Unable to open shared memory descriptor, filename:{}", name),
                e,
            )
        })?;

        // Safety: stat is plain data and fully written by a successful fstat.
        let mut stat: libc::stat = unsafe { core::mem::zeroed() };
        if unsafe { libc::fstat(fd.as_raw_fd(), &mut stat) } == -1 {
            return Err(MatrixError::os(
                format_args!("Unable to stat shared memory segment {}", name),
                io::Error::last_os_error(),
            ));
        }
        if (stat.st_size as usize) < size {
            return Err(MatrixError::memory(format!(
                "Shared memory segment {} holds {} bytes, {} requested",
                name, stat.st_size, size
            )));
        }

        let mapping =
            Mapping::new(&fd, size).map_err(|e| MatrixError::os("Unable to mmap shared memory", e))?;

        log::debug!("attached shared segment {} ({} bytes)", name, size);
        Ok(Self {
            mapping,
            name: name.to_owned(),
        })
    }

    /// The system-wide name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Mapped size in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.mapping.len
    }

    /// True if the mapping holds no bytes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.mapping.len == 0
    }

    /// The mapped bytes.
    #[inline]
    pub fn bytes(&self) -> &[u8] {
        self.mapping.bytes()
    }

    /// The mapped bytes, writable.
    #[inline]
    pub fn bytes_mut(&mut self) -> &mut [u8] {
        self.mapping.bytes_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_attach_share_bytes() {
        let config = MatrixConfig::default();
        let mut creator = SharedCreator::create("segment_test_share", 64, &config).unwrap();
        assert_eq!(creator.len(), 64);
        assert!(creator.bytes().iter().all(|&b| b == 0));

        creator.bytes_mut()[3] = 42;

        let attached = SharedAttached::attach(creator.name(), 64).unwrap();
        assert_eq!(attached.bytes()[3], 42);
        assert_eq!(attached.name(), creator.name());
    }

    #[test]
    fn test_name_collision_picks_new_name() {
        let config = MatrixConfig::default();
        let a = SharedCreator::create("segment_test_collide", 8, &config).unwrap();
        let b = SharedCreator::create("segment_test_collide", 8, &config).unwrap();
        assert_ne!(a.name(), b.name());
        assert!(b.name().ends_with("_1_segment_test_collide"));
    }

    #[test]
    fn test_retry_cap_exhausted() {
        let config = MatrixConfig::default().with_max_name_retries(1);
        let _a = SharedCreator::create("segment_test_cap", 8, &config).unwrap();
        let err = SharedCreator::create("segment_test_cap", 8, &config).err().unwrap();
        assert!(matches!(err, MatrixError::Memory { source: Some(_), .. }));
    }

    #[test]
    fn test_creator_drop_unlinks() {
        let config = MatrixConfig::default();
        let creator = SharedCreator::create("segment_test_unlink", 16, &config).unwrap();
        let name = creator.name().to_owned();
        drop(creator);

        assert!(SharedAttached::attach(&name, 16).is_err());
    }

    #[test]
    fn test_attached_drop_keeps_segment() {
        let config = MatrixConfig::default();
        let creator = SharedCreator::create("segment_test_keep", 16, &config).unwrap();
        drop(SharedAttached::attach(creator.name(), 16).unwrap());

        assert!(SharedAttached::attach(creator.name(), 16).is_ok());
    }

    #[test]
    fn test_attach_too_large_fails() {
        let config = MatrixConfig::default();
        let creator = SharedCreator::create("segment_test_small", 16, &config).unwrap();
        assert!(SharedAttached::attach(creator.name(), 4096).is_err());
        assert!(SharedAttached::attach("__viz__no_such_segment", 16).is_err());
    }

    #[test]
    fn test_zero_size_rejected() {
        let err = SharedCreator::create("segment_test_zero", 0, &MatrixConfig::default());
        assert_eq!(
            err.err().unwrap().to_string(),
            "Cannot make empty matrix shared"
        );
    }
}
