//! Read-only views over named file mappings.

use crate::session::{MappedRegion, MemoryBackend};
use crate::{PitboxError, Result};
use std::ptr::NonNull;
use tracing::{debug, trace};
use windows::Win32::Foundation::{CloseHandle, HANDLE};
use windows::Win32::System::Memory::{
    FILE_MAP_READ, MEMORY_MAPPED_VIEW_ADDRESS, MapViewOfFile, OpenFileMappingW, UnmapViewOfFile,
};
use windows::core::PCWSTR;

/// Opens the simulator's pages through `OpenFileMappingW`.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileMappingBackend;

impl MemoryBackend for FileMappingBackend {
    fn open(&self, name: &str, size: usize) -> Result<Box<dyn MappedRegion>> {
        Ok(Box::new(FileMapping::open(name, size)?))
    }
}

/// One mapped page. Unmapped and closed on drop.
pub struct FileMapping {
    mapping: HANDLE,
    base: NonNull<u8>,
    len: usize,
}

impl FileMapping {
    /// Map the first `len` bytes of an existing named mapping.
    ///
    /// Fails when the simulator has not created the mapping.
    pub fn open(name: &str, len: usize) -> Result<Self> {
        trace!(name, len, "Opening file mapping");

        let mapping = unsafe {
            let wide_name = wide_string(name);
            OpenFileMappingW(FILE_MAP_READ.0, false, PCWSTR::from_raw(wide_name.as_ptr()))
                .map_err(|e| PitboxError::windows_api_error("OpenFileMappingW", e))?
        };

        let view = unsafe { MapViewOfFile(mapping, FILE_MAP_READ, 0, 0, len) };
        let Some(base) = NonNull::new(view.Value as *mut u8) else {
            let win_err = windows::core::Error::from_thread();
            unsafe {
                let _ = CloseHandle(mapping);
            }
            return Err(PitboxError::windows_api_error("MapViewOfFile", win_err));
        };

        debug!(name, len, "Mapped shared memory page");
        Ok(Self { mapping, base, len })
    }

    /// Copy the first `dst.len()` bytes of the view.
    pub fn read_into(&self, dst: &mut [u8]) -> Result<()> {
        if dst.len() > self.len {
            return Err(PitboxError::short_buffer("mapping", dst.len(), self.len));
        }
        // SAFETY: the view is at least `self.len` bytes and stays mapped for
        // the lifetime of `self`; `dst` is a distinct local buffer.
        unsafe {
            std::ptr::copy_nonoverlapping(self.base.as_ptr(), dst.as_mut_ptr(), dst.len());
        }
        Ok(())
    }
}

impl MappedRegion for FileMapping {
    fn len(&self) -> usize {
        self.len
    }

    fn copy_to(&self, dst: &mut [u8]) -> Result<()> {
        self.read_into(dst)
    }
}

impl Drop for FileMapping {
    fn drop(&mut self) {
        unsafe {
            let addr = MEMORY_MAPPED_VIEW_ADDRESS { Value: self.base.as_ptr() as *mut _ };
            let _ = UnmapViewOfFile(addr);
            let _ = CloseHandle(self.mapping);
        }
    }
}

// SAFETY: the struct only holds a kernel handle and a pointer into a read-only
// view, both usable from any thread.
unsafe impl Send for FileMapping {}
unsafe impl Sync for FileMapping {}

/// Convert string to null-terminated wide string for Windows APIs
fn wide_string(s: &str) -> Vec<u16> {
    use std::ffi::OsStr;
    use std::os::windows::ffi::OsStrExt;
    OsStr::new(s).encode_wide().chain(std::iter::once(0)).collect()
}
