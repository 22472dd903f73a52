//! Owned, zero-filled block of OS pages.
//!
//! A [`PageBlock`] is the unit handed out by a [`PageReserver`](crate::PageReserver):
//! one reservation, page-aligned, released back to the OS when the block is dropped.

use std::ptr::NonNull;
use std::sync::OnceLock;

use crate::mmap;

/// An owned block of page-backed memory.
///
/// The logical length is exactly the size that was requested. The mapped
/// capacity is rounded up to whole pages and is never exposed as bytes.
pub struct PageBlock {
    ptr: NonNull<u8>,
    /// Requested size in bytes.
    len: usize,
    /// Mapped size in bytes, a multiple of `alignment`.
    capacity: usize,
    uses_large_pages: bool,
    /// Page size the block was mapped with.
    alignment: usize,
}

impl PageBlock {
    pub fn regular_page_size() -> usize {
        mmap::page_size()
    }

    pub fn large_page_size() -> usize {
        mmap::large_page_size()
    }

    /// Reserves `size` bytes backed by regular pages.
    ///
    /// A zero `size` still maps one page, yielding an empty block.
    ///
    /// # Errors
    ///
    /// Returns the OS error if the pages cannot be mapped.
    pub fn reserve_regular(size: usize) -> std::io::Result<PageBlock> {
        Self::reserve_with(size, false, mmap::page_size())
    }

    /// Reserves `size` bytes backed by large pages.
    ///
    /// # Errors
    ///
    /// Fails if large pages are not configured for this process or system, or
    /// if not enough contiguous large pages are available.
    pub fn reserve_large(size: usize) -> std::io::Result<PageBlock> {
        check_and_enable_large_page_support()?;
        Self::reserve_with(size, true, mmap::large_page_size())
    }

    /// Tries large pages first and falls back to regular pages.
    pub fn reserve_with_fallback(size: usize) -> std::io::Result<PageBlock> {
        match Self::reserve_large(size) {
            Ok(block) => Ok(block),
            Err(e) => {
                log::debug!("large page reservation of {size} bytes refused ({e}), using regular pages");
                Self::reserve_regular(size)
            }
        }
    }

    fn reserve_with(size: usize, large: bool, page_size: usize) -> std::io::Result<PageBlock> {
        assert!(page_size.is_power_of_two());
        let capacity = size
            .max(1)
            .checked_next_multiple_of(page_size)
            .ok_or_else(|| {
                std::io::Error::new(std::io::ErrorKind::OutOfMemory, "reservation size overflow")
            })?;
        let ptr = mmap::map(capacity, large)?;
        debug_assert!((ptr.as_ptr() as usize).is_multiple_of(page_size));

        let mut block = PageBlock {
            ptr,
            len: size,
            capacity,
            uses_large_pages: large,
            alignment: page_size,
        };
        block.ensure_zeroed(mmap::ZERO_FILLED);
        Ok(block)
    }

    /// Clears the block unless the backend already hands out zeroed pages.
    /// Every current backend does; a backend that recycles memory would not.
    pub(crate) fn ensure_zeroed(&mut self, zero_filled: bool) {
        if !zero_filled {
            self.as_bytes_mut().fill(0);
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Mapped size in bytes; at least `len()`, rounded up to whole pages.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn uses_large_pages(&self) -> bool {
        self.uses_large_pages
    }

    /// Alignment of the block start, which is the page size used for mapping.
    #[inline]
    pub fn alignment(&self) -> usize {
        self.alignment
    }

    /// Address of the first byte. Only meaningful for alignment arithmetic and
    /// diagnostics; all access goes through the slice accessors.
    #[inline]
    pub fn addr(&self) -> usize {
        self.ptr.as_ptr() as usize
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        // SAFETY: `ptr` maps at least `capacity >= len` readable bytes for as
        // long as `self` is alive.
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    #[inline]
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        // SAFETY: as above, and `&mut self` guarantees exclusive access.
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }
}

impl std::ops::Deref for PageBlock {
    type Target = [u8];

    #[inline]
    fn deref(&self) -> &Self::Target {
        self.as_bytes()
    }
}

impl std::ops::DerefMut for PageBlock {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.as_bytes_mut()
    }
}

impl AsRef<[u8]> for PageBlock {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl AsMut<[u8]> for PageBlock {
    #[inline]
    fn as_mut(&mut self) -> &mut [u8] {
        self.as_bytes_mut()
    }
}

impl Drop for PageBlock {
    fn drop(&mut self) {
        let res = unsafe { mmap::unmap(self.ptr, self.capacity, self.uses_large_pages) };
        if let Err(e) = res {
            log::warn!("failed to release {} reserved bytes: {e}", self.capacity);
        }
    }
}

// SAFETY: the block exclusively owns its mapping; mutation requires `&mut`.
unsafe impl Send for PageBlock {}

// SAFETY: shared access only hands out `&[u8]`.
unsafe impl Sync for PageBlock {}

impl std::fmt::Debug for PageBlock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageBlock")
            .field("ptr", &self.ptr)
            .field("len", &self.len)
            .field("capacity", &self.capacity)
            .field("uses_large_pages", &self.uses_large_pages)
            .finish()
    }
}

/// Checks once per process whether large pages can be mapped, enabling them
/// first where the platform needs a per-process switch.
///
/// # Errors
///
/// Returns the cached failure if large pages are unavailable.
pub fn check_and_enable_large_page_support() -> std::io::Result<()> {
    static RESULT: OnceLock<std::io::Result<()>> = OnceLock::new();
    match RESULT.get_or_init(enable_large_page_support) {
        Ok(()) => Ok(()),
        Err(e) => Err(std::io::Error::new(e.kind(), e.to_string())),
    }
}

fn enable_large_page_support() -> std::io::Result<()> {
    if probe_large_pages().is_ok() {
        return Ok(());
    }
    mmap::enable_large_pages()?;
    probe_large_pages()
}

fn probe_large_pages() -> std::io::Result<()> {
    let size = mmap::large_page_size();
    let ptr = mmap::map(size, true)?;
    if let Err(e) = unsafe { mmap::unmap(ptr, size, true) } {
        log::warn!("failed to release the {size} byte large page probe: {e}");
    }
    Ok(())
}
