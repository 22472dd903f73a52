use crate::page_block::PageBlock;

/// Source of zero-filled, page-backed memory blocks.
///
/// Each call to [`reserve`](PageReserver::reserve) performs one reservation and
/// reports failure through the returned error instead of panicking.
pub trait PageReserver {
    /// Reserves a zero-filled block whose logical length is exactly `size` bytes.
    fn reserve(&self, size: u32) -> std::io::Result<PageBlock>;
}

/// Reserves pages directly from the operating system.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OsPageReserver {
    large_pages: bool,
}

impl OsPageReserver {
    /// Reserver backed by regular pages.
    pub fn regular() -> OsPageReserver {
        OsPageReserver { large_pages: false }
    }

    /// Reserver that prefers large pages and falls back to regular pages when
    /// the system refuses them.
    pub fn large_pages() -> OsPageReserver {
        OsPageReserver { large_pages: true }
    }

    pub fn prefers_large_pages(&self) -> bool {
        self.large_pages
    }
}

impl PageReserver for OsPageReserver {
    fn reserve(&self, size: u32) -> std::io::Result<PageBlock> {
        let size = size as usize;
        if self.large_pages {
            PageBlock::reserve_with_fallback(size)
        } else {
            PageBlock::reserve_regular(size)
        }
    }
}

impl<R: PageReserver + ?Sized> PageReserver for &R {
    fn reserve(&self, size: u32) -> std::io::Result<PageBlock> {
        (**self).reserve(size)
    }
}

/// Reserves `size` bytes of regular pages from the OS, returning `None` when
/// the reservation cannot be satisfied.
pub fn reserve(size: u32) -> Option<PageBlock> {
    OsPageReserver::regular().reserve(size).ok()
}
