//! Emulated page reservation for platforms without a dedicated backend.
//!
//! Pages come from the global allocator with page alignment. `alloc_zeroed`
//! is used, so the zero-fill guarantee holds here as well.

use std::alloc::{Layout, alloc_zeroed, dealloc};
use std::ptr::NonNull;

pub const ZERO_FILLED: bool = true;

fn layout(capacity: usize, large: bool) -> std::io::Result<Layout> {
    let align = if large { large_page_size() } else { page_size() };
    Layout::from_size_align(capacity, align)
        .map_err(|_| std::io::Error::new(std::io::ErrorKind::InvalidInput, "Invalid layout"))
}

pub fn map(capacity: usize, large: bool) -> std::io::Result<NonNull<u8>> {
    let layout = layout(capacity, large)?;
    let ptr = unsafe { alloc_zeroed(layout) };
    NonNull::new(ptr).ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::OutOfMemory, "Failed to allocate memory")
    })
}

/// # Safety
///
/// `ptr`, `capacity` and `large` must match a previous successful [`map`] call.
pub unsafe fn unmap(ptr: NonNull<u8>, capacity: usize, large: bool) -> std::io::Result<()> {
    let layout = layout(capacity, large)?;
    unsafe { dealloc(ptr.as_ptr(), layout) };
    Ok(())
}

pub fn enable_large_pages() -> std::io::Result<()> {
    Ok(())
}

pub fn page_size() -> usize {
    4 * 1024
}

pub fn large_page_size() -> usize {
    2 * 1024 * 1024
}
