//! Page reservation primitive.
//!
//! Obtains zero-filled, page-aligned memory blocks from the operating system
//! and releases them when the owning [`PageBlock`] is dropped.

pub mod page_block;
pub mod reserver;

#[cfg_attr(target_os = "linux", path = "mmap_linux.rs")]
#[cfg_attr(windows, path = "mmap_win.rs")]
#[cfg_attr(not(any(target_os = "linux", windows)), path = "mmap_fallback.rs")]
pub mod mmap;

pub use page_block::PageBlock;
pub use reserver::{OsPageReserver, PageReserver, reserve};

#[cfg(test)]
mod tests;
