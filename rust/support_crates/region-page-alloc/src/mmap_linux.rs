//! Page reservation on Linux through anonymous private `mmap`.

use std::ptr::NonNull;
use std::sync::OnceLock;

/// Anonymous mappings are zero-filled by the kernel.
pub const ZERO_FILLED: bool = true;

/// Maps `capacity` bytes of private, anonymous, read/write memory.
///
/// `capacity` must already be a multiple of the page size that matches `large`
/// (see [`page_size`] and [`large_page_size`]). When `large` is set the mapping
/// is requested with `MAP_HUGETLB`, which only succeeds if huge pages are
/// configured on the host, e.g. through `/proc/sys/vm/nr_hugepages` or
/// `/proc/sys/vm/nr_overcommit_hugepages`.
///
/// # Errors
///
/// Returns the OS error reported by `mmap`.
pub fn map(capacity: usize, large: bool) -> std::io::Result<NonNull<u8>> {
    let mut flags = libc::MAP_PRIVATE | libc::MAP_ANONYMOUS;
    if large {
        flags |= libc::MAP_HUGETLB;
    }
    let ptr = unsafe {
        libc::mmap(
            std::ptr::null_mut(),
            capacity,
            libc::PROT_READ | libc::PROT_WRITE,
            flags,
            -1,
            0,
        )
    };
    if ptr == libc::MAP_FAILED {
        return Err(std::io::Error::last_os_error());
    }
    NonNull::new(ptr as *mut u8).ok_or_else(|| std::io::Error::other("mmap returned null"))
}

/// Unmaps memory obtained from [`map`].
///
/// # Safety
///
/// `ptr` and `capacity` must be exactly the pointer returned by [`map`] and the
/// capacity passed to it, the mapping must not have been released yet, and no
/// references into it may outlive this call.
pub unsafe fn unmap(ptr: NonNull<u8>, capacity: usize, _large: bool) -> std::io::Result<()> {
    let res = unsafe { libc::munmap(ptr.as_ptr() as *mut libc::c_void, capacity) };
    if res < 0 {
        return Err(std::io::Error::last_os_error());
    }
    Ok(())
}

/// Huge pages need no per-process switch on Linux; availability is decided by
/// the system configuration.
pub fn enable_large_pages() -> std::io::Result<()> {
    Ok(())
}

/// Standard page size from `sysconf(_SC_PAGESIZE)`, cached after the first
/// call. Falls back to 4 KiB if the query fails.
pub fn page_size() -> usize {
    static SIZE: OnceLock<usize> = OnceLock::new();
    *SIZE.get_or_init(|| read_page_size().unwrap_or(4 * 1024))
}

/// Huge page size parsed from `/proc/meminfo`, cached after the first
/// successful read. Falls back to 2 MiB.
pub fn large_page_size() -> usize {
    static SIZE: OnceLock<usize> = OnceLock::new();
    if let Some(&size) = SIZE.get() {
        return size;
    }
    match read_large_page_size() {
        Ok(size) => *SIZE.get_or_init(|| size),
        Err(_) => 2 * 1024 * 1024,
    }
}

/// Parses the `Hugepagesize:    2048 kB` line of `/proc/meminfo`.
fn read_large_page_size() -> std::io::Result<usize> {
    let meminfo = std::fs::read_to_string("/proc/meminfo")?;
    meminfo
        .lines()
        .find_map(|line| line.strip_prefix("Hugepagesize:"))
        .and_then(|rest| rest.split_whitespace().next())
        .and_then(|kb| kb.parse::<usize>().ok())
        .map(|kb| kb * 1024)
        .ok_or_else(|| std::io::Error::other("Failed to read Hugepagesize"))
}

fn read_page_size() -> std::io::Result<usize> {
    let res = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
    if res <= 0 {
        return Err(std::io::Error::last_os_error());
    }
    Ok(res as usize)
}
