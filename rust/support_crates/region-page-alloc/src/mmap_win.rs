//! Page reservation on Windows through `VirtualAlloc`.

use std::ptr::NonNull;
use std::sync::OnceLock;

use windows_sys::Win32::{
    Foundation::{CloseHandle, ERROR_SUCCESS, GetLastError, HANDLE, LUID},
    Security::{
        AdjustTokenPrivileges, LUID_AND_ATTRIBUTES, LookupPrivilegeValueW, SE_LOCK_MEMORY_NAME,
        SE_PRIVILEGE_ENABLED, TOKEN_ADJUST_PRIVILEGES, TOKEN_PRIVILEGES, TOKEN_QUERY,
    },
    System::{
        Memory::{
            GetLargePageMinimum, MEM_COMMIT, MEM_LARGE_PAGES, MEM_RELEASE, MEM_RESERVE,
            PAGE_READWRITE, VirtualAlloc, VirtualFree,
        },
        SystemInformation::{GetSystemInfo, SYSTEM_INFO},
        Threading::{GetCurrentProcess, OpenProcessToken},
    },
};

/// Committed `VirtualAlloc` pages are zero-filled by the OS.
pub const ZERO_FILLED: bool = true;

fn last_error() -> std::io::Error {
    std::io::Error::from_raw_os_error(unsafe { GetLastError() } as i32)
}

/// Reserves and commits `capacity` bytes of read/write memory.
///
/// With `large` set the pages are requested with `MEM_LARGE_PAGES`, which
/// requires the "Lock pages in memory" right (see [`enable_large_pages`]).
///
/// # Errors
///
/// Returns the OS error reported by `VirtualAlloc`.
pub fn map(capacity: usize, large: bool) -> std::io::Result<NonNull<u8>> {
    let mut flags = MEM_COMMIT | MEM_RESERVE;
    if large {
        flags |= MEM_LARGE_PAGES;
    }
    let ptr = unsafe { VirtualAlloc(std::ptr::null_mut(), capacity, flags, PAGE_READWRITE) };
    NonNull::new(ptr as *mut u8).ok_or_else(last_error)
}

/// Releases memory obtained from [`map`].
///
/// # Safety
///
/// `ptr` must be the pointer returned by [`map`], not yet released, with no
/// references into it outliving this call.
pub unsafe fn unmap(ptr: NonNull<u8>, _capacity: usize, _large: bool) -> std::io::Result<()> {
    let result = unsafe { VirtualFree(ptr.as_ptr() as _, 0, MEM_RELEASE) };
    if result == 0 {
        return Err(last_error());
    }
    Ok(())
}

/// Enables `SeLockMemoryPrivilege` for the current process. The privilege
/// persists for the lifetime of the process.
pub fn enable_large_pages() -> std::io::Result<()> {
    unsafe {
        let mut token: HANDLE = std::ptr::null_mut();
        if OpenProcessToken(
            GetCurrentProcess(),
            TOKEN_ADJUST_PRIVILEGES | TOKEN_QUERY,
            &mut token,
        ) == 0
        {
            return Err(last_error());
        }

        let mut luid = LUID {
            LowPart: 0,
            HighPart: 0,
        };
        if LookupPrivilegeValueW(std::ptr::null(), SE_LOCK_MEMORY_NAME, &mut luid) == 0 {
            let err = last_error();
            CloseHandle(token);
            return Err(err);
        }

        let privileges = TOKEN_PRIVILEGES {
            PrivilegeCount: 1,
            Privileges: [LUID_AND_ATTRIBUTES {
                Luid: luid,
                Attributes: SE_PRIVILEGE_ENABLED,
            }],
        };
        let adjusted = AdjustTokenPrivileges(
            token,
            0,
            &privileges,
            0,
            std::ptr::null_mut(),
            std::ptr::null_mut(),
        );
        // AdjustTokenPrivileges reports partial success through GetLastError.
        let status = GetLastError();
        CloseHandle(token);

        if adjusted == 0 || status != ERROR_SUCCESS {
            return Err(std::io::Error::from_raw_os_error(status as i32));
        }
        Ok(())
    }
}

/// Page size from `GetSystemInfo`, cached after the first call.
pub fn page_size() -> usize {
    static SIZE: OnceLock<usize> = OnceLock::new();
    *SIZE.get_or_init(|| unsafe {
        let mut info: SYSTEM_INFO = std::mem::zeroed();
        GetSystemInfo(&mut info);
        info.dwPageSize as usize
    })
}

/// Minimum large page size from `GetLargePageMinimum`; 2 MiB if unsupported.
pub fn large_page_size() -> usize {
    static SIZE: OnceLock<usize> = OnceLock::new();
    *SIZE.get_or_init(|| match unsafe { GetLargePageMinimum() } {
        0 => 2 * 1024 * 1024,
        size => size,
    })
}
