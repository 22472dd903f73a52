//! Arena construction settings.

use region_common::{Result, verify_arg};
use region_page_alloc::OsPageReserver;
use serde::{Deserialize, Serialize};

/// Default arena capacity: 1 MiB.
pub const DEFAULT_CAPACITY: u32 = 1024 * 1024;

/// Configuration for [`Arena::from_config`](crate::Arena::from_config).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// Size of the backing reservation in bytes.
    pub capacity: u32,
    /// Prefer large (huge) pages, falling back to regular pages when the
    /// system refuses them.
    pub large_pages: bool,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            large_pages: false,
        }
    }
}

impl ArenaConfig {
    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_large_pages(mut self, large_pages: bool) -> Self {
        self.large_pages = large_pages;
        self
    }

    pub fn validate(&self) -> Result<()> {
        verify_arg!(capacity, self.capacity != 0);
        Ok(())
    }

    pub(crate) fn reserver(&self) -> OsPageReserver {
        if self.large_pages {
            OsPageReserver::large_pages()
        } else {
            OsPageReserver::regular()
        }
    }
}
