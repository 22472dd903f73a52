//! The owning arena: one OS reservation, bump-allocated until dropped.

use region_common::{Result, error::Error};
use region_page_alloc::{OsPageReserver, PageBlock, PageReserver};

use crate::{config::ArenaConfig, cursor::BumpCursor, region::private::{Internal, RawRegion}, Region};

/// Outcome of the reservation an [`Arena`] was created from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArenaState {
    /// The backing block was reserved. The capacity may still be zero if a
    /// zero-byte arena was requested.
    Ready,
    /// The OS refused the reservation. The arena is inert: its capacity is
    /// zero and every allocation fails.
    ReservationFailed(std::io::ErrorKind),
}

/// A fixed-capacity region arena backed by a single page reservation.
///
/// The arena owns its [`PageBlock`]; the pages are released when the arena is
/// dropped. All allocation goes through the [`Region`] trait and only touches
/// in-memory bookkeeping, never the OS.
pub struct Arena {
    block: Option<PageBlock>,
    cursor: BumpCursor,
    state: ArenaState,
}

impl Arena {
    /// Creates an arena of `size` bytes backed by regular OS pages.
    ///
    /// If the reservation fails the failure is logged and an inert,
    /// zero-capacity arena is returned; check [`Arena::is_reserved`] or
    /// [`Arena::state`] to detect this. Use [`Arena::try_new`] to receive the
    /// OS error instead.
    pub fn new(size: u32) -> Arena {
        Self::with_reserver(size, &OsPageReserver::regular())
    }

    /// Like [`Arena::new`], with the pages obtained from `reserver`.
    pub fn with_reserver<R>(size: u32, reserver: &R) -> Arena
    where
        R: PageReserver + ?Sized,
    {
        match reserver.reserve(size) {
            Ok(block) => Self::from_block(block),
            Err(e) => {
                log::warn!("arena reservation of {size} bytes failed: {e}");
                Self::inert(e.kind())
            }
        }
    }

    /// Creates an arena of `size` bytes, returning the reservation error on
    /// failure.
    pub fn try_new(size: u32) -> Result<Arena> {
        Self::try_with_reserver(size, &OsPageReserver::regular())
    }

    pub fn try_with_reserver<R>(size: u32, reserver: &R) -> Result<Arena>
    where
        R: PageReserver + ?Sized,
    {
        let block = reserver
            .reserve(size)
            .map_err(|e| Error::reservation(size as u64, e))?;
        Ok(Self::from_block(block))
    }

    /// Validates `config` and reserves an arena as described by it.
    pub fn from_config(config: &ArenaConfig) -> Result<Arena> {
        config.validate()?;
        Self::try_with_reserver(config.capacity, &config.reserver())
    }

    /// Wraps an already reserved block. The capacity is the block's length.
    pub fn from_block(block: PageBlock) -> Arena {
        log::debug!(
            "arena reserved: {} bytes ({} mapped, large pages: {})",
            block.len(),
            block.capacity(),
            block.uses_large_pages()
        );
        Arena {
            cursor: BumpCursor::new(block.len() as u64),
            block: Some(block),
            state: ArenaState::Ready,
        }
    }

    fn inert(kind: std::io::ErrorKind) -> Arena {
        Arena {
            block: None,
            cursor: BumpCursor::new(0),
            state: ArenaState::ReservationFailed(kind),
        }
    }

    pub fn state(&self) -> ArenaState {
        self.state
    }

    /// Returns `true` if the backing reservation succeeded.
    pub fn is_reserved(&self) -> bool {
        self.state == ArenaState::Ready
    }

    /// Kind of the OS error that left this arena inert, if any.
    pub fn reservation_error(&self) -> Option<std::io::ErrorKind> {
        match self.state {
            ArenaState::Ready => None,
            ArenaState::ReservationFailed(kind) => Some(kind),
        }
    }

    /// Whether the backing block ended up on large pages.
    pub fn uses_large_pages(&self) -> bool {
        self.block.as_ref().is_some_and(PageBlock::uses_large_pages)
    }
}

impl RawRegion for Arena {
    fn raw(&self, _: Internal) -> (&BumpCursor, &[u8]) {
        let memory = self.block.as_deref().unwrap_or(&[]);
        (&self.cursor, memory)
    }

    fn raw_mut(&mut self, _: Internal) -> (&mut BumpCursor, &mut [u8]) {
        let memory = self.block.as_deref_mut().unwrap_or(&mut []);
        (&mut self.cursor, memory)
    }

    fn is_usable(&self, _: Internal) -> bool {
        self.block.is_some()
    }
}

impl Region for Arena {}

impl std::fmt::Debug for Arena {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Arena")
            .field("capacity", &self.cursor.capacity())
            .field("used", &self.cursor.used())
            .field("epoch", &self.cursor.epoch())
            .field("state", &self.state)
            .finish()
    }
}
