//! Bump-offset bookkeeping shared by arenas and sub-arenas.

use std::ops::Range;

use crate::span::Span;

/// Capacity, used offset and reset epoch of a region.
///
/// Invariant: `used <= capacity`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BumpCursor {
    capacity: u64,
    used: u64,
    epoch: u64,
}

impl BumpCursor {
    pub fn new(capacity: u64) -> BumpCursor {
        BumpCursor {
            capacity,
            used: 0,
            epoch: 0,
        }
    }

    #[inline]
    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    #[inline]
    pub fn used(&self) -> u64 {
        self.used
    }

    #[inline]
    pub fn remaining(&self) -> u64 {
        self.capacity - self.used
    }

    #[inline]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Advances the offset by `size` bytes, returning the span that was
    /// skipped over. Leaves the cursor untouched if the request does not fit,
    /// including when `used + size` would overflow.
    #[inline]
    pub fn bump(&mut self, size: u64) -> Option<Span> {
        let end = self.used.checked_add(size)?;
        if end > self.capacity {
            return None;
        }
        let span = Span::new(self.used, size, self.epoch);
        self.used = end;
        Some(span)
    }

    /// Like [`bump`](Self::bump), but first pads the offset so that
    /// `base_addr + offset` is a multiple of `align`.
    ///
    /// `align` must be a non-zero power of two.
    pub fn bump_aligned(&mut self, size: u64, align: u64, base_addr: usize) -> Option<Span> {
        debug_assert!(align.is_power_of_two());
        let addr = (base_addr as u64).checked_add(self.used)?;
        let padding = addr.checked_next_multiple_of(align)? - addr;
        let start = self.used.checked_add(padding)?;
        let end = start.checked_add(size)?;
        if end > self.capacity {
            return None;
        }
        self.used = end;
        Some(Span::new(start, size, self.epoch))
    }

    /// Cedes the next `size` bytes permanently and returns their byte range.
    ///
    /// # Panics
    ///
    /// Panics if fewer than `size` bytes remain.
    pub fn carve(&mut self, size: u64) -> Range<usize> {
        let remaining = self.remaining();
        let Some(span) = self.bump(size) else {
            panic!("cannot carve a region of {size} bytes: only {remaining} bytes remain");
        };
        span.start()..span.end()
    }

    /// Rewinds the offset to zero and starts a new epoch.
    #[inline]
    pub fn reset(&mut self) {
        self.used = 0;
        self.epoch += 1;
    }
}
