//! The allocation surface shared by [`Arena`](crate::Arena) and [`SubArena`].

use region_common::{Result, error::Error};

use crate::{span::Span, sub_arena::SubArena};

pub(crate) mod private {
    use crate::cursor::BumpCursor;

    /// Access token for [`RawRegion`]. Only this crate can construct one, so
    /// the raw accessors cannot be called from outside even though they are
    /// reachable through a `Region` bound.
    pub struct Internal(pub(crate) ());

    /// Access to a region's bookkeeping and backing bytes.
    ///
    /// The byte slice is always exactly as long as the cursor's capacity.
    pub trait RawRegion {
        fn raw(&self, _: Internal) -> (&BumpCursor, &[u8]);

        fn raw_mut(&mut self, _: Internal) -> (&mut BumpCursor, &mut [u8]);

        /// `false` if the region has no backing memory at all, in which case
        /// every allocation fails, including zero-sized ones.
        fn is_usable(&self, _: Internal) -> bool {
            true
        }
    }

    #[inline]
    pub(crate) fn raw<R: RawRegion + ?Sized>(region: &R) -> (&BumpCursor, &[u8]) {
        region.raw(Internal(()))
    }

    #[inline]
    pub(crate) fn raw_mut<R: RawRegion + ?Sized>(region: &mut R) -> (&mut BumpCursor, &mut [u8]) {
        region.raw_mut(Internal(()))
    }

    #[inline]
    pub(crate) fn is_usable<R: RawRegion + ?Sized>(region: &R) -> bool {
        region.is_usable(Internal(()))
    }
}

use private::{is_usable, raw, raw_mut};

/// A fixed-capacity bump allocator over a contiguous byte range.
///
/// Allocations advance a single offset and are never freed individually;
/// [`reset`](Region::reset) rewinds the whole region at once. Failures are
/// reported as `None` and never change the used offset. No alignment is
/// applied unless requested through [`allocate_aligned`](Region::allocate_aligned).
///
/// The trait is sealed. Its bookkeeping is only reachable from this crate:
///
/// ```compile_fail
/// use region_arena::{Arena, Region};
///
/// fn rewind<R: Region>(region: &mut R) {
///     region.raw_mut(region_arena::region::private::Internal(())).0.reset();
/// }
///
/// rewind(&mut Arena::new(64));
/// ```
pub trait Region: private::RawRegion {
    /// Total size of the region in bytes.
    fn capacity(&self) -> u64 {
        raw(self).0.capacity()
    }

    /// Offset of the next free byte.
    fn used(&self) -> u64 {
        raw(self).0.used()
    }

    fn remaining(&self) -> u64 {
        raw(self).0.remaining()
    }

    /// Number of resets this region has gone through.
    fn epoch(&self) -> u64 {
        raw(self).0.epoch()
    }

    /// Reserves `size` bytes at the current offset.
    ///
    /// Returns `None` without side effects when `used + size` exceeds the
    /// capacity (or overflows), and always on an arena whose reservation
    /// failed.
    fn allocate(&mut self, size: u64) -> Option<Span> {
        if !is_usable(self) {
            return None;
        }
        raw_mut(self).0.bump(size)
    }

    /// Reserves `size` bytes whose first byte lies on an `align` boundary in
    /// memory. Skipped padding bytes are consumed.
    ///
    /// `align` must be a non-zero power of two.
    fn allocate_aligned(&mut self, size: u64, align: u64) -> Option<Span> {
        if !is_usable(self) {
            return None;
        }
        let (cursor, memory) = raw_mut(self);
        let base_addr = memory.as_ptr() as usize;
        cursor.bump_aligned(size, align, base_addr)
    }

    /// Like [`allocate`](Region::allocate), but reports exhaustion as an error.
    fn allocate_checked(&mut self, size: u64) -> Result<Span> {
        let remaining = self.remaining();
        self.allocate(size).ok_or_else(|| Error::exhausted(size, remaining))
    }

    /// Allocates `size` bytes and returns them as a mutable slice.
    ///
    /// The bytes are not cleared: after a [`reset`](Region::reset) they hold
    /// whatever earlier allocations wrote.
    fn alloc_bytes(&mut self, size: u64) -> Option<&mut [u8]> {
        let span = self.allocate(size)?;
        self.bytes_mut(span)
    }

    /// Allocates `source.len()` bytes and copies `source` into them.
    fn emplace(&mut self, source: &[u8]) -> Option<Span> {
        let span = self.allocate(source.len() as u64)?;
        let (_, memory) = raw_mut(self);
        memory[span.range()].copy_from_slice(source);
        Some(span)
    }

    /// Copies the bytes of a plain-data value into the region.
    fn emplace_value<T: bytemuck::NoUninit>(&mut self, value: &T) -> Option<Span> {
        self.emplace(bytemuck::bytes_of(value))
    }

    /// Reads back a value stored with [`emplace_value`](Region::emplace_value).
    ///
    /// The read is unaligned. Returns `None` if the span is out of range or its
    /// length differs from `size_of::<T>()`.
    fn read_value<T: bytemuck::AnyBitPattern>(&self, span: Span) -> Option<T> {
        let bytes = self.bytes(span)?;
        (bytes.len() == std::mem::size_of::<T>()).then(|| bytemuck::pod_read_unaligned(bytes))
    }

    /// Resolves a span to its bytes. `None` if it lies outside the region.
    fn bytes(&self, span: Span) -> Option<&[u8]> {
        raw(self).1.get(span.range())
    }

    fn bytes_mut(&mut self, span: Span) -> Option<&mut [u8]> {
        raw_mut(self).1.get_mut(span.range())
    }

    /// Returns `true` if `span` was allocated since the last reset.
    fn is_current(&self, span: Span) -> bool {
        span.epoch() == self.epoch()
    }

    /// Carves a sub-arena of exactly `size` bytes out of the remaining space.
    ///
    /// The carved range is ceded to the sub-arena permanently: the used offset
    /// advances by `size` and only a reset of this region reclaims it. The
    /// sub-arena borrows this region, so the reset cannot happen while the
    /// sub-arena is alive.
    ///
    /// # Panics
    ///
    /// Panics if fewer than `size` bytes remain, or if this is an arena whose
    /// reservation failed. Sizing a carve is the caller's job; use
    /// [`try_carve_region`](Region::try_carve_region) when the size is not
    /// known to fit.
    fn carve_region(&mut self, size: u64) -> SubArena<'_> {
        assert!(is_usable(self), "cannot carve a region out of an unreserved arena");
        let (cursor, memory) = raw_mut(self);
        let range = cursor.carve(size);
        SubArena::new(&mut memory[range])
    }

    /// Non-panicking variant of [`carve_region`](Region::carve_region).
    fn try_carve_region(&mut self, size: u64) -> Option<SubArena<'_>> {
        if !is_usable(self) || size > self.remaining() {
            return None;
        }
        Some(self.carve_region(size))
    }

    /// Rewinds the used offset to zero.
    ///
    /// Bytes are neither cleared nor released. Every span obtained before the
    /// reset becomes stale: it still resolves, but its bytes may be handed out
    /// again (see [`is_current`](Region::is_current)).
    fn reset(&mut self) {
        raw_mut(self).0.reset();
    }
}
