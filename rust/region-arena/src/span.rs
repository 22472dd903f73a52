use std::ops::Range;

/// A byte range handed out by a region allocation.
///
/// A span is an offset into the region that produced it, not a pointer.
/// Resolving it through [`Region::bytes`](crate::Region::bytes) is bounds
/// checked. A span is only meaningful for the region that allocated it.
///
/// The span also records the region's reset epoch at allocation time. After the
/// region is reset the span still resolves to in-bounds memory, but those
/// bytes may since have been handed to another allocation; use
/// [`Region::is_current`](crate::Region::is_current) to tell the two apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    offset: u64,
    len: u64,
    epoch: u64,
}

impl Span {
    pub(crate) fn new(offset: u64, len: u64, epoch: u64) -> Span {
        Span { offset, len, epoch }
    }

    /// Offset of the first byte, relative to the start of the region.
    #[inline]
    pub fn offset(&self) -> u64 {
        self.offset
    }

    #[inline]
    pub fn len(&self) -> u64 {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    #[inline]
    pub(crate) fn start(&self) -> usize {
        self.offset as usize
    }

    #[inline]
    pub(crate) fn end(&self) -> usize {
        (self.offset + self.len) as usize
    }

    /// Byte range of the span within its region.
    #[inline]
    pub fn range(&self) -> Range<usize> {
        self.start()..self.end()
    }
}
