use crate::{cursor::BumpCursor, region::private::{Internal, RawRegion}, Region};

/// A region carved out of a parent by [`Region::carve_region`].
///
/// The sub-arena is a view: it does not own memory and never releases it. It
/// mutably borrows the parent for `'a`, so the parent can be neither reset nor
/// dropped while the sub-arena is in use. Within its range it behaves like a
/// full arena with its own used offset and epoch, and nothing written through
/// it can reach bytes outside that range.
pub struct SubArena<'a> {
    memory: &'a mut [u8],
    cursor: BumpCursor,
}

impl<'a> SubArena<'a> {
    pub(crate) fn new(memory: &'a mut [u8]) -> SubArena<'a> {
        let cursor = BumpCursor::new(memory.len() as u64);
        SubArena { memory, cursor }
    }
}

impl RawRegion for SubArena<'_> {
    fn raw(&self, _: Internal) -> (&BumpCursor, &[u8]) {
        (&self.cursor, &*self.memory)
    }

    fn raw_mut(&mut self, _: Internal) -> (&mut BumpCursor, &mut [u8]) {
        (&mut self.cursor, &mut *self.memory)
    }
}

impl Region for SubArena<'_> {}

impl std::fmt::Debug for SubArena<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubArena")
            .field("base", &self.memory.as_ptr())
            .field("capacity", &self.cursor.capacity())
            .field("used", &self.cursor.used())
            .finish()
    }
}
