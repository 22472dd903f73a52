//! Command records whose payload bytes live in a region.
//!
//! Only the data shape is defined here. What a command `kind` means is up to
//! the code producing and consuming the commands.

use crate::{Region, span::Span};

/// Payload bytes stored in a region, addressed by span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandPayload {
    pub size: u32,
    pub span: Span,
}

impl CommandPayload {
    /// Copies `bytes` into `region` and describes where they landed.
    ///
    /// Returns `None` if the region is exhausted or the payload is longer than
    /// `u32::MAX` bytes. Nothing is allocated in either case.
    pub fn emplace<R: Region>(region: &mut R, bytes: &[u8]) -> Option<CommandPayload> {
        let size = u32::try_from(bytes.len()).ok()?;
        let span = region.emplace(bytes)?;
        Some(CommandPayload { size, span })
    }

    /// Resolves the payload against the region it was emplaced into.
    pub fn bytes<'r, R: Region>(&self, region: &'r R) -> Option<&'r [u8]> {
        region.bytes(self.span)
    }
}

/// A payload tagged with its command type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command {
    pub payload: CommandPayload,
    pub kind: u32,
}

impl Command {
    pub fn new(kind: u32, payload: CommandPayload) -> Command {
        Command { payload, kind }
    }
}
