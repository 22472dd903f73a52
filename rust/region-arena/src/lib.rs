//! Linear region arenas over a single OS page reservation.
//!
//! An [`Arena`] reserves one zero-filled block of pages when it is created and
//! then serves allocations by advancing an offset: no per-allocation free, no
//! growth, and no further OS calls until the arena is dropped. Allocations are
//! returned as [`Span`]s, offsets that resolve to bytes through bounds-checked
//! indexing. A [`SubArena`] carved from a parent borrows a fixed slice of the
//! parent's space and allocates from it independently.
//!
//! ```
//! use region_arena::{Arena, Region};
//!
//! let mut arena = Arena::new(1024);
//! let span = arena.emplace(&[1, 2, 3, 4]).unwrap();
//! assert_eq!(arena.bytes(span), Some(&[1u8, 2, 3, 4][..]));
//! assert_eq!(arena.used(), 4);
//!
//! let mut scratch = arena.carve_region(512);
//! assert!(scratch.allocate(600).is_none());
//! ```

pub mod arena;
pub mod command;
pub mod config;
mod cursor;
pub mod region;
pub mod span;
pub mod sub_arena;

pub use arena::{Arena, ArenaState};
pub use command::{Command, CommandPayload};
pub use config::ArenaConfig;
pub use region::Region;
pub use span::Span;
pub use sub_arena::SubArena;
