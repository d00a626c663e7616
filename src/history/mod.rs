//! Heap block history
//!
//! [`HeapHistory`] consumes heap events one at a time and keeps:
//! - [`block`]: the append-only ledger of [`HeapBlock`] lifetimes
//! - a live-block index keyed by `(address, heap id)` for conflict detection
//!   and range frees
//! - [`conflict`]: the log of double allocations and unknown frees
//! - [`filter`]: address ranges restricting what gets recorded
//! - [`annotations`]: timeline events and address labels for display
//! - [`point_index`]: a lazily built index answering "which block owns
//!   address A at tick T"
//! - [`area`]: the running bounding box of everything recorded
//! - [`tags`]: the interned alloc/free tag strings
//!
//! # Time
//!
//! The engine's clock is a [`Tick`] counter advanced by exactly one for every
//! allocate or free, including ones that end up filtered out or conflicting.
//! Timeline events and filter ranges do not advance it.
//!
//! The last usable tick is `u32::MAX - 1`, since `u32::MAX` marks a block as
//! still live. Heap events arriving after that are dropped, logged, and
//! counted in [`Diagnostics::overflowed_events`].
//!
//! # Threading
//!
//! A history is built by a single writer and then queried. Tags are `Rc`
//! handles and the point index lives in a `OnceCell`, so `HeapHistory` is
//! neither `Send` nor `Sync`.

pub mod annotations;
pub mod area;
pub mod block;
pub mod conflict;
pub mod engine;
pub mod filter;
pub mod point_index;
pub mod tags;

pub use annotations::Annotation;
pub use area::GlobalArea;
pub use block::{HeapBlock, Tick};
pub use conflict::{Conflict, ConflictKind};
pub use engine::{Diagnostics, HeapHistory};
pub use tags::Tag;
