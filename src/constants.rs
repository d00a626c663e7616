// Constants for the heap history engine

/// End tick of a block that has not been freed yet
pub const INFINITE_TICK: u32 = u32::MAX;

/// Color used for events and annotations that do not specify one
/// A not-too-intrusive gray (#B0B0B0)
pub const DEFAULT_COLOR: u32 = 0x00B0_B0B0;

/// Factor applied to the current tick when extending the global area,
/// leaving headroom on the time axis for downstream consumers
pub const TICK_HEADROOM: f64 = 1.05;

/// How far (in ticks, either direction) `event_near` looks for a timeline event
pub const EVENT_SEARCH_RADIUS: u32 = 300;

/// Tag attached to the old block when a reallocation frees it
pub const REALLOC_FREE_TAG: &str = "freed on reallocation";

/// Tag attached to the new block created by a reallocation
pub const REALLOC_ALLOC_TAG: &str = "reallocated block";
