use super::tags::Tag;
use crate::constants::INFINITE_TICK;

/// Logical clock value; one tick per allocate/free that reaches the engine
pub type Tick = u32;

/// The recorded lifetime of one allocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeapBlock {
    pub start_tick: Tick,
    pub end_tick: Tick, // INFINITE_TICK while live
    pub address: u64,
    pub size: u64,
    pub alloc_tag: Tag,
    pub free_tag: Option<Tag>,
}

impl HeapBlock {
    pub fn new(start_tick: Tick, address: u64, size: u64, alloc_tag: Tag) -> Self {
        HeapBlock {
            start_tick,
            end_tick: INFINITE_TICK,
            address,
            size,
            alloc_tag,
            free_tag: None,
        }
    }

    /// True until the matching free has been recorded
    pub fn is_live(&self) -> bool {
        self.end_tick == INFINITE_TICK
    }

    /// Last address covered by the block (inclusive)
    ///
    /// A zero-size block still occupies its start address.
    pub fn end_address(&self) -> u64 {
        self.address.saturating_add(self.size)
    }

    /// Whether the point `(tick, address)` lies inside the block's
    /// address range and lifetime, both bounds inclusive
    pub fn contains(&self, tick: Tick, address: u64) -> bool {
        address >= self.address
            && address <= self.end_address()
            && tick >= self.start_tick
            && tick <= self.end_tick
    }

    /// Close the block's lifetime
    pub(crate) fn close(&mut self, tick: Tick, tag: Tag) {
        self.end_tick = tick;
        self.free_tag = Some(tag);
    }
}
