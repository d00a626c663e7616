// History engine: ingestion, bookkeeping, and queries

use super::annotations::{Annotation, Annotations};
use super::area::GlobalArea;
use super::block::{HeapBlock, Tick};
use super::conflict::{Conflict, ConflictKind};
use super::filter::FilterSet;
use super::point_index::PointIndex;
use super::tags::TagPool;
use crate::constants::{INFINITE_TICK, REALLOC_ALLOC_TAG, REALLOC_FREE_TAG};
use crate::events::{Color, HeapEvent, HeapId};
use std::cell::OnceCell;
use std::collections::BTreeMap;
use tracing::{debug, trace, warn};

/// Last tick a heap event can take; one more would collide with the
/// open-block sentinel
const LAST_TICK: Tick = INFINITE_TICK - 1;

/// Key of the live-block index: at most one open block per key
type LiveBlockKey = (u64, HeapId);

/// Anomaly counters accumulated during ingestion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Diagnostics {
    pub allocation_conflicts: usize,
    pub free_conflicts: usize,
    /// Heap events dropped by the address filter
    pub filtered_events: usize,
    /// Heap events dropped because the tick counter ran out
    pub overflowed_events: usize,
}

/// The complete lifecycle history of every block seen in an event stream
#[derive(Debug, Default)]
pub struct HeapHistory {
    /// Append-only ledger of blocks, in allocation order
    blocks: Vec<HeapBlock>,

    /// Ledger position of the block currently open at each key
    live_blocks: BTreeMap<LiveBlockKey, usize>,

    /// Lazily built; cleared whenever the ledger grows
    point_index: OnceCell<PointIndex>,

    conflicts: Vec<Conflict>,
    filters: FilterSet,
    annotations: Annotations,
    tags: TagPool,
    global_area: GlobalArea,

    current_tick: Tick,
    filtered_events: usize,
    overflowed_events: usize,
}

impl HeapHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one event record
    pub fn apply(&mut self, event: HeapEvent) {
        match event {
            HeapEvent::Allocate {
                address,
                size,
                tag,
                heap_id,
            } => self.record_allocate(address, size, &tag, heap_id),
            HeapEvent::Free {
                address,
                tag,
                heap_id,
            } => self.record_free(address, &tag, heap_id),
            HeapEvent::FreeRange {
                low,
                high,
                tag,
                heap_id,
            } => self.record_free_range(low, high, &tag, heap_id),
            HeapEvent::Realloc {
                old_address,
                new_address,
                size,
                heap_id,
            } => self.record_realloc(old_address, new_address, size, heap_id),
            HeapEvent::FilterRange { low, high } => self.record_filter_range(low, high),
            HeapEvent::Event { label, color } => self.record_event(label, color),
            HeapEvent::AddressAnnotation {
                address,
                label,
                color,
            } => self.record_address(address, label, color),
        }
    }

    /// Advance the clock and report whether the event at `address` survives
    /// the filter
    fn admit(&mut self, address: u64) -> bool {
        if self.current_tick >= LAST_TICK {
            warn!(address, "tick counter exhausted, dropping heap event");
            self.overflowed_events += 1;
            return false;
        }
        self.current_tick += 1;
        self.global_area.extend_to_tick(self.current_tick);
        if self.filters.excludes(address) {
            trace!(tick = self.current_tick, address, "event filtered");
            self.filtered_events += 1;
            return false;
        }
        true
    }

    fn record_conflict(&mut self, address: u64, kind: ConflictKind) {
        let conflict = Conflict {
            tick: self.current_tick,
            address,
            kind,
        };
        debug!(%conflict, "heap conflict");
        self.conflicts.push(conflict);
    }

    /// Record an allocation of `size` bytes at `address`
    ///
    /// An allocation at a key that already holds a live block is logged as a
    /// conflict and creates no block.
    pub fn record_allocate(&mut self, address: u64, size: u64, tag: &str, heap_id: HeapId) {
        if !self.admit(address) {
            return;
        }
        let key = (address, heap_id);
        if self.live_blocks.contains_key(&key) {
            self.record_conflict(address, ConflictKind::Allocation);
            return;
        }

        let tag = self.tags.intern(tag);
        self.blocks
            .push(HeapBlock::new(self.current_tick, address, size, tag));
        self.live_blocks.insert(key, self.blocks.len() - 1);
        self.point_index.take();

        self.global_area.include_block(address, size);
    }

    /// Record the free of the live block at `address`
    ///
    /// Freeing an address with no live block is logged as a conflict.
    pub fn record_free(&mut self, address: u64, tag: &str, heap_id: HeapId) {
        if !self.admit(address) {
            return;
        }
        let Some(index) = self.live_blocks.remove(&(address, heap_id)) else {
            self.record_conflict(address, ConflictKind::Free);
            return;
        };

        let tag = self.tags.intern(tag);
        self.blocks[index].close(self.current_tick, tag);
    }

    /// Free every live block of `heap_id` whose address lies in `[low, high]`
    ///
    /// Each block is freed as a separate event, in ascending address order,
    /// consuming one tick apiece.
    pub fn record_free_range(&mut self, low: u64, high: u64, tag: &str, heap_id: HeapId) {
        if low > high {
            return;
        }
        // Collect first: freeing mutates the live index
        let to_free: Vec<LiveBlockKey> = self
            .live_blocks
            .range((low, heap_id)..=(high, heap_id))
            .map(|(&key, _)| key)
            .filter(|&(_, block_heap)| block_heap == heap_id)
            .collect();

        for (address, heap_id) in to_free {
            self.record_free(address, tag, heap_id);
        }
    }

    /// Drop later heap events outside `[low, high]` (and any other filter range)
    pub fn record_filter_range(&mut self, low: u64, high: u64) {
        self.filters.add(low, high);
    }

    /// Attach a named event to the current tick
    pub fn record_event(&mut self, label: String, color: Color) {
        self.annotations.record_event(self.current_tick, label, color);
    }

    /// Attach a named label to an address
    pub fn record_address(&mut self, address: u64, label: String, color: Color) {
        self.annotations.record_address(address, label, color);
    }

    /// Record a reallocation as a free of the old block followed by an
    /// allocation of the new one (two ticks, two unrelated ledger effects)
    pub fn record_realloc(&mut self, old_address: u64, new_address: u64, size: u64, heap_id: HeapId) {
        self.record_free(old_address, REALLOC_FREE_TAG, heap_id);
        self.record_allocate(new_address, size, REALLOC_ALLOC_TAG, heap_id);
    }

    // === QUERIES ===

    /// Ledger positions of the blocks active in the current view
    ///
    /// There is no view window yet, so every recorded block counts as active.
    pub fn active_blocks(&self) -> impl Iterator<Item = usize> + Clone + '_ {
        self.blocks
            .iter()
            .enumerate()
            .filter(|(_, block)| self.is_block_active(block))
            .map(|(index, _)| index)
    }

    fn is_block_active(&self, _block: &HeapBlock) -> bool {
        true
    }

    /// Find a block containing `address` at `tick` using the sorted index
    ///
    /// Builds the index first if the ledger has grown since the last query.
    pub fn find_block_at(&self, address: u64, tick: Tick) -> Option<(usize, &HeapBlock)> {
        let index = self
            .point_index
            .get_or_init(|| PointIndex::build(&self.blocks));
        index
            .find(&self.blocks, address, tick)
            .map(|position| (position, &self.blocks[position]))
    }

    /// Find the first block in ledger order containing `address` at `tick`
    /// by scanning every block
    pub fn scan_block_at(&self, address: u64, tick: Tick) -> Option<(usize, &HeapBlock)> {
        self.blocks
            .iter()
            .enumerate()
            .find(|(_, block)| block.contains(tick, address))
    }

    /// Label of the timeline event nearest to `tick`, if one lies within
    /// the search radius
    pub fn event_near(&self, tick: Tick) -> Option<&str> {
        self.annotations
            .event_near(tick)
            .map(|(_, annotation)| annotation.label.as_str())
    }

    // === ACCESSORS ===

    pub fn blocks(&self) -> &[HeapBlock] {
        &self.blocks
    }

    pub fn block(&self, index: usize) -> Option<&HeapBlock> {
        self.blocks.get(index)
    }

    pub fn live_block_count(&self) -> usize {
        self.live_blocks.len()
    }

    pub fn conflicts(&self) -> &[Conflict] {
        &self.conflicts
    }

    pub fn filter_ranges(&self) -> &[(u64, u64)] {
        self.filters.ranges()
    }

    pub fn timeline_events(&self) -> &BTreeMap<Tick, Annotation> {
        self.annotations.events()
    }

    pub fn address_annotations(&self) -> &BTreeMap<u64, Annotation> {
        self.annotations.addresses()
    }

    pub fn global_area(&self) -> &GlobalArea {
        &self.global_area
    }

    pub fn current_tick(&self) -> Tick {
        self.current_tick
    }

    /// Number of distinct alloc/free tags seen
    pub fn tag_count(&self) -> usize {
        self.tags.len()
    }

    pub fn diagnostics(&self) -> Diagnostics {
        let allocation_conflicts = self
            .conflicts
            .iter()
            .filter(|c| c.is_allocation_conflict())
            .count();
        Diagnostics {
            allocation_conflicts,
            free_conflicts: self.conflicts.len() - allocation_conflicts,
            filtered_events: self.filtered_events,
            overflowed_events: self.overflowed_events,
        }
    }

    /// Whether the point index is currently built
    pub fn is_point_index_cached(&self) -> bool {
        self.point_index.get().is_some()
    }
}
