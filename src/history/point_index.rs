//! Sorted point-query index over the block ledger
//!
//! Ledger positions are ordered by address descending, then start tick
//! descending. A point query binary-searches for the first block whose lower
//! left corner `(address, start_tick)` does not lie above and to the right
//! of the query point, then walks toward lower addresses until it either
//! finds a block containing the point or has passed every block that could
//! still reach it.
//!
//! # Probe bound
//!
//! The walk stops once `block.address + max_size < address`, where
//! `max_size` is the largest block size in the ledger. No block further down
//! the order can reach the query address, so the indexed lookup finds a
//! containing block whenever the linear scan does. On heaps with a few huge
//! blocks the walk degrades toward a linear scan of the lower addresses.
//!
//! The index only depends on addresses, start ticks, and sizes, none of which
//! change when a block is freed; only new allocations invalidate it.

use super::block::{HeapBlock, Tick};
use tracing::trace;

#[derive(Debug, Clone, Default)]
pub struct PointIndex {
    order: Vec<usize>,
    max_size: u64,
}

impl PointIndex {
    /// Build the index over the whole ledger
    pub fn build(blocks: &[HeapBlock]) -> Self {
        let mut order: Vec<usize> = (0..blocks.len()).collect();
        order.sort_unstable_by(|&left, &right| {
            let (left, right) = (&blocks[left], &blocks[right]);
            right
                .address
                .cmp(&left.address)
                .then(right.start_tick.cmp(&left.start_tick))
        });
        let max_size = blocks.iter().map(|b| b.size).max().unwrap_or(0);
        trace!(blocks = blocks.len(), max_size, "rebuilt point index");

        PointIndex { order, max_size }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Ledger positions in index order
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Position in `order` of the first block not sorted strictly before
    /// the point `(address, tick)`
    fn first_candidate(&self, blocks: &[HeapBlock], address: u64, tick: Tick) -> usize {
        self.order.partition_point(|&i| {
            let block = &blocks[i];
            block.address > address || (block.address == address && block.start_tick > tick)
        })
    }

    /// Ledger position of a block containing `(address, tick)`, if any
    ///
    /// `blocks` must be the ledger the index was built from (possibly with
    /// more blocks closed since, but none added).
    pub fn find(&self, blocks: &[HeapBlock], address: u64, tick: Tick) -> Option<usize> {
        let start = self.first_candidate(blocks, address, tick);
        for &index in &self.order[start..] {
            let block = &blocks[index];
            if block.address.saturating_add(self.max_size) < address {
                break;
            }
            if block.contains(tick, address) {
                return Some(index);
            }
        }
        None
    }
}
