//! # Introduction
//!
//! heaptrail ingests a stream of heap lifecycle events (allocations, frees,
//! range frees, address filters, named timeline events, and address labels)
//! and keeps the full history of every block's address range and lifetime.
//! The history answers two questions: "what was allocated at tick T" and
//! "which block, if any, owned address A at tick T".
//!
//! ## Pipeline
//!
//! ```text
//! JSON trace → decode → HeapEvent → HeapHistory → queries / reports
//! ```
//!
//! 1. [`events`]: the [`events::HeapEvent`] record types, and
//!    [`events::decode`], which validates a JSON trace record by record.
//! 2. [`history`]: the [`history::HeapHistory`] engine with its block ledger,
//!    live-block index, conflict log, address filters, annotations, and the
//!    sorted point-query index.
//! 3. [`report`]: text tables used by the `heaptrail` binary.
//!
//! ## Example
//!
//! ```
//! use heaptrail::history::HeapHistory;
//!
//! let mut history = HeapHistory::new();
//! history.record_allocate(0x1000, 64, "request buffer", 0);
//! history.record_free(0x1000, "request done", 0);
//!
//! let (index, block) = history.find_block_at(0x1020, 1).unwrap();
//! assert_eq!(index, 0);
//! assert_eq!(block.end_tick, 2);
//! ```

pub mod constants;
pub mod events;
pub mod history;
pub mod report;
