//! Typed arena arrays and worker-partitioned buffers for Kiln.
//!
//! Every block in this crate has an explicit lifecycle: it is created
//! by a call that names its length and [`AllocDomain`], and released by
//! an idempotent `dispose()`. Nothing is reclaimed behind the caller's
//! back. Dropping a block that was never disposed still frees it, but
//! logs a warning and is counted by the [`AllocLedger`] so tests can
//! catch unpaired lifecycles.
//!
//! # Architecture
//!
//! ```text
//! PartitionedBuffer<T>
//! └── Slot<T> × worker_count (one per worker, grows independently)
//!     └── ArenaArray<T> (fixed-length typed block, reallocated on growth)
//!         └── RawBlock<T> (the only unsafe code: alloc / dealloc / access)
//! ```
//!
//! An [`AllocLedger`] may be attached at creation; it tracks live blocks
//! and bytes per domain across every array and slot that shares it.
//!
//! # Concurrency
//!
//! Nothing here takes a lock. [`PartitionedBuffer`] hands one `&mut Slot`
//! to each worker, so disjointness is enforced by the borrow checker and
//! the join barrier before merge or dispose falls out of the borrow
//! ending.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod array;
pub mod config;
pub mod ledger;
pub mod partitioned;
mod raw;
pub mod scoped;

// Public re-exports for the primary API surface.
pub use array::ArenaArray;
pub use config::PartitionConfig;
pub use kiln_core::{AllocDomain, ArenaError, ConfigError, WorkerId};
pub use ledger::{AllocLedger, SharedLedger};
pub use partitioned::{PartitionedBuffer, Slot};
pub use scoped::ScopedArray;
