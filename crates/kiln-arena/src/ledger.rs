//! Live-allocation accounting per domain.
//!
//! An [`AllocLedger`] is attached to arrays and partitioned buffers at
//! creation. Every block they allocate is recorded against its
//! [`AllocDomain`], and every release is subtracted again, so a harness
//! can assert that a scope ended with nothing live.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use kiln_core::AllocDomain;

/// Per-domain counters of live blocks and bytes.
///
/// Counters are updated with relaxed atomics. Readers that need an exact
/// figure must observe the ledger after the workers that touched it have
/// been joined.
#[derive(Debug, Default)]
pub struct AllocLedger {
    live_blocks: [AtomicUsize; AllocDomain::COUNT],
    live_bytes: [AtomicUsize; AllocDomain::COUNT],
    /// Blocks released by `Drop` rather than an explicit `dispose()`.
    implicit_releases: AtomicUsize,
}

/// Shared handle to a ledger.
pub type SharedLedger = Arc<AllocLedger>;

impl AllocLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty ledger wrapped in an `Arc` for sharing.
    pub fn shared() -> SharedLedger {
        Arc::new(Self::new())
    }

    pub(crate) fn record_alloc(&self, domain: AllocDomain, bytes: usize) {
        self.live_blocks[domain.index()].fetch_add(1, Ordering::Relaxed);
        self.live_bytes[domain.index()].fetch_add(bytes, Ordering::Relaxed);
    }

    pub(crate) fn record_release(&self, domain: AllocDomain, bytes: usize) {
        self.live_blocks[domain.index()].fetch_sub(1, Ordering::Relaxed);
        self.live_bytes[domain.index()].fetch_sub(bytes, Ordering::Relaxed);
    }

    pub(crate) fn record_implicit_release(&self) {
        self.implicit_releases.fetch_add(1, Ordering::Relaxed);
    }

    /// Live blocks in one domain.
    pub fn live_blocks(&self, domain: AllocDomain) -> usize {
        self.live_blocks[domain.index()].load(Ordering::Relaxed)
    }

    /// Live bytes in one domain.
    pub fn live_bytes(&self, domain: AllocDomain) -> usize {
        self.live_bytes[domain.index()].load(Ordering::Relaxed)
    }

    /// Live blocks across all domains.
    pub fn total_live_blocks(&self) -> usize {
        AllocDomain::ALL.iter().map(|&d| self.live_blocks(d)).sum()
    }

    /// Live bytes across all domains.
    pub fn total_live_bytes(&self) -> usize {
        AllocDomain::ALL.iter().map(|&d| self.live_bytes(d)).sum()
    }

    /// Number of blocks that were dropped without being disposed.
    pub fn implicit_releases(&self) -> usize {
        self.implicit_releases.load(Ordering::Relaxed)
    }
}
