//! All-resources-disposed assertions.

use kiln_arena::{AllocLedger, SharedLedger};
use kiln_core::AllocDomain;

/// Owns a ledger and asserts on drop that nothing tracked by it is live.
///
/// Pass [`ledger`](LeakCheck::ledger) to every `create_tracked` call in
/// the test. When the check goes out of scope it panics if any block is
/// still allocated, or if any block was released by `Drop` instead of
/// an explicit `dispose()`. The drop-time assertion is skipped while the
/// thread is already panicking so the original failure stays visible.
pub struct LeakCheck {
    ledger: SharedLedger,
}

impl LeakCheck {
    pub fn new() -> Self {
        Self {
            ledger: AllocLedger::shared(),
        }
    }

    pub fn ledger(&self) -> &SharedLedger {
        &self.ledger
    }

    /// Panic with a per-domain breakdown if anything leaked so far.
    pub fn assert_clean(&self) {
        let live = self.ledger.total_live_blocks();
        let implicit = self.ledger.implicit_releases();
        if live == 0 && implicit == 0 {
            return;
        }
        let breakdown: Vec<String> = AllocDomain::ALL
            .iter()
            .map(|&d| {
                format!(
                    "{d}: {} blocks / {} bytes",
                    self.ledger.live_blocks(d),
                    self.ledger.live_bytes(d)
                )
            })
            .collect();
        panic!(
            "leak check failed: {live} live blocks, {implicit} released without dispose ({})",
            breakdown.join(", ")
        );
    }
}

impl Default for LeakCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for LeakCheck {
    fn drop(&mut self) {
        if !std::thread::panicking() {
            self.assert_clean();
        }
    }
}
