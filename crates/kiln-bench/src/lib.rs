//! Workload profiles for the Kiln benchmarks.
//!
//! - [`label_corpus`]: deterministic HUD-style label texts keyed by entity.
//! - [`skewed_worker_loads`]: uneven per-worker output sizes for
//!   partitioned buffer phases.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use kiln_core::ContentKey;

/// Build `count` labels of the form `"<kind>: <n>"`.
///
/// The numeric part is derived from `seed` with a small xorshift so runs
/// are reproducible without pulling in an RNG.
pub fn label_corpus(count: usize, seed: u64) -> Vec<(ContentKey, String)> {
    const KINDS: [&str; 4] = ["Score", "Ammo", "Lives", "Distance"];
    let mut state = seed | 1;
    (0..count)
        .map(|i| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            let key = ContentKey::from_entity(i as u32, 1);
            (key, format!("{}: {}", KINDS[i % KINDS.len()], state % 100_000))
        })
        .collect()
}

/// Output size per worker: worker `i` produces `base * (i + 1)` elements.
pub fn skewed_worker_loads(workers: usize, base: usize) -> Vec<usize> {
    (0..workers).map(|i| base * (i + 1)).collect()
}
