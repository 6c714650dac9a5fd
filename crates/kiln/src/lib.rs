//! Kiln: allocation-explicit primitives for per-frame ECS glue.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all Kiln sub-crates.
//!
//! # Quick start
//!
//! ```rust
//! use kiln::prelude::*;
//!
//! // Parallel map phase: each worker collects its own hits.
//! let mut hits = PartitionedBuffer::<u32>::create(4, 8, AllocDomain::ScopedJob);
//! hits.run_phase(|worker, slot| {
//!     if worker.0 % 2 == 0 {
//!         slot.push(worker.0);
//!     }
//! });
//! let merged = hits.merged();
//! hits.dispose();
//! assert_eq!(merged, vec![0, 2]);
//!
//! // Reactive rebuild gate: only re-layout a label whose text changed.
//! let mut digests = ChangeDigestMap::new();
//! let mut field = DigitField::<6>::new();
//! field.set(merged.len() as i64);
//! assert!(!digests.update(ContentKey(1), field.as_bytes()));
//! field.set(12);
//! assert!(digests.update(ContentKey(1), field.as_bytes()));
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `kiln-core` | Domains, ids, error enums |
//! | [`arena`] | `kiln-arena` | `ArenaArray`, `ScopedArray`, `PartitionedBuffer`, `AllocLedger` |
//! | [`digest`] | `kiln-digest` | `ChangeDigestMap`, `Digest`, fold helpers |
//! | [`text`] | `kiln-text` | `encode_digits`, `DigitField` |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Allocation domains, identifiers, and error types (`kiln-core`).
pub use kiln_core as types;

/// Arena arrays and partitioned buffers (`kiln-arena`).
pub use kiln_arena as arena;

/// Change digest cache (`kiln-digest`).
pub use kiln_digest as digest;

/// Digit encoding (`kiln-text`).
pub use kiln_text as text;

/// Common imports for typical Kiln usage.
///
/// ```rust
/// use kiln::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use kiln_core::{AllocDomain, ArenaError, ConfigError, ContentKey, WorkerId};

    // Arena
    pub use kiln_arena::{
        AllocLedger, ArenaArray, PartitionConfig, PartitionedBuffer, ScopedArray, SharedLedger,
        Slot,
    };

    // Digest
    pub use kiln_digest::{ChangeDigestMap, Digest, DigestChange, DigestMapConfig};

    // Text
    pub use kiln_text::{encode_digits, DigitField};
}
