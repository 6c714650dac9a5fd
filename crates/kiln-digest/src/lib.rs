//! Content fingerprint cache for Kiln.
//!
//! A reactive system that rebuilds size-varying content (text meshes,
//! glyph runs, layout boxes) can ask a [`ChangeDigestMap`] whether the
//! content behind a key actually changed since the last cycle, and skip
//! the rebuild when it did not.
//!
//! Fingerprints are cheap and approximate: one 32-bit [`Digest`] per key,
//! computed by a single-pass fold over per-element FNV-1a hashes. Two
//! different contents can share a digest; the map then reports
//! "unchanged" and one rebuild is missed. That trade is deliberate.
//! Do not swap in a stronger hash here without deciding the rebuild
//! cost is worth it.
//!
//! # Lifecycle
//!
//! One map per consuming system: construct it with the system, drop it
//! with the system. Entries are added lazily the first time a key is
//! observed. Nothing is global.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod fold;
pub mod map;

pub use config::DigestMapConfig;
pub use fold::{element_hash, fold_digest, Digest, Fnv1a32};
pub use map::{ChangeDigestMap, DigestChange};
