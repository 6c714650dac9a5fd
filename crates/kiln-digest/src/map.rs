//! Key → digest cache with change detection.
//!
//! [`ChangeDigestMap::update`] folds the current content for a key into a
//! [`Digest`], compares it with the digest stored last cycle, stores the
//! new one, and reports whether it changed:
//!
//! | stored digest | new digest | result  | map after            |
//! |---------------|------------|---------|----------------------|
//! | absent        | `d`        | `false` | `key → d` (baseline) |
//! | `p`           | `d != p`   | `true`  | `key → d`            |
//! | `p`           | `d == p`   | `false` | unchanged            |
//!
//! The first observation establishes a baseline and is *not* a change.
//! Call sites that must also rebuild on first sight should use
//! [`ChangeDigestMap::observe`], which reports
//! [`DigestChange::FirstSeen`] separately.

use std::hash::Hash;

use indexmap::IndexMap;

use crate::config::DigestMapConfig;
use crate::fold::{fold_digest, Digest};

/// Outcome of observing a key's content.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DigestChange {
    /// The key had no stored digest; the current one is now the baseline.
    FirstSeen,
    /// The stored digest differed and has been replaced.
    Changed {
        /// The digest stored before this observation.
        previous: Digest,
    },
    /// The stored digest matched.
    Unchanged,
}

impl DigestChange {
    /// Whether this outcome counts as a change for [`ChangeDigestMap::update`].
    pub fn is_changed(self) -> bool {
        matches!(self, Self::Changed { .. })
    }

    /// Whether the key was observed for the first time.
    pub fn is_first_seen(self) -> bool {
        matches!(self, Self::FirstSeen)
    }
}

/// Persistent mapping from content key to its last observed [`Digest`].
///
/// At most one entry per key. Capacity grows by doubling (at least
/// [`DigestMapConfig::MIN_GROWTH`] entries) when a new key arrives at a
/// full map, and never shrinks, including across
/// [`forget`](Self::forget) and [`clear`](Self::clear).
///
/// A single logical writer per update cycle is assumed; the map takes no
/// locks.
///
/// # Example
///
/// ```
/// use kiln_digest::ChangeDigestMap;
///
/// let mut labels = ChangeDigestMap::<u64>::new();
/// assert!(!labels.update(7, "HP 100".chars())); // baseline
/// assert!(!labels.update(7, "HP 100".chars())); // same text
/// assert!(labels.update(7, "HP 95".chars()));   // rebuild
/// assert!(!labels.update(7, "HP 95".chars()));
/// ```
#[derive(Debug, Clone)]
pub struct ChangeDigestMap<K> {
    entries: IndexMap<K, Digest>,
    /// High-water mark of `entries.capacity()`. Removals leave tombstones
    /// that lower the live figure, so it is not reported directly.
    capacity: usize,
}

impl<K: Hash + Eq> ChangeDigestMap<K> {
    /// Create a map with the default initial capacity.
    pub fn new() -> Self {
        Self::with_config(DigestMapConfig::default())
    }

    /// Create a map sized by `config`.
    pub fn with_config(config: DigestMapConfig) -> Self {
        let entries = IndexMap::with_capacity(config.initial_capacity);
        let capacity = entries.capacity();
        Self { entries, capacity }
    }

    /// Fold `elements` and record the result for `key`.
    ///
    /// Returns `true` only when a previously stored digest differs from
    /// the new one. See the module docs for the full transition table.
    pub fn update<I>(&mut self, key: K, elements: I) -> bool
    where
        I: IntoIterator,
        I::Item: Hash,
    {
        self.observe(key, elements).is_changed()
    }

    /// As [`update`](Self::update), reporting the first observation
    /// distinctly.
    pub fn observe<I>(&mut self, key: K, elements: I) -> DigestChange
    where
        I: IntoIterator,
        I::Item: Hash,
    {
        self.observe_digest(key, fold_digest(elements))
    }

    /// As [`update`](Self::update) with a precomputed digest.
    pub fn update_digest(&mut self, key: K, digest: Digest) -> bool {
        self.observe_digest(key, digest).is_changed()
    }

    /// As [`observe`](Self::observe) with a precomputed digest.
    pub fn observe_digest(&mut self, key: K, digest: Digest) -> DigestChange {
        match self.entries.get_mut(&key) {
            Some(stored) if *stored == digest => DigestChange::Unchanged,
            Some(stored) => {
                let previous = std::mem::replace(stored, digest);
                tracing::trace!(%previous, current = %digest, "content digest changed");
                DigestChange::Changed { previous }
            }
            None => {
                self.grow_if_full();
                self.entries.insert(key, digest);
                self.track_capacity();
                DigestChange::FirstSeen
            }
        }
    }

    /// The digest stored for `key`, if it has been observed.
    pub fn digest_of(&self, key: &K) -> Option<Digest> {
        self.entries.get(key).copied()
    }

    /// Whether `key` has a stored digest.
    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of keys with a stored digest.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no key has been observed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries the map can hold before growing.
    ///
    /// Never decreases, including across [`forget`](Self::forget) and
    /// [`clear`](Self::clear).
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Reserve room for `additional` more keys ahead of a known burst.
    pub fn reserve(&mut self, additional: usize) {
        self.entries.reserve(additional);
        self.track_capacity();
    }

    /// Remove a key's baseline, returning its digest.
    ///
    /// The next observation of `key` reports
    /// [`DigestChange::FirstSeen`]. Capacity is kept.
    pub fn forget(&mut self, key: &K) -> Option<Digest> {
        self.entries.swap_remove(key)
    }

    /// Remove every baseline, keeping capacity.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Iterate over stored keys and digests in first-observation order
    /// (until a [`forget`](Self::forget) reorders the tail).
    pub fn iter(&self) -> impl Iterator<Item = (&K, Digest)> + '_ {
        self.entries.iter().map(|(k, &d)| (k, d))
    }

    fn grow_if_full(&mut self) {
        let capacity = self.capacity;
        if self.entries.len() < capacity {
            return;
        }
        let additional = capacity.max(DigestMapConfig::MIN_GROWTH);
        self.entries.reserve(additional);
        self.track_capacity();
        tracing::trace!(from = capacity, to = self.capacity, "digest map grew");
    }

    fn track_capacity(&mut self) {
        self.capacity = self.capacity.max(self.entries.capacity());
    }
}

impl<K: Hash + Eq> Default for ChangeDigestMap<K> {
    fn default() -> Self {
        Self::new()
    }
}
