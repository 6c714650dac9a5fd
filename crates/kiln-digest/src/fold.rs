//! Per-element hashing and the digest fold.
//!
//! Elements are hashed with 32-bit FNV-1a through the standard
//! [`Hash`] machinery, then folded left to right:
//!
//! ```text
//! digest_0     = 0
//! digest_{n+1} = rotl(digest_n, 5) ^ hash(e_n)
//! ```
//!
//! The rotation makes the fold order-sensitive ("ab" and "ba" differ)
//! while keeping the combine step a single XOR. The result is not
//! collision-free and is not meant to be.

use std::fmt;
use std::hash::{Hash, Hasher};

/// FNV-1a offset basis for 32-bit.
const FNV_OFFSET: u32 = 0x811c9dc5;
/// FNV-1a prime for 32-bit.
const FNV_PRIME: u32 = 0x0100_0193;
/// Left-rotation applied to the running digest before each combine.
const FOLD_ROTATION: u32 = 5;

/// A 32-bit content fingerprint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Digest(pub u32);

impl Digest {
    /// Digest of an empty sequence (the fold seed).
    pub const EMPTY: Digest = Digest(0);

    /// Combine one element hash into the running digest.
    #[inline]
    pub fn combine(self, element_hash: u32) -> Digest {
        Digest(self.0.rotate_left(FOLD_ROTATION) ^ element_hash)
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08x}", self.0)
    }
}

/// 32-bit FNV-1a [`Hasher`].
///
/// Unlike `DefaultHasher` it is unkeyed, so the same `Hash` stream gives
/// the same value in every run.
#[derive(Clone, Copy, Debug)]
pub struct Fnv1a32 {
    state: u32,
}

impl Fnv1a32 {
    /// A hasher at the offset basis.
    pub const fn new() -> Self {
        Self { state: FNV_OFFSET }
    }

    /// The 32-bit state without widening.
    pub fn finish_u32(&self) -> u32 {
        self.state
    }
}

impl Default for Fnv1a32 {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher for Fnv1a32 {
    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.state = (self.state ^ b as u32).wrapping_mul(FNV_PRIME);
        }
    }

    fn finish(&self) -> u64 {
        self.state as u64
    }
}

/// FNV-1a hash of one element.
#[inline]
pub fn element_hash<E: Hash + ?Sized>(element: &E) -> u32 {
    let mut hasher = Fnv1a32::new();
    element.hash(&mut hasher);
    hasher.finish_u32()
}

/// Fold a sequence of elements into a [`Digest`]. O(n), one pass.
pub fn fold_digest<I>(elements: I) -> Digest
where
    I: IntoIterator,
    I::Item: Hash,
{
    elements
        .into_iter()
        .fold(Digest::EMPTY, |digest, e| digest.combine(element_hash(&e)))
}
