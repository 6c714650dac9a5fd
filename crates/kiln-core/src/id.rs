//! Strongly-typed identifiers.

use std::fmt;

/// Identifies one parallel worker within a phase.
///
/// Worker ids are assigned by the external scheduler before the phase
/// starts and are dense in `0..worker_count`. A worker owns exactly one
/// partition slot for the duration of the phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WorkerId(pub u32);

impl WorkerId {
    /// The id as a slot index.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for WorkerId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Stable opaque identity of an entity or piece of content.
///
/// Supplied by the host engine (an entity index/version pair packed into
/// 64 bits, an asset id, ...). Kiln never interprets the value; it only
/// hashes and compares it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentKey(pub u64);

impl ContentKey {
    /// Pack an entity index and version into a key.
    pub const fn from_entity(index: u32, version: u32) -> Self {
        Self(((version as u64) << 32) | index as u64)
    }

    /// The entity index half of a packed key.
    pub const fn entity_index(self) -> u32 {
        self.0 as u32
    }

    /// The entity version half of a packed key.
    pub const fn entity_version(self) -> u32 {
        (self.0 >> 32) as u32
    }
}

impl fmt::Display for ContentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.entity_index(), self.entity_version())
    }
}

impl From<u64> for ContentKey {
    fn from(v: u64) -> Self {
        Self(v)
    }
}
