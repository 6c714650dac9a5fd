//! Digest map configuration.

/// Sizing for a [`ChangeDigestMap`](crate::ChangeDigestMap).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DigestMapConfig {
    /// Entries reserved at construction.
    ///
    /// Default: 16. Systems that know their live key population up front
    /// (e.g. the number of text entities in a scene) should pass it here
    /// to avoid growth during the first frames.
    pub initial_capacity: usize,
}

impl DigestMapConfig {
    /// Default reserved entries.
    pub const DEFAULT_INITIAL_CAPACITY: usize = 16;

    /// Smallest number of entries added by one growth step.
    pub const MIN_GROWTH: usize = 16;

    /// Create a config reserving `initial_capacity` entries.
    pub fn new(initial_capacity: usize) -> Self {
        Self { initial_capacity }
    }
}

impl Default for DigestMapConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INITIAL_CAPACITY)
    }
}
