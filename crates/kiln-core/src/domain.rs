//! Allocation-lifetime categories.

use std::fmt;

/// Lifetime category attached to every owned memory block.
///
/// The domain does not change how memory is obtained (every block comes
/// from the global allocator). It records how long the caller intends
/// the block to live, so ledgers and logs can attribute live memory to
/// the right phase of a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AllocDomain {
    /// Lives for at most one frame; disposed by the code that created it.
    Temporary,
    /// Lives for the duration of one scheduled parallel job.
    ScopedJob,
    /// Lives until explicitly disposed, typically for the whole session.
    Persistent,
}

impl AllocDomain {
    /// All domains in ledger order.
    pub const ALL: [AllocDomain; 3] = [Self::Temporary, Self::ScopedJob, Self::Persistent];

    /// Number of distinct domains.
    pub const COUNT: usize = Self::ALL.len();

    /// Dense index in `0..COUNT`, used for per-domain counter tables.
    pub const fn index(self) -> usize {
        match self {
            Self::Temporary => 0,
            Self::ScopedJob => 1,
            Self::Persistent => 2,
        }
    }

    /// Lowercase name used in log fields.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Temporary => "temporary",
            Self::ScopedJob => "scoped_job",
            Self::Persistent => "persistent",
        }
    }
}

impl fmt::Display for AllocDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
