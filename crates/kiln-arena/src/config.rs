//! Partitioned buffer configuration.

use kiln_core::{AllocDomain, ConfigError};

/// Configuration for a [`PartitionedBuffer`](crate::PartitionedBuffer).
///
/// Controls how many worker slots are created and how much each slot
/// preallocates. Validated at construction; immutable afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PartitionConfig {
    /// Number of slots, one per parallel worker.
    ///
    /// Must not exceed [`MAX_WORKERS`](Self::MAX_WORKERS). Zero is
    /// accepted and yields a buffer with no slots.
    pub worker_count: usize,

    /// Elements preallocated in every slot.
    ///
    /// Default: 64. Sizing this to the expected per-worker output avoids
    /// reallocation during the phase.
    pub slot_capacity_hint: usize,

    /// Allocation domain for every slot block.
    pub domain: AllocDomain,
}

impl PartitionConfig {
    /// Default elements preallocated per slot.
    pub const DEFAULT_SLOT_CAPACITY: usize = 64;

    /// Largest accepted worker count.
    pub const MAX_WORKERS: usize = 1024;

    /// Create a config for `worker_count` workers with default sizing in
    /// the `ScopedJob` domain.
    pub fn new(worker_count: usize) -> Self {
        Self {
            worker_count,
            slot_capacity_hint: Self::DEFAULT_SLOT_CAPACITY,
            domain: AllocDomain::ScopedJob,
        }
    }

    /// Set the per-slot capacity hint.
    pub fn with_slot_capacity(mut self, hint: usize) -> Self {
        self.slot_capacity_hint = hint;
        self
    }

    /// Set the allocation domain.
    pub fn with_domain(mut self, domain: AllocDomain) -> Self {
        self.domain = domain;
        self
    }

    /// Check the type-independent limits.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.worker_count > Self::MAX_WORKERS {
            return Err(ConfigError::InvalidWorkerCount {
                count: self.worker_count,
                max: Self::MAX_WORKERS,
            });
        }
        Ok(())
    }
}

impl Default for PartitionConfig {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = PartitionConfig::new(8);
        assert_eq!(config.worker_count, 8);
        assert_eq!(config.slot_capacity_hint, 64);
        assert_eq!(config.domain, AllocDomain::ScopedJob);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn builder_overrides() {
        let config = PartitionConfig::new(2)
            .with_slot_capacity(7)
            .with_domain(AllocDomain::Temporary);
        assert_eq!(config.slot_capacity_hint, 7);
        assert_eq!(config.domain, AllocDomain::Temporary);
    }

    #[test]
    fn rejects_too_many_workers() {
        let config = PartitionConfig::new(PartitionConfig::MAX_WORKERS + 1);
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidWorkerCount {
                count: 1025,
                max: 1024
            })
        );
    }

    #[test]
    fn zero_workers_is_valid() {
        assert!(PartitionConfig::new(0).validate().is_ok());
    }
}
