//! Error types for the Kiln primitives.
//!
//! Only recoverable conditions are represented here. Allocation failure
//! through the non-`try_` constructors is fatal and never reaches these
//! enums; digit-buffer truncation and digest collisions are documented
//! behaviour, not errors.

use std::error::Error;
use std::fmt;

use crate::id::WorkerId;

/// Errors from arena arrays and partitioned buffers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArenaError {
    /// The global allocator refused the request.
    AllocationFailed {
        /// Number of bytes requested.
        bytes: usize,
    },
    /// `length * size_of::<T>()` does not fit in a valid allocation layout.
    CapacityOverflow {
        /// Requested element count.
        length: usize,
        /// Size of one element in bytes.
        elem_size: usize,
    },
    /// Checked access outside `[0, len)`.
    IndexOutOfBounds {
        /// The offending index.
        index: usize,
        /// The exclusive upper bound.
        len: usize,
    },
    /// Access to a block that has already been disposed.
    Disposed,
    /// A worker id outside `[0, worker_count)`.
    WorkerOutOfRange {
        /// The offending worker.
        worker: WorkerId,
        /// Number of slots in the buffer.
        worker_count: usize,
    },
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllocationFailed { bytes } => {
                write!(f, "allocation of {bytes} bytes failed")
            }
            Self::CapacityOverflow { length, elem_size } => {
                write!(
                    f,
                    "capacity overflow: {length} elements of {elem_size} bytes"
                )
            }
            Self::IndexOutOfBounds { index, len } => {
                write!(f, "index {index} out of bounds for length {len}")
            }
            Self::Disposed => write!(f, "block has been disposed"),
            Self::WorkerOutOfRange {
                worker,
                worker_count,
            } => {
                write!(
                    f,
                    "worker {worker} out of range for {worker_count} partition slots"
                )
            }
        }
    }
}

impl Error for ArenaError {}

/// Errors from validating a configuration struct.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Worker count above the supported maximum.
    InvalidWorkerCount {
        /// The requested count.
        count: usize,
        /// The largest accepted count.
        max: usize,
    },
    /// Per-slot capacity hint that cannot be allocated.
    InvalidCapacityHint {
        /// The requested hint.
        hint: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidWorkerCount { count, max } => {
                write!(f, "worker count {count} exceeds maximum {max}")
            }
            Self::InvalidCapacityHint { hint } => {
                write!(f, "slot capacity hint {hint} is too large")
            }
        }
    }
}

impl Error for ConfigError {}
