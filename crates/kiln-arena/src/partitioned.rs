//! Worker-partitioned growable buffers.
//!
//! A [`PartitionedBuffer`] holds one [`Slot`] per parallel worker. Worker
//! *i* appends only to slot *i*, so a map phase can collect
//! variable-length output without atomics or locks. Slots grow
//! independently; a reallocation in one slot never touches another.
//! Ordering across slots is undefined until a serial merge phase reads
//! them back (see [`PartitionedBuffer::merged`]).
//!
//! The lifecycle per phase is:
//!
//! ```text
//! create ──► run_phase / slots_mut (workers append) ──► join ──► merged ──► dispose
//! ```
//!
//! The join is not a runtime check: every worker holds a `&mut Slot`
//! borrowed from the buffer, so `merged()` and `dispose()` cannot be
//! called until all of those borrows have ended.

use std::fmt;
use std::ops::Index;

use kiln_core::{AllocDomain, ArenaError, ConfigError, WorkerId};

use crate::array::ArenaArray;
use crate::config::PartitionConfig;
use crate::ledger::SharedLedger;
use crate::raw::RawBlock;

/// One worker's growable sequence.
///
/// Backed by an [`ArenaArray`]. When full, a block of twice the capacity
/// (at least [`Slot::MIN_CAPACITY`]) is allocated in the same domain, the
/// live prefix is copied over, and the old block is disposed.
pub struct Slot<T: Copy + Default> {
    storage: ArenaArray<T>,
    len: usize,
    worker: WorkerId,
}

impl<T: Copy + Default> Slot<T> {
    /// Smallest capacity a slot grows to.
    pub const MIN_CAPACITY: usize = 4;

    fn new(
        worker: WorkerId,
        capacity: usize,
        domain: AllocDomain,
        ledger: Option<SharedLedger>,
    ) -> Self {
        Self {
            storage: ArenaArray::create_with(capacity, domain, ledger),
            len: 0,
            worker,
        }
    }

    /// The worker that owns this slot.
    pub fn worker(&self) -> WorkerId {
        self.worker
    }

    /// Number of appended elements.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether nothing has been appended.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Elements the slot can hold before reallocating.
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// Append `value`. Amortized O(1).
    pub fn push(&mut self, value: T) {
        if self.len == self.storage.len() {
            self.grow(self.len + 1);
        }
        self.storage.as_mut_slice()[self.len] = value;
        self.len += 1;
    }

    /// Append every element of `values`, in order.
    pub fn extend_from_slice(&mut self, values: &[T]) {
        let needed = self.len + values.len();
        if needed > self.storage.len() {
            self.grow(needed);
        }
        self.storage.as_mut_slice()[self.len..needed].copy_from_slice(values);
        self.len = needed;
    }

    /// Element at `index`, or `None` past the end.
    pub fn get(&self, index: usize) -> Option<T> {
        self.as_slice().get(index).copied()
    }

    /// The appended elements in append order.
    pub fn as_slice(&self) -> &[T] {
        let live = self.len.min(self.storage.as_slice().len());
        &self.storage.as_slice()[..live]
    }

    /// Iterate over the appended elements.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    /// Forget every element, keeping the capacity.
    pub fn clear(&mut self) {
        self.len = 0;
    }

    fn grow(&mut self, needed: usize) {
        let old_capacity = self.storage.len();
        let new_capacity = old_capacity
            .checked_mul(2)
            .unwrap_or(needed)
            .max(needed)
            .max(Self::MIN_CAPACITY);
        let mut next = ArenaArray::create_with(
            new_capacity,
            self.storage.domain(),
            self.storage.ledger().cloned(),
        );
        next.as_mut_slice()[..self.len].copy_from_slice(&self.storage.as_slice()[..self.len]);
        self.storage.dispose();
        self.storage = next;
        tracing::trace!(
            worker = self.worker.0,
            from = old_capacity,
            to = new_capacity,
            "partition slot grew"
        );
    }

    fn dispose(&mut self) {
        self.storage.dispose();
        self.len = 0;
    }
}

impl<T: Copy + Default> Index<usize> for Slot<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        match self.as_slice().get(index) {
            Some(value) => value,
            None => panic!(
                "index {index} out of bounds for slot of worker {} with length {}",
                self.worker, self.len
            ),
        }
    }
}

impl<'a, T: Copy + Default> IntoIterator for &'a Slot<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: Copy + Default> fmt::Debug for Slot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Slot")
            .field("worker", &self.worker)
            .field("len", &self.len)
            .field("capacity", &self.capacity())
            .finish()
    }
}

/// An array of independently owned growable sequences, one per worker.
///
/// No internal synchronization. Correctness rests on static partitioning:
/// each worker receives exactly one `&mut Slot`, and the borrow checker
/// keeps two workers off the same slot.
///
/// # Example
///
/// ```
/// use kiln_arena::{AllocDomain, PartitionedBuffer};
///
/// let mut hits = PartitionedBuffer::<u32>::create(4, 16, AllocDomain::ScopedJob);
/// hits.run_phase(|worker, slot| {
///     for i in 0..=worker.0 {
///         slot.push(worker.0 * 100 + i);
///     }
/// });
/// assert_eq!(hits.total_len(), 1 + 2 + 3 + 4);
/// assert_eq!(hits.merged()[..3], [0, 100, 101]);
/// hits.dispose();
/// ```
pub struct PartitionedBuffer<T: Copy + Default> {
    slots: Vec<Slot<T>>,
    worker_count: usize,
    domain: AllocDomain,
    ledger: Option<SharedLedger>,
    created: bool,
}

impl<T: Copy + Default> PartitionedBuffer<T> {
    /// Preallocate `worker_count` slots of `slot_capacity_hint` elements.
    ///
    /// Allocation failure is fatal, as for [`ArenaArray::create`].
    ///
    /// # Panics
    ///
    /// Panics if `worker_count` exceeds [`PartitionConfig::MAX_WORKERS`].
    /// Use [`from_config`](Self::from_config) to get the error instead.
    pub fn create(worker_count: usize, slot_capacity_hint: usize, domain: AllocDomain) -> Self {
        let config = PartitionConfig::new(worker_count);
        if let Err(err) = config.validate() {
            panic!("partitioned buffer creation failed: {err}");
        }
        Self::build(worker_count, slot_capacity_hint, domain, None)
    }

    /// Validate `config` and preallocate its slots.
    pub fn from_config(config: &PartitionConfig) -> Result<Self, ConfigError> {
        Self::check(config)?;
        Ok(Self::build(
            config.worker_count,
            config.slot_capacity_hint,
            config.domain,
            None,
        ))
    }

    /// As [`from_config`](Self::from_config), recording every slot block
    /// in `ledger`.
    pub fn create_tracked(
        config: &PartitionConfig,
        ledger: &SharedLedger,
    ) -> Result<Self, ConfigError> {
        Self::check(config)?;
        Ok(Self::build(
            config.worker_count,
            config.slot_capacity_hint,
            config.domain,
            Some(SharedLedger::clone(ledger)),
        ))
    }

    fn check(config: &PartitionConfig) -> Result<(), ConfigError> {
        config.validate()?;
        if RawBlock::<T>::layout(config.slot_capacity_hint).is_err() {
            return Err(ConfigError::InvalidCapacityHint {
                hint: config.slot_capacity_hint,
            });
        }
        Ok(())
    }

    fn build(
        worker_count: usize,
        slot_capacity_hint: usize,
        domain: AllocDomain,
        ledger: Option<SharedLedger>,
    ) -> Self {
        // Callers validate against MAX_WORKERS, so every index fits a u32.
        let slots = (0..worker_count as u32)
            .map(|i| Slot::new(WorkerId(i), slot_capacity_hint, domain, ledger.clone()))
            .collect();
        tracing::debug!(
            worker_count,
            slot_capacity_hint,
            %domain,
            "partitioned buffer created"
        );
        Self {
            slots,
            worker_count,
            domain,
            ledger,
            created: true,
        }
    }

    /// Number of slots the buffer was created with.
    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// Allocation domain of every slot.
    pub fn domain(&self) -> AllocDomain {
        self.domain
    }

    /// Whether the slots are still allocated.
    pub fn is_created(&self) -> bool {
        self.created
    }

    /// Shared access to one worker's slot.
    ///
    /// # Panics
    ///
    /// Panics if `worker` is out of range or the buffer is disposed.
    pub fn slot(&self, worker: WorkerId) -> &Slot<T> {
        match self.slots.get(worker.index()) {
            Some(slot) => slot,
            None => self.slot_failure(worker),
        }
    }

    /// Exclusive access to one worker's slot.
    ///
    /// # Panics
    ///
    /// Panics if `worker` is out of range or the buffer is disposed.
    pub fn slot_mut(&mut self, worker: WorkerId) -> &mut Slot<T> {
        if worker.index() >= self.slots.len() {
            self.slot_failure(worker);
        }
        &mut self.slots[worker.index()]
    }

    /// Checked exclusive access to one worker's slot.
    pub fn try_slot_mut(&mut self, worker: WorkerId) -> Result<&mut Slot<T>, ArenaError> {
        if !self.created {
            return Err(ArenaError::Disposed);
        }
        let worker_count = self.worker_count;
        self.slots
            .get_mut(worker.index())
            .ok_or(ArenaError::WorkerOutOfRange {
                worker,
                worker_count,
            })
    }

    /// All slots in worker order.
    pub fn slots(&self) -> &[Slot<T>] {
        &self.slots
    }

    /// Disjoint exclusive handles to every slot, for handing to workers.
    pub fn slots_mut(&mut self) -> impl Iterator<Item = (WorkerId, &mut Slot<T>)> + '_ {
        self.slots.iter_mut().map(|slot| (slot.worker(), slot))
    }

    /// Run `work` once per slot on its own scoped thread, then join.
    ///
    /// Returns only after every worker has finished, so the buffer is
    /// safe to merge or dispose afterwards. A panicking worker propagates
    /// its panic after the others have been joined.
    pub fn run_phase<F>(&mut self, work: F)
    where
        T: Send,
        F: Fn(WorkerId, &mut Slot<T>) + Sync,
    {
        let work = &work;
        std::thread::scope(|scope| {
            for (worker, slot) in self.slots_mut() {
                scope.spawn(move || work(worker, slot));
            }
        });
    }

    /// Total elements across all slots.
    pub fn total_len(&self) -> usize {
        self.slots.iter().map(Slot::len).sum()
    }

    /// Concatenate every slot in worker order.
    ///
    /// This is the serial merge step; within each slot the append order
    /// is preserved.
    pub fn merged(&self) -> Vec<T> {
        let mut out = Vec::with_capacity(self.total_len());
        for slot in &self.slots {
            out.extend_from_slice(slot.as_slice());
        }
        out
    }

    /// Empty every slot, keeping capacities for the next phase.
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            slot.clear();
        }
    }

    /// Release every slot. Calling it again is a no-op.
    pub fn dispose(&mut self) {
        if !self.created {
            return;
        }
        for slot in &mut self.slots {
            slot.dispose();
        }
        self.slots.clear();
        self.created = false;
        tracing::debug!(
            worker_count = self.worker_count,
            domain = %self.domain,
            "partitioned buffer disposed"
        );
    }

    #[cold]
    #[inline(never)]
    fn slot_failure(&self, worker: WorkerId) -> ! {
        if !self.created {
            panic!("slot {worker} requested from disposed partitioned buffer");
        }
        panic!(
            "worker {worker} out of range for {} partition slots",
            self.worker_count
        );
    }
}

impl<T: Copy + Default> Drop for PartitionedBuffer<T> {
    fn drop(&mut self) {
        if self.created {
            tracing::warn!(
                worker_count = self.worker_count,
                domain = %self.domain,
                "partitioned buffer dropped without dispose"
            );
            if let Some(ledger) = &self.ledger {
                ledger.record_implicit_release();
            }
            self.dispose();
        }
    }
}

impl<T: Copy + Default> fmt::Debug for PartitionedBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PartitionedBuffer")
            .field("worker_count", &self.worker_count)
            .field("domain", &self.domain)
            .field("created", &self.created)
            .field("slots", &self.slots)
            .finish()
    }
}
