//! Fixed-length typed arrays with explicit lifetimes.
//!
//! An [`ArenaArray`] owns one contiguous block of `len` elements tagged
//! with an [`AllocDomain`]. Its length never changes after creation.
//! The block lives until [`ArenaArray::dispose`] is called; disposing
//! twice is a no-op.

use std::fmt;
use std::ops::{Index, IndexMut};

use kiln_core::{AllocDomain, ArenaError};

use crate::ledger::SharedLedger;
use crate::raw::{self, RawBlock};
use crate::scoped::ScopedArray;

/// A fixed-length typed memory block with manual lifetime control.
///
/// `is_created()` holds exactly while the backing block is allocated.
/// Valid indices are `[0, len())`.
///
/// Access comes in three flavours:
/// - [`get`](Self::get) / [`set`](Self::set) return `Option` / `Result`.
/// - `array[i]` panics with the offending index and bound.
/// - [`get_unchecked`](Self::get_unchecked) /
///   [`set_unchecked`](Self::set_unchecked) skip the check entirely in
///   release builds and fail fast via `debug_assert!` in debug builds.
///
/// # Example
///
/// ```
/// use kiln_arena::{AllocDomain, ArenaArray};
///
/// let mut glyphs = ArenaArray::<u32>::create(4, AllocDomain::Temporary);
/// glyphs[0] = 0x41;
/// assert_eq!(glyphs.get(0), Some(0x41));
/// glyphs.dispose();
/// assert!(!glyphs.is_created());
/// glyphs.dispose(); // no-op
/// ```
pub struct ArenaArray<T: Copy> {
    block: Option<RawBlock<T>>,
    len: usize,
    domain: AllocDomain,
    ledger: Option<SharedLedger>,
}

impl<T: Copy + Default> ArenaArray<T> {
    /// Allocate `length` elements initialised to `T::default()`.
    ///
    /// Allocation failure is fatal: the process aborts through
    /// [`std::alloc::handle_alloc_error`]. A length whose byte size
    /// overflows panics, as `Vec::with_capacity` does.
    pub fn create(length: usize, domain: AllocDomain) -> Self {
        Self::create_with(length, domain, None)
    }

    /// Allocate and record the block in `ledger`.
    pub fn create_tracked(length: usize, domain: AllocDomain, ledger: &SharedLedger) -> Self {
        Self::create_with(length, domain, Some(SharedLedger::clone(ledger)))
    }

    /// Fallible variant of [`create`](Self::create).
    pub fn try_create(length: usize, domain: AllocDomain) -> Result<Self, ArenaError> {
        Self::try_create_with(length, domain, None)
    }

    /// Allocate a block that is disposed automatically when the returned
    /// guard goes out of scope.
    pub fn scoped(length: usize, domain: AllocDomain) -> ScopedArray<T> {
        ScopedArray::new(Self::create(length, domain))
    }

    pub(crate) fn create_with(
        length: usize,
        domain: AllocDomain,
        ledger: Option<SharedLedger>,
    ) -> Self {
        match Self::try_create_with(length, domain, ledger) {
            Ok(array) => array,
            Err(ArenaError::AllocationFailed { .. }) => raw::alloc_failure::<T>(length),
            Err(err) => panic!("arena array creation failed: {err}"),
        }
    }

    pub(crate) fn try_create_with(
        length: usize,
        domain: AllocDomain,
        ledger: Option<SharedLedger>,
    ) -> Result<Self, ArenaError> {
        let block = RawBlock::try_alloc(length, T::default())?;
        let bytes = block.bytes();
        if let Some(ledger) = &ledger {
            ledger.record_alloc(domain, bytes);
        }
        tracing::debug!(len = length, %domain, bytes, "arena array created");
        Ok(Self {
            block: Some(block),
            len: length,
            domain,
            ledger,
        })
    }
}

impl<T: Copy> ArenaArray<T> {
    /// A handle that never owned a block. Used to move out of guards.
    pub(crate) fn detached(domain: AllocDomain) -> Self {
        Self {
            block: None,
            len: 0,
            domain,
            ledger: None,
        }
    }

    /// Number of elements. Fixed at creation.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the array was created with zero elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Allocation domain this block was tagged with.
    pub fn domain(&self) -> AllocDomain {
        self.domain
    }

    /// Whether the backing block is still allocated.
    pub fn is_created(&self) -> bool {
        self.block.is_some()
    }

    /// Size of the backing block in bytes, or 0 once disposed.
    pub fn memory_bytes(&self) -> usize {
        self.block.as_ref().map_or(0, RawBlock::bytes)
    }

    pub(crate) fn ledger(&self) -> Option<&SharedLedger> {
        self.ledger.as_ref()
    }

    /// Checked read. `None` if out of bounds or disposed.
    pub fn get(&self, index: usize) -> Option<T> {
        self.as_slice().get(index).copied()
    }

    /// Checked write.
    pub fn set(&mut self, index: usize, value: T) -> Result<(), ArenaError> {
        let len = self.len;
        let block = self.block.as_mut().ok_or(ArenaError::Disposed)?;
        match block.as_mut_slice().get_mut(index) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(ArenaError::IndexOutOfBounds { index, len }),
        }
    }

    /// Read without a bounds check.
    ///
    /// # Safety
    ///
    /// The array must be created and `index < self.len()`. Debug builds
    /// assert both and report the offending index and bound.
    #[allow(unsafe_code)]
    #[inline]
    pub unsafe fn get_unchecked(&self, index: usize) -> T {
        debug_assert!(
            index < self.len,
            "index {index} out of bounds for arena array of length {}",
            self.len
        );
        match &self.block {
            // SAFETY: caller guarantees index < len.
            Some(block) => unsafe { block.read(index) },
            None => {
                if cfg!(debug_assertions) {
                    panic!("read at index {index} from disposed arena array");
                }
                // SAFETY: caller guarantees the array is created.
                unsafe { std::hint::unreachable_unchecked() }
            }
        }
    }

    /// Write without a bounds check.
    ///
    /// # Safety
    ///
    /// The array must be created and `index < self.len()`. Debug builds
    /// assert both and report the offending index and bound.
    #[allow(unsafe_code)]
    #[inline]
    pub unsafe fn set_unchecked(&mut self, index: usize, value: T) {
        debug_assert!(
            index < self.len,
            "index {index} out of bounds for arena array of length {}",
            self.len
        );
        match &mut self.block {
            // SAFETY: caller guarantees index < len.
            Some(block) => unsafe { block.write(index, value) },
            None => {
                if cfg!(debug_assertions) {
                    panic!("write at index {index} to disposed arena array");
                }
                // SAFETY: caller guarantees the array is created.
                unsafe { std::hint::unreachable_unchecked() }
            }
        }
    }

    /// The elements as a slice. Empty once disposed.
    pub fn as_slice(&self) -> &[T] {
        match &self.block {
            Some(block) => block.as_slice(),
            None => &[],
        }
    }

    /// The elements as a mutable slice. Empty once disposed.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        match &mut self.block {
            Some(block) => block.as_mut_slice(),
            None => &mut [],
        }
    }

    /// Iterate over the elements.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    /// Overwrite every element with `value`.
    pub fn fill(&mut self, value: T) {
        self.as_mut_slice().fill(value);
    }

    /// Copy `src` into the array.
    ///
    /// # Panics
    ///
    /// Panics if `src.len() != self.len()` or the array is disposed.
    pub fn copy_from_slice(&mut self, src: &[T]) {
        self.as_mut_slice().copy_from_slice(src);
    }

    /// Copy the elements into a new `Vec`.
    pub fn to_vec(&self) -> Vec<T> {
        self.as_slice().to_vec()
    }

    /// Release the backing block. Calling it again is a no-op.
    pub fn dispose(&mut self) {
        if let Some(block) = self.block.take() {
            let bytes = block.bytes();
            drop(block);
            if let Some(ledger) = &self.ledger {
                ledger.record_release(self.domain, bytes);
            }
            tracing::debug!(len = self.len, domain = %self.domain, bytes, "arena array disposed");
        }
    }

    /// Move this array into a guard that disposes it on scope exit.
    pub fn into_scoped(self) -> ScopedArray<T> {
        ScopedArray::new(self)
    }

    #[cold]
    #[inline(never)]
    fn index_failure(&self, index: usize) -> ! {
        if self.is_created() {
            panic!(
                "index {index} out of bounds for arena array of length {}",
                self.len
            );
        }
        panic!("index {index} into disposed arena array");
    }
}

impl<T: Copy> Index<usize> for ArenaArray<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        match self.as_slice().get(index) {
            Some(value) => value,
            None => self.index_failure(index),
        }
    }
}

impl<T: Copy> IndexMut<usize> for ArenaArray<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        if index >= self.as_slice().len() {
            self.index_failure(index);
        }
        &mut self.as_mut_slice()[index]
    }
}

impl<'a, T: Copy> IntoIterator for &'a ArenaArray<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: Copy> Drop for ArenaArray<T> {
    fn drop(&mut self) {
        if self.block.is_some() {
            tracing::warn!(
                len = self.len,
                domain = %self.domain,
                "arena array dropped without dispose"
            );
            if let Some(ledger) = &self.ledger {
                ledger.record_implicit_release();
            }
            self.dispose();
        }
    }
}

impl<T: Copy> fmt::Debug for ArenaArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArenaArray")
            .field("len", &self.len)
            .field("domain", &self.domain)
            .field("created", &self.is_created())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::AllocLedger;

    #[test]
    fn create_reports_length_and_created() {
        let mut array = ArenaArray::<u32>::create(10, AllocDomain::Temporary);
        assert_eq!(array.len(), 10);
        assert!(array.is_created());
        assert_eq!(array.domain(), AllocDomain::Temporary);
        assert!(array.iter().all(|&v| v == 0));
        array.dispose();
    }

    #[test]
    fn zero_length_array_is_created() {
        let mut array = ArenaArray::<f32>::create(0, AllocDomain::Persistent);
        assert!(array.is_created());
        assert!(array.is_empty());
        array.dispose();
        assert!(!array.is_created());
    }

    #[test]
    fn dispose_is_idempotent() {
        let mut array = ArenaArray::<u8>::create(4, AllocDomain::ScopedJob);
        array.dispose();
        assert!(!array.is_created());
        array.dispose();
        assert!(!array.is_created());
        assert_eq!(array.len(), 4);
    }

    #[test]
    fn set_then_get_round_trips() {
        let mut array = ArenaArray::<i64>::create(8, AllocDomain::Temporary);
        array.set(7, -42).unwrap();
        assert_eq!(array.get(7), Some(-42));
        array[3] = 11;
        assert_eq!(array[3], 11);
        array.dispose();
    }

    #[test]
    fn checked_access_reports_index_and_bound() {
        let mut array = ArenaArray::<u16>::create(3, AllocDomain::Temporary);
        assert_eq!(array.get(3), None);
        assert_eq!(
            array.set(5, 1),
            Err(ArenaError::IndexOutOfBounds { index: 5, len: 3 })
        );
        array.dispose();
    }

    #[test]
    fn checked_access_after_dispose() {
        let mut array = ArenaArray::<u16>::create(3, AllocDomain::Temporary);
        array.dispose();
        assert_eq!(array.get(0), None);
        assert_eq!(array.set(0, 1), Err(ArenaError::Disposed));
        assert!(array.as_slice().is_empty());
    }

    #[test]
    #[should_panic(expected = "index 4 out of bounds for arena array of length 4")]
    fn index_panics_with_diagnostic() {
        let array = ArenaArray::<u8>::create(4, AllocDomain::Temporary);
        let _ = array[4];
    }

    #[test]
    #[should_panic(expected = "index 0 into disposed arena array")]
    fn index_after_dispose_panics() {
        let mut array = ArenaArray::<u8>::create(4, AllocDomain::Temporary);
        array.dispose();
        array[0] = 1;
    }

    #[test]
    #[allow(unsafe_code)]
    fn unchecked_access_round_trips() {
        let mut array = ArenaArray::<u32>::create(4, AllocDomain::Temporary);
        unsafe {
            array.set_unchecked(2, 99);
            assert_eq!(array.get_unchecked(2), 99);
        }
        array.dispose();
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "index 9 out of bounds for arena array of length 4")]
    #[allow(unsafe_code)]
    fn unchecked_access_fails_fast_in_debug() {
        let array = ArenaArray::<u32>::create(4, AllocDomain::Temporary);
        unsafe {
            array.get_unchecked(9);
        }
    }

    #[test]
    fn try_create_reports_overflow() {
        let result = ArenaArray::<u64>::try_create(usize::MAX, AllocDomain::Temporary);
        assert!(matches!(result, Err(ArenaError::CapacityOverflow { .. })));
    }

    #[test]
    fn fill_copy_and_to_vec() {
        let mut array = ArenaArray::<u8>::create(3, AllocDomain::Temporary);
        array.fill(9);
        assert_eq!(array.to_vec(), vec![9, 9, 9]);
        array.copy_from_slice(&[1, 2, 3]);
        assert_eq!(array.as_slice(), &[1, 2, 3]);
        assert_eq!((&array).into_iter().sum::<u8>(), 6);
        array.dispose();
    }

    #[test]
    fn ledger_tracks_create_and_dispose() {
        let ledger = AllocLedger::shared();
        let mut a = ArenaArray::<u32>::create_tracked(16, AllocDomain::Persistent, &ledger);
        let mut b = ArenaArray::<u8>::create_tracked(8, AllocDomain::Temporary, &ledger);
        assert_eq!(ledger.total_live_blocks(), 2);
        assert_eq!(ledger.live_bytes(AllocDomain::Persistent), 64);

        a.dispose();
        a.dispose();
        assert_eq!(ledger.live_blocks(AllocDomain::Persistent), 0);
        b.dispose();
        assert_eq!(ledger.total_live_blocks(), 0);
        assert_eq!(ledger.implicit_releases(), 0);
    }

    #[test]
    fn drop_without_dispose_is_counted() {
        let ledger = AllocLedger::shared();
        {
            let _leaked = ArenaArray::<u32>::create_tracked(4, AllocDomain::Temporary, &ledger);
        }
        assert_eq!(ledger.total_live_blocks(), 0);
        assert_eq!(ledger.implicit_releases(), 1);
    }

    #[test]
    fn memory_bytes_drops_to_zero_on_dispose() {
        let mut array = ArenaArray::<u64>::create(5, AllocDomain::Temporary);
        assert_eq!(array.memory_bytes(), 40);
        array.dispose();
        assert_eq!(array.memory_bytes(), 0);
    }

    #[cfg(not(miri))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn length_is_preserved(len in 0usize..4096) {
                let mut array = ArenaArray::<u32>::create(len, AllocDomain::Temporary);
                prop_assert_eq!(array.len(), len);
                prop_assert!(array.is_created());
                array.dispose();
                prop_assert!(!array.is_created());
            }

            #[test]
            fn writes_read_back(
                len in 1usize..512,
                writes in proptest::collection::vec((any::<usize>(), any::<i32>()), 0..64),
            ) {
                let mut array = ArenaArray::<i32>::create(len, AllocDomain::Temporary);
                let mut model = vec![0i32; len];
                for (raw_index, value) in writes {
                    let index = raw_index % len;
                    array.set(index, value).unwrap();
                    model[index] = value;
                }
                prop_assert_eq!(array.as_slice(), model.as_slice());
                array.dispose();
            }
        }
    }
}
