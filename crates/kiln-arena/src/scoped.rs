//! Scope-bound acquisition for arena arrays.
//!
//! [`ScopedArray`] disposes the wrapped [`ArenaArray`] on every exit
//! path: normal return, early `?` return and panic unwinding. It is the
//! opt-in alternative to pairing `create`/`dispose` by hand.

use std::ops::{Deref, DerefMut};

use crate::array::ArenaArray;

/// Guard that disposes its array when dropped.
///
/// ```
/// use kiln_arena::{AllocDomain, ArenaArray};
///
/// fn longest_run(values: &[u8]) -> usize {
///     let mut runs = ArenaArray::<usize>::scoped(values.len(), AllocDomain::Temporary);
///     for (i, _) in values.iter().enumerate() {
///         runs[i] = if i > 0 && values[i] == values[i - 1] { runs[i - 1] + 1 } else { 1 };
///     }
///     runs.iter().copied().max().unwrap_or(0)
/// } // runs disposed here
///
/// assert_eq!(longest_run(&[1, 1, 2, 2, 2, 3]), 3);
/// ```
#[derive(Debug)]
pub struct ScopedArray<T: Copy> {
    inner: ArenaArray<T>,
}

impl<T: Copy> ScopedArray<T> {
    /// Take ownership of `array` until the guard is dropped.
    pub fn new(array: ArenaArray<T>) -> Self {
        Self { inner: array }
    }

    /// Give the array back to manual lifetime control.
    ///
    /// The caller becomes responsible for calling `dispose()`.
    pub fn into_inner(mut self) -> ArenaArray<T> {
        let domain = self.inner.domain();
        std::mem::replace(&mut self.inner, ArenaArray::detached(domain))
    }
}

impl<T: Copy> Deref for ScopedArray<T> {
    type Target = ArenaArray<T>;

    fn deref(&self) -> &ArenaArray<T> {
        &self.inner
    }
}

impl<T: Copy> DerefMut for ScopedArray<T> {
    fn deref_mut(&mut self) -> &mut ArenaArray<T> {
        &mut self.inner
    }
}

impl<T: Copy> Drop for ScopedArray<T> {
    fn drop(&mut self) {
        self.inner.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::AllocLedger;
    use kiln_core::{AllocDomain, ArenaError};

    #[test]
    fn disposes_on_scope_exit() {
        let ledger = AllocLedger::shared();
        {
            let mut guard =
                ArenaArray::<u32>::create_tracked(8, AllocDomain::Temporary, &ledger).into_scoped();
            guard[0] = 5;
            assert_eq!(ledger.total_live_blocks(), 1);
        }
        assert_eq!(ledger.total_live_blocks(), 0);
        assert_eq!(ledger.implicit_releases(), 0);
    }

    #[test]
    fn disposes_on_early_return() {
        let ledger = AllocLedger::shared();

        fn fails(ledger: &crate::SharedLedger) -> Result<(), ArenaError> {
            let mut guard =
                ScopedArray::new(ArenaArray::<u8>::create_tracked(2, AllocDomain::ScopedJob, ledger));
            guard.set(9, 1)?;
            Ok(())
        }

        assert!(fails(&ledger).is_err());
        assert_eq!(ledger.total_live_blocks(), 0);
        assert_eq!(ledger.implicit_releases(), 0);
    }

    #[test]
    fn disposes_on_panic() {
        let ledger = AllocLedger::shared();
        let inner = ledger.clone();
        let result = std::panic::catch_unwind(move || {
            let guard =
                ArenaArray::<u8>::create_tracked(2, AllocDomain::Temporary, &inner).into_scoped();
            let _ = guard[2];
        });
        assert!(result.is_err());
        assert_eq!(ledger.total_live_blocks(), 0);
        assert_eq!(ledger.implicit_releases(), 0);
    }

    #[test]
    fn into_inner_returns_manual_control() {
        let guard = ArenaArray::<u16>::scoped(3, AllocDomain::Persistent);
        let mut array = guard.into_inner();
        assert!(array.is_created());
        assert_eq!(array.len(), 3);
        array.dispose();
    }
}
