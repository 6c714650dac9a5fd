//! Low-level primitives for arena memory operations.
//!
//! This is the only module in `kiln-arena` that contains `unsafe` code.
//! [`RawBlock`] owns one allocation from the global allocator and exposes
//! it as a slice; every `unsafe` block carries a `// SAFETY:` comment.
//!
//! Elements are restricted to `Copy` types, so a block never runs element
//! destructors: releasing it is a single `dealloc`.

#![allow(unsafe_code)]

use std::alloc::{self, Layout};
use std::marker::PhantomData;
use std::ptr::NonNull;

use kiln_core::ArenaError;

/// An owned, initialised block of `len` elements of `T`.
///
/// Zero-sized layouts (`len == 0` or zero-sized `T`) use a dangling,
/// well-aligned pointer and never touch the allocator.
pub(crate) struct RawBlock<T: Copy> {
    ptr: NonNull<T>,
    len: usize,
    _owns: PhantomData<T>,
}

// SAFETY: RawBlock uniquely owns its allocation, like Box<[T]>.
unsafe impl<T: Copy + Send> Send for RawBlock<T> {}
// SAFETY: shared access only hands out &T / &[T].
unsafe impl<T: Copy + Sync> Sync for RawBlock<T> {}

impl<T: Copy> RawBlock<T> {
    /// Layout for `len` elements, or `CapacityOverflow`.
    pub(crate) fn layout(len: usize) -> Result<Layout, ArenaError> {
        Layout::array::<T>(len).map_err(|_| ArenaError::CapacityOverflow {
            length: len,
            elem_size: std::mem::size_of::<T>(),
        })
    }

    /// Allocate `len` elements, each initialised to `fill`.
    pub(crate) fn try_alloc(len: usize, fill: T) -> Result<Self, ArenaError> {
        let layout = Self::layout(len)?;
        let ptr = if layout.size() == 0 {
            NonNull::dangling()
        } else {
            // SAFETY: layout has non-zero size.
            let raw = unsafe { alloc::alloc(layout) }.cast::<T>();
            NonNull::new(raw).ok_or(ArenaError::AllocationFailed {
                bytes: layout.size(),
            })?
        };
        for i in 0..len {
            // SAFETY: i < len and the block holds len elements of T.
            unsafe { ptr.as_ptr().add(i).write(fill) };
        }
        Ok(Self {
            ptr,
            len,
            _owns: PhantomData,
        })
    }

    /// Size of the block in bytes.
    pub(crate) fn bytes(&self) -> usize {
        self.len * std::mem::size_of::<T>()
    }

    pub(crate) fn as_slice(&self) -> &[T] {
        // SAFETY: ptr is valid and initialised for len elements for the
        // lifetime of &self.
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: as above, and &mut self guarantees exclusivity.
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }

    /// Read element `index` without a bounds check.
    ///
    /// # Safety
    ///
    /// `index` must be less than the block length.
    #[inline]
    pub(crate) unsafe fn read(&self, index: usize) -> T {
        // SAFETY: caller guarantees index < len.
        unsafe { self.ptr.as_ptr().add(index).read() }
    }

    /// Write element `index` without a bounds check.
    ///
    /// # Safety
    ///
    /// `index` must be less than the block length.
    #[inline]
    pub(crate) unsafe fn write(&mut self, index: usize, value: T) {
        // SAFETY: caller guarantees index < len; &mut self is exclusive.
        unsafe { self.ptr.as_ptr().add(index).write(value) }
    }
}

impl<T: Copy> Drop for RawBlock<T> {
    fn drop(&mut self) {
        // The layout was valid at allocation time, so this cannot fail.
        if let Ok(layout) = Layout::array::<T>(self.len) {
            if layout.size() != 0 {
                // SAFETY: ptr came from alloc::alloc with this exact layout.
                unsafe { alloc::dealloc(self.ptr.as_ptr().cast::<u8>(), layout) };
            }
        }
    }
}

/// Diverge on an allocation failure for `len` elements of `T`.
///
/// Routes through [`alloc::handle_alloc_error`] so the process aborts the
/// same way `Vec` does when the allocator refuses a request.
pub(crate) fn alloc_failure<T: Copy>(len: usize) -> ! {
    match RawBlock::<T>::layout(len) {
        Ok(layout) => alloc::handle_alloc_error(layout),
        Err(err) => panic!("{err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_fills_every_element() {
        let block = RawBlock::try_alloc(16, 7u32).unwrap();
        assert_eq!(block.as_slice(), &[7u32; 16]);
        assert_eq!(block.bytes(), 64);
    }

    #[test]
    fn zero_length_uses_dangling_pointer() {
        let block = RawBlock::<u64>::try_alloc(0, 0).unwrap();
        assert!(block.as_slice().is_empty());
        assert_eq!(block.bytes(), 0);
    }

    #[test]
    fn zero_sized_elements_never_allocate() {
        let block = RawBlock::<()>::try_alloc(1000, ()).unwrap();
        assert_eq!(block.as_slice().len(), 1000);
        assert_eq!(block.bytes(), 0);
    }

    #[test]
    fn overflowing_layout_is_reported() {
        let result = RawBlock::<u64>::try_alloc(usize::MAX, 0);
        assert!(matches!(
            result,
            Err(ArenaError::CapacityOverflow { length: usize::MAX, elem_size: 8 })
        ));
    }

    #[test]
    fn unchecked_read_write_round_trip() {
        let mut block = RawBlock::try_alloc(4, 0i32).unwrap();
        unsafe {
            block.write(3, -9);
            assert_eq!(block.read(3), -9);
        }
    }
}
