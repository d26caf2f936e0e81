// This file is part of bounded-append-buffer.
// SPDX-License-Identifier: MIT OR Apache-2.0

// Crate imports
use crate::{buffer::AppendBuffer, counter::AtomicCount};

impl<'a, T, C: AtomicCount> AppendBuffer<'a, T, C> {
    /// Returns the initialized prefix `[0, len)` as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        match self.slots {
            // SAFETY: no appender is alive while `&self` exists, so
            // `len <= capacity <= storage.len()` and every slot below `len`
            // has been written.
            Some(base) => unsafe {
                core::slice::from_raw_parts(base.as_ptr().cast::<T>(), self.len())
            },
            None => &[],
        }
    }

    /// Returns the initialized prefix `[0, len)` as a mutable slice.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        let len = self.len();
        match self.slots {
            // SAFETY: as in `as_slice`; `&mut self` makes the access exclusive.
            Some(base) => unsafe { core::slice::from_raw_parts_mut(base.as_ptr().cast::<T>(), len) },
            None => &mut [],
        }
    }

    /// Returns a raw pointer to the start of the backing storage.
    ///
    /// Only the first `len` slots are initialized. The pointer is dangling
    /// for an unbound buffer.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        match self.slots {
            Some(base) => base.as_ptr().cast::<T>(),
            None => core::ptr::NonNull::dangling().as_ptr(),
        }
    }

    /// Returns a mutable raw pointer to the start of the backing storage.
    ///
    /// Writes through it beyond `len` do not change `len`; use
    /// [`force_resize`](AppendBuffer::force_resize) to expose them.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        match self.slots {
            Some(base) => base.as_ptr().cast::<T>(),
            None => core::ptr::NonNull::dangling().as_ptr(),
        }
    }

    /// Returns the slot at `index` without bounds checks.
    ///
    /// # Safety
    ///
    /// The buffer must be bound, `index` must be below `capacity`, and the
    /// slot must hold an initialized `T` (always true for `index < len`).
    #[inline]
    pub unsafe fn get_unchecked(&self, index: usize) -> &T {
        debug_assert!(index < self.capacity);
        // SAFETY: guaranteed by the caller.
        unsafe { &*self.as_ptr().add(index) }
    }

    /// Mutable counterpart of [`get_unchecked`](AppendBuffer::get_unchecked).
    ///
    /// # Safety
    ///
    /// Same as [`get_unchecked`](AppendBuffer::get_unchecked).
    #[inline]
    pub unsafe fn get_unchecked_mut(&mut self, index: usize) -> &mut T {
        debug_assert!(index < self.capacity);
        // SAFETY: guaranteed by the caller.
        unsafe { &mut *self.as_mut_ptr().add(index) }
    }

    /// Consumes the buffer and returns the initialized prefix for the whole
    /// storage lifetime `'a`.
    pub fn into_slice(self) -> &'a mut [T] {
        let len = self.len();
        match self.slots {
            // SAFETY: the storage was borrowed mutably for `'a` and this buffer
            // was its only user; `[0, len)` is initialized.
            Some(base) => unsafe { core::slice::from_raw_parts_mut(base.as_ptr().cast::<T>(), len) },
            None => &mut [],
        }
    }
}
