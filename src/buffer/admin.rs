// This file is part of bounded-append-buffer.
// SPDX-License-Identifier: MIT OR Apache-2.0

// Administrative operations. All of them take `&mut self`, so none can overlap
// with a concurrent append phase or with each other.

// Crate imports
use crate::{
    buffer::{bind::as_uninit_slots, AppendBuffer},
    counter::AtomicCount,
    error::Error,
    trace::debug_event,
};

// Core imports
use core::{mem::MaybeUninit, ptr::NonNull};

impl<'a, T, C: AtomicCount> AppendBuffer<'a, T, C> {
    /// Sets `len = 0` without dropping or overwriting the stored elements.
    #[inline]
    pub fn clear(&mut self) {
        debug_event!(len = self.len(), "append buffer cleared");
        self.len.with_mut(|len| *len = 0);
    }

    /// Shrinks to `new_len` if `new_len < len`; otherwise a no-op.
    ///
    /// Elements past `new_len` are forgotten, not dropped.
    #[inline]
    pub fn truncate(&mut self, new_len: usize) {
        self.len.with_mut(|len| {
            if new_len < *len {
                *len = new_len;
            }
        });
    }

    /// Sets the logical length to `new_len`, bypassing the append path.
    ///
    /// Returns [`Error::OutOfBounds`] if `new_len > capacity` and
    /// [`Error::Unbound`] on an unbound buffer with a non-zero `new_len`.
    ///
    /// # Safety
    ///
    /// Every slot in `[0, new_len)` must hold an initialized `T`, for example
    /// because it was written through [`as_mut_ptr`](AppendBuffer::as_mut_ptr)
    /// or survived an earlier [`clear`](AppendBuffer::clear).
    pub unsafe fn force_resize(&mut self, new_len: usize) -> Result<(), Error> {
        if new_len > 0 && !self.is_bound() {
            return Err(Error::Unbound);
        }
        if new_len > self.capacity {
            return Err(Error::OutOfBounds);
        }
        debug_event!(from = self.len(), to = new_len, "append buffer resized");
        self.len.with_mut(|len| *len = new_len);
        Ok(())
    }

    /// Replaces the backing storage, keeping `len` and `capacity`.
    ///
    /// Subsequent appends write into `storage` only, treating slots past `len`
    /// as uninitialized. The previous storage is left untouched and returns to
    /// its owner when `'a` ends.
    ///
    /// Returns [`Error::StorageTooSmall`] if `storage` holds fewer than
    /// `capacity` slots; the buffer is unchanged in that case.
    ///
    /// # Safety
    ///
    /// Every slot in `[0, len)` of `storage` must hold an initialized `T`.
    pub unsafe fn rebind(&mut self, storage: &'a mut [MaybeUninit<T>]) -> Result<(), Error> {
        self.swap_storage(storage, false)
    }

    /// Safe variant of [`rebind`](AppendBuffer::rebind) for storage whose
    /// slots already hold live values.
    ///
    /// As with [`from_init`](AppendBuffer::from_init), appended values replace
    /// and drop the previous occupant of their slot, and emplaced values are
    /// constructed over it.
    pub fn rebind_init(&mut self, storage: &'a mut [T]) -> Result<(), Error> {
        self.swap_storage(as_uninit_slots(storage), true)
    }

    fn swap_storage(&mut self, storage: &'a mut [MaybeUninit<T>], live: bool) -> Result<(), Error> {
        if storage.len() < self.capacity {
            return Err(Error::StorageTooSmall);
        }
        debug_event!(len = self.len(), slots = storage.len(), live, "append buffer rebound");
        self.slots = Some(NonNull::from(storage).cast::<MaybeUninit<T>>());
        self.live = live;
        Ok(())
    }
}
