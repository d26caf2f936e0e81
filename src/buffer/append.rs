// This file is part of bounded-append-buffer.
// SPDX-License-Identifier: MIT OR Apache-2.0

// Crate imports
use crate::{
    appender::Appender, buffer::AppendBuffer, counter::AtomicCount, error::Error,
    trace::trace_event,
};

impl<T, C: AtomicCount> AppendBuffer<'_, T, C> {
    /// Returns a shared handle for appending from many threads.
    ///
    /// The buffer stays exclusively borrowed until every copy of the handle is
    /// gone; read it back afterwards.
    #[inline]
    pub fn appender(&mut self) -> Appender<'_, T, C> {
        Appender::new(self.slots, self.capacity, &self.len, self.live)
    }

    /// Appends `value` without atomic operations and returns its index.
    ///
    /// Assigns indices and reports [`Error::Full`] exactly like
    /// [`Appender::try_append`], for call sites that already hold the buffer
    /// exclusively. On storage bound through
    /// [`from_init`](AppendBuffer::from_init) the previous occupant of the slot
    /// is dropped.
    #[inline]
    pub fn push(&mut self, value: T) -> Result<usize, Error> {
        let assign = self.live;
        self.push_slot(|| value, assign)
    }

    /// Constructs an element in the next free slot without atomic operations
    /// and returns its index.
    ///
    /// `f` is not called when the buffer is full. If `f` panics the buffer is
    /// left unchanged. The slot is written without dropping whatever it held.
    #[inline]
    pub fn push_with<F>(&mut self, f: F) -> Result<usize, Error>
    where
        F: FnOnce() -> T,
    {
        self.push_slot(f, false)
    }

    fn push_slot<F>(&mut self, f: F, assign: bool) -> Result<usize, Error>
    where
        F: FnOnce() -> T,
    {
        let Some(base) = self.slots else {
            return Err(Error::Unbound);
        };
        let reserved = self.len.with_mut(|len| *len);
        if reserved >= self.capacity {
            trace_event!(reserved, capacity = self.capacity, "push rejected: buffer full");
            return Err(Error::Full);
        }
        let value = f();
        // SAFETY: `reserved < capacity <= storage.len()`, and `&mut self`
        // excludes every other access to the slot.
        let slot = unsafe { base.as_ptr().add(reserved).cast::<T>() };
        let previous = if assign {
            // SAFETY: `assign` is only set for storage whose slots all hold a
            // live `T`.
            Some(unsafe { slot.replace(value) })
        } else {
            // SAFETY: as above; the slot is treated as uninitialized.
            unsafe { slot.write(value) };
            None
        };
        // Bump `len` only once the slot is written; `f` may panic.
        self.len.with_mut(|len| *len = reserved + 1);
        drop(previous);
        Ok(reserved)
    }
}
