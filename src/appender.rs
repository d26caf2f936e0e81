// This file is part of bounded-append-buffer.
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lock-free concurrent appends into an [`AppendBuffer`](crate::AppendBuffer).
//!
//! An [`Appender`] is a `Copy` handle created from an exclusive borrow of the
//! buffer and shared by every worker of the concurrent phase. Each append
//! performs one fetch-and-add on the size counter to reserve a slot, plus one
//! compensating fetch-and-subtract when the reservation landed past the end.
//! There are no loops and no retries, so every append completes in a bounded
//! number of steps regardless of contention.
//!
//! Slot assignment follows the order in which the counter increments are
//! linearized; nothing else about ordering is promised. No two successful
//! appends ever receive the same index, and once the phase is over the indices
//! handed out are exactly `0..len`.

// Crate imports
use crate::{counter::AtomicCount, error::Error, trace::trace_event};

// Core imports
use core::{fmt, marker::PhantomData, mem::MaybeUninit, ptr::NonNull, sync::atomic::AtomicUsize};

/// Shared handle for appending into an [`AppendBuffer`](crate::AppendBuffer)
/// from many threads at once.
///
/// Obtained with [`AppendBuffer::appender`](crate::AppendBuffer::appender). The
/// buffer stays mutably borrowed for as long as any copy of the handle is
/// alive, which is what keeps readers from observing half-written slots.
///
/// # Examples
///
/// ```rust
/// use bounded_append_buffer::{AppendBuffer, Error};
/// use core::mem::MaybeUninit;
///
/// let mut storage = [MaybeUninit::<u64>::uninit(); 1000];
/// let mut buf = AppendBuffer::new(&mut storage);
/// let appender = buf.appender();
///
/// let rejected: usize = std::thread::scope(|s| {
///     let workers: Vec<_> = (0..4u64)
///         .map(|w| {
///             s.spawn(move || {
///                 (0..300u64)
///                     .filter(|i| appender.try_append(w * 1000 + i) == Err(Error::Full))
///                     .count()
///             })
///         })
///         .collect();
///     workers.into_iter().map(|h| h.join().unwrap()).sum()
/// });
///
/// assert_eq!(rejected, 200);
/// assert_eq!(buf.len(), 1000);
/// ```
pub struct Appender<'b, T, C: AtomicCount = AtomicUsize> {
    slots: Option<NonNull<MaybeUninit<T>>>,
    capacity: usize,
    len: &'b C,
    live: bool,
    _slots: PhantomData<&'b mut [MaybeUninit<T>]>,
}

// SAFETY: an appender only ever moves `T` values into slots it reserved
// exclusively through the counter; it never reads or hands out references to
// stored elements. Sharing it is therefore sound whenever `T` may be sent to
// another thread.
unsafe impl<T: Send, C: AtomicCount> Send for Appender<'_, T, C> {}
// SAFETY: see above.
unsafe impl<T: Send, C: AtomicCount> Sync for Appender<'_, T, C> {}

impl<T, C: AtomicCount> Clone for Appender<'_, T, C> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T, C: AtomicCount> Copy for Appender<'_, T, C> {}

impl<'b, T, C: AtomicCount> Appender<'b, T, C> {
    pub(crate) fn new(
        slots: Option<NonNull<MaybeUninit<T>>>,
        capacity: usize,
        len: &'b C,
        live: bool,
    ) -> Self {
        Self {
            slots,
            capacity,
            len,
            live,
            _slots: PhantomData,
        }
    }

    /// Moves `value` into the next free slot and returns its index.
    ///
    /// On storage bound through
    /// [`from_init`](crate::AppendBuffer::from_init) the value is assigned into
    /// the slot and the previous occupant is dropped.
    ///
    /// Returns [`Error::Full`] if every slot is taken (the value is dropped) and
    /// [`Error::Unbound`] if the buffer has no storage.
    #[inline]
    pub fn try_append(&self, value: T) -> Result<usize, Error> {
        let slot = self.reserve()?;
        if self.live {
            // SAFETY: `reserve` returned a slot below `capacity` that no other
            // append can obtain until the buffer is cleared through `&mut`;
            // live storage holds an initialized `T` in every slot.
            drop(unsafe { slot.replace(value) });
        } else {
            // SAFETY: as above.
            unsafe { slot.write(value) };
        }
        Ok(slot.index)
    }

    /// Constructs an element in the next free slot and returns its index.
    ///
    /// `f` runs only after a slot has been reserved, so nothing is constructed
    /// when the buffer is full. The element is written over the slot without
    /// dropping whatever it held. Errors are the same as for
    /// [`try_append`](Appender::try_append).
    ///
    /// # Aborts
    ///
    /// If `f` panics the process aborts: the reserved slot can be neither
    /// filled nor handed back while other threads keep appending.
    #[inline]
    pub fn try_emplace<F>(&self, f: F) -> Result<usize, Error>
    where
        F: FnOnce() -> T,
    {
        let slot = self.reserve()?;
        let guard = AbortOnUnwind;
        let value = f();
        core::mem::forget(guard);
        // SAFETY: as in `try_append`.
        unsafe { slot.write(value) };
        Ok(slot.index)
    }

    /// Returns a snapshot of the size counter.
    ///
    /// While overflowing appends are in flight this may briefly exceed
    /// [`capacity`](Appender::capacity).
    #[inline]
    pub fn len(&self) -> usize {
        self.len.load()
    }

    /// Returns `true` if the counter snapshot is `0`.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if the counter snapshot has reached `capacity`.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.len() >= self.capacity
    }

    /// Returns the capacity of the underlying buffer.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn reserve(&self) -> Result<Slot<T>, Error> {
        let Some(base) = self.slots else {
            return Err(Error::Unbound);
        };
        let reserved = self.len.fetch_add(1);
        if reserved < self.capacity {
            return Ok(Slot {
                base,
                index: reserved,
            });
        }
        // Undo only our own reservation.
        self.len.fetch_sub(1);
        trace_event!(reserved, capacity = self.capacity, "append rejected: buffer full");
        Err(Error::Full)
    }
}

impl<T, C: AtomicCount> fmt::Debug for Appender<'_, T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Appender")
            .field("len", &self.len())
            .field("capacity", &self.capacity)
            .finish()
    }
}

/// A slot reserved by one append.
struct Slot<T> {
    base: NonNull<MaybeUninit<T>>,
    index: usize,
}

impl<T> Slot<T> {
    /// # Safety
    ///
    /// `index` must be below the capacity of the storage behind `base`, and the
    /// caller must hold the only reservation of that slot.
    #[inline]
    unsafe fn write(&self, value: T) {
        // SAFETY: guaranteed by the caller; distinct slots never alias, so the
        // write cannot race with any other append.
        unsafe { self.base.as_ptr().add(self.index).cast::<T>().write(value) }
    }

    /// Swaps `value` into the slot and returns its previous occupant.
    ///
    /// # Safety
    ///
    /// As for [`write`](Slot::write); in addition the slot must hold an
    /// initialized `T`.
    #[inline]
    unsafe fn replace(&self, value: T) -> T {
        // SAFETY: guaranteed by the caller.
        unsafe { self.base.as_ptr().add(self.index).cast::<T>().replace(value) }
    }
}

/// Turns an unwinding panic into an abort while alive.
struct AbortOnUnwind;

impl Drop for AbortOnUnwind {
    fn drop(&mut self) {
        // Only reached while unwinding; a second panic aborts.
        panic!("element constructor panicked after reserving a slot");
    }
}
