// This file is part of bounded-append-buffer.
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The `AppendBuffer` type and its inherent API.
//!
//! `AppendBuffer<'a, T, C>` is a fixed-capacity vector over storage it does not
//! own. The caller hands it a slice of slots for the lifetime `'a`; the buffer
//! tracks how many of the leading slots hold live elements and never allocates
//! or frees. The only values it drops are the previous occupants replaced by an
//! append into storage bound with `from_init`.
//!
//! Mutation comes in two phases:
//!
//! - a **concurrent phase**, driven through an [`Appender`](crate::Appender)
//!   obtained with [`AppendBuffer::appender`], where any number of threads append
//!   through a shared handle;
//! - an **exclusive phase**, through `&mut AppendBuffer`, for unchecked appends
//!   and the administrative operations (`clear`, `truncate`, `force_resize`,
//!   `bind`, `rebind`).
//!
//! Reads go through `&AppendBuffer` and are only possible once every appender
//! borrow has ended, so readers always see `len <= capacity` and fully written
//! slots.

mod admin;
mod append;
mod bind;
mod slice;

// Crate imports
use crate::{counter::AtomicCount, error::Error};

// Core imports
use core::{
    fmt,
    hash::{Hash, Hasher},
    marker::PhantomData,
    mem::MaybeUninit,
    ptr::NonNull,
    sync::atomic::AtomicUsize,
};

/// A fixed-capacity append buffer over caller-owned storage.
///
/// `AppendBuffer` borrows a contiguous block of `capacity` slots and keeps a
/// logical length `len` in a counter of type `C` (see [`AtomicCount`]).
/// Appends claim the next slot with a single fetch-and-add on that counter, so
/// many threads can append at once without locks; an append that lands past
/// the end undoes its own reservation and reports [`Error::Full`].
///
/// # Layout and invariants
///
/// - `capacity` is fixed when the buffer is bound.
/// - `0 <= len <= capacity` whenever the buffer itself can be borrowed. Inside a
///   burst of overflowing concurrent appends the raw counter may briefly exceed
///   `capacity`; that state is only observable through
///   [`Appender::len`](crate::Appender::len).
/// - Slots `[0, len)` hold initialized `T` values; slots `[len, capacity)` are
///   unspecified.
/// - [`clear`](AppendBuffer::clear) and [`truncate`](AppendBuffer::truncate)
///   forget elements rather than dropping them; ownership of whatever is left
///   in the storage returns to the caller together with the storage.
/// - Storage bound through [`from_init`](AppendBuffer::from_init) or
///   [`rebind_init`](AppendBuffer::rebind_init) holds a live `T` in every slot.
///   Appending a value there replaces the previous occupant and drops it;
///   emplacing constructs over it without dropping.
///
/// # Binding
///
/// A buffer is usable once it is bound to storage:
///
/// - [`AppendBuffer::new`] binds to a `&mut [MaybeUninit<T>]`, taking its
///   length as capacity;
/// - [`AppendBuffer::with_capacity`] binds with an explicit capacity no larger
///   than the storage;
/// - [`AppendBuffer::from_init`] binds to storage whose slots already hold live
///   values;
/// - [`AppendBuffer::unbound`] / [`Default`] produce a buffer with no storage,
///   which rejects appends and element access with [`Error::Unbound`].
///
/// # Examples
///
/// ```rust
/// use bounded_append_buffer::{AppendBuffer, Error};
/// use core::mem::MaybeUninit;
///
/// let mut storage = [MaybeUninit::<u32>::uninit(); 4];
/// let mut buf = AppendBuffer::new(&mut storage);
///
/// let appender = buf.appender();
/// std::thread::scope(|s| {
///     for worker in 0..3u32 {
///         s.spawn(move || {
///             for i in 0..2 {
///                 let _ = appender.try_append(worker * 10 + i);
///             }
///         });
///     }
/// });
///
/// assert_eq!(buf.len(), 4);
/// assert!(buf.is_full());
/// assert_eq!(buf.push(99), Err(Error::Full));
/// ```
pub struct AppendBuffer<'a, T, C: AtomicCount = AtomicUsize> {
    pub(crate) slots: Option<NonNull<MaybeUninit<T>>>,
    pub(crate) capacity: usize,
    pub(crate) len: C,
    /// Every slot of the storage holds a live `T`.
    pub(crate) live: bool,
    pub(crate) _storage: PhantomData<&'a mut [MaybeUninit<T>]>,
}

// SAFETY: the buffer behaves like `&'a mut [T]` plus a counter: moving it to
// another thread moves exclusive access to the stored elements along with it.
unsafe impl<T: Send, C: AtomicCount> Send for AppendBuffer<'_, T, C> {}

// SAFETY: through `&AppendBuffer` the stored elements can only be read; every
// write path requires `&mut AppendBuffer` (appends go through an `Appender`,
// which is created from an exclusive borrow).
unsafe impl<T: Sync, C: AtomicCount> Sync for AppendBuffer<'_, T, C> {}

impl<T, C: AtomicCount> AppendBuffer<'_, T, C> {
    /// Returns the fixed capacity of this buffer (`0` when unbound).
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the current logical length (`0..=capacity`).
    #[inline]
    pub fn len(&self) -> usize {
        self.len.load()
    }

    /// Returns `true` if `len == 0`.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if `len == capacity`.
    ///
    /// An unbound buffer has capacity `0` and is therefore both empty and full.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.len() == self.capacity
    }

    /// Returns `capacity - len`, the number of appends that can still succeed.
    #[inline]
    pub fn remaining_capacity(&self) -> usize {
        self.capacity - self.len()
    }

    /// Returns `true` if the buffer is bound to storage.
    #[inline]
    pub fn is_bound(&self) -> bool {
        self.slots.is_some()
    }

    /// Returns the element at `index`.
    ///
    /// Fails with [`Error::Unbound`] on an unbound buffer and with
    /// [`Error::OutOfBounds`] when `index >= len`.
    #[inline]
    pub fn get(&self, index: usize) -> Result<&T, Error> {
        if !self.is_bound() {
            return Err(Error::Unbound);
        }
        self.as_slice().get(index).ok_or(Error::OutOfBounds)
    }

    /// Mutable counterpart of [`get`](AppendBuffer::get).
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Result<&mut T, Error> {
        if !self.is_bound() {
            return Err(Error::Unbound);
        }
        self.as_mut_slice().get_mut(index).ok_or(Error::OutOfBounds)
    }

    /// Returns the first element, if any.
    #[inline]
    pub fn first(&self) -> Option<&T> {
        self.as_slice().first()
    }

    /// Returns the element at `len - 1`.
    ///
    /// Fails with [`Error::Empty`] on an empty buffer and with
    /// [`Error::Unbound`] on an unbound one.
    #[inline]
    pub fn last(&self) -> Result<&T, Error> {
        if !self.is_bound() {
            return Err(Error::Unbound);
        }
        self.as_slice().last().ok_or(Error::Empty)
    }

    /// Mutable counterpart of [`last`](AppendBuffer::last).
    #[inline]
    pub fn last_mut(&mut self) -> Result<&mut T, Error> {
        if !self.is_bound() {
            return Err(Error::Unbound);
        }
        self.as_mut_slice().last_mut().ok_or(Error::Empty)
    }

    // iterators
    /// Shorthand for `self.as_slice().iter()`.
    #[inline]
    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    /// Shorthand for `self.as_mut_slice().iter_mut()`.
    #[inline]
    pub fn iter_mut(&mut self) -> core::slice::IterMut<'_, T> {
        self.as_mut_slice().iter_mut()
    }

    /// Returns `true` if the initialized prefix contains `x`.
    #[inline]
    pub fn contains(&self, x: &T) -> bool
    where
        T: PartialEq,
    {
        self.as_slice().contains(x)
    }
}

impl<T, C: AtomicCount> Default for AppendBuffer<'_, T, C> {
    /// An unbound buffer; see [`AppendBuffer::unbound`].
    fn default() -> Self {
        Self {
            slots: None,
            capacity: 0,
            len: C::new_zero(),
            live: false,
            _storage: PhantomData,
        }
    }
}

impl<T: fmt::Debug, C: AtomicCount> fmt::Debug for AppendBuffer<'_, T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppendBuffer")
            .field("len", &self.len())
            .field("capacity", &self.capacity)
            .field("elements", &self.as_slice())
            .finish()
    }
}

impl<T, U, C, D> PartialEq<AppendBuffer<'_, U, D>> for AppendBuffer<'_, T, C>
where
    T: PartialEq<U>,
    C: AtomicCount,
    D: AtomicCount,
{
    fn eq(&self, other: &AppendBuffer<'_, U, D>) -> bool {
        self.as_slice() == other.as_slice()
    }
}
impl<T: Eq, C: AtomicCount> Eq for AppendBuffer<'_, T, C> {}

impl<T, U, C> PartialEq<[U]> for AppendBuffer<'_, T, C>
where
    T: PartialEq<U>,
    C: AtomicCount,
{
    fn eq(&self, other: &[U]) -> bool {
        self.as_slice() == other
    }
}

impl<T, U, C, const M: usize> PartialEq<[U; M]> for AppendBuffer<'_, T, C>
where
    T: PartialEq<U>,
    C: AtomicCount,
{
    fn eq(&self, other: &[U; M]) -> bool {
        self.as_slice() == other
    }
}

impl<T: Hash, C: AtomicCount> Hash for AppendBuffer<'_, T, C> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state)
    }
}

impl<T, C: AtomicCount> AsRef<[T]> for AppendBuffer<'_, T, C> {
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}
impl<T, C: AtomicCount> AsMut<[T]> for AppendBuffer<'_, T, C> {
    fn as_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}
