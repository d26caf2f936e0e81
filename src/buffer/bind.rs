// This file is part of bounded-append-buffer.
// SPDX-License-Identifier: MIT OR Apache-2.0

// Crate imports
use crate::{buffer::AppendBuffer, counter::AtomicCount, error::Error, trace::debug_event};

// Core imports
use core::{mem::MaybeUninit, ptr::NonNull, sync::atomic::AtomicUsize};

impl<'a, T> AppendBuffer<'a, T> {
    /// Constructs a buffer with no storage.
    ///
    /// Appends and element access fail with [`Error::Unbound`] until
    /// [`bind`](AppendBuffer::bind) is called. Buffers backed by another
    /// counter start from [`Default::default`].
    pub fn unbound() -> Self {
        Self::default()
    }

    /// Binds a buffer to `storage`, using its length as capacity.
    ///
    /// Capacity is capped at the [`MAX_CAPACITY`](AtomicCount::MAX_CAPACITY)
    /// of `AtomicUsize`. Only storage of zero-sized elements can be longer
    /// than that; the slots past the cap are never used.
    pub fn new(storage: &'a mut [MaybeUninit<T>]) -> Self {
        let capacity = storage.len().min(<AtomicUsize as AtomicCount>::MAX_CAPACITY);
        let mut buf = Self::unbound();
        buf.attach(capacity, storage, false);
        buf
    }

    /// Binds a buffer to the first `capacity` slots of `storage`.
    ///
    /// Returns [`Error::StorageTooSmall`] if `storage` holds fewer than
    /// `capacity` slots and [`Error::CapacityOverflow`] if `capacity` exceeds
    /// the counter's [`MAX_CAPACITY`](AtomicCount::MAX_CAPACITY).
    pub fn with_capacity(
        capacity: usize,
        storage: &'a mut [MaybeUninit<T>],
    ) -> Result<Self, Error> {
        let mut buf = Self::unbound();
        buf.bind(capacity, storage)?;
        Ok(buf)
    }

    /// Binds a buffer to storage whose slots already hold live values.
    ///
    /// Capacity is `storage.len()`, capped as in [`new`](AppendBuffer::new).
    /// [`push`](AppendBuffer::push) and
    /// [`Appender::try_append`](crate::Appender::try_append) assign into the
    /// slot and drop its previous occupant.
    /// [`push_with`](AppendBuffer::push_with) and
    /// [`Appender::try_emplace`](crate::Appender::try_emplace) construct over
    /// it without dropping. Either way every slot of `storage` still holds a
    /// valid `T` when the buffer goes away.
    pub fn from_init(storage: &'a mut [T]) -> Self {
        let storage = as_uninit_slots(storage);
        let capacity = storage.len().min(<AtomicUsize as AtomicCount>::MAX_CAPACITY);
        let mut buf = Self::unbound();
        buf.attach(capacity, storage, true);
        buf
    }
}

impl<'a, T, C: AtomicCount> AppendBuffer<'a, T, C> {
    /// Re-binds this buffer to the first `capacity` slots of `storage` and
    /// resets `len` to `0`.
    ///
    /// `storage` is treated as uninitialized. Elements in the previous storage
    /// are forgotten, not dropped. On error the buffer is left unchanged.
    ///
    /// Returns [`Error::CapacityOverflow`] if `capacity` exceeds
    /// [`C::MAX_CAPACITY`](AtomicCount::MAX_CAPACITY) and
    /// [`Error::StorageTooSmall`] if `storage` is shorter than `capacity`.
    pub fn bind(
        &mut self,
        capacity: usize,
        storage: &'a mut [MaybeUninit<T>],
    ) -> Result<(), Error> {
        if capacity > C::MAX_CAPACITY {
            return Err(Error::CapacityOverflow);
        }
        if storage.len() < capacity {
            return Err(Error::StorageTooSmall);
        }
        self.attach(capacity, storage, false);
        Ok(())
    }

    /// Points the buffer at `storage` and resets `len`. Callers have checked
    /// `capacity` against the counter range and the storage length.
    fn attach(&mut self, capacity: usize, storage: &'a mut [MaybeUninit<T>], live: bool) {
        debug_event!(capacity, slots = storage.len(), live, "append buffer bound");
        self.slots = Some(NonNull::from(storage).cast::<MaybeUninit<T>>());
        self.capacity = capacity;
        self.live = live;
        self.len.with_mut(|len| *len = 0);
    }
}

/// Views fully initialized storage as slots.
///
/// The returned slice must only ever receive initialized values.
pub(crate) fn as_uninit_slots<T>(storage: &mut [T]) -> &mut [MaybeUninit<T>] {
    // SAFETY: `MaybeUninit<T>` has the same layout as `T`. Every write path of
    // `AppendBuffer` stores an initialized value, so the owner of `storage`
    // still finds valid `T`s in every slot afterwards.
    unsafe {
        core::slice::from_raw_parts_mut(
            storage.as_mut_ptr().cast::<MaybeUninit<T>>(),
            storage.len(),
        )
    }
}

#[cfg(test)]
mod tests {
    // Imports
    use crate::{AppendBuffer, Error};
    use alloc::vec::Vec;
    use core::{mem::MaybeUninit, sync::atomic::AtomicU32};

    #[test]
    fn test_with_capacity_uses_prefix_of_storage() {
        let mut storage = [MaybeUninit::<u8>::uninit(); 8];
        let mut buf = AppendBuffer::with_capacity(2, &mut storage).unwrap();
        assert_eq!(buf.capacity(), 2);
        buf.push(1).unwrap();
        buf.push(2).unwrap();
        assert_eq!(buf.push(3), Err(Error::Full));
    }

    #[test]
    fn test_with_capacity_rejects_short_storage() {
        let mut storage = [MaybeUninit::<u8>::uninit(); 2];
        let err = AppendBuffer::with_capacity(3, &mut storage).unwrap_err();
        assert_eq!(err, Error::StorageTooSmall);
    }

    #[test]
    fn test_capacity_beyond_counter_range() {
        let mut storage: [MaybeUninit<()>; 0] = [];
        let mut buf = AppendBuffer::<'_, (), AtomicU32>::default();
        assert_eq!(buf.bind(usize::MAX, &mut storage), Err(Error::CapacityOverflow));
        assert!(!buf.is_bound());
    }

    #[test]
    fn test_bind_unbound_buffer_and_rebind_resets_len() {
        let mut first = [MaybeUninit::<i32>::uninit(); 2];
        let mut second = [MaybeUninit::<i32>::uninit(); 3];

        let mut buf = AppendBuffer::unbound();
        assert_eq!(buf.push(1), Err(Error::Unbound));

        buf.bind(2, &mut first).unwrap();
        buf.push(1).unwrap();
        assert_eq!(buf.len(), 1);

        assert_eq!(buf.bind(4, &mut second), Err(Error::StorageTooSmall));
        assert_eq!(buf.capacity(), 2);
        assert_eq!(buf.len(), 1);
    }

    #[test]
    fn test_bind_switches_storage() {
        let mut first = [MaybeUninit::<i32>::uninit(); 2];
        let mut second = [MaybeUninit::<i32>::uninit(); 3];
        let mut buf = AppendBuffer::new(&mut first);
        buf.push(1).unwrap();
        buf.bind(3, &mut second).unwrap();
        assert!(buf.is_empty());
        assert_eq!(buf.capacity(), 3);
        assert_eq!(buf.push(5), Ok(0));
        assert_eq!(buf, [5]);
    }

    #[test]
    fn test_new_caps_zero_sized_storage_at_counter_range() {
        let mut backing: Vec<()> = Vec::new();
        let slots = backing.spare_capacity_mut();
        assert_eq!(slots.len(), usize::MAX);
        let mut buf = AppendBuffer::new(slots);
        assert_eq!(buf.capacity(), isize::MAX as usize);
        assert_eq!(buf.push(()), Ok(0));
        assert_eq!(buf.appender().try_append(()), Ok(1));
        assert_eq!(buf.len(), 2);
    }

    #[test]
    fn test_from_init_keeps_storage_valid() {
        let mut storage = [0u16; 4];
        {
            let mut buf = AppendBuffer::from_init(&mut storage);
            assert!(buf.is_empty());
            assert_eq!(buf.capacity(), 4);
            let appender = buf.appender();
            appender.try_append(7).unwrap();
            appender.try_append(8).unwrap();
            assert_eq!(buf, [7, 8]);
        }
        assert_eq!(storage, [7, 8, 0, 0]);
    }
}
