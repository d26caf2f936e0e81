// This file is part of bounded-append-buffer.
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Iterator support for [`AppendBuffer`](crate::AppendBuffer).
//!
//! - `&AppendBuffer` and `&mut AppendBuffer` iterate as slices over `[0, len)`.
//! - `AppendBuffer` by value yields `&'a mut T` for the whole storage lifetime,
//!   the iterator form of [`into_slice`](crate::AppendBuffer::into_slice).
//!
//! There is no owning iterator: the buffer does not own its elements.

// Crate imports
use crate::{buffer::AppendBuffer, counter::AtomicCount};

impl<'b, T, C: AtomicCount> IntoIterator for &'b AppendBuffer<'_, T, C> {
    type Item = &'b T;
    type IntoIter = core::slice::Iter<'b, T>;
    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl<'b, T, C: AtomicCount> IntoIterator for &'b mut AppendBuffer<'_, T, C> {
    type Item = &'b mut T;
    type IntoIter = core::slice::IterMut<'b, T>;
    fn into_iter(self) -> Self::IntoIter {
        self.as_mut_slice().iter_mut()
    }
}

impl<'a, T, C: AtomicCount> IntoIterator for AppendBuffer<'a, T, C> {
    type Item = &'a mut T;
    type IntoIter = core::slice::IterMut<'a, T>;
    fn into_iter(self) -> Self::IntoIter {
        self.into_slice().iter_mut()
    }
}

#[cfg(test)]
mod tests {
    // Imports
    use crate::AppendBuffer;
    use alloc::vec::Vec;
    use core::mem::MaybeUninit;

    #[test]
    fn test_borrowed_iteration_in_order() {
        let mut storage = [MaybeUninit::<i32>::uninit(); 4];
        let mut buf = AppendBuffer::new(&mut storage);
        for x in [10, 20, 30] {
            buf.push(x).unwrap();
        }

        let mut seen = Vec::new();
        for x in &buf {
            seen.push(*x);
        }
        assert_eq!(seen, [10, 20, 30]);

        for x in &mut buf {
            *x += 1;
        }
        assert_eq!(buf.iter().rev().copied().collect::<Vec<_>>(), [31, 21, 11]);
        assert_eq!(buf.iter().len(), 3);
    }

    #[test]
    fn test_by_value_iteration_outlives_buffer() {
        let mut storage = [MaybeUninit::<u8>::uninit(); 3];
        let refs: Vec<&mut u8> = {
            let mut buf = AppendBuffer::new(&mut storage);
            buf.push(1).unwrap();
            buf.push(2).unwrap();
            buf.into_iter().collect()
        };
        assert_eq!(refs.len(), 2);
        for r in refs {
            *r *= 10;
        }
        // SAFETY: the first two slots were written by the buffer.
        let first_two = unsafe { [storage[0].assume_init(), storage[1].assume_init()] };
        assert_eq!(first_two, [10, 20]);
    }

    #[test]
    fn test_iteration_sees_only_prefix() {
        let mut storage = [MaybeUninit::<u8>::uninit(); 8];
        let mut buf = AppendBuffer::new(&mut storage);
        buf.push(1).unwrap();
        assert_eq!(buf.iter().count(), 1);
        buf.clear();
        assert_eq!((&buf).into_iter().next(), None);
    }
}
