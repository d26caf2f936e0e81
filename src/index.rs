// This file is part of bounded-append-buffer.
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Indexing support for [`AppendBuffer`](crate::AppendBuffer).
//!
//! `Index`/`IndexMut` accept anything a slice accepts and behave like slices:
//! they panic on out-of-bounds or inverted ranges, and they only see the
//! initialized prefix `[0, len)`. Use [`get`](crate::AppendBuffer::get) for a
//! checked alternative.

// Crate imports
use crate::{buffer::AppendBuffer, counter::AtomicCount};

// Core imports
use core::{
    ops::{Index, IndexMut},
    slice::SliceIndex,
};

impl<T, C: AtomicCount, I: SliceIndex<[T]>> Index<I> for AppendBuffer<'_, T, C> {
    type Output = I::Output;
    fn index(&self, index: I) -> &Self::Output {
        &self.as_slice()[index]
    }
}

impl<T, C: AtomicCount, I: SliceIndex<[T]>> IndexMut<I> for AppendBuffer<'_, T, C> {
    fn index_mut(&mut self, index: I) -> &mut Self::Output {
        &mut self.as_mut_slice()[index]
    }
}
