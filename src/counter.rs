// This file is part of bounded-append-buffer.
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The size-counter capability behind [`AppendBuffer`](crate::AppendBuffer).
//!
//! The buffer needs exactly one primitive from its execution domain: an
//! integer that supports an indivisible fetch-and-add and fetch-and-subtract
//! returning the previous value. Anything providing that (a CPU atomic, a
//! model-checker atomic, a device atomic wrapped by a downstream crate) can
//! back the buffer through [`AtomicCount`].
//!
//! Implementations shipped here:
//!
//! - [`AtomicUsize`] (the default),
//! - [`AtomicU32`], a 32-bit counter for code that mirrors device-side `int`
//!   counters,
//! - `loom::sync::atomic::AtomicUsize` when built with `--cfg loom`.

// Core imports
use core::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

/// An integer counter shared across a parallel execution domain.
///
/// All read-modify-write operations use the primitive's weakest ordering that
/// still guarantees atomicity. Index uniqueness only depends on the
/// modification order of this single location; publication of slot contents
/// is the job of whatever ends the concurrent phase (thread join, scope exit).
///
/// # Safety
///
/// Implementors must guarantee that:
///
/// - [`fetch_add`](AtomicCount::fetch_add) and
///   [`fetch_sub`](AtomicCount::fetch_sub) are single indivisible operations
///   returning the value immediately before the update, so that no two
///   concurrent `fetch_add` calls ever observe the same previous value unless
///   a matching `fetch_sub` happened in between;
/// - the counter does not wrap for any value up to
///   [`MAX_CAPACITY`](AtomicCount::MAX_CAPACITY) plus the number of
///   concurrently overflowing appenders;
/// - [`with_mut`](AtomicCount::with_mut) exposes the current value and stores
///   back whatever the closure leaves behind.
///
/// [`AppendBuffer`](crate::AppendBuffer) relies on these properties to hand out
/// exclusive slots; a faulty implementation leads to data races.
pub unsafe trait AtomicCount: Send + Sync {
    /// The largest capacity a buffer backed by this counter may be bound with.
    const MAX_CAPACITY: usize;

    /// Returns a counter holding `0`.
    fn new_zero() -> Self;

    /// Atomically adds `n`, returning the previous value.
    fn fetch_add(&self, n: usize) -> usize;

    /// Atomically subtracts `n`, returning the previous value.
    fn fetch_sub(&self, n: usize) -> usize;

    /// Reads the current value.
    fn load(&self) -> usize;

    /// Runs `f` with plain, non-atomic access to the value.
    fn with_mut<R>(&mut self, f: impl FnOnce(&mut usize) -> R) -> R;
}

unsafe impl AtomicCount for AtomicUsize {
    const MAX_CAPACITY: usize = isize::MAX as usize;

    #[inline]
    fn new_zero() -> Self {
        AtomicUsize::new(0)
    }

    #[inline]
    fn fetch_add(&self, n: usize) -> usize {
        AtomicUsize::fetch_add(self, n, Ordering::Relaxed)
    }

    #[inline]
    fn fetch_sub(&self, n: usize) -> usize {
        AtomicUsize::fetch_sub(self, n, Ordering::Relaxed)
    }

    #[inline]
    fn load(&self) -> usize {
        AtomicUsize::load(self, Ordering::Relaxed)
    }

    #[inline]
    fn with_mut<R>(&mut self, f: impl FnOnce(&mut usize) -> R) -> R {
        f(self.get_mut())
    }
}

unsafe impl AtomicCount for AtomicU32 {
    // Half the range is left as headroom for overflowing bursts.
    const MAX_CAPACITY: usize = (u32::MAX / 2) as usize;

    #[inline]
    fn new_zero() -> Self {
        AtomicU32::new(0)
    }

    #[inline]
    fn fetch_add(&self, n: usize) -> usize {
        AtomicU32::fetch_add(self, n as u32, Ordering::Relaxed) as usize
    }

    #[inline]
    fn fetch_sub(&self, n: usize) -> usize {
        AtomicU32::fetch_sub(self, n as u32, Ordering::Relaxed) as usize
    }

    #[inline]
    fn load(&self) -> usize {
        AtomicU32::load(self, Ordering::Relaxed) as usize
    }

    #[inline]
    fn with_mut<R>(&mut self, f: impl FnOnce(&mut usize) -> R) -> R {
        let slot = self.get_mut();
        let mut value = *slot as usize;
        let out = f(&mut value);
        debug_assert!(value <= u32::MAX as usize);
        *slot = value as u32;
        out
    }
}

#[cfg(loom)]
unsafe impl AtomicCount for loom::sync::atomic::AtomicUsize {
    const MAX_CAPACITY: usize = isize::MAX as usize;

    fn new_zero() -> Self {
        loom::sync::atomic::AtomicUsize::new(0)
    }

    fn fetch_add(&self, n: usize) -> usize {
        loom::sync::atomic::AtomicUsize::fetch_add(self, n, Ordering::Relaxed)
    }

    fn fetch_sub(&self, n: usize) -> usize {
        loom::sync::atomic::AtomicUsize::fetch_sub(self, n, Ordering::Relaxed)
    }

    fn load(&self) -> usize {
        loom::sync::atomic::AtomicUsize::load(self, Ordering::Relaxed)
    }

    fn with_mut<R>(&mut self, f: impl FnOnce(&mut usize) -> R) -> R {
        loom::sync::atomic::AtomicUsize::with_mut(self, f)
    }
}
