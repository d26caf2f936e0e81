// This file is part of bounded-append-buffer.
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # `bounded-append-buffer`
//!
//! A `no_std`, fixed-capacity append buffer that lives in storage owned by the
//! caller and accepts **lock-free appends from many threads at once**.
//!
//! The core type, [`AppendBuffer<'a, T, C>`], borrows a block of `capacity`
//! slots for the lifetime `'a` and tracks a logical length `len ∈ 0..=capacity`
//! in a single counter. Growing the buffer is one atomic fetch-and-add on that
//! counter: the previous value is the slot the caller now owns exclusively. An
//! append that lands past the end undoes its own increment and reports
//! [`Error::Full`] instead of blocking, retrying, or reallocating.
//!
//! ## When to use this crate
//!
//! - Many workers produce a variable number of results each and you can bound
//!   the total up front.
//! - The result memory is allocated elsewhere (a pinned host buffer, a
//!   pre-sized `Vec`, a memory-mapped region) and must not be reallocated.
//! - Dropping overflowing results and counting them is acceptable; capacity
//!   can be raised on the next pass.
//!
//! ## Phases
//!
//! - **Concurrent**: [`AppendBuffer::appender`] hands out an [`Appender`], a
//!   `Copy + Send + Sync` handle whose [`try_append`](Appender::try_append) and
//!   [`try_emplace`](Appender::try_emplace) may be called from any number of
//!   threads.
//! - **Exclusive**: through `&mut AppendBuffer`, [`push`](AppendBuffer::push)
//!   appends without atomic operations, and [`clear`](AppendBuffer::clear),
//!   [`truncate`](AppendBuffer::truncate),
//!   [`force_resize`](AppendBuffer::force_resize),
//!   [`bind`](AppendBuffer::bind) and [`rebind`](AppendBuffer::rebind)
//!   administer the buffer.
//! - **Read**: once every appender borrow has ended, `&AppendBuffer` exposes
//!   the initialized prefix through [`as_slice`](AppendBuffer::as_slice),
//!   indexing, iteration and [`get`](AppendBuffer::get).
//!
//! The borrow checker enforces the phase boundaries: an appender keeps the
//! buffer mutably borrowed, so neither reads nor administrative calls can
//! overlap with in-flight appends.
//!
//! ## Counter backends
//!
//! The counter type `C` implements [`AtomicCount`]. [`AtomicUsize`] is the
//! default; [`AtomicU32`] mirrors 32-bit device counters; building with
//! `--cfg loom` adds loom's atomic for model checking. Downstream crates can
//! implement the trait for the atomics of their own execution domain.
//!
//! [`AtomicUsize`]: core::sync::atomic::AtomicUsize
//! [`AtomicU32`]: core::sync::atomic::AtomicU32
//!
//! ## Features
//!
//! - `serde`
//!   - `Serialize` for `AppendBuffer<'_, T, C>` (the initialized prefix as a
//!     sequence).
//!   - `&mut AppendBuffer` implements `DeserializeSeed`, appending a sequence
//!     into bound storage.
//!
//! - `tracing`
//!   - `trace` events for rejected appends, `debug` events for bind, rebind,
//!     clear and force-resize.
//!
//! ## Error behavior
//!
//! - Appends fail only with [`Error::Full`] (or [`Error::Unbound`] before the
//!   buffer is bound). Nothing is retried internally.
//! - Checked accessors return [`Error::OutOfBounds`], [`Error::Empty`] or
//!   [`Error::Unbound`].
//! - Indexing (`buf[i]`, `buf[a..b]`) panics on out-of-bounds like slices.
//!
//! ## Example
//!
//! ```rust
//! use bounded_append_buffer::{AppendBuffer, Error};
//! use core::mem::MaybeUninit;
//!
//! let mut storage = [MaybeUninit::<&str>::uninit(); 4];
//! let mut buf = AppendBuffer::new(&mut storage);
//!
//! let appender = buf.appender();
//! assert_eq!(appender.try_append("a"), Ok(0));
//! assert_eq!(appender.try_append("b"), Ok(1));
//! assert_eq!(appender.try_append("c"), Ok(2));
//! assert_eq!(appender.try_append("d"), Ok(3));
//! assert_eq!(appender.try_append("e"), Err(Error::Full));
//!
//! assert!(buf.is_full());
//! assert_eq!(buf.as_slice(), &["a", "b", "c", "d"]);
//! ```

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_op_in_unsafe_fn)]

#[cfg(test)]
extern crate alloc;

// Modules
mod appender;
mod buffer;
mod counter;
mod error;
mod index;
mod iter;
#[cfg(feature = "serde")]
mod serde;
mod trace;

// Public exports (crate API surface)
pub use appender::Appender;
pub use buffer::AppendBuffer;
pub use counter::AtomicCount;
pub use error::Error;
