// This file is part of bounded-append-buffer.
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for [`AppendBuffer`](crate::AppendBuffer).
//!
//! [`Error::Full`] is the only condition the append path can produce; the
//! remaining variants are checked precondition violations on binding and
//! element access. All of them are `Copy` and implement `core::error::Error`.

// Core imports
use core::{error::Error as CoreError, fmt};

/// Errors returned by operations on [`AppendBuffer`](crate::AppendBuffer) and
/// [`Appender`](crate::Appender).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Error {
    /// The append was rejected because every slot up to `capacity` is taken.
    Full,
    /// The buffer has not been bound to any storage yet.
    Unbound,
    /// An index was outside the current logical bounds (`len` or `capacity`).
    OutOfBounds,
    /// The operation needs at least one element.
    Empty,
    /// The supplied storage holds fewer slots than the requested capacity.
    StorageTooSmall,
    /// The requested capacity exceeds what the size counter can represent.
    CapacityOverflow,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full => f.write_str("capacity exceeded"),
            Self::Unbound => f.write_str("buffer is not bound to storage"),
            Self::OutOfBounds => f.write_str("index out of bounds"),
            Self::Empty => f.write_str("buffer is empty"),
            Self::StorageTooSmall => f.write_str("storage smaller than capacity"),
            Self::CapacityOverflow => f.write_str("capacity exceeds counter range"),
        }
    }
}

impl CoreError for Error {}
