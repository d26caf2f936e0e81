// This file is part of bounded-append-buffer.
// SPDX-License-Identifier: MIT OR Apache-2.0

// Event macros forwarding to `tracing` when the `tracing` feature is on and
// expanding to nothing otherwise. Arguments are not evaluated when disabled.

#[cfg(feature = "tracing")]
macro_rules! trace_event {
    ($($arg:tt)*) => {
        tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_event {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "tracing")]
macro_rules! debug_event {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! debug_event {
    ($($arg:tt)*) => {};
}

pub(crate) use {debug_event, trace_event};
