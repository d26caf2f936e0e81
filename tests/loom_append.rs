// This file is part of bounded-append-buffer.
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Loom models of the concurrent append protocol.
//!
//! Run with `RUSTFLAGS="--cfg loom" cargo test --test loom_append --release`.

#![cfg(loom)]

use bounded_append_buffer::{AppendBuffer, Appender, Error};
use loom::{model, sync::atomic::AtomicUsize, thread};
use std::mem::MaybeUninit;

type LoomAppender = Appender<'static, usize, AtomicUsize>;

/// Leaks a fresh buffer of `capacity` slots and returns its appender.
///
/// Loom threads need `'static` captures; each model iteration leaks a few
/// bytes, which is fine for a test.
fn leaked_appender(capacity: usize) -> LoomAppender {
    let storage: &'static mut [MaybeUninit<usize>] =
        Box::leak((0..capacity).map(|_| MaybeUninit::uninit()).collect());
    let buf: &'static mut AppendBuffer<'static, usize, AtomicUsize> =
        Box::leak(Box::new(AppendBuffer::default()));
    buf.bind(capacity, storage).unwrap();
    buf.appender()
}

fn run(capacity: usize, threads: usize) {
    model(move || {
        let appender = leaked_appender(capacity);

        let handles: Vec<_> = (0..threads)
            .map(|t| thread::spawn(move || appender.try_append(t)))
            .collect();
        let outcomes: Vec<Result<usize, Error>> =
            handles.into_iter().map(|h| h.join().unwrap()).collect();

        let expected = threads.min(capacity);
        let mut indices: Vec<usize> = outcomes.iter().filter_map(|r| r.ok()).collect();
        indices.sort_unstable();
        assert_eq!(indices, (0..expected).collect::<Vec<_>>());
        assert_eq!(
            outcomes.iter().filter(|r| **r == Err(Error::Full)).count(),
            threads - expected
        );
        assert_eq!(appender.len(), expected);
    });
}

#[test]
fn two_threads_one_slot() {
    run(1, 2);
}

#[test]
fn three_threads_two_slots() {
    run(2, 3);
}

#[test]
fn two_threads_enough_room() {
    run(2, 2);
}

#[test]
fn overflow_observer_sees_bounded_overshoot() {
    // While two appenders overflow a full buffer, a third observer may see the
    // counter above capacity, but never by more than the number of racers.
    model(|| {
        let appender = leaked_appender(1);
        assert_eq!(appender.try_append(0), Ok(0));

        let racers: Vec<_> = (0..2)
            .map(|t| thread::spawn(move || appender.try_append(t + 1)))
            .collect();
        let observed = appender.len();
        assert!((1..=3).contains(&observed));

        for h in racers {
            assert_eq!(h.join().unwrap(), Err(Error::Full));
        }
        assert_eq!(appender.len(), 1);
    });
}
