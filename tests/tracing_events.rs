// This file is part of bounded-append-buffer.
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Structured events emitted with the `tracing` feature.
//!
//! Run with `cargo test --features tracing --test tracing_events`.

#![cfg(feature = "tracing")]

use bounded_append_buffer::{AppendBuffer, Error};
use std::{
    collections::BTreeMap,
    fmt,
    mem::MaybeUninit,
    sync::{Arc, Mutex},
};
use tracing::{
    field::{Field, Visit},
    Event, Level, Subscriber,
};
use tracing_subscriber::{
    layer::{Context, SubscriberExt},
    Layer, Registry,
};

#[derive(Debug)]
struct Recorded {
    level: Level,
    message: String,
    fields: BTreeMap<&'static str, String>,
}

/// Layer that keeps every event it sees.
#[derive(Clone, Default)]
struct Recorder(Arc<Mutex<Vec<Recorded>>>);

#[derive(Default)]
struct FieldMap {
    message: String,
    fields: BTreeMap<&'static str, String>,
}

impl Visit for FieldMap {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.fields.insert(field.name(), format!("{value:?}"));
        }
    }
}

impl<S: Subscriber> Layer<S> for Recorder {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut map = FieldMap::default();
        event.record(&mut map);
        self.0.lock().unwrap().push(Recorded {
            level: *event.metadata().level(),
            message: map.message,
            fields: map.fields,
        });
    }
}

/// Runs `f` with a recording subscriber installed on this thread.
fn record(f: impl FnOnce()) -> Vec<Recorded> {
    let recorder = Recorder::default();
    tracing::subscriber::with_default(Registry::default().with(recorder.clone()), f);
    let events = std::mem::take(&mut *recorder.0.lock().unwrap());
    events
}

fn find<'e>(events: &'e [Recorded], message: &str) -> &'e Recorded {
    events
        .iter()
        .find(|e| e.message == message)
        .unwrap_or_else(|| panic!("no `{message}` event in {events:?}"))
}

#[test]
fn rejected_append_emits_trace_event() {
    let mut storage = [MaybeUninit::<u8>::uninit(); 1];
    let events = record(|| {
        let mut buf = AppendBuffer::new(&mut storage);
        let appender = buf.appender();
        assert_eq!(appender.try_append(1), Ok(0));
        assert_eq!(appender.try_append(2), Err(Error::Full));
    });

    let rejected = find(&events, "append rejected: buffer full");
    assert_eq!(rejected.level, Level::TRACE);
    assert_eq!(rejected.fields["reserved"], "1");
    assert_eq!(rejected.fields["capacity"], "1");
    assert_eq!(
        events.iter().filter(|e| e.level == Level::TRACE).count(),
        1,
        "accepted appends stay silent: {events:?}"
    );
}

#[test]
fn rejected_push_emits_trace_event() {
    let mut storage = [MaybeUninit::<u8>::uninit(); 2];
    let events = record(|| {
        let mut buf = AppendBuffer::new(&mut storage);
        buf.push(1).unwrap();
        buf.push(2).unwrap();
        assert_eq!(buf.push(3), Err(Error::Full));
    });

    let rejected = find(&events, "push rejected: buffer full");
    assert_eq!(rejected.level, Level::TRACE);
    assert_eq!(rejected.fields["reserved"], "2");
    assert_eq!(rejected.fields["capacity"], "2");
}

#[test]
fn administrative_calls_emit_debug_events() {
    let mut fresh = [MaybeUninit::<u32>::uninit(); 4];
    let mut live = [0u32; 6];
    let events = record(|| {
        let mut buf = AppendBuffer::new(&mut fresh);
        buf.push(1).unwrap();
        buf.push(2).unwrap();
        buf.clear();
        // SAFETY: slot 0 was written before `clear`.
        unsafe { buf.force_resize(1).unwrap() };
        buf.rebind_init(&mut live).unwrap();
    });

    let debug: Vec<&str> = events
        .iter()
        .filter(|e| e.level == Level::DEBUG)
        .map(|e| e.message.as_str())
        .collect();
    assert_eq!(
        debug,
        [
            "append buffer bound",
            "append buffer cleared",
            "append buffer resized",
            "append buffer rebound",
        ]
    );

    let bound = find(&events, "append buffer bound");
    assert_eq!(bound.fields["capacity"], "4");
    assert_eq!(bound.fields["slots"], "4");
    assert_eq!(bound.fields["live"], "false");

    let cleared = find(&events, "append buffer cleared");
    assert_eq!(cleared.fields["len"], "2");

    let resized = find(&events, "append buffer resized");
    assert_eq!(resized.fields["from"], "0");
    assert_eq!(resized.fields["to"], "1");

    let rebound = find(&events, "append buffer rebound");
    assert_eq!(rebound.fields["len"], "1");
    assert_eq!(rebound.fields["slots"], "6");
    assert_eq!(rebound.fields["live"], "true");
}
