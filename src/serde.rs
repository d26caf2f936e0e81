// This file is part of bounded-append-buffer.
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `serde` support for [`AppendBuffer`](crate::AppendBuffer).
//!
//! - **Serialize**: as a sequence of the `len` initialized elements.
//! - **Deserialize**: the buffer cannot own storage, so there is no
//!   `Deserialize` impl. Instead `&mut AppendBuffer` is a
//!   [`DeserializeSeed`]: it appends every element of a sequence into the
//!   bound storage and yields the number of elements appended. A sequence
//!   longer than the remaining capacity is a deserialization error; elements
//!   appended before the error stay in the buffer.

// Crate imports
use crate::{buffer::AppendBuffer, counter::AtomicCount, error::Error};

// Core imports
use core::fmt;

// External imports - serde
use serde::{de, ser, Deserialize, Deserializer, Serialize, Serializer};

impl<T: Serialize, C: AtomicCount> Serialize for AppendBuffer<'_, T, C> {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        use ser::SerializeSeq;
        let sl = self.as_slice();
        let mut seq = s.serialize_seq(Some(sl.len()))?;
        for item in sl {
            seq.serialize_element(item)?;
        }
        seq.end()
    }
}

struct AppendVisitor<'b, 'a, T, C: AtomicCount>(&'b mut AppendBuffer<'a, T, C>);

impl<'de, T, C> de::Visitor<'de> for AppendVisitor<'_, '_, T, C>
where
    T: Deserialize<'de>,
    C: AtomicCount,
{
    type Value = usize;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "sequence with at most {} elements", self.0.remaining_capacity())
    }

    fn visit_seq<A: de::SeqAccess<'de>>(self, mut a: A) -> Result<Self::Value, A::Error> {
        let capacity = self.0.capacity();
        let mut appended = 0;
        while let Some(elem) = a.next_element::<T>()? {
            self.0.push(elem).map_err(|e| match e {
                Error::Full => <A::Error as de::Error>::custom(format_args!(
                    "too many elements (capacity {capacity})"
                )),
                other => <A::Error as de::Error>::custom(other),
            })?;
            appended += 1;
        }
        Ok(appended)
    }
}

impl<'de, T, C> de::DeserializeSeed<'de> for &mut AppendBuffer<'_, T, C>
where
    T: Deserialize<'de>,
    C: AtomicCount,
{
    type Value = usize;

    fn deserialize<D: Deserializer<'de>>(self, d: D) -> Result<Self::Value, D::Error> {
        d.deserialize_seq(AppendVisitor(self))
    }
}
