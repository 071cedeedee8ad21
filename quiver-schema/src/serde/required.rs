/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::serde::ShapeSerializer;
use crate::{SchemaRef, SerdeError};
use quiver_types::{BigDecimal, BigInteger, Blob, DateTime, Document};

/// Wraps a delegate and asserts that at least one value was written.
///
/// Used where a caller contractually must produce a value, such as a URI
/// label. Only scalar writes are supported; the positions that require a
/// write never accept aggregates.
#[derive(Debug)]
pub struct RequiredWriteSerializer<'a, S> {
    inner: &'a mut S,
    wrote: bool,
}

impl<'a, S: ShapeSerializer> RequiredWriteSerializer<'a, S> {
    /// Creates a serializer asserting that `inner` receives at least one write.
    pub fn new(inner: &'a mut S) -> Self {
        Self {
            inner,
            wrote: false,
        }
    }

    /// Finishes, failing if no value was ever written.
    pub fn finish(self) -> Result<(), SerdeError> {
        if self.wrote {
            Ok(())
        } else {
            Err(SerdeError::protocol("expected a value to be written"))
        }
    }
}

macro_rules! tracked_write {
    ($method:ident, $value_ty:ty) => {
        fn $method(&mut self, schema: &SchemaRef, value: $value_ty) -> Result<(), SerdeError> {
            self.wrote = true;
            self.inner.$method(schema, value)
        }
    };
}

impl<S: ShapeSerializer> ShapeSerializer for RequiredWriteSerializer<'_, S> {
    crate::reject_shape_writes!(structure list map);

    tracked_write!(write_boolean, bool);
    tracked_write!(write_byte, i8);
    tracked_write!(write_short, i16);
    tracked_write!(write_integer, i32);
    tracked_write!(write_long, i64);
    tracked_write!(write_float, f32);
    tracked_write!(write_double, f64);
    tracked_write!(write_big_integer, &BigInteger);
    tracked_write!(write_big_decimal, &BigDecimal);
    tracked_write!(write_string, &str);
    tracked_write!(write_blob, &Blob);
    tracked_write!(write_timestamp, &DateTime);
    tracked_write!(write_document, &Document);

    fn write_null(&mut self, schema: &SchemaRef) -> Result<(), SerdeError> {
        self.wrote = true;
        self.inner.write_null(schema)
    }
}
