/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::serde::ShapeSerializer;
use crate::{SchemaRef, SerdeError};
use quiver_types::{BigDecimal, BigInteger, Blob, DateTime, Document};

/// Before/after hooks for an [`InterceptingSerializer`].
pub trait Interceptor {
    /// Called before a value is written.
    fn before(&mut self, _schema: &SchemaRef) -> Result<(), SerdeError> {
        Ok(())
    }

    /// Called after a value is written.
    fn after(&mut self, _schema: &SchemaRef) -> Result<(), SerdeError> {
        Ok(())
    }
}

/// Routes scalar writes to a delegate, surrounding each with the
/// interceptor's before/after hooks.
///
/// Aggregate writes are rejected: an aggregate callback re-enters its
/// serializer at the callback's concrete type, so a generic wrapper cannot
/// thread its hooks through the delegate's framing. Serializers that need
/// per-member framing around aggregates inline this pattern instead (the
/// CBOR struct serializer and the HTTP binding router both do).
#[derive(Debug)]
pub struct InterceptingSerializer<'a, S, I> {
    inner: &'a mut S,
    interceptor: &'a mut I,
}

impl<'a, S, I> InterceptingSerializer<'a, S, I>
where
    S: ShapeSerializer,
    I: Interceptor,
{
    /// Creates a serializer routing writes to `inner` through `interceptor`.
    pub fn new(inner: &'a mut S, interceptor: &'a mut I) -> Self {
        Self { inner, interceptor }
    }
}

macro_rules! intercepted_write {
    ($method:ident, $value_ty:ty) => {
        fn $method(&mut self, schema: &SchemaRef, value: $value_ty) -> Result<(), SerdeError> {
            self.interceptor.before(schema)?;
            self.inner.$method(schema, value)?;
            self.interceptor.after(schema)
        }
    };
}

impl<S, I> ShapeSerializer for InterceptingSerializer<'_, S, I>
where
    S: ShapeSerializer,
    I: Interceptor,
{
    crate::reject_shape_writes!(structure list map);

    intercepted_write!(write_boolean, bool);
    intercepted_write!(write_byte, i8);
    intercepted_write!(write_short, i16);
    intercepted_write!(write_integer, i32);
    intercepted_write!(write_long, i64);
    intercepted_write!(write_float, f32);
    intercepted_write!(write_double, f64);
    intercepted_write!(write_big_integer, &BigInteger);
    intercepted_write!(write_big_decimal, &BigDecimal);
    intercepted_write!(write_string, &str);
    intercepted_write!(write_blob, &Blob);
    intercepted_write!(write_timestamp, &DateTime);
    intercepted_write!(write_document, &Document);

    fn write_null(&mut self, schema: &SchemaRef) -> Result<(), SerdeError> {
        self.interceptor.before(schema)?;
        self.inner.write_null(schema)?;
        self.interceptor.after(schema)
    }
}
