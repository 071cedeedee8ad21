/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::binding::{Binding, BindingMatcher};
use quiver_schema::serde::{FramedShapeSerializer, ShapeSerializer};
use quiver_schema::{SchemaRef, SerdeError};
use quiver_types::{BigDecimal, BigInteger, Blob, DateTime, Document};
use std::sync::Arc;

/// Which members the filter lets through to the payload codec.
#[derive(Debug, Clone, Copy)]
pub(crate) enum FilterMode {
    /// Forward body-bound members, inside the top-level struct framing.
    Body,
    /// Forward only the payload member at this index, standalone.
    Payload(usize),
}

/// Routes the members the matcher assigns to the message body into the
/// payload codec's serializer and consumes everything else.
///
/// The structure is walked a second time through this filter, so the payload
/// codec sees a single coherent struct serialization containing exactly the
/// body members. Aggregate framing of the inner serializer is driven through
/// its begin/end pairs, which keeps the filter compatible with any codec
/// whose serializer implements [`FramedShapeSerializer`].
#[derive(Debug)]
pub(crate) struct BodyFilterSerializer<S> {
    inner: S,
    matcher: Arc<BindingMatcher>,
    mode: FilterMode,
    entered: bool,
    depth: usize,
    skip_depth: usize,
}

impl<S: FramedShapeSerializer> BodyFilterSerializer<S> {
    pub(crate) fn new(inner: S, matcher: Arc<BindingMatcher>, mode: FilterMode) -> Self {
        Self {
            inner,
            matcher,
            mode,
            entered: false,
            depth: 0,
            skip_depth: 0,
        }
    }

    pub(crate) fn into_inner(self) -> S {
        self.inner
    }

    fn forwards(&self, member: &SchemaRef) -> Result<bool, SerdeError> {
        match self.mode {
            FilterMode::Body => Ok(self.matcher.binding(member)? == Binding::Body),
            FilterMode::Payload(index) => Ok(member.member_index() == Some(index)),
        }
    }

    fn skip<F>(&mut self, body: F) -> Result<(), SerdeError>
    where
        F: FnOnce(&mut Self) -> Result<(), SerdeError>,
    {
        self.skip_depth += 1;
        let result = body(self);
        self.skip_depth -= 1;
        result
    }

    // Scalar dispatch: inside a forwarded aggregate everything forwards; at
    // the member level only matching members do; in skip mode nothing does.
    fn forward_scalar(&mut self, member: &SchemaRef) -> Result<bool, SerdeError> {
        if self.skip_depth > 0 {
            return Ok(false);
        }
        if self.depth > 0 {
            return Ok(true);
        }
        if !self.entered {
            return Err(SerdeError::mismatch(
                "the body filter serializes structures only",
            ));
        }
        self.forwards(member)
    }
}

macro_rules! filtered_scalar_write {
    ($method:ident, $value_ty:ty) => {
        fn $method(&mut self, schema: &SchemaRef, value: $value_ty) -> Result<(), SerdeError> {
            if self.forward_scalar(schema)? {
                self.inner.$method(schema, value)?;
            }
            Ok(())
        }
    };
}

impl<S: FramedShapeSerializer> ShapeSerializer for BodyFilterSerializer<S> {
    fn write_struct<F>(&mut self, schema: &SchemaRef, members: F) -> Result<(), SerdeError>
    where
        F: FnOnce(&mut Self) -> Result<(), SerdeError>,
    {
        if self.skip_depth > 0 {
            return self.skip(members);
        }
        if !self.entered {
            self.entered = true;
            return match self.mode {
                FilterMode::Body => {
                    self.inner.begin_struct(schema)?;
                    members(self)?;
                    self.inner.end_struct(schema)
                }
                // The payload member serializes standalone; the top-level
                // struct contributes no framing of its own.
                FilterMode::Payload(_) => members(self),
            };
        }
        let forward = self.depth > 0 || self.forwards(schema)?;
        if !forward {
            return self.skip(members);
        }
        self.inner.begin_struct(schema)?;
        self.depth += 1;
        let result = members(self);
        self.depth -= 1;
        result?;
        self.inner.end_struct(schema)
    }

    fn write_list<F>(
        &mut self,
        schema: &SchemaRef,
        size: Option<usize>,
        elements: F,
    ) -> Result<(), SerdeError>
    where
        F: FnOnce(&mut Self) -> Result<(), SerdeError>,
    {
        if self.skip_depth > 0 {
            return self.skip(elements);
        }
        if !self.entered {
            return Err(SerdeError::mismatch(
                "the body filter serializes structures only",
            ));
        }
        let forward = self.depth > 0 || self.forwards(schema)?;
        if !forward {
            return self.skip(elements);
        }
        self.inner.begin_list(schema, size)?;
        self.depth += 1;
        let result = elements(self);
        self.depth -= 1;
        result?;
        self.inner.end_list(schema)
    }

    fn write_map<F>(
        &mut self,
        schema: &SchemaRef,
        size: Option<usize>,
        entries: F,
    ) -> Result<(), SerdeError>
    where
        F: FnOnce(&mut Self) -> Result<(), SerdeError>,
    {
        if self.skip_depth > 0 {
            return self.skip(entries);
        }
        if !self.entered {
            return Err(SerdeError::mismatch(
                "the body filter serializes structures only",
            ));
        }
        let forward = self.depth > 0 || self.forwards(schema)?;
        if !forward {
            return self.skip(entries);
        }
        self.inner.begin_map(schema, size)?;
        self.depth += 1;
        let result = entries(self);
        self.depth -= 1;
        result?;
        self.inner.end_map(schema)
    }

    filtered_scalar_write!(write_boolean, bool);
    filtered_scalar_write!(write_byte, i8);
    filtered_scalar_write!(write_short, i16);
    filtered_scalar_write!(write_integer, i32);
    filtered_scalar_write!(write_long, i64);
    filtered_scalar_write!(write_float, f32);
    filtered_scalar_write!(write_double, f64);
    filtered_scalar_write!(write_big_integer, &BigInteger);
    filtered_scalar_write!(write_big_decimal, &BigDecimal);
    filtered_scalar_write!(write_string, &str);
    filtered_scalar_write!(write_blob, &Blob);
    filtered_scalar_write!(write_timestamp, &DateTime);
    filtered_scalar_write!(write_document, &Document);

    fn write_null(&mut self, schema: &SchemaRef) -> Result<(), SerdeError> {
        if self.forward_scalar(schema)? {
            self.inner.write_null(schema)?;
        }
        Ok(())
    }
}
