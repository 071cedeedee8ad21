/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Shape deserialization interfaces for the shape data model.

use crate::{SchemaRef, SerdeError};
use quiver_types::{BigDecimal, BigInteger, Blob, DateTime, Document};

/// Deserializes shapes from a serial format.
///
/// This trait provides a format-agnostic API for deserializing the shape data
/// model. Implementations read from a serial format and create data objects
/// based on schemas.
///
/// The deserializer uses a consumer pattern for aggregate types. The consumer
/// receives state and returns updated state with each deserialized value,
/// which keeps aggregate deserialization allocation-free: the closure can be
/// inlined and the state is typically a builder moved through the calls.
///
/// # Example
///
/// ```ignore
/// let builder = deserializer.read_struct(
///     &PERSON,
///     PersonBuilder::default(),
///     |mut builder, member, de| {
///         match member.member_index() {
///             Some(0) => builder.name = Some(de.read_string(member)?),
///             Some(1) => builder.age = Some(de.read_integer(member)?),
///             _ => {}
///         }
///         Ok(builder)
///     },
/// )?;
/// ```
pub trait ShapeDeserializer {
    /// Reads a structure or union.
    ///
    /// The consumer is invoked once per member present on the wire with
    /// `(state, member_schema, deserializer)` and returns the updated state.
    fn read_struct<T, F>(
        &mut self,
        schema: &SchemaRef,
        state: T,
        consumer: F,
    ) -> Result<T, SerdeError>
    where
        F: FnMut(T, &SchemaRef, &mut Self) -> Result<T, SerdeError>;

    /// Reads a list.
    ///
    /// The consumer is invoked once per element with `(state, deserializer)`.
    fn read_list<T, F>(
        &mut self,
        schema: &SchemaRef,
        state: T,
        consumer: F,
    ) -> Result<T, SerdeError>
    where
        F: FnMut(T, &mut Self) -> Result<T, SerdeError>;

    /// Reads a string-keyed map.
    ///
    /// The consumer is invoked once per entry with `(state, key, deserializer)`.
    fn read_string_map<T, F>(
        &mut self,
        schema: &SchemaRef,
        state: T,
        consumer: F,
    ) -> Result<T, SerdeError>
    where
        F: FnMut(T, String, &mut Self) -> Result<T, SerdeError>;

    /// Reads a boolean value.
    fn read_boolean(&mut self, schema: &SchemaRef) -> Result<bool, SerdeError>;

    /// Reads a byte (i8) value.
    fn read_byte(&mut self, schema: &SchemaRef) -> Result<i8, SerdeError>;

    /// Reads a short (i16) value.
    fn read_short(&mut self, schema: &SchemaRef) -> Result<i16, SerdeError>;

    /// Reads an integer (i32) value.
    fn read_integer(&mut self, schema: &SchemaRef) -> Result<i32, SerdeError>;

    /// Reads a long (i64) value.
    fn read_long(&mut self, schema: &SchemaRef) -> Result<i64, SerdeError>;

    /// Reads a float (f32) value.
    fn read_float(&mut self, schema: &SchemaRef) -> Result<f32, SerdeError>;

    /// Reads a double (f64) value.
    fn read_double(&mut self, schema: &SchemaRef) -> Result<f64, SerdeError>;

    /// Reads a big integer value.
    fn read_big_integer(&mut self, schema: &SchemaRef) -> Result<BigInteger, SerdeError>;

    /// Reads a big decimal value.
    fn read_big_decimal(&mut self, schema: &SchemaRef) -> Result<BigDecimal, SerdeError>;

    /// Reads a string value.
    fn read_string(&mut self, schema: &SchemaRef) -> Result<String, SerdeError>;

    /// Reads a blob (byte array) value.
    fn read_blob(&mut self, schema: &SchemaRef) -> Result<Blob, SerdeError>;

    /// Reads a timestamp value.
    fn read_timestamp(&mut self, schema: &SchemaRef) -> Result<DateTime, SerdeError>;

    /// Reads a document value.
    fn read_document(&mut self, schema: &SchemaRef) -> Result<Document, SerdeError>;

    /// Consumes an explicit null value.
    fn read_null(&mut self, schema: &SchemaRef) -> Result<(), SerdeError>;

    /// Checks whether the current position holds a null.
    ///
    /// Used for sparse collections where null values are significant; pair
    /// with [`read_null`](Self::read_null) to consume the null.
    fn is_null(&mut self) -> bool;

    /// Returns the size of the current container if known.
    ///
    /// This is an optimization hint that allows pre-allocating collections
    /// with the correct capacity. Returns `None` if the size is unknown or
    /// not applicable.
    fn container_size(&mut self) -> Option<usize>;
}
