/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Shape serialization interfaces for the shape data model.

use crate::{SchemaRef, SerdeError};
use quiver_types::{BigDecimal, BigInteger, Blob, DateTime, Document};

/// Serializes shapes to a target format.
///
/// This trait provides a format-agnostic API for serializing the shape data
/// model. Implementations serialize each data type to the corresponding
/// encoding in their serial format.
///
/// The serializer accepts a schema along with the value to provide additional
/// information about how to serialize it (timestamp format, member name,
/// binding traits). Aggregate values are written through a callback that
/// re-enters the serializer for each member, element, or entry; the
/// serializer emits framing before and after running the callback and invokes
/// it exactly once.
///
/// Serializers are single-use: one value per instance, with the serialized
/// output harvested by an inherent `finish` method on the concrete type.
pub trait ShapeSerializer {
    /// Writes a structure or union.
    ///
    /// The callback writes each populated member, in schema order, passing
    /// the member schema with each value.
    fn write_struct<F>(&mut self, schema: &SchemaRef, members: F) -> Result<(), SerdeError>
    where
        F: FnOnce(&mut Self) -> Result<(), SerdeError>;

    /// Writes a list.
    ///
    /// `size` is the element count when known; `None` requests an
    /// indefinite-length encoding from formats that support one.
    fn write_list<F>(
        &mut self,
        schema: &SchemaRef,
        size: Option<usize>,
        elements: F,
    ) -> Result<(), SerdeError>
    where
        F: FnOnce(&mut Self) -> Result<(), SerdeError>;

    /// Writes a map.
    ///
    /// The callback writes each entry as a key write (with the map's key
    /// schema) followed by a value write; every key of one map uses the same
    /// key schema. `size` is the entry count when known.
    fn write_map<F>(
        &mut self,
        schema: &SchemaRef,
        size: Option<usize>,
        entries: F,
    ) -> Result<(), SerdeError>
    where
        F: FnOnce(&mut Self) -> Result<(), SerdeError>;

    /// Writes a boolean value.
    fn write_boolean(&mut self, schema: &SchemaRef, value: bool) -> Result<(), SerdeError>;

    /// Writes a byte (i8) value.
    fn write_byte(&mut self, schema: &SchemaRef, value: i8) -> Result<(), SerdeError>;

    /// Writes a short (i16) value.
    fn write_short(&mut self, schema: &SchemaRef, value: i16) -> Result<(), SerdeError>;

    /// Writes an integer (i32) value.
    fn write_integer(&mut self, schema: &SchemaRef, value: i32) -> Result<(), SerdeError>;

    /// Writes a long (i64) value.
    fn write_long(&mut self, schema: &SchemaRef, value: i64) -> Result<(), SerdeError>;

    /// Writes a float (f32) value.
    fn write_float(&mut self, schema: &SchemaRef, value: f32) -> Result<(), SerdeError>;

    /// Writes a double (f64) value.
    fn write_double(&mut self, schema: &SchemaRef, value: f64) -> Result<(), SerdeError>;

    /// Writes a big integer value.
    fn write_big_integer(
        &mut self,
        schema: &SchemaRef,
        value: &BigInteger,
    ) -> Result<(), SerdeError>;

    /// Writes a big decimal value.
    fn write_big_decimal(
        &mut self,
        schema: &SchemaRef,
        value: &BigDecimal,
    ) -> Result<(), SerdeError>;

    /// Writes a string value.
    fn write_string(&mut self, schema: &SchemaRef, value: &str) -> Result<(), SerdeError>;

    /// Writes a blob (byte array) value.
    fn write_blob(&mut self, schema: &SchemaRef, value: &Blob) -> Result<(), SerdeError>;

    /// Writes a timestamp value.
    fn write_timestamp(&mut self, schema: &SchemaRef, value: &DateTime) -> Result<(), SerdeError>;

    /// Writes a document value.
    fn write_document(&mut self, schema: &SchemaRef, value: &Document) -> Result<(), SerdeError>;

    /// Writes a null value (for sparse collections).
    fn write_null(&mut self, schema: &SchemaRef) -> Result<(), SerdeError>;
}

/// A [`ShapeSerializer`] whose aggregate framing can be driven
/// incrementally.
///
/// The callback-based aggregate methods of [`ShapeSerializer`] re-enter the
/// serializer at the callback's concrete type, which keeps hot paths
/// monomorphic but means an adapter cannot interpose on a delegate's
/// framing. Serializers that can emit their aggregate framing as explicit
/// begin/end pairs implement this trait as well; adapters that re-route
/// member writes (the HTTP binding body filter) require it of their inner
/// serializer.
///
/// `begin_*` emits everything [`ShapeSerializer::write_struct`] (etc.) emits
/// before invoking its callback, and `end_*` everything emitted after; an
/// aggregate written through a begin/end pair is byte-identical to one
/// written through the callback form.
pub trait FramedShapeSerializer: ShapeSerializer {
    /// Emits the framing that precedes a structure's members.
    fn begin_struct(&mut self, schema: &SchemaRef) -> Result<(), SerdeError>;

    /// Emits the framing that follows a structure's members.
    fn end_struct(&mut self, schema: &SchemaRef) -> Result<(), SerdeError>;

    /// Emits the framing that precedes a list's elements.
    fn begin_list(&mut self, schema: &SchemaRef, size: Option<usize>) -> Result<(), SerdeError>;

    /// Emits the framing that follows a list's elements.
    fn end_list(&mut self, schema: &SchemaRef) -> Result<(), SerdeError>;

    /// Emits the framing that precedes a map's entries.
    fn begin_map(&mut self, schema: &SchemaRef, size: Option<usize>) -> Result<(), SerdeError>;

    /// Emits the framing that follows a map's entries.
    fn end_map(&mut self, schema: &SchemaRef) -> Result<(), SerdeError>;
}

/// Trait for structures that can be serialized.
///
/// This trait is implemented by generated structure types to enable
/// schema-based serialization.
///
/// # Example
///
/// ```ignore
/// impl SerializableStruct for PutItemInput {
///     fn schema(&self) -> SchemaRef {
///         PUT_ITEM_INPUT.clone()
///     }
///
///     fn serialize_members<S: ShapeSerializer>(&self, ser: &mut S) -> Result<(), SerdeError> {
///         let schema = self.schema();
///         ser.write_string(schema.member("id").unwrap(), &self.id)?;
///         ser.write_integer(schema.member("count").unwrap(), self.count)?;
///         Ok(())
///     }
/// }
/// ```
pub trait SerializableStruct {
    /// Returns the schema of this structure.
    fn schema(&self) -> SchemaRef;

    /// Serializes this structure, including its struct framing.
    fn serialize<S: ShapeSerializer>(&self, serializer: &mut S) -> Result<(), SerdeError> {
        let schema = self.schema();
        serializer.write_struct(&schema, |s| self.serialize_members(s))
    }

    /// Serializes the members of this structure without the struct framing.
    ///
    /// Every populated member is written exactly once, in schema order, with
    /// its member schema.
    fn serialize_members<S: ShapeSerializer>(&self, serializer: &mut S)
        -> Result<(), SerdeError>;
}
