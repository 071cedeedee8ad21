/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Serialization and deserialization interfaces for the shape data model.

mod deserializer;
pub mod document;
mod fmt;
mod intercept;
mod null;
mod required;
mod serializer;
pub mod validate;

pub use deserializer::ShapeDeserializer;
pub use fmt::FmtSerializer;
pub use intercept::{InterceptingSerializer, Interceptor};
pub use null::NullSerializer;
pub use required::RequiredWriteSerializer;
pub use serializer::{FramedShapeSerializer, SerializableStruct, ShapeSerializer};

use crate::{SchemaRef, SerdeError};

/// Trait for structures that can be deserialized member by member.
///
/// Implemented by generated structure types. Orchestrators that split a
/// structure across several sources (the HTTP binding layer) call
/// [`read_member`](Self::read_member) directly, pointing each member at the
/// deserializer for its transport location; single-source codecs use
/// [`deserialize`](Self::deserialize).
pub trait DeserializableStruct: Sized {
    /// The builder accumulating members before [`build`](Self::build).
    type Builder: Default;

    /// Returns the schema of this structure.
    fn schema() -> SchemaRef;

    /// Reads a single member into the builder from the given deserializer.
    ///
    /// Members not known to the builder are ignored.
    fn read_member<D: ShapeDeserializer>(
        builder: Self::Builder,
        member: &SchemaRef,
        deserializer: &mut D,
    ) -> Result<Self::Builder, SerdeError>;

    /// Builds the structure, failing if required members are missing.
    fn build(builder: Self::Builder) -> Result<Self, SerdeError>;

    /// Deserializes the structure from a single deserializer.
    fn deserialize<D: ShapeDeserializer>(deserializer: &mut D) -> Result<Self, SerdeError> {
        let schema = Self::schema();
        let builder =
            deserializer.read_struct(&schema, Self::Builder::default(), Self::read_member)?;
        Self::build(builder)
    }
}

/// Generates `SchemaMismatch`-returning serializer methods for the listed
/// shape kinds.
///
/// Location-specific serializers accept only a couple of shape kinds; this
/// macro supplies the default-reject methods for the rest, in the body of a
/// [`ShapeSerializer`] impl.
#[macro_export]
macro_rules! reject_shape_writes {
    () => {};
    (structure $($rest:ident)*) => {
        fn write_struct<F>(
            &mut self,
            schema: &$crate::SchemaRef,
            _members: F,
        ) -> Result<(), $crate::SerdeError>
        where
            F: FnOnce(&mut Self) -> Result<(), $crate::SerdeError>,
        {
            Err($crate::SerdeError::mismatch(format!(
                "structures cannot be serialized here (schema `{}`)",
                schema.id()
            )))
        }
        $crate::reject_shape_writes!($($rest)*);
    };
    (list $($rest:ident)*) => {
        fn write_list<F>(
            &mut self,
            schema: &$crate::SchemaRef,
            _size: Option<usize>,
            _elements: F,
        ) -> Result<(), $crate::SerdeError>
        where
            F: FnOnce(&mut Self) -> Result<(), $crate::SerdeError>,
        {
            Err($crate::SerdeError::mismatch(format!(
                "lists cannot be serialized here (schema `{}`)",
                schema.id()
            )))
        }
        $crate::reject_shape_writes!($($rest)*);
    };
    (map $($rest:ident)*) => {
        fn write_map<F>(
            &mut self,
            schema: &$crate::SchemaRef,
            _size: Option<usize>,
            _entries: F,
        ) -> Result<(), $crate::SerdeError>
        where
            F: FnOnce(&mut Self) -> Result<(), $crate::SerdeError>,
        {
            Err($crate::SerdeError::mismatch(format!(
                "maps cannot be serialized here (schema `{}`)",
                schema.id()
            )))
        }
        $crate::reject_shape_writes!($($rest)*);
    };
    (boolean $($rest:ident)*) => {
        $crate::__reject_scalar_write!(write_boolean, bool, "booleans");
        $crate::reject_shape_writes!($($rest)*);
    };
    (byte $($rest:ident)*) => {
        $crate::__reject_scalar_write!(write_byte, i8, "bytes");
        $crate::reject_shape_writes!($($rest)*);
    };
    (short $($rest:ident)*) => {
        $crate::__reject_scalar_write!(write_short, i16, "shorts");
        $crate::reject_shape_writes!($($rest)*);
    };
    (integer $($rest:ident)*) => {
        $crate::__reject_scalar_write!(write_integer, i32, "integers");
        $crate::reject_shape_writes!($($rest)*);
    };
    (long $($rest:ident)*) => {
        $crate::__reject_scalar_write!(write_long, i64, "longs");
        $crate::reject_shape_writes!($($rest)*);
    };
    (float $($rest:ident)*) => {
        $crate::__reject_scalar_write!(write_float, f32, "floats");
        $crate::reject_shape_writes!($($rest)*);
    };
    (double $($rest:ident)*) => {
        $crate::__reject_scalar_write!(write_double, f64, "doubles");
        $crate::reject_shape_writes!($($rest)*);
    };
    (big_integer $($rest:ident)*) => {
        $crate::__reject_scalar_write!(
            write_big_integer,
            &quiver_types::BigInteger,
            "big integers"
        );
        $crate::reject_shape_writes!($($rest)*);
    };
    (big_decimal $($rest:ident)*) => {
        $crate::__reject_scalar_write!(
            write_big_decimal,
            &quiver_types::BigDecimal,
            "big decimals"
        );
        $crate::reject_shape_writes!($($rest)*);
    };
    (string $($rest:ident)*) => {
        $crate::__reject_scalar_write!(write_string, &str, "strings");
        $crate::reject_shape_writes!($($rest)*);
    };
    (blob $($rest:ident)*) => {
        $crate::__reject_scalar_write!(write_blob, &quiver_types::Blob, "blobs");
        $crate::reject_shape_writes!($($rest)*);
    };
    (timestamp $($rest:ident)*) => {
        $crate::__reject_scalar_write!(write_timestamp, &quiver_types::DateTime, "timestamps");
        $crate::reject_shape_writes!($($rest)*);
    };
    (document $($rest:ident)*) => {
        $crate::__reject_scalar_write!(write_document, &quiver_types::Document, "documents");
        $crate::reject_shape_writes!($($rest)*);
    };
    (null $($rest:ident)*) => {
        fn write_null(&mut self, schema: &$crate::SchemaRef) -> Result<(), $crate::SerdeError> {
            Err($crate::SerdeError::mismatch(format!(
                "null cannot be serialized here (schema `{}`)",
                schema.id()
            )))
        }
        $crate::reject_shape_writes!($($rest)*);
    };
}

/// Implementation detail of [`reject_shape_writes`].
#[doc(hidden)]
#[macro_export]
macro_rules! __reject_scalar_write {
    ($method:ident, $value_ty:ty, $what:literal) => {
        fn $method(
            &mut self,
            schema: &$crate::SchemaRef,
            _value: $value_ty,
        ) -> Result<(), $crate::SerdeError> {
            Err($crate::SerdeError::mismatch(format!(
                concat!($what, " cannot be serialized here (schema `{}`)"),
                schema.id()
            )))
        }
    };
}
